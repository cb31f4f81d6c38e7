//! Configuration error types.

use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable was not set.
    #[error("missing required environment variable: {name}")]
    MissingEnvVar { name: &'static str },

    /// A threshold is outside its valid range.
    #[error("invalid value for {name}: {value} (must be within {min} to {max})")]
    InvalidThreshold {
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    /// A size or count setting must be non-zero.
    #[error("invalid value for {name}: must be non-zero")]
    InvalidSize { name: &'static str },
}
