//! HTML-entity decoding for corpus text.
//!
//! Transcript chapters were ingested from sources that entity-encode text
//! (`&amp;`, `&quot;`, numeric references for smart quotes). Decoding happens
//! on the read path, when candidates come back from the vector index, so the
//! reranker and callers always see plain text.

use std::borrow::Cow;

// Longest entity we accept between '&' and ';'. Anything longer is left as
// literal text.
const MAX_ENTITY_LEN: usize = 10;

/// Decodes HTML entities in `text`, returning the input unchanged (borrowed)
/// when it contains none.
///
/// Handles the named entities seen in the corpus plus decimal (`&#8217;`)
/// and hexadecimal (`&#x2019;`) character references. Unknown or malformed
/// entities are passed through literally.
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        match parse_entity(tail) {
            Some((decoded, consumed)) => {
                out.push(decoded);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    Cow::Owned(out)
}

/// Parses one entity at the start of `tail` (which begins with '&').
/// Returns the decoded character and the number of bytes consumed,
/// including the trailing ';'.
fn parse_entity(tail: &str) -> Option<(char, usize)> {
    let semi = tail[1..].find(';')?;
    if semi == 0 || semi > MAX_ENTITY_LEN {
        return None;
    }

    let body = &tail[1..1 + semi];
    let decoded = if let Some(reference) = body.strip_prefix('#') {
        parse_numeric(reference)?
    } else {
        named_entity(body)?
    };

    Some((decoded, semi + 2))
}

fn parse_numeric(reference: &str) -> Option<char> {
    let code = if let Some(hex) = reference.strip_prefix(['x', 'X']) {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        reference.parse::<u32>().ok()?
    };
    char::from_u32(code)
}

fn named_entity(name: &str) -> Option<char> {
    let decoded = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "ldquo" => '\u{201c}',
        "rdquo" => '\u{201d}',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "hellip" => '\u{2026}',
        _ => return None,
    };
    Some(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;

    #[test]
    fn test_plain_text_is_borrowed() {
        let text = "starting a startup is hard";
        assert!(matches!(decode_entities(text), Cow::Borrowed(_)));
        assert_eq!(decode_entities(text), text);
    }

    #[test]
    fn test_named_entities() {
        assert_eq!(
            decode_entities("Y Combinator &amp; friends"),
            "Y Combinator & friends"
        );
        assert_eq!(
            decode_entities("&quot;do things that don&apos;t scale&quot;"),
            "\"do things that don't scale\""
        );
        assert_eq!(decode_entities("a &lt; b &gt; c"), "a < b > c");
    }

    #[test]
    fn test_numeric_references() {
        assert_eq!(decode_entities("don&#39;t"), "don't");
        assert_eq!(decode_entities("it&#8217;s"), "it\u{2019}s");
        assert_eq!(decode_entities("it&#x2019;s"), "it\u{2019}s");
    }

    #[test]
    fn test_smart_quotes() {
        assert_eq!(
            decode_entities("&ldquo;growth&rdquo; &ndash; really"),
            "\u{201c}growth\u{201d} \u{2013} really"
        );
    }

    #[test]
    fn test_unknown_entity_passes_through() {
        assert_eq!(decode_entities("AT&T; &bogus; &"), "AT&T; &bogus; &");
    }

    #[test]
    fn test_unterminated_entity_passes_through() {
        assert_eq!(decode_entities("fish & chips"), "fish & chips");
        assert_eq!(decode_entities("trailing &amp"), "trailing &amp");
    }

    #[test]
    fn test_invalid_numeric_reference_passes_through() {
        assert_eq!(decode_entities("&#xZZ;"), "&#xZZ;");
        assert_eq!(decode_entities("&#1114112;"), "&#1114112;");
    }

    #[test]
    fn test_adjacent_entities() {
        assert_eq!(decode_entities("&amp;&amp;&amp;"), "&&&");
    }
}
