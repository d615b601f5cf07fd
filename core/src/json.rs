//! JSON encoding for values embedded in a `<script>` element.
//!
//! Values are serialized with `serde_json` and then made HTML-safe: the
//! characters `<`, `>` and `&`, plus the JavaScript line terminators U+2028
//! and U+2029, are written as `\u` escapes. Those characters can only occur
//! inside string literals in serialized JSON, so the result is still valid
//! JSON and parses back to the same value, but it can never close the
//! surrounding script element.

use serde::Serialize;
use serde_json::Value;
use std::fmt::Write;

/// Encode a value as HTML-safe JSON.
///
/// `None` encodes as `null`.
///
/// # Example
///
/// ```
/// use landmark_core::json::encode;
///
/// assert_eq!(encode(&"say \"hi\""), r#""say \"hi\"""#);
/// assert_eq!(encode(&None::<String>), "null");
/// assert_eq!(encode(&"</script>"), r#""\u003c/script\u003e""#);
/// ```
#[must_use]
pub fn encode<T>(value: &T) -> String
where
    T: Serialize + ?Sized,
{
    // Only reachable for foreign Serialize impls; strings and Properties never fail.
    let raw = serde_json::to_string(value).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "Value could not be encoded as JSON, rendering null");
        Value::Null.to_string()
    });
    escape_html(&raw)
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '<' | '>' | '&' | '\u{2028}' | '\u{2029}' => {
                let _ = write!(out, "\\u{:04x}", u32::from(c));
            }
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_encode_plain_string() {
        assert_eq!(encode("/"), "\"/\"");
    }

    #[test]
    fn test_encode_quotes_and_backslashes() {
        assert_eq!(encode(r#"a"b\c"#), r#""a\"b\\c""#);
    }

    #[test]
    fn test_encode_unicode_passes_through() {
        assert_eq!(encode("café ☕"), "\"café ☕\"");
    }

    #[test]
    fn test_encode_none_is_null() {
        assert_eq!(encode(&None::<&str>), "null");
    }

    #[test]
    fn test_encode_empty_object() {
        assert_eq!(encode(&json!({})), "{}");
    }

    #[test]
    fn test_encode_script_terminator() {
        let encoded = encode("</script><script>alert(1)</script>");
        assert!(!encoded.contains('<'));
        assert!(!encoded.contains('>'));
        let decoded: String = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, "</script><script>alert(1)</script>");
    }

    #[test]
    fn test_encode_line_separators() {
        let encoded = encode("a\u{2028}b\u{2029}c");
        assert!(!encoded.contains('\u{2028}'));
        assert!(!encoded.contains('\u{2029}'));
        let decoded: String = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, "a\u{2028}b\u{2029}c");
    }

    #[test]
    fn test_encode_nested_object_escapes_keys_and_values() {
        let value = json!({"<k>": ["&", {"x": ">"}]});
        let encoded = encode(&value);
        assert!(!encoded.contains('<') && !encoded.contains('&'));
        let decoded: Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, value);
    }

    proptest! {
        #[test]
        fn prop_encode_round_trips(s in "\\PC*") {
            let encoded = encode(&s);
            let decoded: String = serde_json::from_str(&encoded).unwrap();
            prop_assert_eq!(decoded, s);
        }

        #[test]
        fn prop_encode_never_emits_markup(s in ".*") {
            let encoded = encode(&s);
            prop_assert!(!encoded.contains('<'));
            prop_assert!(!encoded.contains('>'));
        }
    }
}
