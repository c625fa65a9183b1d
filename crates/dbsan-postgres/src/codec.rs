//! Decode/encode of Postgres `COPY ... FROM stdin;` text-format values.

use dbsan_core::{DumpValue, Error, Result};

const DIALECT: &str = "postgres";

/// The two-character sentinel that represents SQL NULL in `COPY` text
/// format, in both directions.
pub const POSTGRES_COPY_NULL_VALUE: &str = "\\N";

/// Decode a single tab-delimited `COPY` field into a [`DumpValue`].
///
/// `\N` decodes to `Null`; every other value is unescaped per the table in
/// module docs and returned as `Text`. A field containing no backslash is
/// returned unchanged (fast path).
pub fn decode_copy_value(field: &str) -> Result<DumpValue> {
    if field == POSTGRES_COPY_NULL_VALUE {
        return Ok(DumpValue::Null);
    }
    if !field.contains('\\') {
        return Ok(DumpValue::Text(field.to_string()));
    }

    let chars: Vec<char> = field.chars().collect();
    let len = chars.len();
    let mut result = String::with_capacity(len);
    let mut i = 0usize;

    while i < len {
        if chars[i] != '\\' {
            result.push(chars[i]);
            i += 1;
            continue;
        }

        i += 1;
        if i >= len {
            return Err(Error::decode(DIALECT, "unterminated escape sequence", field));
        }

        match chars[i] {
            '\\' => {
                result.push('\\');
                i += 1;
            }
            'b' => {
                result.push('\u{8}');
                i += 1;
            }
            'f' => {
                result.push('\u{c}');
                i += 1;
            }
            'n' => {
                result.push('\n');
                i += 1;
            }
            'r' => {
                result.push('\r');
                i += 1;
            }
            't' => {
                result.push('\t');
                i += 1;
            }
            'v' => {
                result.push('\u{b}');
                i += 1;
            }
            c if c.is_digit(8) => {
                let start = i;
                let mut end = i + 1;
                while end < len && end < start + 3 && chars[end].is_digit(8) {
                    end += 1;
                }
                let octal: String = chars[start..end].iter().collect();
                let code = u32::from_str_radix(&octal, 8)
                    .map_err(|e| Error::decode(DIALECT, format!("invalid octal escape: {e}"), field))?;
                let ch = char::from_u32(code)
                    .ok_or_else(|| Error::decode(DIALECT, "octal escape out of range", field))?;
                result.push(ch);
                i = end;
            }
            'x' => {
                let start = i + 1;
                let mut end = start;
                while end < len && end < start + 2 && chars[end].is_ascii_hexdigit() {
                    end += 1;
                }
                if end == start {
                    return Err(Error::decode(DIALECT, "unrecognized escape sequence", field));
                }
                let hex: String = chars[start..end].iter().collect();
                let code = u32::from_str_radix(&hex, 16)
                    .map_err(|e| Error::decode(DIALECT, format!("invalid hex escape: {e}"), field))?;
                let ch = char::from_u32(code)
                    .ok_or_else(|| Error::decode(DIALECT, "hex escape out of range", field))?;
                result.push(ch);
                i = end;
            }
            _ => return Err(Error::decode(DIALECT, "unrecognized escape sequence", field)),
        }
    }

    Ok(DumpValue::Text(result))
}

/// Encode a [`DumpValue`] into a single tab-delimited `COPY` field.
///
/// `Null` always emits the `\N` sentinel — it is the only representation
/// of NULL in this codec's output.
pub fn encode_copy_value(value: &DumpValue) -> String {
    match value {
        DumpValue::Null => POSTGRES_COPY_NULL_VALUE.to_string(),
        DumpValue::Text(s) => escape_copy_value(s),
        DumpValue::Bool(b) => escape_copy_value(if *b { "t" } else { "f" }),
        DumpValue::Int(i) => escape_copy_value(&i.to_string()),
        DumpValue::Float(f) => escape_copy_value(&f.to_string()),
    }
}

fn escape_copy_value(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' => result.push_str("\\\\"),
            '\u{8}' => result.push_str("\\b"),
            '\u{c}' => result.push_str("\\f"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            '\u{b}' => result.push_str("\\v"),
            _ => result.push(ch),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_null_sentinel() {
        assert_eq!(decode_copy_value("\\N").unwrap(), DumpValue::Null);
    }

    #[test]
    fn escaped_backslash_n_is_not_the_null_sentinel() {
        // "\\N" as *data* (a literal backslash followed by N), distinct
        // from the two-char sentinel "\N".
        let decoded = decode_copy_value("\\\\N").unwrap();
        assert_eq!(decoded, DumpValue::Text("\\N".to_string()));
        assert_eq!(encode_copy_value(&decoded), "\\\\N");
    }

    #[test]
    fn plain_text_is_returned_unchanged() {
        assert_eq!(
            decode_copy_value("hello world").unwrap(),
            DumpValue::Text("hello world".to_string())
        );
    }

    #[test]
    fn decodes_c_style_escapes() {
        assert_eq!(decode_copy_value("a\\tb").unwrap(), DumpValue::Text("a\tb".to_string()));
        assert_eq!(decode_copy_value("a\\nb").unwrap(), DumpValue::Text("a\nb".to_string()));
    }

    #[test]
    fn decodes_hex_and_octal_escapes() {
        assert_eq!(decode_copy_value("\\xff").unwrap(), DumpValue::Text("\u{ff}".to_string()));
        assert_eq!(decode_copy_value("\\123").unwrap(), DumpValue::Text("\u{53}".to_string()));
    }

    #[test]
    fn unterminated_backslash_is_decode_error() {
        assert!(decode_copy_value("abc\\").is_err());
    }

    #[test]
    fn unrecognized_escape_is_decode_error() {
        assert!(decode_copy_value("\\q").is_err());
    }

    #[test]
    fn null_and_text_roundtrip() {
        for v in [DumpValue::Null, DumpValue::Text("tab\there".to_string())] {
            let encoded = encode_copy_value(&v);
            let decoded = decode_copy_value(&encoded).unwrap();
            assert_eq!(decoded, v);
        }
    }
}
