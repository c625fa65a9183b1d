//! E-mail address sanitizers.

use dbsan_core::DumpValue;

/// Replaces any non-empty value with the fixed address
/// `example@example.org`; an empty string stays empty, `Null` stays `Null`.
pub fn sanitize_example(value: DumpValue) -> DumpValue {
    match value {
        DumpValue::Null => DumpValue::Null,
        DumpValue::Text(s) if s.is_empty() => DumpValue::Text(s),
        _ => DumpValue::Text("example@example.org".to_string()),
    }
}
