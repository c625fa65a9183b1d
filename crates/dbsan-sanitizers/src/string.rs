//! Generic string sanitizers.

use dbsan_core::DumpValue;

/// Replaces any non-null value with the empty string.
pub fn sanitize_empty(value: DumpValue) -> DumpValue {
    match value {
        DumpValue::Null => DumpValue::Null,
        _ => DumpValue::Text(String::new()),
    }
}

/// Replaces any non-null text value with a same-length run of `'0'`
/// characters, preserving the original length as a rough shape hint.
pub fn sanitize_zfill(value: DumpValue) -> DumpValue {
    match value {
        DumpValue::Null => DumpValue::Null,
        DumpValue::Text(s) => DumpValue::Text("0".repeat(s.chars().count())),
        other => other,
    }
}
