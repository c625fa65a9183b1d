//! Sanitizers that produce randomized timestamps.

use chrono::Local;
use dbsan_core::DumpValue;
use rand::Rng;

const TEN_YEARS_AS_SECONDS: i64 = 10 * 365 * 24 * 3600;

/// Replaces any non-null value with an RFC 3339 timestamp drawn uniformly
/// from the ten years preceding the current instant.
///
/// Intentionally non-deterministic across runs (like the original sanitizer
/// it is grounded on) and not keyed by the session secret — a "when" has no
/// stable identity worth preserving the way a derived UUID or username does.
pub fn sanitize_random_past_timestamp(value: DumpValue) -> DumpValue {
    if value.is_null() {
        return DumpValue::Null;
    }
    let millis_back = rand::thread_rng().gen_range(0..=(TEN_YEARS_AS_SECONDS * 1000));
    let delta = chrono::Duration::milliseconds(millis_back);
    let when = Local::now() - delta;
    DumpValue::Text(when.to_rfc3339())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_passes_through() {
        assert_eq!(sanitize_random_past_timestamp(DumpValue::Null), DumpValue::Null);
    }

    #[test]
    fn produces_a_parseable_timestamp_in_the_past() {
        let DumpValue::Text(s) = sanitize_random_past_timestamp(DumpValue::Text("anything".into())) else {
            panic!("expected text");
        };
        let parsed = chrono::DateTime::parse_from_rfc3339(&s).expect("valid RFC3339 timestamp");
        assert!(parsed < chrono::Utc::now());
    }
}
