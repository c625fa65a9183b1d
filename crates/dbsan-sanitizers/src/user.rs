//! Synthetic-identity sanitizers: usernames, full names, e-mail addresses
//! derived deterministically from the original value via the session
//! secret, indexing into fixed English given-name/surname tables.

use std::sync::LazyLock;

use dbsan_core::DumpValue;
use dbsan_session::{hash_text_to_int, hash_text_to_ints};

const GIVEN_NAMES_RAW: &str = include_str!("data/given_names.txt");
const SURNAMES_RAW: &str = include_str!("data/surnames.txt");

static GIVEN_NAMES: LazyLock<Vec<&'static str>> =
    LazyLock::new(|| GIVEN_NAMES_RAW.split_whitespace().collect());
static SURNAMES: LazyLock<Vec<&'static str>> =
    LazyLock::new(|| SURNAMES_RAW.split_whitespace().collect());

fn is_blank(value: &DumpValue) -> bool {
    matches!(value, DumpValue::Null) || matches!(value, DumpValue::Text(s) if s.is_empty())
}

/// Replaces a value with a synthetic e-mail address built from two hashed
/// name indices and a hex suffix, case-folding the name roughly 7/8 of the
/// time (mirroring the original's `num3 % 8 > 0` condition).
pub fn sanitize_email(value: DumpValue) -> DumpValue {
    if is_blank(&value) {
        return value;
    }
    let DumpValue::Text(s) = value else { return value };
    let key = s.trim();
    let nums = hash_text_to_ints(key, &[16, 16, 32]);
    let (num1, num2, num3) = (nums[0], nums[1], nums[2]);

    let given = GIVEN_NAMES[(num1 as usize) % GIVEN_NAMES.len()];
    let surname = SURNAMES[(num2 as usize) % SURNAMES.len()].replace('\'', "");
    let fold = num3 % 8 > 0;

    let first = if fold { given.to_lowercase() } else { given.to_string() };
    let last = if fold { surname.to_lowercase() } else { surname };

    DumpValue::Text(format!("{first}.{last}@x{num3:x}.sanitized.net"))
}

/// Replaces a value with a synthetic username: a lowercase given name
/// followed by a hashed hex suffix.
pub fn sanitize_username(value: DumpValue) -> DumpValue {
    if is_blank(&value) {
        return value;
    }
    let DumpValue::Text(s) = value else { return value };
    let nums = hash_text_to_ints(&s, &[16, 32]);
    let (num1, num2) = (nums[0], nums[1]);
    let given = GIVEN_NAMES[(num1 as usize) % GIVEN_NAMES.len()].to_lowercase();
    DumpValue::Text(format!("{given}{num2:x}"))
}

/// Replaces a value with a synthetic `"Given Surname"` full name.
pub fn sanitize_full_name_en_gb(value: DumpValue) -> DumpValue {
    if is_blank(&value) {
        return value;
    }
    let DumpValue::Text(s) = value else { return value };
    let key = s.trim().to_lowercase();
    let nums = hash_text_to_ints(&key, &[16, 16]);
    let (num1, num2) = (nums[0], nums[1]);
    let given = GIVEN_NAMES[(num1 as usize) % GIVEN_NAMES.len()];
    let surname = SURNAMES[(num2 as usize) % SURNAMES.len()];
    DumpValue::Text(format!("{given} {surname}"))
}

/// Replaces a value with a synthetic given name.
pub fn sanitize_given_name_en_gb(value: DumpValue) -> DumpValue {
    if is_blank(&value) {
        return value;
    }
    let DumpValue::Text(s) = value else { return value };
    let key = s.trim().to_lowercase();
    let num = hash_text_to_int(&key, dbsan_session::DEFAULT_INT_BITS);
    DumpValue::Text(GIVEN_NAMES[(num as usize) % GIVEN_NAMES.len()].to_string())
}

/// Replaces a value with a synthetic surname.
pub fn sanitize_surname_en_gb(value: DumpValue) -> DumpValue {
    if is_blank(&value) {
        return value;
    }
    let DumpValue::Text(s) = value else { return value };
    let key = s.trim().to_lowercase();
    let num = hash_text_to_int(&key, dbsan_session::DEFAULT_INT_BITS);
    DumpValue::Text(SURNAMES[(num as usize) % SURNAMES.len()].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_pass_through() {
        assert_eq!(sanitize_username(DumpValue::Null), DumpValue::Null);
        assert_eq!(sanitize_username(DumpValue::Text(String::new())), DumpValue::Text(String::new()));
    }

    #[test]
    fn username_is_deterministic() {
        dbsan_session::reset(Some(b"fixed".to_vec()));
        let a = sanitize_username(DumpValue::Text("alice@example.com".into()));
        let b = sanitize_username(DumpValue::Text("alice@example.com".into()));
        assert_eq!(a, b);
    }

    #[test]
    fn full_name_has_two_words() {
        dbsan_session::reset(Some(b"fixed".to_vec()));
        let DumpValue::Text(s) = sanitize_full_name_en_gb(DumpValue::Text("Bob Smith".into())) else {
            panic!("expected text");
        };
        assert_eq!(s.split(' ').count(), 2);
    }

    #[test]
    fn given_name_is_from_the_table() {
        dbsan_session::reset(Some(b"fixed".to_vec()));
        let DumpValue::Text(s) = sanitize_given_name_en_gb(DumpValue::Text("x".into())) else {
            panic!("expected text");
        };
        assert!(GIVEN_NAMES.contains(&s.as_str()));
    }

    #[test]
    fn email_is_deterministic_and_well_formed() {
        dbsan_session::reset(Some(b"fixed".to_vec()));
        let DumpValue::Text(s) = sanitize_email(DumpValue::Text("someone@real.example".into())) else {
            panic!("expected text");
        };
        assert!(s.contains('@'));
        assert!(s.ends_with(".sanitized.net"));
    }
}
