//! Built-in sanitizer function library.
//!
//! Every function here has signature `fn(DumpValue) -> DumpValue` per the
//! sanitizer contract, and returns `Null` unchanged.

pub mod derived;
pub mod email;
pub mod string;
pub mod times;
pub mod user;

use std::sync::Arc;

use dbsan_core::{DumpValue, Sanitizer};

/// Resolve a built-in sanitizer by its dotted name (`module.function`,
/// where `function` is looked up as `sanitize_{function}` in `module`),
/// matching the third and final phase of the configuration loader's
/// lookup order.
pub fn find_builtin(name: &str) -> Option<Sanitizer> {
    let (module, function) = name.split_once('.')?;
    let f: fn(DumpValue) -> DumpValue = match (module, function) {
        ("string", "empty") => string::sanitize_empty,
        ("string", "zfill") => string::sanitize_zfill,
        ("email", "example") => email::sanitize_example,
        ("derived", "uuid4") => derived::sanitize_uuid4,
        ("times", "random_past_timestamp") => times::sanitize_random_past_timestamp,
        ("user", "email") => user::sanitize_email,
        ("user", "username") => user::sanitize_username,
        ("user", "full_name_en_gb") => user::sanitize_full_name_en_gb,
        ("user", "given_name_en_gb") => user::sanitize_given_name_en_gb,
        ("user", "surname_en_gb") => user::sanitize_surname_en_gb,
        _ => return None,
    };
    Some(Arc::new(f))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_every_advertised_builtin() {
        for name in [
            "string.empty",
            "string.zfill",
            "email.example",
            "derived.uuid4",
            "times.random_past_timestamp",
            "user.email",
            "user.username",
            "user.full_name_en_gb",
            "user.given_name_en_gb",
            "user.surname_en_gb",
        ] {
            assert!(find_builtin(name).is_some(), "expected to resolve {name}");
        }
    }

    #[test]
    fn unknown_name_resolves_to_none() {
        assert!(find_builtin("nope.nothing").is_none());
        assert!(find_builtin("no-dot").is_none());
    }

    #[test]
    fn every_builtin_passes_null_through() {
        for name in ["string.empty", "string.zfill", "email.example", "derived.uuid4", "user.email"] {
            let sanitizer = find_builtin(name).unwrap();
            assert_eq!(sanitizer(DumpValue::Null), DumpValue::Null, "{name} must preserve Null");
        }
    }
}
