//! Decoded dump cell values.

use serde::{Deserialize, Serialize};

/// A decoded cell from a database dump, before or after sanitization.
///
/// Every codec in the workspace (`dbsan-mysql`, `dbsan-postgres`) converges
/// on this type: decoding a dialect-specific literal produces a
/// `DumpValue`, and every sanitizer is a pure function over it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DumpValue {
    /// SQL NULL.
    Null,

    /// Boolean literal (`TRUE`/`FALSE` in MySQL; Postgres carries booleans
    /// as text and never produces this variant from the COPY codec, but
    /// sanitizer functions may still return it).
    Bool(bool),

    /// Signed 64-bit integer.
    Int(i64),

    /// 64-bit floating point.
    Float(f64),

    /// Text, already unescaped.
    Text(String),
}

impl DumpValue {
    /// Check if this value is NULL.
    pub const fn is_null(&self) -> bool {
        matches!(self, DumpValue::Null)
    }

    /// Borrow the text payload, if this is a `Text` value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            DumpValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Type name used in error messages.
    pub const fn type_name(&self) -> &'static str {
        match self {
            DumpValue::Null => "NULL",
            DumpValue::Bool(_) => "BOOL",
            DumpValue::Int(_) => "INT",
            DumpValue::Float(_) => "FLOAT",
            DumpValue::Text(_) => "TEXT",
        }
    }
}

impl From<&str> for DumpValue {
    fn from(s: &str) -> Self {
        DumpValue::Text(s.to_string())
    }
}

impl From<String> for DumpValue {
    fn from(s: String) -> Self {
        DumpValue::Text(s)
    }
}

impl From<i64> for DumpValue {
    fn from(v: i64) -> Self {
        DumpValue::Int(v)
    }
}

impl From<f64> for DumpValue {
    fn from(v: f64) -> Self {
        DumpValue::Float(v)
    }
}

impl From<bool> for DumpValue {
    fn from(v: bool) -> Self {
        DumpValue::Bool(v)
    }
}
