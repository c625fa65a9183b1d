//! Core types shared by every dbsan crate.
//!
//! - `DumpValue` — the decoded-cell sum type both dialect codecs converge on.
//! - `Error` — the crate family's unified error type.
//! - `SanitizerBinding` — the resolved `(table, column) -> Sanitizer` map.

pub mod binding;
pub mod error;
pub mod value;

pub use binding::{Sanitizer, SanitizerBinding};
pub use error::{Error, Result};
pub use value::DumpValue;
