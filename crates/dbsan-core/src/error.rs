//! Error types for dbsan operations.

use std::fmt;

/// The primary error type for all dbsan operations.
#[derive(Debug)]
pub enum Error {
    /// The dispatcher was given a URL whose scheme maps to no pipeline.
    UnsupportedScheme(UnsupportedSchemeError),
    /// A literal or escape sequence did not conform to the dialect's grammar.
    Decode(DecodeError),
    /// A row's column count disagreed with the header it belongs to.
    ArityMismatch(ArityMismatchError),
    /// The configuration document was malformed.
    Config(ConfigError),
    /// An I/O failure reading the dump or writing the sanitized output.
    Io(IoError),
}

#[derive(Debug)]
pub struct UnsupportedSchemeError {
    pub scheme: String,
}

#[derive(Debug)]
pub struct DecodeError {
    pub dialect: &'static str,
    pub message: String,
    pub input: String,
}

#[derive(Debug)]
pub struct ArityMismatchError {
    pub table: String,
    pub expected: usize,
    pub found: usize,
}

#[derive(Debug)]
pub struct ConfigError {
    pub path: String,
    pub message: String,
}

#[derive(Debug)]
pub struct IoError {
    pub message: String,
    pub source: Option<std::io::Error>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnsupportedScheme(e) => {
                write!(f, "unsupported URL scheme: '{}'", e.scheme)
            }
            Error::Decode(e) => {
                write!(
                    f,
                    "{} decode error: {} (input: {:?})",
                    e.dialect, e.message, e.input
                )
            }
            Error::ArityMismatch(e) => write!(
                f,
                "arity mismatch in table '{}': expected {} columns, found {}",
                e.table, e.expected, e.found
            ),
            Error::Config(e) => write!(f, "configuration error at '{}': {}", e.path, e.message),
            Error::Io(e) => write!(f, "I/O error: {}", e.message),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => e.source.as_ref().map(|e| e as &(dyn std::error::Error + 'static)),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io(IoError {
            message: source.to_string(),
            source: Some(source),
        })
    }
}

impl Error {
    pub fn unsupported_scheme(scheme: impl Into<String>) -> Self {
        Error::UnsupportedScheme(UnsupportedSchemeError {
            scheme: scheme.into(),
        })
    }

    pub fn decode(dialect: &'static str, message: impl Into<String>, input: impl Into<String>) -> Self {
        Error::Decode(DecodeError {
            dialect,
            message: message.into(),
            input: input.into(),
        })
    }

    pub fn arity_mismatch(table: impl Into<String>, expected: usize, found: usize) -> Self {
        Error::ArityMismatch(ArityMismatchError {
            table: table.into(),
            expected,
            found,
        })
    }

    pub fn config(path: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Config(ConfigError {
            path: path.into(),
            message: message.into(),
        })
    }
}

/// Result type alias for dbsan operations.
pub type Result<T> = std::result::Result<T, Error>;
