//! Top-level facade: selects and drives the dialect-specific pipeline for a
//! dump identified by URL scheme.
//!
//! ```ignore
//! use dbsan::Dispatcher;
//!
//! let binding = dbsan_core::SanitizerBinding::new();
//! let report = Dispatcher::new(binding).run("mysql://localhost/app", input, output)?;
//! ```

use std::io::{BufRead, Write};

use dbsan_core::{Error, Result, SanitizerBinding};
use dbsan_mysql::process_line as process_mysql_line;
use dbsan_postgres::CopyPipeline;

/// Which dialect pipeline a URL scheme resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialect {
    Mysql,
    Postgres,
}

fn dialect_for_scheme(scheme: &str) -> Option<Dialect> {
    match scheme {
        "mysql" => Some(Dialect::Mysql),
        "postgres" | "postgresql" | "postgis" => Some(Dialect::Postgres),
        _ => None,
    }
}

/// Extracts the scheme from a URL (the substring before `://`).
fn scheme_of(url: &str) -> &str {
    url.split("://").next().unwrap_or(url)
}

/// Summary of one completed run, used by the CLI to populate its info-level
/// log line without re-deriving counts from the binding.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunReport {
    pub lines_read: usize,
    pub lines_written: usize,
}

/// Selects the MySQL or Postgres pipeline by URL scheme and drives it over
/// a line-oriented input/output stream.
pub struct Dispatcher {
    binding: SanitizerBinding,
}

impl Dispatcher {
    pub fn new(binding: SanitizerBinding) -> Self {
        Self { binding }
    }

    /// Runs the sanitizer over `input`, writing sanitized lines to `output`.
    ///
    /// Resets the thread's [`dbsan_session::SessionSecret`] before
    /// processing begins, so every run starts from a fresh secret.
    pub fn run(&self, url: &str, input: impl BufRead, output: &mut impl Write) -> Result<RunReport> {
        let dialect = dialect_for_scheme(scheme_of(url))
            .ok_or_else(|| Error::unsupported_scheme(scheme_of(url)))?;

        dbsan_session::reset(None);

        let mut report = RunReport::default();
        let mut postgres_pipeline = CopyPipeline::new();

        for line in input.lines() {
            let line = line?;
            report.lines_read += 1;

            let emitted = match dialect {
                Dialect::Mysql => process_mysql_line(&line, &self.binding)?,
                Dialect::Postgres => postgres_pipeline.process_line(&line, &self.binding)?,
            };

            if let Some(emitted) = emitted {
                writeln!(output, "{emitted}")?;
                report.lines_written += 1;
            }
        }

        Ok(report)
    }
}
