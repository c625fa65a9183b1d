//! Streaming recognizer/rewriter for Postgres `COPY ... FROM stdin;`
//! blocks.

use std::sync::LazyLock;

use dbsan_core::{Error, Result, Sanitizer, SanitizerBinding};
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;

use crate::codec::decode_copy_value;
use crate::codec::encode_copy_value;

static COPY_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^COPY "(?P<schema>[^"]+)"\."(?P<table>[^"]+)" \((?P<columns>.*)\) FROM stdin;$"#)
        .expect("valid regex")
});

const COPY_TERMINATOR: &str = "\\.";

#[derive(Clone)]
struct ActiveCopy {
    table: String,
    columns: Vec<String>,
    sanitizers: HashMap<usize, Sanitizer>,
    skipped: bool,
}

/// Streaming state for one Postgres dump. Construct once per run and feed
/// it lines in order via [`CopyPipeline::process_line`].
#[derive(Default)]
pub struct CopyPipeline {
    active: Option<ActiveCopy>,
}

impl CopyPipeline {
    pub fn new() -> Self {
        Self { active: None }
    }

    /// Process one input line (without its trailing LF), returning the
    /// line to emit, or `None` if it should be dropped (inside a
    /// `skip_rows` block).
    pub fn process_line(&mut self, line: &str, binding: &SanitizerBinding) -> Result<Option<String>> {
        match self.active.take() {
            None => self.process_outside(line, binding),
            Some(active) => self.process_inside(line, active),
        }
    }

    fn process_outside(&mut self, line: &str, binding: &SanitizerBinding) -> Result<Option<String>> {
        let Some(caps) = COPY_HEADER_RE.captures(line) else {
            return Ok(Some(line.to_string()));
        };

        let table = caps["table"].to_string();
        let columns = parse_column_names(&caps["columns"]);
        let sanitizers = binding.sanitizers_for_columns(&table, &columns);
        let skipped = binding.skip_rows(&table);

        self.active = Some(ActiveCopy { table, columns, sanitizers, skipped });

        if skipped {
            Ok(None)
        } else {
            Ok(Some(line.to_string()))
        }
    }

    fn process_inside(&mut self, line: &str, active: ActiveCopy) -> Result<Option<String>> {
        if line == COPY_TERMINATOR {
            // Block closed; stay in the Outside state for the next line.
            return Ok(if active.skipped { None } else { Some(line.to_string()) });
        }

        if active.skipped {
            self.active = Some(active);
            return Ok(None);
        }

        if active.sanitizers.is_empty() {
            self.active = Some(active);
            return Ok(Some(line.to_string()));
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != active.columns.len() {
            let table = active.table.clone();
            let expected = active.columns.len();
            let found = fields.len();
            self.active = Some(active);
            return Err(Error::arity_mismatch(table, expected, found));
        }

        let mut encoded = Vec::with_capacity(fields.len());
        for (index, field) in fields.iter().enumerate() {
            let mut value = decode_copy_value(field)?;
            if let Some(sanitizer) = active.sanitizers.get(&index) {
                value = Arc::clone(sanitizer)(value);
            }
            encoded.push(encode_copy_value(&value));
        }

        self.active = Some(active);
        Ok(Some(encoded.join("\t")))
    }
}

fn parse_column_names(columns: &str) -> Vec<String> {
    columns
        .split(',')
        .map(|c| c.trim().trim_matches('"').to_string())
        .collect()
}
