//! Streaming recognizer/rewriter for MySQL extended `INSERT INTO`
//! statements.

use std::sync::LazyLock;

use dbsan_core::{DumpValue, Error, Result, SanitizerBinding};
use regex::Regex;

use crate::codec::{decode_mysql_literal, encode_mysql_literal};

static INSERT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^INSERT INTO `(?P<table>[^`]+)` \((?P<columns>.*)\) VALUES (?P<values>.*);$")
        .expect("valid regex")
});

/// Process one input line (without its trailing LF) against the given
/// binding, producing the line to emit or `None` if the line should be
/// dropped (a `skip_rows` table).
pub fn process_line(line: &str, binding: &SanitizerBinding) -> Result<Option<String>> {
    if binding.is_empty() {
        return Ok(Some(line.to_string()));
    }

    let Some(caps) = INSERT_RE.captures(line) else {
        return Ok(Some(line.to_string()));
    };

    let table = &caps["table"];
    if binding.skip_rows(table) {
        return Ok(None);
    }

    let columns = parse_column_names(&caps["columns"]);
    let sanitizers = binding.sanitizers_for_columns(table, &columns);
    if sanitizers.is_empty() {
        // Fast path: no sanitizer touches this table, so decoding (and any
        // DecodeError it might raise) is skipped entirely.
        return Ok(Some(line.to_string()));
    }

    let rows = parse_values(&caps["values"])?;
    let mut encoded_rows = Vec::with_capacity(rows.len());
    for row in rows {
        if row.len() != columns.len() {
            return Err(Error::arity_mismatch(table, columns.len(), row.len()));
        }
        let mut encoded = Vec::with_capacity(row.len());
        for (index, token) in row.iter().enumerate() {
            let mut value = decode_mysql_literal(token)?;
            if let Some(sanitizer) = sanitizers.get(&index) {
                value = sanitizer(value);
            }
            encoded.push(encode_mysql_literal(&value));
        }
        encoded_rows.push(format!("({})", encoded.join(",")));
    }

    let columns_sql = columns
        .iter()
        .map(|c| format!("`{c}`"))
        .collect::<Vec<_>>()
        .join(", ");

    Ok(Some(format!(
        "INSERT INTO `{table}` ({columns_sql}) VALUES {};",
        encoded_rows.join(",")
    )))
}

fn parse_column_names(columns: &str) -> Vec<String> {
    columns
        .split(',')
        .map(|c| c.trim().trim_matches('`').to_string())
        .collect()
}

/// Parse the `VALUES (...)...;`-clause body into rows of raw value tokens
/// (still encoded; not yet decoded into [`DumpValue`]s).
fn parse_values(values: &str) -> Result<Vec<Vec<String>>> {
    let chars: Vec<char> = values.chars().collect();
    let len = chars.len();
    let mut pos = 0usize;
    let mut rows = Vec::new();

    while pos < len {
        if chars[pos] != '(' {
            return Err(Error::decode("mysql", "expected '(' to start a row tuple", values));
        }
        pos += 1;

        let mut row = Vec::new();
        loop {
            if pos >= len {
                return Err(Error::decode("mysql", "unterminated row tuple", values));
            }
            let (token, next_pos) = if chars[pos] == '\'' {
                scan_string_token(&chars, pos)?
            } else {
                scan_plain_token(&chars, pos)
            };
            pos = next_pos;
            row.push(token);

            match chars.get(pos) {
                Some(',') => pos += 1,
                Some(')') => {
                    pos += 1;
                    break;
                }
                _ => return Err(Error::decode("mysql", "malformed row tuple", values)),
            }
        }
        rows.push(row);

        if pos < len && chars[pos] == ',' {
            pos += 1;
        }
    }

    Ok(rows)
}

/// Scan a single-quoted string token starting at `chars[pos] == '\''`,
/// tolerating `''` and `\'` as embedded-quote escapes, returning the token
/// (quotes included) and the position just past the closing quote.
fn scan_string_token(chars: &[char], pos: usize) -> Result<(String, usize)> {
    let start = pos;
    let len = chars.len();
    let mut i = pos + 1;
    loop {
        if i >= len {
            return Err(Error::decode(
                "mysql",
                "unterminated string literal",
                chars[start..].iter().collect::<String>(),
            ));
        }
        match chars[i] {
            '\\' => i += 2,
            '\'' if i + 1 < len && chars[i + 1] == '\'' => i += 2,
            '\'' => {
                i += 1;
                break;
            }
            _ => i += 1,
        }
    }
    Ok((chars[start..i].iter().collect(), i))
}

/// Scan an unquoted value token up to the next `,` or `)` delimiter.
fn scan_plain_token(chars: &[char], pos: usize) -> (String, usize) {
    let start = pos;
    let len = chars.len();
    let mut i = pos;
    while i < len && chars[i] != ',' && chars[i] != ')' {
        i += 1;
    }
    (chars[start..i].iter().collect(), i)
}
