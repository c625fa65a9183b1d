//! Resolved `(table, column) -> sanitizer` lookup.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::value::DumpValue;

/// A pure function mapping a decoded cell to a replacement cell.
///
/// Sanitizers must return `Null` when given `Null`; the core never checks
/// this but every built-in sanitizer (see `dbsan-sanitizers`) honors it.
pub type Sanitizer = Arc<dyn Fn(DumpValue) -> DumpValue + Send + Sync>;

/// The resolved mapping from `(table, column)` to sanitizer, plus the set
/// of tables whose rows should be dropped entirely.
#[derive(Default, Clone)]
pub struct SanitizerBinding {
    sanitizers: HashMap<(String, String), Sanitizer>,
    skip_rows: HashSet<String>,
}

impl SanitizerBinding {
    /// An empty binding: every pipeline treats this as pure pass-through.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.sanitizers.is_empty() && self.skip_rows.is_empty()
    }

    /// Bind a sanitizer to a `(table, column)` pair, replacing any prior
    /// binding for the same pair.
    pub fn bind(&mut self, table: impl Into<String>, column: impl Into<String>, sanitizer: Sanitizer) {
        self.sanitizers.insert((table.into(), column.into()), sanitizer);
    }

    /// Mark a whole table's rows for dropping.
    pub fn set_skip_rows(&mut self, table: impl Into<String>) {
        self.skip_rows.insert(table.into());
    }

    /// Look up the sanitizer bound to a `(table, column)` pair, if any.
    pub fn get(&self, table: &str, column: &str) -> Option<&Sanitizer> {
        self.sanitizers.get(&(table.to_string(), column.to_string()))
    }

    /// Whether every row of `table` should be dropped.
    pub fn skip_rows(&self, table: &str) -> bool {
        self.skip_rows.contains(table)
    }

    /// Build the index-keyed sanitizer map for a known column ordering,
    /// used by both pipelines to decide whether decoding can be skipped
    /// entirely for a row (§4.5 step 5, §4.6 "all identity or absent").
    pub fn sanitizers_for_columns(&self, table: &str, columns: &[String]) -> HashMap<usize, Sanitizer> {
        let mut map = HashMap::new();
        for (index, column) in columns.iter().enumerate() {
            if let Some(sanitizer) = self.get(table, column) {
                map.insert(index, Arc::clone(sanitizer));
            }
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> Sanitizer {
        Arc::new(|v| v)
    }

    #[test]
    fn empty_binding_has_no_sanitizers_and_is_empty() {
        let binding = SanitizerBinding::new();
        assert!(binding.is_empty());
        assert!(binding.get("t", "c").is_none());
        assert!(!binding.skip_rows("t"));
    }

    #[test]
    fn bind_and_lookup_roundtrip() {
        let mut binding = SanitizerBinding::new();
        binding.bind("users", "email", identity());
        assert!(binding.get("users", "email").is_some());
        assert!(binding.get("users", "name").is_none());
        assert!(!binding.is_empty());
    }

    #[test]
    fn skip_rows_is_per_table() {
        let mut binding = SanitizerBinding::new();
        binding.set_skip_rows("sessions");
        assert!(binding.skip_rows("sessions"));
        assert!(!binding.skip_rows("users"));
    }

    #[test]
    fn sanitizers_for_columns_indexes_by_position() {
        let mut binding = SanitizerBinding::new();
        binding.bind("t", "b", identity());
        let columns = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let map = binding.sanitizers_for_columns("t", &columns);
        assert_eq!(map.len(), 1);
        assert!(map.contains_key(&1));
    }
}
