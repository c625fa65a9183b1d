//! YAML-backed configuration loader: parses a sanitizer strategy document
//! into a [`SanitizerBinding`], resolving each named sanitizer against a
//! caller-supplied addon registry and the built-in sanitizer library.

use std::collections::HashMap;
use std::path::Path;

use dbsan_core::{Error, Result, Sanitizer, SanitizerBinding};
use serde_yaml::Value as Yaml;

const MYSQLDUMP_DEFAULT_PARAMETERS: &[&str] = &["--single-transaction"];
const PG_DUMP_DEFAULT_PARAMETERS: &[&str] = &[];

/// A caller-supplied registry of sanitizer functions searched before the
/// built-in library, keyed by the sanitizer's dotted name. Represents both
/// the "user top-level namespace" and any declared addon packages, merged
/// into one lookup table (see DESIGN.md's Open Question decisions — Rust
/// has no dynamic module loader to keep these phases separate).
pub type AddonRegistry = HashMap<String, Sanitizer>;

/// Parsed configuration: a resolved sanitizer binding plus the pass-through
/// dump-utility parameter lists.
#[derive(Clone, Default)]
pub struct Configuration {
    pub binding: SanitizerBinding,
    pub addon_packages: Vec<String>,
    pub mysqldump_params: Vec<String>,
    pub pg_dump_params: Vec<String>,
}

impl Configuration {
    /// Reads and parses configuration from a YAML file on disk.
    pub fn from_file(path: impl AsRef<Path>, addons: &AddonRegistry) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        Self::from_yaml_bytes(&bytes, addons)
    }

    /// Parses configuration from an in-memory YAML document.
    pub fn from_yaml_bytes(bytes: &[u8], addons: &AddonRegistry) -> Result<Self> {
        let doc: Yaml = serde_yaml::from_slice(bytes)
            .map_err(|e| Error::config("<root>", format!("invalid YAML: {e}")))?;
        Self::load(&doc, addons)
    }

    /// Loads configuration from an already-parsed YAML document.
    pub fn load(doc: &Yaml, addons: &AddonRegistry) -> Result<Self> {
        let Yaml::Mapping(root) = doc else {
            return Err(Error::config("<root>", "configuration document is not a mapping"));
        };

        let addon_packages = load_addon_packages(root)?;
        let (mysqldump_params, pg_dump_params) = load_dump_extra_parameters(root)?;
        let binding = load_strategy(root, addons)?;

        Ok(Configuration { binding, addon_packages, mysqldump_params, pg_dump_params })
    }
}

fn get<'a>(mapping: &'a serde_yaml::Mapping, key: &str) -> Option<&'a Yaml> {
    mapping.get(Yaml::String(key.to_string()))
}

fn load_addon_packages(root: &serde_yaml::Mapping) -> Result<Vec<String>> {
    let Some(config_section) = get(root, "config") else {
        return Ok(Vec::new());
    };
    let Yaml::Mapping(config_section) = config_section else {
        return Err(Error::config("config", "'config' is not a mapping"));
    };
    let Some(addons) = get(config_section, "addons") else {
        return Ok(Vec::new());
    };
    let Yaml::Sequence(items) = addons else {
        return Err(Error::config("config.addons", "'config.addons' is not a list"));
    };

    let mut result = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let Yaml::String(s) = item else {
            return Err(Error::config(
                format!("config.addons[{index}]"),
                "item is not a string",
            ));
        };
        result.push(s.clone());
    }
    Ok(result)
}

fn load_dump_extra_parameters(root: &serde_yaml::Mapping) -> Result<(Vec<String>, Vec<String>)> {
    let Some(config_section) = get(root, "config") else {
        return Ok((
            MYSQLDUMP_DEFAULT_PARAMETERS.iter().map(|s| s.to_string()).collect(),
            PG_DUMP_DEFAULT_PARAMETERS.iter().map(|s| s.to_string()).collect(),
        ));
    };
    let Yaml::Mapping(config_section) = config_section else {
        return Err(Error::config("config", "'config' is not a mapping"));
    };

    let extra = get(config_section, "extra_parameters");
    let extra_mapping = match extra {
        None => return Ok((
            MYSQLDUMP_DEFAULT_PARAMETERS.iter().map(|s| s.to_string()).collect(),
            PG_DUMP_DEFAULT_PARAMETERS.iter().map(|s| s.to_string()).collect(),
        )),
        Some(Yaml::Mapping(m)) => m,
        Some(_) => {
            return Err(Error::config(
                "config.extra_parameters",
                "'config.extra_parameters' is not a mapping",
            ));
        }
    };

    let mysqldump_params = load_string_list(
        extra_mapping,
        "mysqldump",
        "config.extra_parameters.mysqldump",
        MYSQLDUMP_DEFAULT_PARAMETERS,
    )?;
    let pg_dump_params = load_string_list(
        extra_mapping,
        "pg_dump",
        "config.extra_parameters.pg_dump",
        PG_DUMP_DEFAULT_PARAMETERS,
    )?;

    Ok((mysqldump_params, pg_dump_params))
}

fn load_string_list(
    mapping: &serde_yaml::Mapping,
    key: &str,
    path: &str,
    default: &[&str],
) -> Result<Vec<String>> {
    match get(mapping, key) {
        None => Ok(default.iter().map(|s| s.to_string()).collect()),
        Some(Yaml::Sequence(items)) => items
            .iter()
            .map(|item| match item {
                Yaml::String(s) => Ok(s.clone()),
                _ => Err(Error::config(path.to_string(), "item is not a string")),
            })
            .collect(),
        Some(_) => Err(Error::config(path.to_string(), "value is not a list")),
    }
}

fn load_strategy(root: &serde_yaml::Mapping, addons: &AddonRegistry) -> Result<SanitizerBinding> {
    let mut binding = SanitizerBinding::new();
    let Some(strategy) = get(root, "strategy") else {
        return Ok(binding);
    };
    let Yaml::Mapping(strategy) = strategy else {
        return Err(Error::config("strategy", "'strategy' is not a mapping"));
    };

    for (table_key, column_data) in strategy {
        let table = yaml_key_to_string(table_key)?;

        match column_data {
            Yaml::Null => continue,
            Yaml::String(s) if s == "skip_rows" => {
                binding.set_skip_rows(&table);
            }
            Yaml::Mapping(columns) => {
                for (column_key, sanitizer_name) in columns {
                    let column = yaml_key_to_string(column_key)?;
                    match sanitizer_name {
                        Yaml::Null => continue,
                        Yaml::String(name) => {
                            let path = format!("strategy.{table}.{column}");
                            let sanitizer = resolve_sanitizer(name, addons, &path)?;
                            binding.bind(&table, &column, sanitizer);
                        }
                        _ => {
                            return Err(Error::config(
                                format!("strategy.{table}.{column}"),
                                "value is not a string",
                            ));
                        }
                    }
                }
            }
            _ => {
                return Err(Error::config(
                    format!("strategy.{table}"),
                    "value is neither 'skip_rows' nor a mapping",
                ));
            }
        }
    }

    Ok(binding)
}

fn yaml_key_to_string(key: &Yaml) -> Result<String> {
    match key {
        Yaml::String(s) => Ok(s.clone()),
        other => Err(Error::config("strategy", format!("non-string key: {other:?}"))),
    }
}

/// Resolves a sanitizer name through the two-phase lookup described in
/// SPEC_FULL §4.8: the caller-supplied addon registry first, then the
/// built-in sanitizer library.
fn resolve_sanitizer(name: &str, addons: &AddonRegistry, path: &str) -> Result<Sanitizer> {
    if let Some(sanitizer) = addons.get(name) {
        return Ok(sanitizer.clone());
    }
    if let Some(sanitizer) = dbsan_sanitizers::find_builtin(name) {
        return Ok(sanitizer);
    }
    Err(Error::config(path.to_string(), format!("unable to find sanitizer called '{name}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbsan_core::DumpValue;

    #[test]
    fn s7_loads_builtin_strategy_and_skip_rows() {
        let yaml = r#"
strategy:
  users:
    email: email.example
  sessions: skip_rows
config:
  addons: []
"#;
        let addons = AddonRegistry::new();
        let config = Configuration::from_yaml_bytes(yaml.as_bytes(), &addons).unwrap();

        assert!(config.binding.get("users", "email").is_some());
        assert!(config.binding.get("users", "id").is_none());
        assert!(config.binding.skip_rows("sessions"));
    }

    #[test]
    fn null_sanitizer_name_leaves_column_unbound() {
        let yaml = r#"
strategy:
  users:
    email: null
"#;
        let config = Configuration::from_yaml_bytes(yaml.as_bytes(), &AddonRegistry::new()).unwrap();
        assert!(config.binding.get("users", "email").is_none());
    }

    #[test]
    fn unresolvable_sanitizer_name_is_config_error() {
        let yaml = r#"
strategy:
  users:
    email: nope.nothing
"#;
        let result = Configuration::from_yaml_bytes(yaml.as_bytes(), &AddonRegistry::new());
        assert!(result.is_err());
    }

    #[test]
    fn default_dump_parameters_when_absent() {
        let config = Configuration::from_yaml_bytes(b"{}", &AddonRegistry::new()).unwrap();
        assert_eq!(config.mysqldump_params, vec!["--single-transaction".to_string()]);
        assert!(config.pg_dump_params.is_empty());
    }

    #[test]
    fn extra_parameters_are_carried_through_verbatim() {
        let yaml = r#"
config:
  extra_parameters:
    mysqldump: ["--no-data"]
    pg_dump: ["--schema-only"]
"#;
        let config = Configuration::from_yaml_bytes(yaml.as_bytes(), &AddonRegistry::new()).unwrap();
        assert_eq!(config.mysqldump_params, vec!["--no-data".to_string()]);
        assert_eq!(config.pg_dump_params, vec!["--schema-only".to_string()]);
    }

    #[test]
    fn malformed_strategy_shape_is_config_error() {
        let yaml = "strategy: not-a-mapping-or-skip-rows";
        assert!(Configuration::from_yaml_bytes(yaml.as_bytes(), &AddonRegistry::new()).is_err());
    }

    #[test]
    fn addon_registry_is_tried_before_builtins() {
        use std::sync::Arc;
        let mut addons = AddonRegistry::new();
        addons.insert(
            "email.example".to_string(),
            Arc::new(|_: DumpValue| DumpValue::Text("overridden".into())) as Sanitizer,
        );
        let yaml = r#"
strategy:
  users:
    email: email.example
"#;
        let config = Configuration::from_yaml_bytes(yaml.as_bytes(), &addons).unwrap();
        let sanitizer = config.binding.get("users", "email").unwrap();
        assert_eq!(sanitizer(DumpValue::Text("x".into())), DumpValue::Text("overridden".into()));
    }
}
