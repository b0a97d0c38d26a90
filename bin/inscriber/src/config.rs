//! `key.path=value` overrides applied to the raw config table before deserialization.

use toml::value::{Table, Value};

use crate::errors::ConfigError;

/// Splits an override string like `writer.max_fee_rate=50` into its path and typed value.
pub(crate) fn parse_override(override_str: &str) -> Result<(String, Value), ConfigError> {
    let (path, value) = override_str
        .split_once('=')
        .ok_or_else(|| ConfigError::InvalidOverride(override_str.to_string()))?;

    let path = path.trim();
    if path.is_empty() || path.split('.').any(str::is_empty) {
        return Err(ConfigError::InvalidOverride(override_str.to_string()));
    }

    Ok((path.to_string(), parse_value(value.trim())))
}

/// Integers and booleans keep their type, everything else is a string.
fn parse_value(raw: &str) -> Value {
    if let Ok(v) = raw.parse::<i64>() {
        Value::Integer(v)
    } else if let Ok(v) = raw.parse::<bool>() {
        Value::Boolean(v)
    } else {
        Value::String(raw.to_string())
    }
}

/// Sets `value` at the dotted `path` inside `table`.
///
/// Missing intermediate tables are created since every section except `writer` is optional.
pub(crate) fn apply_override(
    path: &str,
    value: Value,
    table: &mut Table,
) -> Result<(), ConfigError> {
    match path.split_once('.') {
        None => {
            table.insert(path.to_string(), value);
            Ok(())
        }
        Some((key, rest)) => {
            let entry = table
                .entry(key.to_string())
                .or_insert_with(|| Value::Table(Table::new()));
            match entry {
                Value::Table(inner) => apply_override(rest, value, inner),
                _ => Err(ConfigError::TraverseNonTableAt(key.to_string())),
            }
        }
    }
}
