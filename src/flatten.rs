//! Record flattening for nested metrics snapshots
//!
//! Collapses an arbitrarily nested JSON object into a single-level map whose
//! keys are the separator-joined paths of ancestor keys. Input is assumed to
//! be acyclic JSON; there is no depth limit.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Flatten a nested record into separator-joined key paths
///
/// Non-object values (scalars, nulls, arrays) are leaves; object values
/// recurse, so an empty object contributes no entries. Joined paths must be
/// unique: a collision (e.g. `{"a": {"b": 1}, "a_b": 2}` with separator `_`)
/// fails with [`Error::DuplicateKey`] instead of silently overwriting.
pub fn flatten(record: &Map<String, Value>, sep: &str) -> Result<BTreeMap<String, Value>> {
    let mut flat = BTreeMap::new();
    flatten_into(record, "", sep, &mut flat)?;
    Ok(flat)
}

fn flatten_into(
    record: &Map<String, Value>,
    parent: &str,
    sep: &str,
    flat: &mut BTreeMap<String, Value>,
) -> Result<()> {
    for (key, value) in record {
        let path = if parent.is_empty() {
            key.clone()
        } else {
            format!("{}{}{}", parent, sep, key)
        };
        match value {
            Value::Object(nested) => flatten_into(nested, &path, sep, flat)?,
            leaf => {
                if flat.insert(path.clone(), leaf.clone()).is_some() {
                    return Err(Error::DuplicateKey(path));
                }
            }
        }
    }
    Ok(())
}

/// Restrict a flattened record to numeric entries
///
/// The accepted value kinds are exactly JSON integers and floats; nulls,
/// strings, booleans, and containers are dropped. This is the single place
/// deciding what counts as model-ready numeric data.
pub fn numeric_entries(flat: &BTreeMap<String, Value>) -> BTreeMap<String, f64> {
    flat.iter()
        .filter_map(|(key, value)| match value {
            Value::Number(n) => n.as_f64().map(|f| (key.clone(), f)),
            _ => None,
        })
        .collect()
}
