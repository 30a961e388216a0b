use std::collections::HashSet;

use crate::error::{Error, Result};

/// Asset keys must be unique within one multi-asset request; a repeated key
/// would silently overwrite another asset's column downstream.
pub fn check_unique_keys(keys: &[String]) -> Result<()> {
    let mut seen = HashSet::with_capacity(keys.len());
    for key in keys {
        if !seen.insert(key.as_str()) {
            return Err(Error::DuplicateKey(key.clone()));
        }
    }
    Ok(())
}
