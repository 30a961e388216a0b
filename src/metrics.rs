//! Multi-asset metric snapshots

use serde_json::Value;
use std::collections::BTreeMap;

use crate::api::MessariClient;
use crate::error::{Error, Result};
use crate::flatten::{flatten, numeric_entries};
use crate::models::parse_metrics;
use crate::table::{Cell, Table};
use crate::utils::check_unique_keys;

/// Separator used when flattening metric field paths
const FLATTEN_SEP: &str = "_";

/// Fetch the metrics snapshot for several assets as one table
///
/// Rows are metric field paths (the union across assets), columns are asset
/// keys in input order. With `flatten_records` the nested snapshot is
/// flattened with `_`-joined paths and restricted to numeric entries, giving
/// a model-ready feature column per asset; without it the top-level fields
/// become rows and nested values are rendered as compact JSON text. Fields
/// absent for an asset stay missing, never zero.
pub async fn assets_metrics(
    client: &MessariClient,
    assets: &[String],
    flatten_records: bool,
) -> Result<Table> {
    if assets.is_empty() {
        return Err(Error::EmptyInput);
    }
    check_unique_keys(assets)?;

    let mut records = Vec::with_capacity(assets.len());
    for asset in assets {
        let body = client.get_asset_metrics(asset, None).await?;
        let data = parse_metrics(body)?;
        let record = if flatten_records {
            numeric_record(&data)?
        } else {
            top_level_record(&data)?
        };
        records.push((asset.clone(), record));
    }

    Table::from_records(records)
}

/// Flattened, numeric-only feature row for one asset
fn numeric_record(data: &Value) -> Result<BTreeMap<String, Cell>> {
    let record = as_object(data)?;
    let flat = flatten(record, FLATTEN_SEP)?;
    Ok(numeric_entries(&flat)
        .into_iter()
        .map(|(path, value)| (path, Cell::Number(value)))
        .collect())
}

/// Top-level fields of the snapshot, values kept as-is
fn top_level_record(data: &Value) -> Result<BTreeMap<String, Cell>> {
    let record = as_object(data)?;
    Ok(record
        .iter()
        .map(|(field, value)| (field.clone(), Cell::from_json(value)))
        .collect())
}

fn as_object(data: &Value) -> Result<&serde_json::Map<String, Value>> {
    data.as_object()
        .ok_or_else(|| Error::MalformedResponse("metrics `data` is not an object".to_string()))
}
