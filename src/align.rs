//! Alignment of per-asset price series into one rectangular table

use chrono::DateTime;

use crate::error::{Error, Result};
use crate::models::Point;
use crate::table::Table;
use crate::DATE_FMT;

/// Merge one series per asset into a single date-indexed table
///
/// The row index is derived from the FIRST asset's timestamps, truncated to
/// day granularity. Shorter value columns are zero-padded at the front so
/// they stay aligned with the longest series' most recent dates; column
/// order matches the input order.
///
/// All series are assumed to come from requests sharing the same start/end/
/// interval. If assets have genuinely different calendars (not just
/// different lengths) the padded columns silently adopt the first asset's
/// dates; the one case that cannot be labeled at all - the first asset's
/// series being shorter than the longest one - is rejected.
pub fn align_price_history(assets: &[(String, Vec<Point>)]) -> Result<Table> {
    if assets.is_empty() {
        return Err(Error::EmptyInput);
    }

    let dates: Vec<String> = assets[0]
        .1
        .iter()
        .map(|(ts, _)| date_from_millis(*ts))
        .collect::<Result<_>>()?;

    let max_len = assets.iter().map(|(_, series)| series.len()).max().unwrap_or(0);
    if dates.len() < max_len {
        return Err(Error::MalformedResponse(format!(
            "date axis from `{}` has {} rows but the longest series has {}",
            assets[0].0,
            dates.len(),
            max_len
        )));
    }

    let columns = assets
        .iter()
        .map(|(key, series)| {
            let mut values = vec![0.0; max_len - series.len()];
            values.extend(series.iter().map(|(_, value)| *value));
            (key.clone(), values)
        })
        .collect();

    Table::from_columns(dates, columns)
}

/// Millisecond timestamp to a calendar date string, sub-day precision dropped
fn date_from_millis(ts: i64) -> Result<String> {
    let datetime = DateTime::from_timestamp(ts / 1000, 0)
        .ok_or_else(|| Error::MalformedResponse(format!("timestamp out of range: {}", ts)))?;
    Ok(datetime.date_naive().format(DATE_FMT).to_string())
}
