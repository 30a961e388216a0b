//! High-level multi-asset price-history operations

use chrono::{Duration, NaiveDate, Utc};

use crate::align::align_price_history;
use crate::api::MessariClient;
use crate::error::{Error, Result};
use crate::models::{parse_timeseries, Point};
use crate::table::Table;
use crate::utils::check_unique_keys;
use crate::DATE_FMT;

/// Price column requested by default
pub const DEFAULT_COLUMNS: &str = "close";

/// Time granularity requested by default
pub const DEFAULT_INTERVAL: &str = "1d";

/// Parse a caller-supplied `YYYY-MM-DD` date string
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text, DATE_FMT).map_err(|_| Error::InvalidDate(text.to_string()))
}

/// Resolve optional start/end date strings, defaulting to the trailing year
///
/// Validation happens here, before any request is issued.
fn resolve_range(start: Option<&str>, end: Option<&str>) -> Result<(String, String)> {
    let today = Utc::now().date_naive();
    let start = match start {
        Some(text) => parse_date(text)?,
        None => today - Duration::days(365),
    };
    let end = match end {
        Some(text) => parse_date(text)?,
        None => today,
    };
    Ok((
        start.format(DATE_FMT).to_string(),
        end.format(DATE_FMT).to_string(),
    ))
}

/// Fetch one asset's price history as `(timestamp, value)` points
pub async fn asset_price_history(
    client: &MessariClient,
    asset_key: &str,
    start: Option<&str>,
    end: Option<&str>,
    columns: &str,
    interval: &str,
) -> Result<Vec<Point>> {
    let (start, end) = resolve_range(start, end)?;
    fetch_points(client, asset_key, &start, &end, columns, interval).await
}

/// Fetch price histories for several assets and align them into one table
///
/// Column order matches the input asset order and the date axis derives from
/// the first asset (see [`align_price_history`]). Empty or duplicated asset
/// lists fail before any network call; one failed fetch fails the whole
/// operation, there is no partial-result mode.
pub async fn assets_price_history(
    client: &MessariClient,
    assets: &[String],
    start: Option<&str>,
    end: Option<&str>,
    columns: &str,
    interval: &str,
) -> Result<Table> {
    if assets.is_empty() {
        return Err(Error::EmptyInput);
    }
    check_unique_keys(assets)?;
    let (start, end) = resolve_range(start, end)?;

    let mut series: Vec<(String, Vec<Point>)> = Vec::with_capacity(assets.len());
    for asset in assets {
        let points = fetch_points(client, asset, &start, &end, columns, interval).await?;
        series.push((asset.clone(), points));
    }

    align_price_history(&series)
}

async fn fetch_points(
    client: &MessariClient,
    asset_key: &str,
    start: &str,
    end: &str,
    columns: &str,
    interval: &str,
) -> Result<Vec<Point>> {
    let params = [
        ("start", start),
        ("end", end),
        ("interval", interval),
        ("columns", columns),
    ];
    let body = client
        .get_asset_timeseries(asset_key, "price", &params)
        .await?;
    parse_timeseries(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2021-01-17").unwrap(),
            NaiveDate::from_ymd_opt(2021, 1, 17).unwrap()
        );
    }

    #[test]
    fn test_invalid_date_rejected() {
        let err = parse_date("2021-13-40").unwrap_err();
        assert!(matches!(err, Error::InvalidDate(ref s) if s == "2021-13-40"));
    }

    #[test]
    fn test_resolve_range_defaults_to_trailing_year() {
        let (start, end) = resolve_range(None, None).unwrap();
        let start = parse_date(&start).unwrap();
        let end = parse_date(&end).unwrap();
        assert_eq!(end - start, Duration::days(365));
    }

    #[test]
    fn test_resolve_range_validates_before_defaulting() {
        let err = resolve_range(Some("not-a-date"), None).unwrap_err();
        assert!(matches!(err, Error::InvalidDate(_)));
    }

    #[tokio::test]
    async fn test_empty_asset_list_fails_before_any_request() {
        // Unroutable base URL: reaching the network would fail differently.
        let client = MessariClient::with_base_url("http://127.0.0.1:1", None).unwrap();
        let err = assets_price_history(&client, &[], None, None, DEFAULT_COLUMNS, DEFAULT_INTERVAL)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::EmptyInput));
    }

    #[tokio::test]
    async fn test_duplicate_asset_fails_before_any_request() {
        let client = MessariClient::with_base_url("http://127.0.0.1:1", None).unwrap();
        let assets = vec!["bitcoin".to_string(), "bitcoin".to_string()];
        let err = assets_price_history(
            &client,
            &assets,
            None,
            None,
            DEFAULT_COLUMNS,
            DEFAULT_INTERVAL,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateKey(_)));
    }

    #[tokio::test]
    async fn test_bad_start_date_fails_before_any_request() {
        let client = MessariClient::with_base_url("http://127.0.0.1:1", None).unwrap();
        let assets = vec!["bitcoin".to_string()];
        let err = assets_price_history(
            &client,
            &assets,
            Some("2021-13-40"),
            None,
            DEFAULT_COLUMNS,
            DEFAULT_INTERVAL,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::InvalidDate(_)));
    }
}
