use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::error::{Error, Result};

/// One time-series observation: (timestamp in milliseconds, value)
pub type Point = (i64, f64);

/// Envelope of a time-series response; the payload nests under `data.values`
#[derive(Debug, Deserialize)]
pub struct TimeSeriesResponse {
    pub data: Option<TimeSeriesData>,
    // Catch-all for envelope fields we don't care about (status, etc.)
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct TimeSeriesData {
    pub values: Option<Vec<Value>>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Envelope of a metrics response; the snapshot nests under `data`
#[derive(Debug, Deserialize)]
pub struct MetricsResponse {
    pub data: Option<Value>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl TimeSeriesResponse {
    /// Pull the `(timestamp, value)` pairs out of the envelope
    pub fn into_points(self) -> Result<Vec<Point>> {
        let values = self
            .data
            .ok_or_else(|| Error::MalformedResponse("missing `data` key".to_string()))?
            .values
            .ok_or_else(|| Error::MalformedResponse("missing `data.values` key".to_string()))?;

        values.iter().map(parse_point).collect()
    }
}

/// Decode a raw time-series response body into points
pub fn parse_timeseries(body: Value) -> Result<Vec<Point>> {
    let response: TimeSeriesResponse =
        serde_json::from_value(body).map_err(|e| Error::MalformedResponse(e.to_string()))?;
    response.into_points()
}

/// Decode a raw metrics response body into the nested snapshot record
pub fn parse_metrics(body: Value) -> Result<Value> {
    let response: MetricsResponse =
        serde_json::from_value(body).map_err(|e| Error::MalformedResponse(e.to_string()))?;
    response
        .data
        .ok_or_else(|| Error::MalformedResponse("missing `data` key".to_string()))
}

fn parse_point(value: &Value) -> Result<Point> {
    let pair = value
        .as_array()
        .ok_or_else(|| Error::MalformedResponse("series point is not an array".to_string()))?;

    if pair.len() != 2 {
        return Err(Error::MalformedResponse(format!(
            "expected [timestamp, value] pair, got {} elements",
            pair.len()
        )));
    }

    let timestamp = pair[0]
        .as_f64()
        .ok_or_else(|| Error::MalformedResponse("non-numeric timestamp".to_string()))?;
    let value = pair[1]
        .as_f64()
        .ok_or_else(|| Error::MalformedResponse("non-numeric series value".to_string()))?;

    Ok((timestamp as i64, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_timeseries() {
        let body = json!({
            "status": { "elapsed": 1 },
            "data": { "values": [[0, 10.0], [86400000, 20.5]] }
        });
        let points = parse_timeseries(body).unwrap();
        assert_eq!(points, vec![(0, 10.0), (86400000, 20.5)]);
    }

    #[test]
    fn test_missing_data_key() {
        let body = json!({ "status": { "elapsed": 1 } });
        let err = parse_timeseries(body).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[test]
    fn test_missing_values_key() {
        let body = json!({ "data": { "schema": {} } });
        let err = parse_timeseries(body).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[test]
    fn test_wrong_point_arity() {
        let body = json!({ "data": { "values": [[0, 10.0, 11.0]] } });
        let err = parse_timeseries(body).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[test]
    fn test_parse_metrics() {
        let body = json!({
            "status": { "elapsed": 1 },
            "data": { "symbol": "BTC", "market_data": { "price_usd": 50000.0 } }
        });
        let data = parse_metrics(body).unwrap();
        assert_eq!(data["market_data"]["price_usd"], json!(50000.0));
    }
}
