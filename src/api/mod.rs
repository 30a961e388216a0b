pub mod client;

pub use client::{metrics_path, timeseries_path, MessariClient};
