//! Client for the Messari asset-data HTTP API
//!
//! Fetches asset price time-series and metric snapshots and reshapes them
//! into rectangular tables for multiple assets:
//!
//! ```rust,no_run
//! use messari_rs::{history, metrics, MessariClient};
//!
//! #[tokio::main]
//! async fn main() -> messari_rs::Result<()> {
//!     let client = MessariClient::new(std::env::var("MESSARI_API_KEY").ok())?;
//!     let assets = vec!["bitcoin".to_string(), "ethereum".to_string()];
//!
//!     let prices = history::assets_price_history(
//!         &client, &assets, Some("2021-01-01"), Some("2021-02-01"), "close", "1d",
//!     )
//!     .await?;
//!     println!("{}", prices);
//!
//!     let snapshot = metrics::assets_metrics(&client, &assets, true).await?;
//!     println!("{}", snapshot);
//!     Ok(())
//! }
//! ```

pub mod align;
pub mod api;
pub mod error;
pub mod flatten;
pub mod history;
pub mod metrics;
pub mod models;
pub mod table;
pub mod utils;

pub use api::MessariClient;
pub use error::{Error, Result};
pub use table::{Cell, Table};

/// Calendar date format used for query parameters and row labels
pub const DATE_FMT: &str = "%Y-%m-%d";
