use anyhow::Result;
use chrono::Local;
use clap::Parser;
use std::env;
use std::path::{Path, PathBuf};

use messari_rs::history::{self, DEFAULT_COLUMNS, DEFAULT_INTERVAL};
use messari_rs::metrics;
use messari_rs::{MessariClient, Table};

#[derive(Parser, Debug)]
#[command(
    name = "messari-rs",
    about = "Fetch Messari asset price history and metric snapshots as tables"
)]
struct Args {
    /// Asset keys (id, slug, or symbol)
    #[arg(short, long, required = true, num_args = 1..)]
    assets: Vec<String>,

    /// Start date (YYYY-MM-DD), defaults to one year ago
    #[arg(short, long, value_parser = validate_date)]
    start: Option<String>,

    /// End date (YYYY-MM-DD), defaults to today
    #[arg(short, long, value_parser = validate_date)]
    end: Option<String>,

    /// Keep metric snapshots as top-level fields instead of flattened numeric rows
    #[arg(long)]
    no_flatten: bool,

    /// Also export both tables as CSV under output/
    #[arg(long)]
    csv: bool,
}

fn validate_date(text: &str) -> Result<String, messari_rs::Error> {
    history::parse_date(text)?;
    Ok(text.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let client = MessariClient::new(env::var("MESSARI_API_KEY").ok())?;

    let price_history = history::assets_price_history(
        &client,
        &args.assets,
        args.start.as_deref(),
        args.end.as_deref(),
        DEFAULT_COLUMNS,
        DEFAULT_INTERVAL,
    )
    .await?;
    println!("Asset price history:\n{}", price_history);

    let snapshot = metrics::assets_metrics(&client, &args.assets, !args.no_flatten).await?;
    println!("\nAsset metrics:\n{}", snapshot);

    if args.csv {
        let path = write_csv_file(&price_history, Path::new("output"), "price_history")?;
        println!("CSV file created at: {}", path.display());
        let path = write_csv_file(&snapshot, Path::new("output"), "metrics")?;
        println!("CSV file created at: {}", path.display());
    }

    Ok(())
}

fn write_csv_file(table: &Table, output_dir: &Path, name: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let csv_path = output_dir.join(format!("{}_{}.csv", name, timestamp));
    let file = std::fs::File::create(&csv_path)?;
    table.write_csv(file)?;

    Ok(csv_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_date() {
        assert!(validate_date("2021-01-17").is_ok());
        assert!(validate_date("2021-13-40").is_err());
    }

    #[test]
    fn test_write_csv_file() -> Result<()> {
        let table = Table::from_columns(
            vec!["2021-01-01".to_string()],
            vec![("bitcoin".to_string(), vec![10.0])],
        )?;

        let dir = tempfile::tempdir()?;
        let path = write_csv_file(&table, dir.path(), "price_history")?;
        let contents = std::fs::read_to_string(&path)?;
        assert_eq!(contents, ",bitcoin\n2021-01-01,10\n");
        Ok(())
    }

    #[test]
    fn test_args_require_assets() {
        use clap::CommandFactory;
        let result = Args::try_parse_from(["messari-rs"]);
        assert!(result.is_err());
        Args::command().debug_assert();
    }
}
