//! Spreadsheet import CLI.
//!
//! Loads error records from a workbook sheet into the `sheet1_errors` table.
//! Rows missing any required value are dropped and counted, the rest are
//! inserted in a single transaction.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use nce_core::ports::ErrorRecordRepository;
use nce_infra::database::{DatabaseConfig, PostgresErrorRecordRepository, connect};

mod rows;
mod sheet;

#[derive(Debug, Parser)]
#[command(name = "sheet-import", about = "Bulk load error records from a spreadsheet")]
struct Args {
    /// Workbook to read (.xlsx, .xlsm, .xlsb, .xls or .ods)
    #[arg(short, long)]
    file: PathBuf,

    /// Sheet holding the records
    #[arg(short, long, default_value = "Sheet1")]
    sheet: String,

    /// Parse and report without touching the database
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    if let Err(e) = run(args).await {
        tracing::error!("Import failed: {:#}", e);
        return Err(e);
    }
    Ok(())
}

async fn run(args: Args) -> Result<()> {
    let Args {
        file,
        sheet: sheet_name,
        dry_run,
    } = args;

    let rows = tokio::task::spawn_blocking(move || sheet::read_sheet(&file, &sheet_name))
        .await
        .context("spreadsheet reader task failed")??;
    let read = rows.len();

    let batch = rows::prepare(rows);
    for dropped in &batch.discarded {
        tracing::debug!(line = dropped.line, field = dropped.field, "Discarding incomplete row");
    }
    tracing::info!(
        read,
        prepared = batch.records.len(),
        discarded = batch.discarded.len(),
        "Prepared rows for insert"
    );

    if dry_run {
        tracing::info!("Dry run - skipping database insert");
        return Ok(());
    }

    let url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    tracing::info!("Connecting to PostgreSQL ...");
    let conn = connect(&DatabaseConfig::new(url))
        .await
        .context("failed to connect to database")?;

    let repo = PostgresErrorRecordRepository::new(conn);
    let inserted = repo
        .insert_batch(batch.records)
        .await
        .context("bulk insert failed, nothing was written")?;

    tracing::info!(inserted, "Data inserted successfully");
    Ok(())
}
