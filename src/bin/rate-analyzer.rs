//! Rate Analyzer
//!
//! Rates a file of shipments against a reference workbook and prints the
//! analysis report as JSON.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use parcel_rate_engine::batch::{BatchOptions, BatchProcessor};
use parcel_rate_engine::config::SettingsLoader;
use parcel_rate_engine::models::ShipmentRecord;
use parcel_rate_engine::reference::RateTableIndex;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rate-analyzer")]
#[command(about = "Compare current parcel spend against an alternative carrier's rates")]
struct Cli {
    /// Directory holding the reference sheets (base rates, zone chart, surcharge lists)
    #[arg(short, long)]
    reference: PathBuf,

    /// Rate settings YAML file. Defaults apply when omitted.
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// JSON array of shipment records
    #[arg(long)]
    shipments: PathBuf,

    /// Worker threads. Defaults to one per CPU.
    #[arg(short, long)]
    workers: Option<usize>,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_shipments(path: &Path) -> Result<Vec<ShipmentRecord>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read shipments from {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse shipments in {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let settings = match &cli.settings {
        Some(path) => SettingsLoader::load(path)?,
        None => Default::default(),
    };
    let index = RateTableIndex::load_dir(&cli.reference)?;
    let records = load_shipments(&cli.shipments)?;
    info!(records = records.len(), path = %cli.shipments.display(), "Loaded shipments");

    let options = match cli.workers {
        Some(workers) => BatchOptions::default().with_workers(workers),
        None => BatchOptions::parallel(),
    };
    let report = BatchProcessor::new(&settings, &index)?
        .process_with_options(&records, &options)?
        .into_report();

    let json = serde_json::to_string_pretty(&report)?;
    match &cli.output {
        Some(path) => {
            fs::write(path, json)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            info!(path = %path.display(), analysis_id = %report.analysis_id, "Report written");
        }
        None => println!("{json}"),
    }

    Ok(())
}
