mod bootstrap;

use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use report_core::formatting::format_seconds;
use report_core::settings::Settings;
use report_data::store::Store;
use report_metrics::report::{render_report, run_battery};

fn main() -> Result<()> {
    let settings = Settings::parse();
    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("campaign-report v{} starting", env!("CARGO_PKG_VERSION"));

    let run_start = Instant::now();
    let data_dir = bootstrap::resolve_data_dir(&settings)?;
    tracing::info!("Reading source files from {}", data_dir.display());

    let mut store = Store::new(settings.campaigns_path(), settings.stats_path());

    let load_start = Instant::now();
    let dataset = store.dataset()?;
    println!(
        "Loading source files into memory: {}",
        format_seconds(load_start.elapsed().as_secs_f64())
    );

    let reports = run_battery(dataset)?;
    println!("{}", render_report(&reports));
    println!(
        "Report processing time: {}",
        format_seconds(run_start.elapsed().as_secs_f64())
    );

    Ok(())
}
