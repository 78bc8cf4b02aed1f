use anyhow::{Context, Result};
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use metoedm::host::{JobDriver, JobFixture};
use metoedm::output::RunRecordStore;
use metoedm::Converter;

const USAGE: &str = "usage: metoedm <job.json> [records.json]";

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Setup Logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber).context("setting default subscriber failed")?;

    let mut args = std::env::args().skip(1);
    let job_path = PathBuf::from(args.next().context(USAGE)?);
    let out_path = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("records.json"));

    // 2. Load job
    let fixture = JobFixture::load(&job_path).with_context(|| format!("loading job {}", job_path.display()))?;
    tracing::info!(
        elements = fixture.elements.len(),
        runs = fixture.runs.len(),
        "job loaded from {}",
        job_path.display()
    );

    // 3. Build converter against the record store
    let mut records = RunRecordStore::new();
    let converter = Converter::initialize(fixture.config.clone(), Some(fixture.store()), &mut records)
        .context("initializing converter")?;

    // 4. Feed lifecycle events through the host channel
    let (tx, rx) = mpsc::channel(16);
    let events = fixture.events();
    tokio::spawn(async move {
        for event in events {
            if tx.send(event).await.is_err() {
                tracing::error!("driver hung up before all events were delivered");
                break;
            }
        }
    });

    let mut driver = JobDriver::new(rx, converter, records);
    let summary = driver.run().await.context("running job")?;
    tracing::info!(
        runs = summary.runs_processed,
        containers = summary.stats.total_containers(),
        skipped = summary.stats.elements_skipped,
        "job finished"
    );

    // 5. Persist
    let (_, records) = driver.into_parts();
    records
        .save(&out_path)
        .with_context(|| format!("writing {}", out_path.display()))?;
    tracing::info!("run products written to {}", out_path.display());

    Ok(())
}
