//! Discovery journey terminal entry point.

use std::error::Error;
use std::sync::Arc;

use journey_cli::config::AppConfig;
use journey_cli::terminal;
use journey_content::application::ingest::ingest_manifest_file;
use journey_core::telemetry::Telemetry;
use journey_engine::{EventBus, JourneyController, JourneySession};
use journey_progress::ProgressStore;
use journey_storage::FileStorage;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    // Logs go to stderr; stdout carries the journey itself.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .json()
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!(
        content = %config.content_path.display(),
        state_dir = %config.state_dir.display(),
        "starting discovery journey"
    );

    let content = Arc::new(ingest_manifest_file(&config.content_path)?);
    let storage = Arc::new(FileStorage::new(&config.state_dir));
    let store = ProgressStore::new(storage, Telemetry::default());

    let bus = EventBus::new();
    let session = JourneySession::start(JourneyController::new(store, Arc::clone(&content)), &bus);

    let stdin = std::io::stdin();
    terminal::run(&session, &bus, &content, stdin.lock(), std::io::stdout().lock())?;

    session.close();
    Ok(())
}
