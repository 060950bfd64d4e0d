// ------------------------------------------------------------
// Module declarations
// ------------------------------------------------------------
//
// - config:    Built-in run configuration (classes, regions, pacing)
// - schema:    Observation API types and the dataset row
// - util:      Small helpers (size tokens, delays, CSV escaping)
// - sources:   Observation source trait and implementations
// - collector: Class / taxon / page iteration
// - output:    CSV serialization
// - metrics:   Run counters
//
mod config;
mod schema;
mod util;
mod sources;
mod collector;
mod output;
mod metrics;

use anyhow::anyhow;
use env_logger::Env;
use log::info;

use collector::runner::run_collection;
use config::CollectorConfig;
use metrics::METRICS;
use sources::get_source;

// ------------------------------------------------------------
// Application entry point
// ------------------------------------------------------------
//
// Collects image URLs per class from the observation API and
// writes them to one CSV table.
//
// Responsibilities:
// - Initialize logging and the TLS backend
// - Resolve the observation source
// - Run the collection (never fails)
// - Write the table (fatal on failure)
//
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    // Must run before the HTTP client is built
    util::install_crypto_provider();

    let config = CollectorConfig::builtin();

    let source = get_source(&config.api)?
        .ok_or_else(|| anyhow!("observation source '{}' is not supported", config.api.source))?;

    let rows = run_collection(source.as_ref(), &config, &METRICS).await;

    info!("{}", METRICS.summary());

    output::write_dataset(&config.output_path, &rows)?;

    info!("Done! URLs saved to '{}'", config.output_path);

    Ok(())
}
