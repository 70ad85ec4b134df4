use std::path::PathBuf;

use anyhow::Context;
use nexussuite::{Aggregator, Cache, NexusConfig, logging, web};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = NexusConfig::load_from_path(config_path).context("Failed to load configuration")?;

    logging::init(&config.logging);
    tracing::info!(version = nexussuite::VERSION, "Starting NexusSuite");

    let cache = Cache::from_config(&config.cache).context("Failed to open cache")?;
    let aggregator = Aggregator::from_config(&config, cache).context("Failed to build aggregator")?;

    web::run(aggregator, &config.server.bind_address).await
}
