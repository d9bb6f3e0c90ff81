//! travelplan - command-line client for the travel itinerary planner.
//!
//! Every command maps onto one or more calls through `ApiClient`; the
//! session token is attached automatically and cleared on a 401.

mod cli;
mod commands;
mod navigator;

use std::io;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use travelplan_core::config::TokenBackend;
use travelplan_core::{
    ApiClient, BaseUrl, Config, FileTokenStore, KeyringTokenStore, MemoryTokenStore, TokenStore,
};

use cli::Cli;
use commands::Context;
use navigator::TerminalNavigator;

/// Initialize the tracing subscriber for logging
fn init_tracing() -> tracing_appender::non_blocking::WorkerGuard {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let (writer, guard) = tracing_appender::non_blocking(io::stderr());

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer))
        .with(filter)
        .init();
    guard
}

fn token_store(backend: TokenBackend, config: &Config) -> Result<Arc<dyn TokenStore>> {
    Ok(match backend {
        TokenBackend::File => Arc::new(FileTokenStore::new(&config.cache_dir()?)),
        TokenBackend::Keyring => Arc::new(KeyringTokenStore::new()),
        TokenBackend::Memory => Arc::new(MemoryTokenStore::new()),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _log_guard = init_tracing();

    let config = Config::load().unwrap_or_else(|e| {
        warn!(error = %e, "Ignoring unreadable config file");
        Config::default()
    });

    let base_url = BaseUrl::resolve(cli.api_url.as_deref(), &config);
    let backend = cli.store.unwrap_or(config.token_backend);
    info!(base_url = %base_url, backend = ?backend, "travelplan starting");

    let navigator = Arc::new(TerminalNavigator::new());
    let client = ApiClient::builder()
        .base_url(base_url)
        .token_store(token_store(backend, &config)?)
        .navigator(navigator)
        .build()?;

    let mut ctx = Context::new(client, config, backend);
    commands::run(cli.command, &mut ctx).await
}
