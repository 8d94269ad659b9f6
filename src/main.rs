//! wg-easy console - an interactive client for the wg-easy admin API.
//!
//! Manages virtual-network peer identities (create, delete, enable,
//! disable, list, look up) over an authenticated session that is acquired
//! lazily and renewed transparently on expiry.

mod api;
mod auth;
mod cli;
mod config;
mod models;
mod utils;

use std::io;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use api::WgEasyClient;
use config::Config;

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();
    info!("wg-easy console starting");

    let config = Config::from_env().context("configuration error")?;
    let client = WgEasyClient::new(&config).context("failed to construct API client")?;

    println!("=== wg-easy peer console ===");
    println!("Authenticating...");
    if let Err(e) = client.ensure_session().await {
        eprintln!("Authentication failed: {e}");
        eprintln!("Check PASSWORD and WG_EASY_URL and try again.");
        std::process::exit(1);
    }
    println!("Authenticated.");

    cli::run(&client).await?;

    info!("wg-easy console shutting down");
    Ok(())
}
