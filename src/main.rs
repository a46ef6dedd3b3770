//! Theca server: bookmarks-manager backend.
//!
//! Loads configuration, initializes logging, and runs the public and admin
//! listeners until shutdown.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use theca_core::config::AppConfig;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "theca-server", version, about = "Theca bookmarks backend")]
struct Args {
    /// Configuration profile; selects `config/<env>.toml`.
    #[arg(long, env = "THECA_ENV", default_value = "development")]
    env: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match AppConfig::load(&args.env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %args.env, "Starting Theca v{}", env!("CARGO_PKG_VERSION"));

    if config.auth.uses_default_secrets() {
        tracing::warn!("JWT secrets are still the shipped placeholders; set THECA__AUTH__ACCESS_SECRET and THECA__AUTH__REFRESH_SECRET");
    }

    if let Err(e) = theca_api::run_server(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}
