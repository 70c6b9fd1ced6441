//! paypal-webhooks - PayPal webhook management CLI
//!
//! Main entry point.

mod cli;
mod commands;

use std::path::PathBuf;

use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use paypal_client::{Client, API_BASE_LIVE, API_BASE_SANDBOX};
use paypal_config::{ConfigLoader, ConfigValidator};

use crate::cli::Cli;

/// Get the paypal-webhooks home directory (~/.paypal).
fn paypal_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".paypal")
}

/// Initialize logging to stderr so stdout only carries JSON results.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let cli = Cli::parse();

    let config_path = cli
        .config
        .map(|path| PathBuf::from(ConfigLoader::expand_path(&path.to_string_lossy())))
        .unwrap_or_else(|| paypal_dir().join("config.toml"));
    debug!("Loading configuration from {}", config_path.display());

    let mut config = ConfigLoader::load_or_env(&config_path)?;
    if cli.sandbox {
        config.client.api_base = API_BASE_SANDBOX.to_string();
    } else if cli.live {
        config.client.api_base = API_BASE_LIVE.to_string();
    }

    let warnings = ConfigValidator::validate(&config)?.into_result()?;
    for warning in warnings {
        warn!("Config {}: {}", warning.path, warning.message);
    }

    let client = Client::from_config(&config.client)?;
    debug!("Using PayPal API at {}", client.api_base());

    commands::handle_command(
        &client,
        cli.command,
        config.webhooks.webhook_id.as_deref(),
        &config.webhooks.anchor_type,
    )
    .await
}
