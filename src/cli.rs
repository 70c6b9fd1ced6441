//! CLI definitions for paypal-webhooks.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// PayPal webhook management CLI.
#[derive(Parser)]
#[command(name = "paypal-webhooks")]
#[command(about = "Manage PayPal webhooks and verify webhook deliveries")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: ~/.paypal/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Use the sandbox API regardless of configuration
    #[arg(long, global = true, conflicts_with = "live")]
    pub sandbox: bool,

    /// Use the live API regardless of configuration
    #[arg(long, global = true)]
    pub live: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Subscribe a URL to event types
    Create {
        /// Listener URL
        #[arg(long)]
        url: String,

        /// Event type name (repeatable)
        #[arg(long = "event-type", required = true)]
        event_types: Vec<String>,
    },

    /// Show a webhook
    Get {
        /// Webhook ID
        webhook_id: String,
    },

    /// Replace the URL and/or event types of a webhook
    Update {
        /// Webhook ID
        webhook_id: String,

        /// New listener URL
        #[arg(long)]
        url: Option<String>,

        /// New event type list (repeatable)
        #[arg(long = "event-type")]
        event_types: Vec<String>,
    },

    /// List webhooks
    List {
        /// Anchor type (APPLICATION or ACCOUNT; default from config)
        #[arg(long)]
        anchor_type: Option<String>,
    },

    /// Delete a webhook
    Delete {
        /// Webhook ID
        webhook_id: String,
    },

    /// Verify the signature of a captured webhook delivery
    Verify {
        /// Webhook ID the delivery was sent to (default from config)
        #[arg(long)]
        webhook_id: Option<String>,

        /// File holding the raw delivery body
        #[arg(long)]
        body: PathBuf,

        /// Delivery header as NAME:VALUE (repeatable)
        #[arg(long = "header")]
        headers: Vec<String>,
    },

    /// List the event types webhooks can subscribe to
    EventTypes,
}
