//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

/// Sandbox REST endpoint.
pub const API_BASE_SANDBOX: &str = "https://api-m.sandbox.paypal.com";

/// Production REST endpoint.
pub const API_BASE_LIVE: &str = "https://api-m.paypal.com";

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub webhooks: WebhooksConfig,
}

/// Credentials and transport settings for the REST client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub client_id: String,

    #[serde(default)]
    pub secret: String,

    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Per-request timeout.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            secret: String::new(),
            api_base: default_api_base(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_api_base() -> String {
    API_BASE_SANDBOX.to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Defaults for webhook commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhooksConfig {
    /// Webhook used for signature verification when none is given.
    #[serde(default)]
    pub webhook_id: Option<String>,

    #[serde(default = "default_anchor_type")]
    pub anchor_type: String,
}

impl Default for WebhooksConfig {
    fn default() -> Self {
        Self {
            webhook_id: None,
            anchor_type: default_anchor_type(),
        }
    }
}

fn default_anchor_type() -> String {
    "APPLICATION".to_string()
}
