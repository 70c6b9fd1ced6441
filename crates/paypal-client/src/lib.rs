//! # PayPal Client
//!
//! PayPal REST client for webhook management and webhook signature
//! verification.
//!
//! ```no_run
//! # async fn run() -> Result<(), paypal_client::PayPalError> {
//! use paypal_client::{Client, CreateWebhookRequest, API_BASE_SANDBOX};
//!
//! let client = Client::new("client-id", "secret", API_BASE_SANDBOX);
//! let webhook = client
//!     .create_webhook(&CreateWebhookRequest::new(
//!         "https://example.com/paypal",
//!         ["PAYMENT.CAPTURE.COMPLETED"],
//!     ))
//!     .await?;
//! println!("created {}", webhook.id);
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod types;
mod verify;
mod webhooks;

pub use client::{Client, TokenResponse};
pub use error::{ErrorDetail, ErrorResponse, PayPalError};
pub use types::*;
pub use verify::*;
pub use webhooks::WebhookBody;

pub use paypal_config::{API_BASE_LIVE, API_BASE_SANDBOX};
