//! PayPal client errors.

use paypal_json::JsonError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PayPalError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Json(#[from] JsonError),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("API error: {status} {name} - {message}")]
    Api {
        status: u16,
        name: String,
        message: String,
        debug_id: Option<String>,
        details: Vec<ErrorDetail>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PayPalError {
    /// Maps a non-success response to an error, decoding PayPal's error
    /// envelope when the body carries one.
    pub(crate) fn from_response(status: u16, body: &[u8]) -> Self {
        let envelope = paypal_json::unmarshal::<ErrorResponse>(body).unwrap_or_default();
        let message = envelope
            .error_description
            .clone()
            .filter(|d| !d.is_empty())
            .or_else(|| Some(envelope.message.clone()).filter(|m| !m.is_empty()))
            .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned());

        if status == 401 {
            return PayPalError::AuthenticationFailed(message);
        }

        let name = if envelope.name.is_empty() {
            envelope.error.unwrap_or_default()
        } else {
            envelope.name
        };

        PayPalError::Api {
            status,
            name,
            message,
            debug_id: envelope.debug_id,
            details: envelope.details,
        }
    }

    /// HTTP status for errors returned by the remote service.
    pub fn status(&self) -> Option<u16> {
        match self {
            PayPalError::Api { status, .. } => Some(*status),
            PayPalError::AuthenticationFailed(_) => Some(401),
            _ => None,
        }
    }
}

/// Error body returned by the REST API (and the OAuth2 endpoint).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<ErrorDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

/// One entry of an error response's `details`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub issue: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
