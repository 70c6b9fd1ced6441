//! Webhook data model.

use chrono::{DateTime, Utc};
use paypal_json::{JsonError, RawMessage};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Webhooks registered for the REST app.
pub const ANCHOR_TYPE_APPLICATION: &str = "APPLICATION";
/// Webhooks registered for the merchant account.
pub const ANCHOR_TYPE_ACCOUNT: &str = "ACCOUNT";

pub const VERIFICATION_STATUS_SUCCESS: &str = "SUCCESS";
pub const VERIFICATION_STATUS_FAILURE: &str = "FAILURE";

/// HATEOAS link.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub rel: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enctype: Option<String>,
}

/// A webhook subscription.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Webhook {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub event_types: Vec<WebhookEventType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebhookEventType {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resource_versions: Vec<String>,
}

impl WebhookEventType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Body of `create_webhook`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateWebhookRequest {
    pub url: String,
    pub event_types: Vec<WebhookEventType>,
}

impl CreateWebhookRequest {
    pub fn new<I, S>(url: impl Into<String>, event_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            url: url.into(),
            event_types: event_types.into_iter().map(WebhookEventType::new).collect(),
        }
    }
}

/// A single patch instruction for `update_webhook`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookField {
    #[serde(rename = "op")]
    pub operation: String,
    pub path: String,
    pub value: serde_json::Value,
}

impl WebhookField {
    pub fn new(
        operation: impl Into<String>,
        path: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        Self {
            operation: operation.into(),
            path: path.into(),
            value: value.into(),
        }
    }

    pub fn replace(path: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self::new("replace", path, value)
    }

    /// Replace `/event_types` with the given names.
    pub fn replace_event_types<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let event_types: Vec<serde_json::Value> = names
            .into_iter()
            .map(|name| {
                let name: String = name.into();
                serde_json::json!({ "name": name })
            })
            .collect();
        Self::replace("/event_types", event_types)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListWebhookResponse {
    #[serde(default)]
    pub webhooks: Vec<Webhook>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebhookEventTypesResponse {
    #[serde(default)]
    pub event_types: Vec<WebhookEventType>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerifyWebhookResponse {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub verification_status: String,
}

impl VerifyWebhookResponse {
    pub fn is_verified(&self) -> bool {
        self.verification_status == VERIFICATION_STATUS_SUCCESS
    }
}

/// Notification envelope delivered to a webhook listener.
///
/// `resource` is kept as raw JSON; decode it with [`WebhookEvent::resource_as`]
/// once the event type is known.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub event_version: String,
    pub event_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub summary: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub resource_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<RawMessage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
}

impl WebhookEvent {
    pub fn from_bytes(body: &[u8]) -> Result<Self, JsonError> {
        paypal_json::unmarshal(body)
    }

    pub fn resource_as<T: DeserializeOwned>(&self) -> Result<Option<T>, JsonError> {
        self.resource
            .as_ref()
            .map(|raw| paypal_json::unmarshal_str(raw.get()))
            .transpose()
    }
}
