//! Webhook management and signature verification.

use std::io::Cursor;

use bytes::Bytes;
use http::HeaderMap;
use reqwest::Method;
use tokio::io::{AsyncRead, AsyncReadExt};
use url::Url;

use crate::client::Client;
use crate::error::PayPalError;
use crate::types::*;
use crate::verify::VerifyWebhookSignatureRequest;

const WEBHOOKS_PATH: &str = "/v1/notifications/webhooks";
const VERIFY_SIGNATURE_PATH: &str = "/v1/notifications/verify-webhook-signature";
const EVENT_TYPES_PATH: &str = "/v1/notifications/webhooks-event-types";

/// Body of an inbound webhook delivery as handed to
/// [`Client::verify_webhook_signature`]. `None` means the request has no body.
pub type WebhookBody = Option<Box<dyn AsyncRead + Send + Unpin>>;

impl Client {
    /// Subscribes a URL to a list of event types.
    ///
    /// Endpoint: POST /v1/notifications/webhooks
    pub async fn create_webhook(
        &self,
        request: &CreateWebhookRequest,
    ) -> Result<Webhook, PayPalError> {
        let url = self.endpoint(WEBHOOKS_PATH)?;
        let req = self.new_request(Method::POST, url, Some(request))?;
        self.send_with_auth(req).await
    }

    /// Endpoint: GET /v1/notifications/webhooks/ID
    pub async fn get_webhook(&self, webhook_id: &str) -> Result<Webhook, PayPalError> {
        let url = self.webhook_url(webhook_id)?;
        let req = self.new_request(Method::GET, url, None::<&()>)?;
        self.send_with_auth(req).await
    }

    /// Applies `fields` in order; attributes not named keep their value.
    ///
    /// Endpoint: PATCH /v1/notifications/webhooks/ID
    pub async fn update_webhook(
        &self,
        webhook_id: &str,
        fields: &[WebhookField],
    ) -> Result<Webhook, PayPalError> {
        let url = self.webhook_url(webhook_id)?;
        let req = self.new_request(Method::PATCH, url, Some(fields))?;
        self.send_with_auth(req).await
    }

    /// Lists webhooks for `anchor_type`, [`ANCHOR_TYPE_APPLICATION`] when empty.
    ///
    /// Endpoint: GET /v1/notifications/webhooks
    pub async fn list_webhooks(&self, anchor_type: &str) -> Result<ListWebhookResponse, PayPalError> {
        let anchor_type = if anchor_type.is_empty() {
            ANCHOR_TYPE_APPLICATION
        } else {
            anchor_type
        };

        let mut url = self.endpoint(WEBHOOKS_PATH)?;
        url.query_pairs_mut().append_pair("anchor_type", anchor_type);

        let req = self.new_request(Method::GET, url, None::<&()>)?;
        self.send_with_auth(req).await
    }

    /// Endpoint: DELETE /v1/notifications/webhooks/ID
    pub async fn delete_webhook(&self, webhook_id: &str) -> Result<(), PayPalError> {
        let url = self.webhook_url(webhook_id)?;
        let req = self.new_request(Method::DELETE, url, None::<&()>)?;
        self.send_with_auth_no_content(req).await
    }

    /// Verifies an inbound delivery against PayPal.
    ///
    /// The body is read to the end and then replaced by an in-memory reader
    /// over the same bytes, so the caller can still consume it afterwards.
    /// A request without a body fails with [`PayPalError::InvalidInput`]
    /// before anything is sent.
    ///
    /// Endpoint: POST /v1/notifications/verify-webhook-signature
    pub async fn verify_webhook_signature(
        &self,
        request: &mut http::Request<WebhookBody>,
        webhook_id: &str,
    ) -> Result<VerifyWebhookResponse, PayPalError> {
        let mut reader = request
            .body_mut()
            .take()
            .ok_or_else(|| PayPalError::InvalidInput("webhook request has no body".to_string()))?;

        let mut buf = Vec::new();
        let read = reader.read_to_end(&mut buf).await;
        let body = Bytes::from(buf);
        *request.body_mut() = Some(Box::new(Cursor::new(body.clone())));
        read?;

        self.verify_webhook_signature_raw(&body, request.headers(), webhook_id)
            .await
    }

    /// Verifies a delivery given its raw body and headers.
    ///
    /// Endpoint: POST /v1/notifications/verify-webhook-signature
    pub async fn verify_webhook_signature_raw(
        &self,
        body: &[u8],
        headers: &HeaderMap,
        webhook_id: &str,
    ) -> Result<VerifyWebhookResponse, PayPalError> {
        let payload = VerifyWebhookSignatureRequest::from_parts(body, headers, webhook_id)?;
        let url = self.endpoint(VERIFY_SIGNATURE_PATH)?;
        let req = self.new_request(Method::POST, url, Some(&payload))?;
        self.send_with_auth(req).await
    }

    /// Lists every event type a webhook can subscribe to.
    ///
    /// Endpoint: GET /v1/notifications/webhooks-event-types
    pub async fn get_webhook_event_types(&self) -> Result<WebhookEventTypesResponse, PayPalError> {
        let url = self.endpoint(EVENT_TYPES_PATH)?;
        let req = self.new_request(Method::GET, url, None::<&()>)?;
        self.send_with_auth(req).await
    }

    /// `/v1/notifications/webhooks/{id}` with the id percent-encoded as one
    /// path segment.
    fn webhook_url(&self, webhook_id: &str) -> Result<Url, PayPalError> {
        if matches!(webhook_id, "" | "." | "..") {
            return Err(PayPalError::InvalidInput(format!(
                "invalid webhook id '{}'",
                webhook_id
            )));
        }

        let mut url = self.endpoint(WEBHOOKS_PATH)?;
        url.path_segments_mut()
            .map_err(|_| PayPalError::InvalidUrl("API base cannot carry a path".to_string()))?
            .push(webhook_id);
        Ok(url)
    }
}

#[cfg(test)]
#[path = "webhooks_tests.rs"]
mod tests;
