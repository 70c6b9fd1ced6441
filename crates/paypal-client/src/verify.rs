//! Webhook signature verification payload.
//!
//! PayPal signs each delivery and sends the signature metadata in five
//! transmission headers. Verification is delegated to the REST API: the
//! headers, the webhook id and the untouched delivery body are posted to
//! `/v1/notifications/verify-webhook-signature`. No cryptography happens here.

use http::HeaderMap;
use paypal_json::{RawMessage, RawValue};
use serde::{Deserialize, Serialize};

use crate::error::PayPalError;

pub const HEADER_AUTH_ALGO: &str = "PAYPAL-AUTH-ALGO";
pub const HEADER_CERT_URL: &str = "PAYPAL-CERT-URL";
pub const HEADER_TRANSMISSION_ID: &str = "PAYPAL-TRANSMISSION-ID";
pub const HEADER_TRANSMISSION_SIG: &str = "PAYPAL-TRANSMISSION-SIG";
pub const HEADER_TRANSMISSION_TIME: &str = "PAYPAL-TRANSMISSION-TIME";

/// Body of the verify-webhook-signature call. Empty fields are not sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerifyWebhookSignatureRequest {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub auth_algo: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cert_url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub transmission_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub transmission_sig: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub transmission_time: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub webhook_id: String,
    /// The delivery body, never re-serialized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_event: Option<RawMessage>,
}

impl VerifyWebhookSignatureRequest {
    /// Assembles the payload from an inbound delivery.
    ///
    /// Header lookup is case-insensitive and a missing header is treated as
    /// empty. Header values are forwarded as received, with invalid UTF-8
    /// replaced by U+FFFD. The body must be UTF-8 JSON; the top-level value
    /// is carried byte for byte, but whitespace before or after it is
    /// dropped.
    pub fn from_parts(
        body: &[u8],
        headers: &HeaderMap,
        webhook_id: &str,
    ) -> Result<Self, PayPalError> {
        let webhook_event = if body.is_empty() {
            None
        } else {
            let text = String::from_utf8(body.to_vec()).map_err(|e| {
                PayPalError::InvalidInput(format!("webhook body is not valid UTF-8: {e}"))
            })?;
            Some(RawValue::from_string(text).map_err(paypal_json::JsonError::Encoding)?)
        };

        Ok(Self {
            auth_algo: header_value(headers, HEADER_AUTH_ALGO),
            cert_url: header_value(headers, HEADER_CERT_URL),
            transmission_id: header_value(headers, HEADER_TRANSMISSION_ID),
            transmission_sig: header_value(headers, HEADER_TRANSMISSION_SIG),
            transmission_time: header_value(headers, HEADER_TRANSMISSION_TIME),
            webhook_id: webhook_id.to_string(),
            webhook_event,
        })
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn signed_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("paypal-auth-algo", HeaderValue::from_static("SHA256withRSA"));
        headers.insert(
            "paypal-cert-url",
            HeaderValue::from_static("https://api.paypal.com/v1/notifications/certs/CERT-360caa42"),
        );
        headers.insert(
            "paypal-transmission-id",
            HeaderValue::from_static("69cd13f0-d67a-11e5-baa3-778b53f4ae55"),
        );
        headers.insert("paypal-transmission-sig", HeaderValue::from_static("lmI95Jx3Y9nhR5SJ"));
        headers.insert(
            "paypal-transmission-time",
            HeaderValue::from_static("2016-02-18T20:01:35Z"),
        );
        headers
    }

    #[test]
    fn test_from_parts_copies_headers_verbatim() {
        let request =
            VerifyWebhookSignatureRequest::from_parts(br#"{"id":"evt_1"}"#, &signed_headers(), "WH-1")
                .unwrap();
        assert_eq!(request.auth_algo, "SHA256withRSA");
        assert_eq!(
            request.cert_url,
            "https://api.paypal.com/v1/notifications/certs/CERT-360caa42"
        );
        assert_eq!(request.transmission_id, "69cd13f0-d67a-11e5-baa3-778b53f4ae55");
        assert_eq!(request.transmission_sig, "lmI95Jx3Y9nhR5SJ");
        assert_eq!(request.transmission_time, "2016-02-18T20:01:35Z");
        assert_eq!(request.webhook_id, "WH-1");
    }

    #[test]
    fn test_event_is_byte_identical() {
        let body = br#"{"id":"evt_1"}"#;
        let request =
            VerifyWebhookSignatureRequest::from_parts(body, &signed_headers(), "WH-1").unwrap();
        assert_eq!(request.webhook_event.as_ref().unwrap().get().as_bytes(), body);

        let encoded = String::from_utf8(paypal_json::marshal(&request).unwrap()).unwrap();
        assert!(encoded.ends_with(r#","webhook_id":"WH-1","webhook_event":{"id":"evt_1"}}"#));
    }

    #[test]
    fn test_event_keeps_original_formatting() {
        let body = br#"{"summary": "Sale <completed>", "amount" : {"total":"0.48"}}"#;
        let request =
            VerifyWebhookSignatureRequest::from_parts(body, &signed_headers(), "WH-1").unwrap();

        let encoded = paypal_json::marshal(&request).unwrap();
        let needle = std::str::from_utf8(body).unwrap();
        assert!(std::str::from_utf8(&encoded).unwrap().contains(needle));
    }

    #[test]
    fn test_headers_are_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert("PAYPAL-AUTH-ALGO", HeaderValue::from_static("SHA256withRSA"));
        headers.insert("Paypal-Transmission-Id", HeaderValue::from_static("abc"));

        let request = VerifyWebhookSignatureRequest::from_parts(b"{}", &headers, "WH-1").unwrap();
        assert_eq!(request.auth_algo, "SHA256withRSA");
        assert_eq!(request.transmission_id, "abc");
    }

    #[test]
    fn test_non_ascii_header_is_forwarded() {
        let mut headers = signed_headers();
        headers.insert(
            "paypal-transmission-sig",
            HeaderValue::from_bytes("sig-é".as_bytes()).unwrap(),
        );
        headers.insert("paypal-auth-algo", HeaderValue::from_bytes(b"RSA\xff").unwrap());

        let request = VerifyWebhookSignatureRequest::from_parts(b"{}", &headers, "WH-1").unwrap();
        assert_eq!(request.transmission_sig, "sig-é");
        assert_eq!(request.auth_algo, "RSA\u{fffd}");
    }

    #[test]
    fn test_surrounding_whitespace_is_dropped() {
        let request = VerifyWebhookSignatureRequest::from_parts(
            b" {\"id\": \"evt_1\"}\n",
            &signed_headers(),
            "WH-1",
        )
        .unwrap();
        assert_eq!(request.webhook_event.unwrap().get(), r#"{"id": "evt_1"}"#);
    }

    #[test]
    fn test_missing_fields_are_omitted() {
        let request =
            VerifyWebhookSignatureRequest::from_parts(b"", &HeaderMap::new(), "").unwrap();
        assert!(request.webhook_event.is_none());
        assert_eq!(paypal_json::marshal_string(&request), "{}");
    }

    #[test]
    fn test_invalid_json_body() {
        let err = VerifyWebhookSignatureRequest::from_parts(b"{not json", &signed_headers(), "WH-1")
            .unwrap_err();
        match err {
            PayPalError::Json(e) => assert!(e.is_encoding()),
            other => panic!("Expected Json, got {:?}", other),
        }
    }

    #[test]
    fn test_non_utf8_body() {
        let err = VerifyWebhookSignatureRequest::from_parts(&[0xff, 0xfe], &signed_headers(), "WH-1")
            .unwrap_err();
        assert!(matches!(err, PayPalError::InvalidInput(_)));
    }
}
