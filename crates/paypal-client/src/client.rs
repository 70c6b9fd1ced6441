//! Authenticated PayPal REST transport.

use std::fmt;
use std::time::{Duration, Instant};

use bytes::Bytes;
use paypal_config::ClientConfig;
use reqwest::Method;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;
use url::Url;

use crate::error::PayPalError;

const TOKEN_PATH: &str = "/v1/oauth2/token";
const JSON_CONTENT_TYPE: &str = "application/json";

/// Tokens are refreshed this long before PayPal expires them.
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Response of the OAuth2 client-credentials grant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    /// Lifetime in seconds.
    #[serde(default)]
    pub expires_in: u64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn new(access_token: String, lifetime: Duration) -> Self {
        Self {
            access_token,
            expires_at: Instant::now() + lifetime,
        }
    }

    fn is_fresh(&self) -> bool {
        Instant::now() + TOKEN_REFRESH_MARGIN < self.expires_at
    }
}

/// PayPal REST client.
///
/// Holds the app credentials and a cached access token. Safe to share
/// between tasks; every operation takes `&self`.
pub struct Client {
    client_id: String,
    secret: String,
    api_base: String,
    http: reqwest::Client,
    token: Mutex<Option<CachedToken>>,
}

impl Client {
    /// Create a client for the given app credentials and API base
    /// (see [`crate::API_BASE_SANDBOX`] and [`crate::API_BASE_LIVE`]).
    pub fn new(
        client_id: impl Into<String>,
        secret: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Self {
        Self::with_http_client(client_id, secret, api_base, reqwest::Client::new())
    }

    /// Create a client on top of a preconfigured `reqwest::Client`.
    pub fn with_http_client(
        client_id: impl Into<String>,
        secret: impl Into<String>,
        api_base: impl Into<String>,
        http: reqwest::Client,
    ) -> Self {
        let api_base: String = api_base.into();
        Self {
            client_id: client_id.into(),
            secret: secret.into(),
            api_base: api_base.trim_end_matches('/').to_string(),
            http,
            token: Mutex::new(None),
        }
    }

    /// Create a client from the `[client]` configuration section.
    pub fn from_config(config: &ClientConfig) -> Result<Self, PayPalError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| PayPalError::Network(e.to_string()))?;

        Ok(Self::with_http_client(
            config.client_id.clone(),
            config.secret.clone(),
            config.api_base.clone(),
            http,
        ))
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Absolute URL for an API path such as `/v1/notifications/webhooks`.
    pub fn endpoint(&self, path: &str) -> Result<Url, PayPalError> {
        let raw = format!("{}{}", self.api_base, path);
        Url::parse(&raw).map_err(|e| PayPalError::InvalidUrl(format!("{}: {}", raw, e)))
    }

    /// Build a request, encoding `body` (if any) through the JSON facade.
    pub fn new_request<B>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<reqwest::Request, PayPalError>
    where
        B: Serialize + ?Sized,
    {
        let mut builder = self
            .http
            .request(method, url)
            .header(ACCEPT, JSON_CONTENT_TYPE);

        if let Some(body) = body {
            let encoded = paypal_json::marshal(body)?;
            builder = builder.header(CONTENT_TYPE, JSON_CONTENT_TYPE).body(encoded);
        }

        builder
            .build()
            .map_err(|e| PayPalError::InvalidUrl(e.to_string()))
    }

    /// Send an authenticated request and decode the JSON response.
    pub async fn send_with_auth<T>(&self, request: reqwest::Request) -> Result<T, PayPalError>
    where
        T: DeserializeOwned,
    {
        let body = self.execute_with_auth(request).await?;
        Ok(paypal_json::unmarshal(&body)?)
    }

    /// Send an authenticated request whose response carries no content.
    pub async fn send_with_auth_no_content(
        &self,
        request: reqwest::Request,
    ) -> Result<(), PayPalError> {
        self.execute_with_auth(request).await.map(|_| ())
    }

    /// Request a fresh access token and cache it.
    pub async fn get_access_token(&self) -> Result<TokenResponse, PayPalError> {
        let token = self.request_token().await?;
        self.set_access_token(
            token.access_token.clone(),
            Duration::from_secs(token.expires_in),
        )
        .await;
        Ok(token)
    }

    /// Use a token obtained elsewhere until `lifetime` elapses.
    pub async fn set_access_token(&self, access_token: impl Into<String>, lifetime: Duration) {
        *self.token.lock().await = Some(CachedToken::new(access_token.into(), lifetime));
    }

    async fn execute_with_auth(&self, mut request: reqwest::Request) -> Result<Bytes, PayPalError> {
        let token = self.bearer_token().await?;
        let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
            PayPalError::AuthenticationFailed("access token is not a valid header value".to_string())
        })?;
        request.headers_mut().insert(AUTHORIZATION, value);
        self.execute(request).await
    }

    async fn bearer_token(&self) -> Result<String, PayPalError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.access_token.clone());
        }

        let token = self.request_token().await?;
        let access_token = token.access_token.clone();
        *cached = Some(CachedToken::new(
            token.access_token,
            Duration::from_secs(token.expires_in),
        ));
        Ok(access_token)
    }

    async fn request_token(&self) -> Result<TokenResponse, PayPalError> {
        let url = self.endpoint(TOKEN_PATH)?;
        debug!("PayPal token request: client_id={}", self.client_id);

        let request = self
            .http
            .post(url)
            .basic_auth(&self.client_id, Some(&self.secret))
            .header(ACCEPT, JSON_CONTENT_TYPE)
            .form(&[("grant_type", "client_credentials")])
            .build()
            .map_err(|e| PayPalError::InvalidUrl(e.to_string()))?;

        let body = self.execute(request).await?;
        let token: TokenResponse = paypal_json::unmarshal(&body)?;
        if token.access_token.is_empty() {
            return Err(PayPalError::AuthenticationFailed(
                "token response carried no access_token".to_string(),
            ));
        }
        Ok(token)
    }

    async fn execute(&self, request: reqwest::Request) -> Result<Bytes, PayPalError> {
        debug!("PayPal request: {} {}", request.method(), request.url().path());

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| PayPalError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| PayPalError::Network(e.to_string()))?;

        debug!("PayPal response: status={} bytes={}", status.as_u16(), body.len());

        if !status.is_success() {
            return Err(PayPalError::from_response(status.as_u16(), &body));
        }
        Ok(body)
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("client_id", &self.client_id)
            .field("secret", &"<redacted>")
            .field("api_base", &self.api_base)
            .finish()
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
