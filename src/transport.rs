// Outbound HTTP seam: the client builds requests, a Transport sends them
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use tracing::{debug, warn};

use crate::error::{ClientError, SupplierError};

// Basic auth pair; `key_id` is the user and `api_key` the password
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub key_id: String,
    pub api_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("key_id", &self.key_id)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

// Every supplier endpoint is a JSON POST
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub url: String,
    pub credentials: Credentials,
    pub body: Option<serde_json::Value>,
}

#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Bytes,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request and returns whatever the supplier answered.
///
/// Implementations report connection-level failures as
/// [`SupplierError::Network`] or [`SupplierError::Timeout`] and hand every
/// HTTP status back unchanged; interpreting it is the client's job.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, SupplierError>;
}

// reqwest-backed transport with a pooled connection client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    timeout_ms: u64,
}

impl HttpTransport {
    pub fn new(timeout_ms: u64) -> Result<Self, ClientError> {
        let client = Client::builder()
            .pool_max_idle_per_host(10)
            .timeout(Duration::from_millis(timeout_ms))
            .connect_timeout(Duration::from_millis(timeout_ms.min(10_000)))
            .build()
            .map_err(|e| ClientError::InitError(e.to_string()))?;

        Ok(Self { client, timeout_ms })
    }

    fn map_error(&self, error: reqwest::Error) -> SupplierError {
        if error.is_timeout() {
            SupplierError::Timeout(self.timeout_ms)
        } else {
            SupplierError::Network(error.to_string())
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, SupplierError> {
        debug!(url = %request.url, "sending supplier request");

        let builder = self
            .client
            .post(&request.url)
            .basic_auth(&request.credentials.key_id, Some(&request.credentials.api_key))
            .header(reqwest::header::ACCEPT, "application/json");
        let builder = match &request.body {
            Some(body) => builder.json(body),
            None => builder,
        };

        let response = builder.send().await.map_err(|e| {
            let error = self.map_error(e);
            warn!(url = %request.url, error = %error, "supplier request failed");
            error
        })?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| self.map_error(e))?;
        debug!(url = %request.url, status, bytes = body.len(), "supplier responded");

        Ok(TransportResponse { status, body })
    }
}
