//! Single-request HTTP transport. One call, one attempt, no retries.

use async_trait::async_trait;
use log::debug;
use reqwest::{
    Client,
    header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue},
};
use std::time::{Duration, Instant};

use super::error::TransportError;
use crate::endpoint::Headers;

/// Status, body and wall-clock time of one completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptResult {
    pub status: u16,
    pub body: String,
    pub elapsed: Duration,
}

impl AttemptResult {
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed.as_millis() as u64
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `payload` as JSON.
    async fn post_json(
        &self,
        url: &str,
        payload: &serde_json::Value,
        headers: &Headers,
        timeout: Duration,
    ) -> Result<AttemptResult, TransportError>;

    /// GET with query parameters.
    async fn get(
        &self,
        url: &str,
        query: &[(String, String)],
        headers: &Headers,
        timeout: Duration,
    ) -> Result<AttemptResult, TransportError>;
}

/// [`Transport`] backed by a shared reqwest [`Client`].
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Client with the CLI's user agent.
    pub fn with_defaults() -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("semitia-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::new(client))
    }

    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
        timeout: Duration,
    ) -> Result<AttemptResult, TransportError> {
        let start = Instant::now();

        let response = request
            .timeout(timeout)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_reqwest_error)?;

        let elapsed = start.elapsed();
        debug!("HTTP {} after {}ms", status, elapsed.as_millis());

        Ok(AttemptResult {
            status,
            body,
            elapsed,
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[tracing::instrument(skip(self, payload, headers))]
    async fn post_json(
        &self,
        url: &str,
        payload: &serde_json::Value,
        headers: &Headers,
        timeout: Duration,
    ) -> Result<AttemptResult, TransportError> {
        debug!("POST {}...", url);
        let request = self
            .client
            .post(url)
            .headers(to_header_map(headers)?)
            .json(payload);
        self.execute(request, timeout).await
    }

    #[tracing::instrument(skip(self, headers))]
    async fn get(
        &self,
        url: &str,
        query: &[(String, String)],
        headers: &Headers,
        timeout: Duration,
    ) -> Result<AttemptResult, TransportError> {
        debug!("GET {} with query {:?}...", url, query);
        let request = self
            .client
            .get(url)
            .headers(to_header_map(headers)?)
            .query(query);
        self.execute(request, timeout).await
    }
}

fn to_header_map(headers: &Headers) -> Result<HeaderMap, TransportError> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| TransportError::InvalidHeader(name.clone()))?;
        let mut header_value =
            HeaderValue::from_str(value).map_err(|_| TransportError::InvalidHeader(name.clone()))?;
        if header_name == AUTHORIZATION {
            header_value.set_sensitive(true);
        }
        map.insert(header_name, header_value);
    }
    Ok(map)
}

fn map_reqwest_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Network(error.to_string())
    }
}
