//! HTTP client for the predict endpoint.

use crate::config::ClientConfig;
use crate::predict::{PredictRequest, PredictResponse, TransportError};
use async_trait::async_trait;

/// Anything that can turn a request into a prediction response.
#[async_trait]
pub trait PredictClient: Send + Sync {
    /// Send one request. No retries.
    async fn predict(&self, request: &PredictRequest) -> Result<PredictResponse, TransportError>;
}

/// `POST`s JSON to the configured endpoint with reqwest.
pub struct HttpPredictClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpPredictClient {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        if is_loopback(&config.endpoint) {
            builder = builder.no_proxy();
        }
        Ok(Self {
            client: builder.build()?,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Local servers are reached directly, whatever `HTTP_PROXY` says.
fn is_loopback(endpoint: &str) -> bool {
    let rest = endpoint
        .strip_prefix("http://")
        .or_else(|| endpoint.strip_prefix("https://"))
        .unwrap_or(endpoint);
    ["127.0.0.1", "localhost", "[::1]"].iter().any(|&host| {
        rest.strip_prefix(host)
            .is_some_and(|tail| tail.is_empty() || tail.starts_with([':', '/']))
    })
}

#[async_trait]
impl PredictClient for HttpPredictClient {
    async fn predict(&self, request: &PredictRequest) -> Result<PredictResponse, TransportError> {
        log::debug!("POST {}", self.endpoint);
        let response = self.client.post(&self.endpoint).json(request).send().await?;

        // Status is not inspected; a 4xx with an `error` body is a well-formed response.
        let status = response.status();
        let body = response.text().await?;
        log::debug!("{} from {} ({} bytes)", status, self.endpoint, body.len());
        PredictResponse::from_body(&body)
    }
}
