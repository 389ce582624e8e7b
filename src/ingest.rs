use crate::error::DeliveryError;
use crate::record::LogRecord;
use crate::sink::LogSink;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use std::sync::OnceLock;
use std::time::Duration;

/// Ingestion endpoint receiving error records.
pub const INGEST_URL: &str = "https://sabertooth.fly.dev/ingest";

/// Upper bound on a single POST to the ingestion endpoint.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

static CLIENT: OnceLock<Client> = OnceLock::new();

/// Process-wide HTTP client; its connection pool is shared by every
/// in-flight dispatch.
pub fn shared_client() -> Client {
    CLIENT.get_or_init(Client::new).clone()
}

/// Configuration for [`IngestSink`].
#[derive(Clone, Debug)]
pub struct IngestConfig {
    /// Full URL records are POSTed to.
    pub url: String,
    pub timeout: Duration,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            url: INGEST_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// [`LogSink`] that POSTs each record as JSON to the ingestion endpoint.
///
/// The endpoint acknowledges a stored record with `201 Created`; any other
/// status is reported as [`DeliveryError::UnexpectedStatus`].
#[derive(Clone)]
pub struct IngestSink {
    client: Client,
    config: IngestConfig,
}

impl IngestSink {
    /// Construct a sink on top of the shared client.
    ///
    /// **Parameters**
    /// - `config`: [`IngestConfig`] with the target URL and request timeout.
    pub fn new(config: IngestConfig) -> Self {
        Self { client: shared_client(), config }
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }
}

impl Default for IngestSink {
    fn default() -> Self {
        Self::new(IngestConfig::default())
    }
}

#[async_trait]
impl LogSink for IngestSink {
    async fn send(&self, record: &LogRecord) -> Result<(), DeliveryError> {
        let body = serde_json::to_vec(record)?;
        let resp = self
            .client
            .post(&self.config.url)
            .header(CONTENT_TYPE, "application/json")
            .timeout(self.config.timeout)
            .body(body)
            .send()
            .await?;

        let status = resp.status();
        // Drain the body so the connection goes back to the pool.
        let _ = resp.bytes().await;
        if status == StatusCode::CREATED {
            Ok(())
        } else {
            Err(DeliveryError::UnexpectedStatus(status.as_u16()))
        }
    }
}
