//! External source HTTP adapter
//!
//! The catalog needs one capability from the outside world: fetch a URL and
//! decode its JSON body. Every transport, status or decoding failure
//! collapses into a single [`FetchError`]; retry and backoff live behind
//! this boundary.

use std::time::Duration;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::time::sleep;
use tracing::warn;

use crate::config::SeedConfig;

/// The only failure kind of the external source
#[derive(Debug, Error)]
#[error("failed to fetch {url} from external source")]
pub struct FetchError {
    pub url: String,
    #[source]
    source: anyhow::Error,
}

impl FetchError {
    pub fn new(url: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self {
            url: url.into(),
            source: source.into(),
        }
    }
}

#[async_trait]
pub trait HttpAdapter: Send + Sync {
    /// GET `url` and return the decoded JSON body
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, FetchError>;
}

/// Fetch `url` and decode it into `T`
pub async fn fetch_json<T: DeserializeOwned>(
    adapter: &dyn HttpAdapter,
    url: &str,
) -> Result<T, FetchError> {
    let value = adapter.get_json(url).await?;
    serde_json::from_value(value)
        .with_context(|| format!("Unexpected response shape from {}", url))
        .map_err(|e| FetchError::new(url, e))
}

/// reqwest-backed adapter with timeout and bounded retries
pub struct ReqwestAdapter {
    client: Client,
    max_retries: u32,
    retry_backoff: Duration,
}

impl ReqwestAdapter {
    pub fn new(timeout: Duration, max_retries: u32, retry_backoff: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            max_retries,
            retry_backoff,
        })
    }

    pub fn from_config(config: &SeedConfig) -> anyhow::Result<Self> {
        Self::new(
            config.fetch_timeout,
            config.fetch_retries,
            config.retry_backoff,
        )
    }

    async fn attempt(&self, url: &str) -> Result<serde_json::Value, Attempt> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Attempt::Retryable(anyhow::Error::new(e).context("Request failed")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = anyhow!(
                "External source returned {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            );
            return Err(if status.is_server_error() {
                Attempt::Retryable(err)
            } else {
                Attempt::Fatal(err)
            });
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| Attempt::Fatal(anyhow::Error::new(e).context("Failed to decode response body")))
    }
}

/// Linear backoff, clamped instead of overflowing
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(attempt)
}

enum Attempt {
    Retryable(anyhow::Error),
    Fatal(anyhow::Error),
}

#[async_trait]
impl HttpAdapter for ReqwestAdapter {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, FetchError> {
        let mut attempt_no = 0u32;
        loop {
            match self.attempt(url).await {
                Ok(value) => return Ok(value),
                Err(Attempt::Retryable(err)) if attempt_no < self.max_retries => {
                    attempt_no += 1;
                    warn!(url, attempt = attempt_no, error = %err, "Fetch attempt failed, retrying");
                    sleep(backoff_delay(self.retry_backoff, attempt_no)).await;
                }
                Err(Attempt::Retryable(err)) | Err(Attempt::Fatal(err)) => {
                    return Err(FetchError::new(url, err));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species_source::SpeciesPage;

    struct CannedAdapter(serde_json::Value);

    #[async_trait]
    impl HttpAdapter for CannedAdapter {
        async fn get_json(&self, _url: &str) -> Result<serde_json::Value, FetchError> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn decodes_into_requested_type() {
        let adapter = CannedAdapter(serde_json::json!({
            "results": [{ "name": "mew", "url": "https://pokeapi.co/api/v2/pokemon/151/" }]
        }));
        let page: SpeciesPage = fetch_json(&adapter, "https://example.test/pokemon")
            .await
            .unwrap();
        assert_eq!(page.results[0].name, "mew");
    }

    #[tokio::test]
    async fn wrong_shape_is_a_fetch_error() {
        let adapter = CannedAdapter(serde_json::json!({ "unexpected": true }));
        let err = fetch_json::<SpeciesPage>(&adapter, "https://example.test/pokemon")
            .await
            .unwrap_err();
        assert_eq!(err.url, "https://example.test/pokemon");
    }

    #[tokio::test]
    async fn unreachable_host_is_a_fetch_error() {
        let adapter =
            ReqwestAdapter::new(Duration::from_millis(500), 0, Duration::from_millis(1)).unwrap();
        let err = adapter
            .get_json("http://127.0.0.1:9/pokemon?limit=1")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("127.0.0.1:9"));
    }

    #[test]
    fn backoff_grows_linearly() {
        let base = Duration::from_millis(250);
        assert_eq!(backoff_delay(base, 1), Duration::from_millis(250));
        assert_eq!(backoff_delay(base, 3), Duration::from_millis(750));
    }

    #[test]
    fn backoff_saturates_on_huge_config() {
        let base = Duration::from_millis(u64::MAX);
        assert_eq!(backoff_delay(base, u32::MAX), Duration::MAX);
    }
}
