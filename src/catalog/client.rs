//! HTTP client for the catalog endpoint.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use super::{CatalogError, CatalogSource};
use crate::config::Settings;
use crate::models::{CatalogEnvelope, CatalogPage};

const USER_AGENT: &str = concat!("artcat/", env!("CARGO_PKG_VERSION"));

/// The configured user agent, or `artcat/<version>` when none is set.
fn user_agent(settings: &Settings) -> &str {
    settings.user_agent.as_deref().unwrap_or(USER_AGENT)
}

/// Catalog client backed by `reqwest`. No retries, no backoff.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: Url,
}

impl CatalogClient {
    pub fn new(settings: &Settings) -> Result<Self, CatalogError> {
        let base_url = settings.base_url()?;
        let mut builder = Client::builder()
            .user_agent(user_agent(settings))
            .gzip(true)
            .brotli(true);
        if let Some(timeout) = settings.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(CatalogError::Client)?;

        Ok(Self { client, base_url })
    }

    /// URL for a 1-based page number.
    pub fn page_url(&self, page: u32) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut().append_pair("page", &page.to_string());
        url
    }
}

#[async_trait]
impl CatalogSource for CatalogClient {
    async fn fetch_page(&self, page: u32) -> Result<CatalogPage, CatalogError> {
        let url = self.page_url(page);
        debug!("GET {}", url);

        let start = Instant::now();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| CatalogError::Transport { page, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status { page, status });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| CatalogError::Transport { page, source })?;
        let envelope: CatalogEnvelope =
            serde_json::from_slice(&body).map_err(|source| CatalogError::Parse { page, source })?;

        let elapsed: Duration = start.elapsed();
        debug!(
            "page {} returned {} records (total {}) in {:?}",
            page,
            envelope.data.len(),
            envelope.pagination.total,
            elapsed
        );

        Ok(CatalogPage::from_envelope(page, envelope))
    }
}
