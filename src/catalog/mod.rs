//! Remote catalog access.
//!
//! [`CatalogSource`] is the seam between the controller and the network.
//! [`fetch_page_or_empty`] is the lenient entry point the rest of the crate
//! uses: failures are logged and turned into empty pages.

mod client;

pub use client::CatalogClient;

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::error;

use crate::models::CatalogPage;

/// Anything that can serve catalog pages by 1-based page number.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_page(&self, page: u32) -> Result<CatalogPage, CatalogError>;
}

/// Errors from a single catalog page request.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("invalid catalog URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("request for page {page} failed: {source}")]
    Transport {
        page: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("page {page} returned HTTP {status}")]
    Status { page: u32, status: StatusCode },

    #[error("page {page} payload could not be parsed: {source}")]
    Parse {
        page: u32,
        #[source]
        source: serde_json::Error,
    },
}

/// Fetch a page, logging any failure and returning an empty page instead.
pub async fn fetch_page_or_empty(source: &dyn CatalogSource, page: u32) -> CatalogPage {
    match source.fetch_page(page).await {
        Ok(page) => page,
        Err(e) => {
            error!("{}", e);
            CatalogPage::failed(page)
        }
    }
}
