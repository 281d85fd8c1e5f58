//! Catalog records and the JSON envelope they arrive in.

use serde::{Deserialize, Serialize};

/// One artwork entry from the remote catalog.
///
/// Only `id` is required. Text and date fields may be missing or `null`
/// upstream and render as empty cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artwork {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub place_of_origin: Option<String>,
    #[serde(default)]
    pub artist_display: Option<String>,
    #[serde(default)]
    pub inscriptions: Option<String>,
    #[serde(default)]
    pub date_start: Option<i64>,
    #[serde(default)]
    pub date_end: Option<i64>,
}

impl Artwork {
    /// Title for display, empty when the catalog has none.
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    pub fn origin(&self) -> &str {
        self.place_of_origin.as_deref().unwrap_or("")
    }

    pub fn artist(&self) -> &str {
        self.artist_display.as_deref().unwrap_or("")
    }

    pub fn inscriptions(&self) -> &str {
        self.inscriptions.as_deref().unwrap_or("")
    }

    pub fn start_label(&self) -> String {
        self.date_start.map(|d| d.to_string()).unwrap_or_default()
    }

    pub fn end_label(&self) -> String {
        self.date_end.map(|d| d.to_string()).unwrap_or_default()
    }
}

/// Response body of a catalog page request.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEnvelope {
    pub data: Vec<Artwork>,
    pub pagination: Pagination,
}

/// Pagination block of the envelope. Fields other than `total` are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Pagination {
    pub total: u64,
}

/// Records for one page plus the server-reported total.
///
/// `total` is `None` when the fetch failed and the page was replaced with
/// an empty one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPage {
    pub page: u32,
    pub records: Vec<Artwork>,
    pub total: Option<u64>,
}

impl CatalogPage {
    /// Empty stand-in for a page whose fetch failed.
    pub fn failed(page: u32) -> Self {
        Self {
            page,
            records: Vec::new(),
            total: None,
        }
    }

    pub fn from_envelope(page: u32, envelope: CatalogEnvelope) -> Self {
        Self {
            page,
            records: envelope.data,
            total: Some(envelope.pagination.total),
        }
    }

    /// Whether this page came from a successful response.
    pub fn is_loaded(&self) -> bool {
        self.total.is_some()
    }
}
