//! Cross-page bulk selection: collect the first N catalog records.

use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::catalog::{fetch_page_or_empty, CatalogSource};
use crate::controller::page_state::first_index;
use crate::models::Artwork;

/// Warning shown to the user when the requested count is unusable.
pub const INVALID_COUNT_MESSAGE: &str = "Enter a valid number";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Enter a valid number: {input:?}")]
    InvalidCount { input: String },
}

/// Parse the popup input into a positive record count.
pub fn parse_select_count(input: &str) -> Result<usize, SelectionError> {
    let invalid = || SelectionError::InvalidCount {
        input: input.to_string(),
    };
    let value: i64 = input.trim().parse().map_err(|_| invalid())?;
    validate_count(value).map_err(|_| invalid())
}

/// Reject zero and negative counts.
pub fn validate_count(value: i64) -> Result<usize, SelectionError> {
    if value <= 0 {
        return Err(SelectionError::InvalidCount {
            input: value.to_string(),
        });
    }
    usize::try_from(value).map_err(|_| SelectionError::InvalidCount {
        input: value.to_string(),
    })
}

/// Outcome of one bulk selection run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkSelection {
    pub requested: usize,
    /// At most `requested` records, in catalog order, unique by id.
    pub records: Vec<Artwork>,
    /// Last page number requested during the run.
    pub last_page: Option<u32>,
    pub pages_fetched: u32,
    /// Pages whose fetch failed and contributed no records.
    pub failed_pages: Vec<u32>,
}

impl BulkSelection {
    /// Whether fewer records came back than were asked for.
    pub fn is_short(&self) -> bool {
        self.records.len() < self.requested
    }
}

/// Fetch pages from the start of the catalog until `count` records are
/// collected or the known total is exhausted.
///
/// Pages are requested one at a time. Each successful response refreshes
/// the total used for the bound check; a failed page contributes nothing
/// and the previous total stays in effect. With no known total only page 1
/// is attempted before a total is learned.
pub async fn select_first_n(
    source: &dyn CatalogSource,
    count: usize,
    known_total: Option<u64>,
    page_size: usize,
) -> BulkSelection {
    let page_size = page_size.max(1);
    let mut total = known_total;
    let mut seen = HashSet::new();
    let mut outcome = BulkSelection {
        requested: count,
        ..Default::default()
    };

    let mut page: u32 = 1;
    while outcome.records.len() < count {
        let offset = first_index(page, page_size) as u64;
        let in_bounds = match total {
            Some(total) => offset < total,
            None => page == 1,
        };
        if !in_bounds {
            break;
        }

        let fetched = fetch_page_or_empty(source, page).await;
        outcome.pages_fetched += 1;
        outcome.last_page = Some(page);

        match fetched.total {
            Some(t) => total = Some(t),
            None => outcome.failed_pages.push(page),
        }

        let before = outcome.records.len();
        outcome
            .records
            .extend(fetched.records.into_iter().filter(|r| seen.insert(r.id)));
        debug!(
            "bulk select: page {} added {} records ({} of {})",
            page,
            outcome.records.len() - before,
            outcome.records.len(),
            count
        );

        page += 1;
    }

    outcome.records.truncate(count);

    if !outcome.failed_pages.is_empty() {
        warn!(
            "bulk select: pages {:?} failed; selected {} of {} requested",
            outcome.failed_pages,
            outcome.records.len(),
            count
        );
    }
    info!(
        "Selected {} records across {} pages",
        outcome.records.len(),
        outcome.pages_fetched
    );

    outcome
}
