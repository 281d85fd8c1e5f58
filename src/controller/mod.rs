//! Single owner of the browser's state.
//!
//! The presentation layer never mutates state directly. It calls transition
//! methods here and runs whatever fetch work they hand back.

pub mod page_state;
pub mod selection;

pub use page_state::{PageState, PageTicket, PageWindow};
pub use selection::SelectionSet;

use tracing::debug;

use crate::catalog::{fetch_page_or_empty, CatalogSource};
use crate::models::{Artwork, CatalogPage};
use crate::services::{
    parse_select_count, select_first_n, validate_count, BulkSelection, SelectionError,
    INVALID_COUNT_MESSAGE,
};

/// Popup holding the bulk-selection count input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectPopup {
    pub open: bool,
    pub input: String,
}

/// Blocking message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Warning(String),
}

/// Parameters for a bulk selection that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkRequest {
    pub count: usize,
    pub known_total: Option<u64>,
    pub page_size: usize,
}

impl BulkRequest {
    pub async fn run(self, source: &dyn CatalogSource) -> BulkSelection {
        select_first_n(source, self.count, self.known_total, self.page_size).await
    }
}

#[derive(Debug, Clone)]
pub struct CatalogController {
    pages: PageState,
    selection: SelectionSet,
    popup: SelectPopup,
    notice: Option<Notice>,
    /// Bulk runs planned but not yet applied.
    bulk_runs: usize,
}

impl CatalogController {
    pub fn new(page_size: usize) -> Self {
        Self {
            pages: PageState::new(page_size),
            selection: SelectionSet::new(),
            popup: SelectPopup::default(),
            notice: None,
            bulk_runs: 0,
        }
    }

    pub fn page(&self) -> u32 {
        self.pages.page()
    }

    pub fn data(&self) -> &[Artwork] {
        self.pages.data()
    }

    pub fn total_records(&self) -> u64 {
        self.pages.total_records()
    }

    pub fn window(&self) -> PageWindow {
        self.pages.window()
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn popup(&self) -> &SelectPopup {
        &self.popup
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn is_busy(&self) -> bool {
        self.pages.is_loading() || self.bulk_runs > 0
    }

    // ---- page changes -------------------------------------------------

    /// Ticket for (re)loading whatever page is current.
    pub fn reload(&mut self) -> PageTicket {
        self.pages.request_page(self.pages.page())
    }

    /// Page-change event from the paginator, which counts pages from zero.
    pub fn on_page_change(&mut self, index: usize) -> Option<PageTicket> {
        let page = u32::try_from(index.saturating_add(1)).unwrap_or(u32::MAX);
        self.go_to_page(page)
    }

    /// Move to a 1-based page. Returns `None` if it is already displayed.
    pub fn go_to_page(&mut self, page: u32) -> Option<PageTicket> {
        let page = page.max(1);
        if page == self.pages.page() {
            return None;
        }
        debug!("page change {} -> {}", self.pages.page(), page);
        Some(self.pages.request_page(page))
    }

    pub fn commit_page(&mut self, ticket: PageTicket, fetched: CatalogPage) -> bool {
        let committed = self.pages.commit(ticket, fetched);
        if !committed {
            debug!("dropped response for page {} (seq {})", ticket.page, ticket.seq);
        }
        committed
    }

    /// Fetch and commit a page in one step.
    pub async fn load_page(&mut self, source: &dyn CatalogSource, ticket: PageTicket) -> bool {
        let fetched = fetch_page_or_empty(source, ticket.page).await;
        self.commit_page(ticket, fetched)
    }

    // ---- selection ----------------------------------------------------

    /// Selection-change event carrying the widget's full new set.
    pub fn set_selection(&mut self, records: impl IntoIterator<Item = Artwork>) {
        self.selection.replace(records);
    }

    // ---- popup --------------------------------------------------------

    pub fn toggle_popup(&mut self) {
        self.popup.open = !self.popup.open;
    }

    /// Dismiss the popup, e.g. on a click outside it.
    pub fn close_popup(&mut self) {
        self.popup.open = false;
    }

    /// Type into the count field. Only digits and a leading minus are kept.
    pub fn popup_input(&mut self, c: char) {
        if c.is_ascii_digit() || (c == '-' && self.popup.input.is_empty()) {
            self.popup.input.push(c);
        }
    }

    pub fn popup_backspace(&mut self) {
        self.popup.input.pop();
    }

    // ---- bulk selection -----------------------------------------------

    /// Validate the popup's count and plan a bulk selection.
    ///
    /// Invalid input raises a warning notice and leaves everything else as it
    /// was.
    pub fn submit_popup(&mut self) -> Result<BulkRequest, SelectionError> {
        let parsed = parse_select_count(&self.popup.input);
        self.plan(parsed)
    }

    /// Plan a bulk selection of the first `count` records.
    pub fn request_bulk_select(&mut self, count: i64) -> Result<BulkRequest, SelectionError> {
        let validated = validate_count(count);
        self.plan(validated)
    }

    fn plan(
        &mut self,
        validated: Result<usize, SelectionError>,
    ) -> Result<BulkRequest, SelectionError> {
        match validated {
            Ok(count) => {
                self.bulk_runs += 1;
                Ok(BulkRequest {
                    count,
                    known_total: self.pages.known_total(),
                    page_size: self.pages.page_size(),
                })
            }
            Err(e) => {
                self.notice = Some(Notice::Warning(INVALID_COUNT_MESSAGE.to_string()));
                Err(e)
            }
        }
    }

    /// Replace the selection with a finished bulk run.
    ///
    /// If the last selected record is not on the displayed page, the page
    /// holding it becomes current and its ticket is returned for fetching.
    pub fn apply_bulk_selection(&mut self, outcome: &BulkSelection) -> Option<PageTicket> {
        self.bulk_runs = self.bulk_runs.saturating_sub(1);
        self.selection.replace(outcome.records.iter().cloned());
        self.popup = SelectPopup::default();

        let selected = self.selection.len();
        if selected == 0 {
            return None;
        }
        let target = selected.div_ceil(self.pages.page_size().max(1));
        let target = u32::try_from(target).unwrap_or(u32::MAX);
        self.go_to_page(target)
    }

    /// Validate, run, and apply a bulk selection, then load the page it lands on.
    pub async fn select_first_n(
        &mut self,
        source: &dyn CatalogSource,
        count: i64,
    ) -> Result<BulkSelection, SelectionError> {
        let request = self.request_bulk_select(count)?;
        let outcome = request.run(source).await;
        if let Some(ticket) = self.apply_bulk_selection(&outcome) {
            self.load_page(source, ticket).await;
        }
        Ok(outcome)
    }
}
