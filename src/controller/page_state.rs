//! Current page, its records, and the stale-response guard.

use crate::models::{Artwork, CatalogPage};

/// Visible slice of the catalog, derived from page number and total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// 1-based page number.
    pub page: u32,
    /// Zero-based index of the first record on the page.
    pub first: usize,
    pub rows: usize,
    pub total: u64,
}

impl PageWindow {
    pub fn new(page: u32, page_size: usize, total: u64) -> Self {
        Self {
            page,
            first: first_index(page, page_size),
            rows: page_size,
            total,
        }
    }

    /// Number of pages needed to show `total` records; at least one.
    pub fn page_count(&self) -> u32 {
        if self.rows == 0 {
            return 1;
        }
        let pages = self.total.div_ceil(self.rows as u64);
        pages.clamp(1, u32::MAX as u64) as u32
    }

    /// Zero-based index of the last record shown, clamped to `total`.
    pub fn last(&self) -> usize {
        let end = (self.first + self.rows).min(self.total as usize);
        end.saturating_sub(1).max(self.first)
    }
}

/// Zero-based catalog index of the first record on a 1-based page.
pub fn first_index(page: u32, page_size: usize) -> usize {
    (page.max(1) as usize - 1) * page_size
}

/// Handle for one outstanding page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTicket {
    pub seq: u64,
    pub page: u32,
}

/// Page the user is looking at and the records loaded for it.
#[derive(Debug, Clone)]
pub struct PageState {
    page: u32,
    data: Vec<Artwork>,
    total_records: u64,
    page_size: usize,
    latest_seq: u64,
    loading: bool,
    committed: bool,
}

impl PageState {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            data: Vec::new(),
            total_records: 0,
            page_size,
            latest_seq: 0,
            loading: false,
            committed: false,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn data(&self) -> &[Artwork] {
        &self.data
    }

    pub fn total_records(&self) -> u64 {
        self.total_records
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Whether the latest requested page is still in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Total from the last committed page, `None` before the first one.
    pub fn known_total(&self) -> Option<u64> {
        self.committed.then_some(self.total_records)
    }

    pub fn window(&self) -> PageWindow {
        PageWindow::new(self.page, self.page_size, self.total_records)
    }

    /// Make `page` the requested page and issue the ticket its response must carry.
    pub fn request_page(&mut self, page: u32) -> PageTicket {
        self.page = page.max(1);
        self.latest_seq += 1;
        self.loading = true;
        PageTicket {
            seq: self.latest_seq,
            page: self.page,
        }
    }

    /// Apply a fetched page if its ticket is still the latest one.
    ///
    /// Superseded responses are dropped. A failed fetch clears the loading
    /// flag but keeps the previous records and total.
    pub fn commit(&mut self, ticket: PageTicket, fetched: CatalogPage) -> bool {
        if ticket.seq != self.latest_seq || ticket.page != self.page {
            return false;
        }
        self.loading = false;

        match fetched.total {
            Some(total) => {
                self.data = fetched.records;
                self.total_records = total;
                self.committed = true;
                true
            }
            None => false,
        }
    }
}
