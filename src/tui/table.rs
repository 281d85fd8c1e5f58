//! Column definitions and title sorting for the records table.

use std::cmp::Ordering;

use crate::models::Artwork;

/// Data columns after the checkbox column.
pub const COLUMNS: [&str; 6] = ["Title", "Origin", "Artist", "Inscriptions", "Start", "End"];

/// Sort state of the Title column. Only the displayed page is sorted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Unsorted,
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn cycle(self) -> Self {
        match self {
            SortOrder::Unsorted => SortOrder::Ascending,
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Unsorted,
        }
    }

    /// Header label for the Title column.
    pub fn title_header(self) -> &'static str {
        match self {
            SortOrder::Unsorted => "Title ⇅",
            SortOrder::Ascending => "Title ▲",
            SortOrder::Descending => "Title ▼",
        }
    }

    /// Rows in display order. Ties keep catalog order.
    pub fn apply<'a>(self, rows: &'a [Artwork]) -> Vec<&'a Artwork> {
        let mut view: Vec<&Artwork> = rows.iter().collect();
        match self {
            SortOrder::Unsorted => {}
            SortOrder::Ascending => view.sort_by(|a, b| compare_titles(a, b)),
            SortOrder::Descending => view.sort_by(|a, b| compare_titles(b, a)),
        }
        view
    }
}

fn compare_titles(a: &Artwork, b: &Artwork) -> Ordering {
    a.title().to_lowercase().cmp(&b.title().to_lowercase())
}

/// Cell text for the data columns, in `COLUMNS` order.
pub fn cells(record: &Artwork) -> [String; 6] {
    [
        record.title().to_string(),
        record.origin().to_string(),
        record.artist().replace('\n', " "),
        record.inscriptions().replace('\n', " "),
        record.start_label(),
        record.end_label(),
    ]
}
