//! Ordered set of checked records.

use std::collections::HashSet;

use crate::models::Artwork;

/// Records the user has checked, in the order they were added.
///
/// Membership is keyed by artwork id; inserting an id that is already
/// present is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    records: Vec<Artwork>,
    ids: HashSet<i64>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    pub fn records(&self) -> &[Artwork] {
        &self.records
    }

    pub fn ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.records.iter().map(|r| r.id)
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.title())
    }

    /// Add a record. Returns false if its id was already selected.
    pub fn insert(&mut self, record: Artwork) -> bool {
        if !self.ids.insert(record.id) {
            return false;
        }
        self.records.push(record);
        true
    }

    pub fn remove(&mut self, id: i64) -> bool {
        if !self.ids.remove(&id) {
            return false;
        }
        self.records.retain(|r| r.id != id);
        true
    }

    /// Check or uncheck a record. Returns whether it is now selected.
    pub fn toggle(&mut self, record: &Artwork) -> bool {
        if self.remove(record.id) {
            false
        } else {
            self.insert(record.clone());
            true
        }
    }

    /// Replace the whole set, keeping the first occurrence of each id.
    pub fn replace(&mut self, records: impl IntoIterator<Item = Artwork>) {
        self.records.clear();
        self.ids.clear();
        for record in records {
            self.insert(record);
        }
    }
}
