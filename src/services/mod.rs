//! Service layer for artcat business logic.
//!
//! This module contains domain logic separated from UI concerns.
//! Services can be used by the CLI, the terminal browser, or other interfaces.

pub mod bulk_select;

pub use bulk_select::{
    parse_select_count, select_first_n, validate_count, BulkSelection, SelectionError,
    INVALID_COUNT_MESSAGE,
};
