//! artcat: page through a remote artwork catalog and select records,
//! including the first N records across page boundaries.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod controller;
pub mod models;
pub mod services;
pub mod tui;

pub use catalog::{fetch_page_or_empty, CatalogClient, CatalogError, CatalogSource};
pub use config::{Settings, PAGE_SIZE};
pub use controller::CatalogController;
pub use models::{Artwork, CatalogPage};
pub use services::{select_first_n, BulkSelection, SelectionError};
