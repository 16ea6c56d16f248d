//! Catalog browsing

use super::sync::{DataSync, SyncSource};
use crate::{
    api::endpoints,
    models::{Book, BookFilter},
};

pub const CATALOG_ERROR: &str = "Failed to fetch books.";

/// `/books/` filtered by author, genre and availability
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogSource;

impl SyncSource for CatalogSource {
    type Item = Book;
    type Query = BookFilter;

    fn name(&self) -> &'static str {
        "catalog"
    }

    fn path(&self, filter: &BookFilter) -> String {
        endpoints::books(filter)
    }

    fn requires_token(&self) -> bool {
        false
    }

    fn error_message(&self) -> &'static str {
        CATALOG_ERROR
    }
}

pub type CatalogSync = DataSync<CatalogSource>;
