//! Database-backed slug lookup.

use std::collections::BTreeSet;

use rusqlite::Connection;
use storefront_catalog::SlugLookup;

use crate::operations::OperationError;
use crate::queries::product_ids_with_slug;

/// Answers slug lookups from the `products` table.
///
/// Each lookup reads the table as it is now, so writes made through the same
/// connection are visible to the next resolution.
#[derive(Clone, Copy)]
pub struct ProductStore<'a> {
    conn: &'a Connection,
}

impl<'a> ProductStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl SlugLookup for ProductStore<'_> {
    type Error = OperationError;

    fn owners_of(&self, slug: &str) -> Result<BTreeSet<String>, Self::Error> {
        product_ids_with_slug(self.conn, slug)
    }
}
