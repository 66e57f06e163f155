//! SQLite persistence layer for the product catalog.
//!
//! Provides schema creation, CRUD operations, read queries, and the
//! database-backed slug lookup, backed by SQLite (via rusqlite with the
//! bundled feature).

pub mod operations;
pub mod queries;
pub mod schema;
pub mod store;

pub use operations::{
    OperationError, find_product_by_sku, find_taxonomy_by_slug, insert_product, insert_taxonomy,
    merge_product, update_product_slug, upsert_primary_image,
};
pub use queries::{
    CatalogStats, ProductSlugRow, catalog_stats, get_product, images_for_product,
    list_product_slugs, list_taxonomy, product_ids_with_slug,
};
pub use rusqlite::Connection;
pub use schema::{open_database, open_memory};
pub use store::ProductStore;
