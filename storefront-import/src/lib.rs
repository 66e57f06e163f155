//! Bulk data jobs against the product catalog database.
//!
//! This crate owns the ETL and cleanup logic: importing products from CSV
//! (with get-or-create for brands and categories and placeholder SKUs), and
//! the slug fixer that validates every stored slug and rewrites the broken
//! ones.

pub mod context;
pub mod csv_import;
pub mod progress;
pub mod slug_fix;

pub use context::{ImportContext, SkuGenerator};
pub use csv_import::{
    ExistingMode, ImportError, ImportOptions, ImportStats, ProductRow, RowFailure,
    import_products_csv, parse_tags,
};
pub use progress::{ImportProgress, LogProgress, PROGRESS_INTERVAL, SilentProgress};
pub use slug_fix::{
    SlugCheckReport, SlugFix, SlugFixError, SlugFixOptions, SlugFixResult, SlugFixStats,
    check_slugs, fix_slugs,
};
