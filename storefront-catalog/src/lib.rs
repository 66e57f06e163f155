//! Product catalog data model types and URL slug handling.
//!
//! This crate defines the catalog records (products, brands, categories,
//! images) without any database dependencies, together with the slug core:
//! normalizing display text into slugs, validating stored slugs, and
//! resolving slug collisions against an external lookup.

pub mod normalize;
pub mod resolve;
pub mod slug;
pub mod types;
pub mod validate;

pub use normalize::{ConfigError, FALLBACK_SLUG, Normalizer, SymbolTable, normalize};
pub use resolve::{
    FnLookup, MAX_SUFFIX_ATTEMPTS, OWNER_FRAGMENT_LEN, ResolveError, SlugIndex, SlugLookup,
    ensure_unique, lookup_fn,
};
pub use slug::Slug;
pub use types::*;
pub use validate::{SlugIssue, ViolationReport, validate};
