//! Data model types for the product catalog.
//!
//! These types mirror the persistent catalog schema: products, their images,
//! and the brand/category taxonomies products are filed under.

use std::fmt;

use serde::{Deserialize, Serialize};

// ── Product ─────────────────────────────────────────────────────────────────

/// A sellable product.
///
/// `slug` is kept as a plain string because stored slugs are not guaranteed to
/// be valid; the slug fixer exists to repair them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub sku: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub brand_id: Option<String>,
    pub retail_price: f64,
    pub wholesale_price: f64,
    #[serde(default)]
    pub cost_price: Option<f64>,
    pub min_wholesale_qty: i64,
    pub stock_quantity: i64,
    pub low_stock_threshold: i64,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub ingredients: Option<String>,
    #[serde(default)]
    pub usage_instructions: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Default minimum quantity for wholesale orders.
pub const DEFAULT_MIN_WHOLESALE_QTY: i64 = 10;

/// Default stock level below which a product counts as low on stock.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;

impl Product {
    /// A product with the given identity and every other field at its default.
    pub fn new(
        id: impl Into<String>,
        sku: impl Into<String>,
        name: impl Into<String>,
        slug: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            sku: sku.into(),
            name: name.into(),
            slug: slug.into(),
            description: None,
            short_description: None,
            category_id: None,
            brand_id: None,
            retail_price: 0.0,
            wholesale_price: 0.0,
            cost_price: None,
            min_wholesale_qty: DEFAULT_MIN_WHOLESALE_QTY,
            stock_quantity: 0,
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            weight: None,
            ingredients: None,
            usage_instructions: None,
            tags: Vec::new(),
            status: ProductStatus::Draft,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }
}

/// Publication state of a product.
///
/// Unknown values from imports are preserved verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProductStatus {
    #[default]
    Draft,
    Published,
    Archived,
    Other(String),
}

impl ProductStatus {
    /// Parse a status as written in import files.
    ///
    /// Empty means draft, and `available` is the storefront's old word for
    /// published.
    pub fn from_import(value: &str) -> Self {
        let trimmed = value.trim();
        match trimmed.to_lowercase().as_str() {
            "" | "draft" => Self::Draft,
            "published" | "available" => Self::Published,
            "archived" => Self::Archived,
            _ => Self::Other(trimmed.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Archived => "archived",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ProductStatus {
    fn from(s: String) -> Self {
        Self::from_import(&s)
    }
}

impl From<ProductStatus> for String {
    fn from(status: ProductStatus) -> Self {
        status.as_str().to_string()
    }
}

// ── Product Image ───────────────────────────────────────────────────────────

/// An image attached to a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    pub id: i64,
    pub product_id: String,
    pub image_url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
    pub is_primary: bool,
    pub display_order: i64,
}

// ── Brand / Category ────────────────────────────────────────────────────────

/// A brand or category entry. Which one depends on the [`Taxonomy`] it was
/// read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyEntry {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub is_active: bool,
}

/// The two name-keyed taxonomies products reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Taxonomy {
    Brand,
    Category,
}

impl Taxonomy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Brand => "brand",
            Self::Category => "category",
        }
    }
}

impl fmt::Display for Taxonomy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
