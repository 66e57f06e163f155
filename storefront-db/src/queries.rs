//! Read queries for the catalog database.

use std::collections::BTreeSet;

use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, params};
use storefront_catalog::types::*;

use crate::operations::{OperationError, table_for};

// ── Product Lookups ─────────────────────────────────────────────────────────

/// Fetch a product by id.
pub fn get_product(conn: &Connection, id: &str) -> Result<Option<Product>, OperationError> {
    conn.query_row(
        "SELECT id, sku, name, slug, description, short_description, category_id,
                brand_id, retail_price, wholesale_price, cost_price, min_wholesale_qty,
                stock_quantity, low_stock_threshold, weight, ingredients,
                usage_instructions, tags, status, created_at, updated_at
         FROM products WHERE id = ?1",
        params![id],
        row_to_product,
    )
    .optional()
    .map_err(Into::into)
}

/// The fields the slug fixer needs from every product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSlugRow {
    pub id: String,
    pub sku: String,
    pub name: String,
    pub slug: String,
}

/// List every product's slug, ordered by name then id.
pub fn list_product_slugs(conn: &Connection) -> Result<Vec<ProductSlugRow>, OperationError> {
    let mut stmt = conn.prepare("SELECT id, sku, name, slug FROM products ORDER BY name, id")?;
    let rows = stmt.query_map([], |row| {
        Ok(ProductSlugRow {
            id: row.get(0)?,
            sku: row.get(1)?,
            name: row.get(2)?,
            slug: row.get(3)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Ids of every product whose slug is exactly `slug`.
pub fn product_ids_with_slug(
    conn: &Connection,
    slug: &str,
) -> Result<BTreeSet<String>, OperationError> {
    let mut stmt = conn.prepare_cached("SELECT id FROM products WHERE slug = ?1")?;
    let rows = stmt.query_map(params![slug], |row| row.get::<_, String>(0))?;
    rows.collect::<Result<BTreeSet<_>, _>>().map_err(Into::into)
}

/// Images for a product, primary first.
pub fn images_for_product(
    conn: &Connection,
    product_id: &str,
) -> Result<Vec<ProductImage>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT id, product_id, image_url, alt_text, is_primary, display_order
         FROM product_images WHERE product_id = ?1
         ORDER BY is_primary DESC, display_order, id",
    )?;
    let rows = stmt.query_map(params![product_id], |row| {
        Ok(ProductImage {
            id: row.get(0)?,
            product_id: row.get(1)?,
            image_url: row.get(2)?,
            alt_text: row.get(3)?,
            is_primary: row.get(4)?,
            display_order: row.get(5)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

// ── Brand / Category Queries ────────────────────────────────────────────────

/// List all brands or categories, ordered by name.
pub fn list_taxonomy(
    conn: &Connection,
    taxonomy: Taxonomy,
) -> Result<Vec<TaxonomyEntry>, OperationError> {
    let sql = format!(
        "SELECT id, name, slug, is_active FROM {} ORDER BY name",
        table_for(taxonomy)
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| {
        Ok(TaxonomyEntry {
            id: row.get(0)?,
            name: row.get(1)?,
            slug: row.get(2)?,
            is_active: row.get(3)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

// ── Statistics ──────────────────────────────────────────────────────────────

/// Summary statistics for the catalog.
#[derive(Debug)]
pub struct CatalogStats {
    pub products: i64,
    pub published: i64,
    pub drafts: i64,
    pub low_stock: i64,
    pub brands: i64,
    pub categories: i64,
    pub images: i64,
}

/// Get overall catalog statistics.
pub fn catalog_stats(conn: &Connection) -> Result<CatalogStats, OperationError> {
    let count = |sql: &str| -> Result<i64, OperationError> {
        conn.query_row(sql, [], |r| r.get(0)).map_err(Into::into)
    };

    Ok(CatalogStats {
        products: count("SELECT COUNT(*) FROM products")?,
        published: count("SELECT COUNT(*) FROM products WHERE status = 'published'")?,
        drafts: count("SELECT COUNT(*) FROM products WHERE status = 'draft'")?,
        low_stock: count("SELECT COUNT(*) FROM products WHERE stock_quantity <= low_stock_threshold")?,
        brands: count("SELECT COUNT(*) FROM brands")?,
        categories: count("SELECT COUNT(*) FROM categories")?,
        images: count("SELECT COUNT(*) FROM product_images")?,
    })
}

// ── Row Mapping Helpers ─────────────────────────────────────────────────────

fn row_to_product(row: &rusqlite::Row<'_>) -> rusqlite::Result<Product> {
    let tags_json: Option<String> = row.get(17)?;
    let tags = match tags_json {
        Some(json) => serde_json::from_str(&json)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(17, Type::Text, Box::new(e)))?,
        None => Vec::new(),
    };
    let status: String = row.get(18)?;

    Ok(Product {
        id: row.get(0)?,
        sku: row.get(1)?,
        name: row.get(2)?,
        slug: row.get(3)?,
        description: row.get(4)?,
        short_description: row.get(5)?,
        category_id: row.get(6)?,
        brand_id: row.get(7)?,
        retail_price: row.get(8)?,
        wholesale_price: row.get(9)?,
        cost_price: row.get(10)?,
        min_wholesale_qty: row.get(11)?,
        stock_quantity: row.get(12)?,
        low_stock_threshold: row.get(13)?,
        weight: row.get(14)?,
        ingredients: row.get(15)?,
        usage_instructions: row.get(16)?,
        tags,
        status: ProductStatus::from_import(&status),
        created_at: row.get(19)?,
        updated_at: row.get(20)?,
    })
}
