//! Write operations for catalog entities.

use rusqlite::{Connection, OptionalExtension, params};
use storefront_catalog::types::*;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Entity not found: {entity_type} with id '{id}'")]
    NotFound { entity_type: String, id: String },
    #[error("Tag encoding error: {0}")]
    Tags(#[from] serde_json::Error),
}

// ── Brand / Category Operations ─────────────────────────────────────────────

/// Find a brand or category id by slug.
pub fn find_taxonomy_by_slug(
    conn: &Connection,
    taxonomy: Taxonomy,
    slug: &str,
) -> Result<Option<String>, OperationError> {
    let sql = format!("SELECT id FROM {} WHERE slug = ?1 LIMIT 1", table_for(taxonomy));
    conn.query_row(&sql, params![slug], |row| row.get::<_, String>(0))
        .optional()
        .map_err(Into::into)
}

/// Insert a new brand or category.
pub fn insert_taxonomy(
    conn: &Connection,
    taxonomy: Taxonomy,
    entry: &TaxonomyEntry,
) -> Result<(), OperationError> {
    let sql = format!(
        "INSERT INTO {} (id, name, slug, is_active) VALUES (?1, ?2, ?3, ?4)",
        table_for(taxonomy)
    );
    conn.execute(
        &sql,
        params![entry.id, entry.name, entry.slug, entry.is_active],
    )?;
    Ok(())
}

// ── Product Operations ──────────────────────────────────────────────────────

/// Find a product id by SKU.
pub fn find_product_by_sku(conn: &Connection, sku: &str) -> Result<Option<String>, OperationError> {
    conn.query_row(
        "SELECT id FROM products WHERE sku = ?1 LIMIT 1",
        params![sku],
        |row| row.get::<_, String>(0),
    )
    .optional()
    .map_err(Into::into)
}

/// Insert a new product.
pub fn insert_product(conn: &Connection, product: &Product) -> Result<(), OperationError> {
    let tags = encode_tags(&product.tags)?;
    conn.execute(
        "INSERT INTO products (id, sku, name, slug, description, short_description,
             category_id, brand_id, retail_price, wholesale_price, cost_price,
             min_wholesale_qty, stock_quantity, low_stock_threshold, weight,
             ingredients, usage_instructions, tags, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)",
        params![
            product.id,
            product.sku,
            product.name,
            product.slug,
            product.description,
            product.short_description,
            product.category_id,
            product.brand_id,
            product.retail_price,
            product.wholesale_price,
            product.cost_price,
            product.min_wholesale_qty,
            product.stock_quantity,
            product.low_stock_threshold,
            product.weight,
            product.ingredients,
            product.usage_instructions,
            tags,
            product.status.as_str(),
        ],
    )?;
    Ok(())
}

/// Update an existing product from freshly imported data.
///
/// Identity, pricing, stock, and status fields are always overwritten.
/// Optional fields that are `None` (and an empty tag list) keep the stored
/// value, so a sparse import never erases data.
pub fn merge_product(conn: &Connection, product: &Product) -> Result<(), OperationError> {
    let tags = encode_tags(&product.tags)?;
    let changed = conn.execute(
        "UPDATE products SET
             sku = ?2,
             name = ?3,
             slug = ?4,
             description = COALESCE(?5, description),
             short_description = COALESCE(?6, short_description),
             category_id = COALESCE(?7, category_id),
             brand_id = COALESCE(?8, brand_id),
             retail_price = ?9,
             wholesale_price = ?10,
             cost_price = COALESCE(?11, cost_price),
             min_wholesale_qty = ?12,
             stock_quantity = ?13,
             low_stock_threshold = ?14,
             weight = COALESCE(?15, weight),
             ingredients = COALESCE(?16, ingredients),
             usage_instructions = COALESCE(?17, usage_instructions),
             tags = COALESCE(?18, tags),
             status = ?19,
             updated_at = datetime('now')
         WHERE id = ?1",
        params![
            product.id,
            product.sku,
            product.name,
            product.slug,
            product.description,
            product.short_description,
            product.category_id,
            product.brand_id,
            product.retail_price,
            product.wholesale_price,
            product.cost_price,
            product.min_wholesale_qty,
            product.stock_quantity,
            product.low_stock_threshold,
            product.weight,
            product.ingredients,
            product.usage_instructions,
            tags,
            product.status.as_str(),
        ],
    )?;
    if changed == 0 {
        return Err(not_found("product", &product.id));
    }
    Ok(())
}

/// Rewrite a product's slug.
pub fn update_product_slug(conn: &Connection, id: &str, slug: &str) -> Result<(), OperationError> {
    let changed = conn.execute(
        "UPDATE products SET slug = ?2, updated_at = datetime('now') WHERE id = ?1",
        params![id, slug],
    )?;
    if changed == 0 {
        return Err(not_found("product", id));
    }
    Ok(())
}

// ── Image Operations ────────────────────────────────────────────────────────

/// Point a product's primary image at `image_url`, creating it if the product
/// has none. Returns `true` if a new image row was inserted.
pub fn upsert_primary_image(
    conn: &Connection,
    product_id: &str,
    image_url: &str,
    alt_text: &str,
) -> Result<bool, OperationError> {
    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM product_images
             WHERE product_id = ?1
             ORDER BY is_primary DESC, display_order, id
             LIMIT 1",
            params![product_id],
            |row| row.get(0),
        )
        .optional()?;

    match existing {
        Some(image_id) => {
            conn.execute(
                "UPDATE product_images SET image_url = ?2, is_primary = 1 WHERE id = ?1",
                params![image_id, image_url],
            )?;
            Ok(false)
        }
        None => {
            conn.execute(
                "INSERT INTO product_images (product_id, image_url, alt_text, is_primary, display_order)
                 VALUES (?1, ?2, ?3, 1, 0)",
                params![product_id, image_url, alt_text],
            )?;
            Ok(true)
        }
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────────

pub(crate) fn table_for(taxonomy: Taxonomy) -> &'static str {
    match taxonomy {
        Taxonomy::Brand => "brands",
        Taxonomy::Category => "categories",
    }
}

/// Tags are stored as a JSON array, or NULL when there are none.
fn encode_tags(tags: &[String]) -> Result<Option<String>, OperationError> {
    if tags.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::to_string(tags)?))
}

fn not_found(entity_type: &str, id: &str) -> OperationError {
    OperationError::NotFound {
        entity_type: entity_type.to_string(),
        id: id.to_string(),
    }
}
