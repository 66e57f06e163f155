//! Product import from supplier CSV exports.
//!
//! Each row becomes (or updates) one product, matched by SKU. Brands and
//! categories are created on demand, missing SKUs get placeholders, and
//! slugs are derived from the product name unless the file provides one.

use std::io::Read;

use rusqlite::Connection;
use serde::Deserialize;
use storefront_catalog::types::*;
use storefront_catalog::{ResolveError, ensure_unique};
use storefront_db::operations::{self, OperationError};
use storefront_db::{ProductStore, queries};
use thiserror::Error;

use crate::context::ImportContext;
use crate::progress::{ImportProgress, PROGRESS_INTERVAL};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Database error: {0}")]
    Db(#[from] OperationError),
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Missing product name")]
    MissingName,
    #[error(transparent)]
    Slug(#[from] ResolveError<OperationError>),
}

/// What to do when a row's SKU already exists in the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExistingMode {
    /// Leave the stored product untouched.
    #[default]
    Skip,
    /// Overwrite the stored product with the row's values.
    Update,
}

#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    pub existing: ExistingMode,
}

/// A row that could not be imported.
#[derive(Debug, Clone)]
pub struct RowFailure {
    /// 1-based data row number (the header is row 0).
    pub row: usize,
    pub name: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ImportStats {
    pub total_rows: usize,
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub errors: usize,
    pub generated_skus: Vec<String>,
    pub categories_created: usize,
    pub brands_created: usize,
    pub failures: Vec<RowFailure>,
}

/// One CSV row. Absent columns and missing trailing cells read as empty
/// strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProductRow {
    pub sku: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    #[serde(rename = "short description")]
    pub short_description: String,
    pub category: String,
    pub brand: String,
    pub retail_price: String,
    pub wholesale_price: String,
    pub cost_price: String,
    pub min_wholesale_qty: String,
    pub stock_quantity: String,
    pub low_stock_threshold: String,
    pub weight: String,
    pub ingredients: String,
    pub usage_instructions: String,
    pub tags: String,
    pub status: String,
    pub image_url: String,
}

enum RowOutcome {
    Created,
    Updated,
    Skipped,
}

/// Import products from CSV data.
///
/// The whole file runs inside one transaction and each row inside its own
/// savepoint, so a bad row is rolled back and counted without stopping the
/// rest of the import.
pub fn import_products_csv<R: Read>(
    conn: &Connection,
    reader: R,
    ctx: &mut ImportContext,
    options: &ImportOptions,
    progress: Option<&dyn ImportProgress>,
) -> Result<ImportStats, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = canonical_headers(csv_reader.headers()?);

    let mut stats = ImportStats::default();
    let mut rows = Vec::new();
    for (i, result) in csv_reader.records().enumerate() {
        let parsed = result.and_then(|mut record| {
            while record.len() < headers.len() {
                record.push_field("");
            }
            record.deserialize::<ProductRow>(Some(&headers))
        });
        match parsed {
            Ok(row) => rows.push((i + 1, row)),
            Err(e) => {
                log::warn!("Skipping malformed CSV row {}: {}", i + 1, e);
                stats.total_rows += 1;
                record_failure(&mut stats, i + 1, "", &e.to_string());
            }
        }
    }
    stats.total_rows += rows.len();

    if let Some(p) = progress {
        p.on_phase(&format!("Importing {} products", rows.len()));
    }

    let mut tx = conn.unchecked_transaction()?;

    for (n, (row_number, row)) in rows.iter().enumerate() {
        let name = row.name.trim();
        if name.is_empty() {
            log::warn!("Row {}: {}", row_number, ImportError::MissingName);
            record_failure(&mut stats, *row_number, "", &ImportError::MissingName.to_string());
        } else {
            let category_id = resolve_reference(&tx, ctx, Taxonomy::Category, &row.category, &mut stats);
            let brand_id = resolve_reference(&tx, ctx, Taxonomy::Brand, &row.brand, &mut stats);

            let sp = tx.savepoint()?;
            let generated_sku = row.sku.trim().is_empty();
            let sku = if generated_sku {
                ctx.skus().next_for(name)
            } else {
                row.sku.trim().to_string()
            };

            let refs = References {
                sku: &sku,
                category_id,
                brand_id,
            };
            match import_row(&sp, ctx, row, refs, options) {
                Ok(outcome) => {
                    sp.commit()?;
                    match outcome {
                        RowOutcome::Created => stats.created += 1,
                        RowOutcome::Updated => stats.updated += 1,
                        RowOutcome::Skipped => stats.skipped += 1,
                    }
                    if generated_sku {
                        stats.generated_skus.push(sku);
                    }
                }
                Err(e) => {
                    // dropping the savepoint rolls the row back
                    drop(sp);
                    log::warn!("Row {} ({}): {}", row_number, name, e);
                    record_failure(&mut stats, *row_number, name, &e.to_string());
                }
            }
        }

        if let Some(p) = progress {
            p.on_record(n + 1, rows.len(), name);
            if (n + 1) % PROGRESS_INTERVAL == 0 && n + 1 < rows.len() {
                p.on_summary(&format!(
                    "Progress {}/{}: {} created, {} updated, {} skipped, {} errors",
                    n + 1,
                    rows.len(),
                    stats.created,
                    stats.updated,
                    stats.skipped,
                    stats.errors
                ));
            }
        }
    }

    tx.commit()?;

    if let Some(p) = progress {
        p.on_complete(&format!(
            "Import complete: {} created, {} updated, {} skipped, {} errors",
            stats.created, stats.updated, stats.skipped, stats.errors
        ));
    }

    Ok(stats)
}

struct References<'a> {
    sku: &'a str,
    category_id: Option<String>,
    brand_id: Option<String>,
}

fn import_row(
    conn: &Connection,
    ctx: &ImportContext,
    row: &ProductRow,
    refs: References<'_>,
    options: &ImportOptions,
) -> Result<RowOutcome, ImportError> {
    let name = row.name.trim();

    let existing = match operations::find_product_by_sku(conn, refs.sku)? {
        Some(_) if options.existing == ExistingMode::Skip => {
            log::debug!("Skipping existing product {}", refs.sku);
            return Ok(RowOutcome::Skipped);
        }
        Some(id) => Some(queries::get_product(conn, &id)?.ok_or_else(|| {
            OperationError::NotFound {
                entity_type: "product".to_string(),
                id: id.clone(),
            }
        })?),
        None => None,
    };

    let id = existing
        .as_ref()
        .map(|p| p.id.clone())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let slug = match non_empty(&row.slug) {
        Some(slug) => slug,
        None => {
            let candidate = ctx.normalizer().normalize(name);
            ensure_unique(&candidate, &id, &ProductStore::new(conn))?.into_string()
        }
    };

    // Numeric fields fall back to the stored value on update, and to the
    // catalog defaults for new products.
    let base = match &existing {
        Some(stored) => stored.clone(),
        None => Product::new(&id, refs.sku, name, &slug),
    };

    let product = Product {
        id: id.clone(),
        sku: refs.sku.to_string(),
        name: name.to_string(),
        slug,
        description: non_empty(&row.description),
        short_description: non_empty(&row.short_description),
        category_id: refs.category_id,
        brand_id: refs.brand_id,
        retail_price: parse_f64(&row.retail_price).unwrap_or(0.0),
        wholesale_price: parse_f64(&row.wholesale_price).unwrap_or(0.0),
        cost_price: parse_f64(&row.cost_price).filter(|v| *v != 0.0),
        min_wholesale_qty: parse_i64(&row.min_wholesale_qty).unwrap_or(base.min_wholesale_qty),
        stock_quantity: parse_i64(&row.stock_quantity).unwrap_or(base.stock_quantity),
        low_stock_threshold: parse_i64(&row.low_stock_threshold)
            .unwrap_or(base.low_stock_threshold),
        weight: parse_f64(&row.weight).filter(|v| *v != 0.0),
        ingredients: non_empty(&row.ingredients),
        usage_instructions: non_empty(&row.usage_instructions),
        tags: parse_tags(&row.tags),
        status: ProductStatus::from_import(row.status.trim()),
        created_at: base.created_at,
        updated_at: base.updated_at,
    };

    let outcome = if existing.is_some() {
        operations::merge_product(conn, &product)?;
        log::debug!("Updated {} ({})", product.name, product.sku);
        RowOutcome::Updated
    } else {
        operations::insert_product(conn, &product)?;
        log::debug!("Created {} ({})", product.name, product.sku);
        RowOutcome::Created
    };

    if let Some(url) = non_empty(&row.image_url) {
        operations::upsert_primary_image(conn, &id, &url, name)?;
    }

    Ok(outcome)
}

/// Brand/category failures only cost the product its reference.
fn resolve_reference(
    conn: &Connection,
    ctx: &mut ImportContext,
    taxonomy: Taxonomy,
    name: &str,
    stats: &mut ImportStats,
) -> Option<String> {
    match ctx.resolve_taxonomy(conn, taxonomy, name) {
        Ok(Some((id, created))) => {
            if created {
                match taxonomy {
                    Taxonomy::Category => stats.categories_created += 1,
                    Taxonomy::Brand => stats.brands_created += 1,
                }
            }
            Some(id)
        }
        Ok(None) => None,
        Err(e) => {
            log::warn!("Could not resolve {} '{}': {}", taxonomy, name.trim(), e);
            None
        }
    }
}

/// Fold header aliases and resolve repeated columns to their last
/// occurrence. Earlier copies are renamed so no field reads them.
fn canonical_headers(raw: &csv::StringRecord) -> csv::StringRecord {
    let names: Vec<&str> = raw
        .iter()
        .map(|h| match h {
            "short_description" => "short description",
            other => other,
        })
        .collect();

    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            if names[i + 1..].contains(name) {
                format!("_shadowed_{}", i)
            } else {
                name.to_string()
            }
        })
        .collect()
}

fn record_failure(stats: &mut ImportStats, row: usize, name: &str, message: &str) {
    stats.errors += 1;
    stats.failures.push(RowFailure {
        row,
        name: name.to_string(),
        message: message.to_string(),
    });
}

// ── Field Parsing ───────────────────────────────────────────────────────────

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn parse_f64(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Integers accept decimal text ("12.0", "7.9") and truncate.
fn parse_i64(value: &str) -> Option<i64> {
    parse_f64(value).map(|v| v.trunc() as i64)
}

/// Split a comma-separated tag list, dropping blanks.
pub fn parse_tags(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lenient_numbers() {
        assert_eq!(parse_f64(" 249.50 "), Some(249.5));
        assert_eq!(parse_f64(""), None);
        assert_eq!(parse_f64("n/a"), None);
        assert_eq!(parse_f64("inf"), None);
        assert_eq!(parse_i64("12.0"), Some(12));
        assert_eq!(parse_i64("7.9"), Some(7));
        assert_eq!(parse_i64("abc"), None);
    }

    #[test]
    fn tags_split_on_commas() {
        assert_eq!(parse_tags("skincare, cleanser,,  "), vec!["skincare", "cleanser"]);
        assert!(parse_tags("").is_empty());
    }

    #[test]
    fn repeated_headers_keep_the_last_column() {
        let raw = csv::StringRecord::from(vec!["name", "short_description", "short description", "name"]);
        let headers = canonical_headers(&raw);
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec!["_shadowed_0", "_shadowed_1", "short description", "name"]
        );
    }

    #[test]
    fn blank_text_is_none() {
        assert_eq!(non_empty("   "), None);
        assert_eq!(non_empty(" Gentle "), Some("Gentle".to_string()));
    }
}
