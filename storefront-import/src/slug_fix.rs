//! Validate every stored product slug and repair the broken ones.
//!
//! Repairs re-derive the slug from the product name and resolve collisions
//! against an in-memory index of all slugs, updated as each fix is planned.
//! A dry run therefore plans exactly the slugs a live run would write.

use rusqlite::Connection;
use storefront_catalog::{
    Normalizer, ResolveError, Slug, SlugIndex, ViolationReport, ensure_unique, validate,
};
use storefront_db::operations::{self, OperationError};
use storefront_db::queries::{self, ProductSlugRow};
use thiserror::Error;

use crate::progress::{ImportProgress, PROGRESS_INTERVAL};

#[derive(Debug, Error)]
pub enum SlugFixError {
    #[error("Database error: {0}")]
    Db(#[from] OperationError),
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

#[derive(Debug, Clone, Default)]
pub struct SlugFixOptions {
    /// Plan fixes without writing them.
    pub dry_run: bool,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SlugFixStats {
    pub total: usize,
    pub fixed: usize,
    pub already_valid: usize,
    pub errors: usize,
    pub deduplicated: usize,
}

/// One planned (or applied) slug rewrite.
#[derive(Debug, Clone)]
pub struct SlugFix {
    pub product_id: String,
    pub sku: String,
    pub name: String,
    pub old_slug: String,
    pub new_slug: String,
    pub issues: ViolationReport,
    /// The normalized name was taken and a suffix had to be added.
    pub deduplicated: bool,
    /// Set when writing the new slug failed.
    pub error: Option<String>,
}

#[derive(Debug, Default)]
pub struct SlugFixResult {
    pub stats: SlugFixStats,
    pub fixes: Vec<SlugFix>,
}

/// Rewrite every invalid product slug.
///
/// Valid slugs are left alone even when they do not match the current name.
/// Records are processed in name order. A failed write is recorded on the
/// fix and counted, and the batch carries on.
pub fn fix_slugs(
    conn: &Connection,
    normalizer: &Normalizer,
    options: &SlugFixOptions,
    progress: Option<&dyn ImportProgress>,
) -> Result<SlugFixResult, SlugFixError> {
    let rows = queries::list_product_slugs(conn)?;
    let mut index = SlugIndex::from_assignments(rows.iter().map(|r| (r.id.as_str(), r.slug.as_str())));
    let mut result = SlugFixResult::default();
    result.stats.total = rows.len();

    if let Some(p) = progress {
        p.on_phase(&format!("Checking {} product slugs", rows.len()));
    }

    let tx = if options.dry_run {
        None
    } else {
        Some(conn.unchecked_transaction()?)
    };

    for (i, row) in rows.iter().enumerate() {
        let issues = validate(&row.slug);
        if issues.is_valid() {
            result.stats.already_valid += 1;
        } else {
            let fix = plan_fix(normalizer, row, issues, &index);
            let fix = match &tx {
                Some(tx) => apply_fix(tx, fix),
                None => fix,
            };

            if fix.error.is_none() {
                index.assign(&fix.product_id, &fix.new_slug);
                result.stats.fixed += 1;
                if fix.deduplicated {
                    result.stats.deduplicated += 1;
                }
                log::debug!("{}: '{}' -> '{}'", fix.name, fix.old_slug, fix.new_slug);
            } else {
                result.stats.errors += 1;
            }
            result.fixes.push(fix);
        }

        if let Some(p) = progress {
            p.on_record(i + 1, rows.len(), &row.name);
            if (i + 1) % PROGRESS_INTERVAL == 0 && i + 1 < rows.len() {
                p.on_summary(&running_totals(i + 1, rows.len(), &result.stats));
            }
        }
    }

    if let Some(tx) = tx {
        tx.commit()?;
    }

    if let Some(p) = progress {
        let verb = if options.dry_run { "would fix" } else { "fixed" };
        p.on_complete(&format!(
            "Slug check complete: {} {}, {} already valid, {} errors",
            verb, result.stats.fixed, result.stats.already_valid, result.stats.errors
        ));
    }

    Ok(result)
}

fn running_totals(done: usize, total: usize, stats: &SlugFixStats) -> String {
    format!(
        "Progress {}/{}: {} fixed, {} already valid, {} errors",
        done, total, stats.fixed, stats.already_valid, stats.errors
    )
}

fn plan_fix(
    normalizer: &Normalizer,
    row: &ProductSlugRow,
    issues: ViolationReport,
    index: &SlugIndex,
) -> SlugFix {
    let candidate = normalizer.normalize(&row.name);
    let new_slug = resolve_in_index(&candidate, &row.id, index);

    SlugFix {
        product_id: row.id.clone(),
        sku: row.sku.clone(),
        name: row.name.clone(),
        old_slug: row.slug.clone(),
        deduplicated: new_slug != candidate,
        new_slug: new_slug.into_string(),
        issues,
        error: None,
    }
}

fn resolve_in_index(candidate: &Slug, owner_id: &str, index: &SlugIndex) -> Slug {
    match ensure_unique(candidate, owner_id, index) {
        Ok(slug) => slug,
        Err(ResolveError::Lookup { source, .. }) => match source {},
    }
}

fn apply_fix(conn: &Connection, mut fix: SlugFix) -> SlugFix {
    if let Err(e) = operations::update_product_slug(conn, &fix.product_id, &fix.new_slug) {
        log::warn!("Failed to update slug for {} ({}): {}", fix.name, fix.sku, e);
        fix.error = Some(e.to_string());
    }
    fix
}

// ── Read-only Check ─────────────────────────────────────────────────────────

/// Invalid and duplicated slugs currently in the catalog.
#[derive(Debug, Default)]
pub struct SlugCheckReport {
    pub total: usize,
    pub invalid: Vec<(ProductSlugRow, ViolationReport)>,
    /// Slugs shared by more than one product, with the owning ids.
    pub duplicates: Vec<(String, Vec<String>)>,
}

impl SlugCheckReport {
    pub fn is_clean(&self) -> bool {
        self.invalid.is_empty() && self.duplicates.is_empty()
    }
}

/// Report problems without changing anything.
pub fn check_slugs(conn: &Connection) -> Result<SlugCheckReport, SlugFixError> {
    let rows = queries::list_product_slugs(conn)?;
    let index = SlugIndex::from_assignments(rows.iter().map(|r| (r.id.as_str(), r.slug.as_str())));

    let duplicates = index
        .duplicates()
        .into_iter()
        .map(|(slug, owners)| (slug.to_string(), owners.into_iter().map(String::from).collect()))
        .collect();

    let total = rows.len();
    let invalid = rows
        .into_iter()
        .filter_map(|row| {
            let report = validate(&row.slug);
            (!report.is_valid()).then_some((row, report))
        })
        .collect();

    Ok(SlugCheckReport {
        total,
        invalid,
        duplicates,
    })
}
