//! State carried across rows of an import.
//!
//! Brand and category lookups are cached by name so that a file with
//! thousands of rows in a handful of categories hits the database once per
//! category. The cache lives here, in a value the caller owns and passes in,
//! rather than in globals.

use std::collections::{HashMap, HashSet};

use rusqlite::Connection;
use storefront_catalog::types::{Taxonomy, TaxonomyEntry};
use storefront_catalog::Normalizer;
use storefront_db::operations::{self, OperationError};

/// Caches and generators shared by every row of one or more imports.
#[derive(Debug, Default)]
pub struct ImportContext {
    normalizer: Normalizer,
    taxonomy_ids: HashMap<(Taxonomy, String), String>,
    skus: SkuGenerator,
}

impl ImportContext {
    pub fn new(normalizer: Normalizer) -> Self {
        Self {
            normalizer,
            ..Self::default()
        }
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn skus(&mut self) -> &mut SkuGenerator {
        &mut self.skus
    }

    /// Find or create the brand/category called `name`.
    ///
    /// Entries are matched by the normalized slug of the name, so "Face Wash"
    /// and "FACE WASH" resolve to the same row. Returns the id and whether a
    /// new row was inserted; blank names yield `None`.
    pub fn resolve_taxonomy(
        &mut self,
        conn: &Connection,
        taxonomy: Taxonomy,
        name: &str,
    ) -> Result<Option<(String, bool)>, OperationError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }

        let key = (taxonomy, name.to_string());
        if let Some(id) = self.taxonomy_ids.get(&key) {
            return Ok(Some((id.clone(), false)));
        }

        let slug = self.normalizer.normalize(name);
        let (id, created) = match operations::find_taxonomy_by_slug(conn, taxonomy, slug.as_str())? {
            Some(id) => (id, false),
            None => {
                let entry = TaxonomyEntry {
                    id: uuid::Uuid::new_v4().to_string(),
                    name: name.to_string(),
                    slug: slug.into_string(),
                    is_active: true,
                };
                operations::insert_taxonomy(conn, taxonomy, &entry)?;
                log::info!("Created {}: {}", taxonomy, name);
                (entry.id, true)
            }
        };

        self.taxonomy_ids.insert(key, id.clone());
        Ok(Some((id, created)))
    }
}

/// Generates placeholder SKUs for rows that have none.
///
/// SKUs look like `DOVE-0001`: up to four leading letters/digits of the
/// upper-cased product name and a run-wide counter. When the name yields no
/// prefix, or the SKU was already handed out, `MOCK-nnnn` is used instead.
#[derive(Debug)]
pub struct SkuGenerator {
    counter: u32,
    generated: HashSet<String>,
}

impl Default for SkuGenerator {
    fn default() -> Self {
        Self {
            counter: 1,
            generated: HashSet::new(),
        }
    }
}

impl SkuGenerator {
    pub fn next_for(&mut self, product_name: &str) -> String {
        let prefix: String = product_name
            .to_uppercase()
            .chars()
            .take(4)
            .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
            .collect();

        let mut sku = if prefix.is_empty() {
            format!("MOCK-{:04}", self.counter)
        } else {
            format!("{}-{:04}", prefix, self.counter)
        };

        while self.generated.contains(&sku) {
            self.counter += 1;
            sku = format!("MOCK-{:04}", self.counter);
        }

        self.counter += 1;
        self.generated.insert(sku.clone());
        sku
    }

    /// Number of SKUs handed out so far.
    pub fn generated_count(&self) -> usize {
        self.generated.len()
    }
}
