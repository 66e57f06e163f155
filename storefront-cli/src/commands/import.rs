use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use storefront_import::{ExistingMode, ImportContext, ImportOptions, import_products_csv};

use super::open_catalog;
use crate::CliError;
use crate::config::Config;

/// How many failed rows to list after an import.
const FAILURES_SHOWN: usize = 20;

/// Import products from a CSV file into the catalog database.
pub(crate) fn run_import(
    config: &Config,
    csv_path: &Path,
    db_path: PathBuf,
    existing: ExistingMode,
) -> Result<(), CliError> {
    let file = std::fs::File::open(csv_path).map_err(|e| {
        CliError::import(format!("Failed to open {}: {}", csv_path.display(), e))
    })?;
    let conn = open_catalog(&db_path)?;

    log::info!(
        "{}",
        format!(
            "Importing {} into {}",
            csv_path.display(),
            db_path.display()
        )
        .if_supports_color(Stdout, |t| t.bold()),
    );
    if existing == ExistingMode::Update {
        log::info!("  Existing products will be updated");
    }

    let mut ctx = ImportContext::new(config.normalizer()?);
    let options = ImportOptions { existing };
    let progress = CliImportProgress::new(!log::log_enabled!(log::Level::Info));

    let stats = import_products_csv(&conn, file, &mut ctx, &options, Some(&progress))
        .map_err(|e| CliError::import(e.to_string()))?;
    progress.finish();

    crate::log_blank();
    log::info!(
        "{}",
        "Import complete".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("  Rows:         {:>6}", stats.total_rows);
    log::info!("  Created:      {:>6}", stats.created);
    log::info!("  Updated:      {:>6}", stats.updated);
    log::info!("  Skipped:      {:>6}", stats.skipped);
    log::info!("  Errors:       {:>6}", stats.errors);
    if stats.categories_created > 0 || stats.brands_created > 0 {
        log::info!(
            "  New categories: {}, new brands: {}",
            stats.categories_created,
            stats.brands_created,
        );
    }
    if !stats.generated_skus.is_empty() {
        log::info!(
            "  Generated {} placeholder SKU(s); replace them with real SKUs",
            stats.generated_skus.len(),
        );
        for sku in &stats.generated_skus {
            log::debug!("      {}", sku);
        }
    }

    if !stats.failures.is_empty() {
        crate::log_blank();
        log::warn!("{} row(s) failed:", stats.failures.len());
        for failure in stats.failures.iter().take(FAILURES_SHOWN) {
            log::warn!(
                "  {} row {}: {} {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                failure.row,
                failure.message,
                if failure.name.is_empty() {
                    String::new()
                } else {
                    format!("({})", failure.name)
                },
            );
        }
        if stats.failures.len() > FAILURES_SHOWN {
            log::warn!("  ... and {} more", stats.failures.len() - FAILURES_SHOWN);
        }
    }

    log::info!("  Database: {}", db_path.display());
    Ok(())
}

/// Progress bar for CSV imports.
struct CliImportProgress {
    bar: ProgressBar,
}

impl CliImportProgress {
    fn new(hidden: bool) -> Self {
        let bar = ProgressBar::new(0);
        if hidden {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        bar.set_style(
            ProgressStyle::with_template("  {bar:40.cyan/blue} {pos}/{len} {wide_msg}")
                .expect("static pattern")
                .progress_chars("=> "),
        );
        Self { bar }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl storefront_import::ImportProgress for CliImportProgress {
    fn on_record(&self, current: usize, total: usize, name: &str) {
        if self.bar.length() != Some(total as u64) {
            self.bar.set_length(total as u64);
        }
        self.bar.set_position(current as u64);
        self.bar.set_message(name.to_string());
    }

    fn on_phase(&self, message: &str) {
        self.bar.println(format!("  {}", message));
    }

    fn on_complete(&self, message: &str) {
        log::debug!("{}", message);
    }
}
