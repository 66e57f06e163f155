use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use super::open_existing_catalog;
use crate::CliError;

pub(crate) fn run_stats(db_path: PathBuf) -> Result<(), CliError> {
    let Some(conn) = open_existing_catalog(&db_path)? else {
        return Ok(());
    };

    let stats = storefront_db::catalog_stats(&conn)
        .map_err(|e| CliError::database(format!("Failed to query catalog stats: {}", e)))?;

    log::info!(
        "{}",
        "Catalog Database Statistics".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("  Database: {}", db_path.display());
    crate::log_blank();
    log::info!("  Products:       {:>8}", stats.products);
    log::info!("    Published:    {:>8}", stats.published);
    log::info!("    Drafts:       {:>8}", stats.drafts);
    log::info!("    Low stock:    {:>8}", stats.low_stock);
    log::info!("  Brands:         {:>8}", stats.brands);
    log::info!("  Categories:     {:>8}", stats.categories);
    log::info!("  Images:         {:>8}", stats.images);

    Ok(())
}
