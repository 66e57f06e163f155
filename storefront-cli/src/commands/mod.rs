pub(crate) mod import;
pub(crate) mod slugs;
pub(crate) mod stats;

use std::path::Path;

use storefront_db::Connection;

use crate::CliError;

/// Open the catalog database, creating it (and its directory) if needed.
pub(crate) fn open_catalog(db_path: &Path) -> Result<Connection, CliError> {
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    storefront_db::open_database(db_path).map_err(|e| {
        CliError::database(format!(
            "Failed to open catalog database at {}: {}",
            db_path.display(),
            e
        ))
    })
}

/// Open an existing catalog database, or `None` (with a hint) if there is none.
pub(crate) fn open_existing_catalog(db_path: &Path) -> Result<Option<Connection>, CliError> {
    if !db_path.exists() {
        log::warn!("No catalog database found at {}", db_path.display());
        log::info!("Run 'storefront import <CSV>' to create one.");
        return Ok(None);
    }
    open_catalog(db_path).map(Some)
}

/// Truncate a string to a maximum width in characters, appending "..." if needed.
pub(crate) fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max > 3 {
        let head: String = s.chars().take(max - 3).collect();
        format!("{}...", head)
    } else {
        s.chars().take(max).collect()
    }
}
