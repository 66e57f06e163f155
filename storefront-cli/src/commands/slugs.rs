use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use storefront_catalog::validate;
use storefront_import::{LogProgress, SlugFixOptions, check_slugs, fix_slugs};

use super::{open_existing_catalog, truncate_str};
use crate::CliError;
use crate::config::Config;

/// How many deduplicated fixes to list after a fix run.
const DEDUPLICATED_SHOWN: usize = 10;

/// Print the slug generated for each text.
pub(crate) fn run_normalize(config: &Config, texts: &[String]) -> Result<(), CliError> {
    let normalizer = config.normalizer()?;
    for text in texts {
        let slug = normalizer.normalize(text);
        log::info!(
            "  {} \u{2192} {}",
            format!("{:?}", text).if_supports_color(Stdout, |t| t.dimmed()),
            slug.if_supports_color(Stdout, |t| t.cyan()),
        );
    }
    Ok(())
}

/// Validate slugs given on the command line.
pub(crate) fn run_validate(slugs: &[String]) -> Result<(), CliError> {
    let mut invalid = 0;
    for slug in slugs {
        let report = validate(slug);
        if report.is_valid() {
            log::info!(
                "  {} {}",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                slug,
            );
        } else {
            invalid += 1;
            log::info!(
                "  {} {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                slug.if_supports_color(Stdout, |t| t.bold()),
            );
            for issue in report.issues() {
                log::info!("      - {}", issue);
            }
        }
    }

    if invalid > 0 {
        return Err(CliError::InvalidSlugs(invalid));
    }
    Ok(())
}

/// List invalid and duplicated slugs in the catalog.
pub(crate) fn run_check(db_path: PathBuf) -> Result<(), CliError> {
    let Some(conn) = open_existing_catalog(&db_path)? else {
        return Ok(());
    };

    let report = check_slugs(&conn)
        .map_err(|e| CliError::database(format!("Failed to read product slugs: {}", e)))?;

    log::info!(
        "{}",
        format!("Checked {} product slug(s)", report.total).if_supports_color(Stdout, |t| t.bold()),
    );

    if report.is_clean() {
        log::info!(
            "  {} All slugs are valid and unique",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        );
        return Ok(());
    }

    if !report.invalid.is_empty() {
        crate::log_blank();
        log::info!(
            "{}",
            format!("Invalid slugs ({})", report.invalid.len())
                .if_supports_color(Stdout, |t| t.yellow()),
        );
        for (row, issues) in &report.invalid {
            log::info!(
                "  {:<12} {:<40} {:?}",
                row.sku,
                truncate_str(&row.name, 40),
                row.slug,
            );
            log::info!("      {}", issues.to_string().if_supports_color(Stdout, |t| t.dimmed()));
        }
    }

    if !report.duplicates.is_empty() {
        crate::log_blank();
        log::info!(
            "{}",
            format!("Duplicate slugs ({})", report.duplicates.len())
                .if_supports_color(Stdout, |t| t.yellow()),
        );
        for (slug, owners) in &report.duplicates {
            log::info!("  {} ({} products)", slug.if_supports_color(Stdout, |t| t.bold()), owners.len());
            for id in owners {
                log::debug!("      {}", id);
            }
        }
    }

    crate::log_blank();
    log::info!("Run 'storefront slugs fix --dry-run' to preview repairs.");
    Ok(())
}

/// Regenerate invalid slugs from product names.
pub(crate) fn run_fix(config: &Config, db_path: PathBuf, dry_run: bool) -> Result<(), CliError> {
    let normalizer = config.normalizer()?;
    let Some(conn) = open_existing_catalog(&db_path)? else {
        return Ok(());
    };

    if dry_run {
        log::info!(
            "{}",
            "Dry run: no slugs will be written".if_supports_color(Stdout, |t| t.yellow()),
        );
    }

    let options = SlugFixOptions { dry_run };
    let result = fix_slugs(&conn, &normalizer, &options, Some(&LogProgress))
        .map_err(|e| CliError::import(format!("Slug fix failed: {}", e)))?;
    let stats = &result.stats;

    let (title, fixed_label) = if dry_run {
        ("Slug fix preview", "Would fix:")
    } else {
        ("Slug fix complete", "Fixed:")
    };

    crate::log_blank();
    log::info!("{}", title.if_supports_color(Stdout, |t| t.bold()));
    log::info!("  {:<16} {:>6}", "Products:", stats.total);
    log::info!("  {:<16} {:>6}", "Already valid:", stats.already_valid);
    log::info!("  {:<16} {:>6}", fixed_label, stats.fixed);
    log::info!("  {:<16} {:>6}", "Deduplicated:", stats.deduplicated);
    if stats.errors > 0 {
        log::info!(
            "  {:<16} {}",
            "Errors:",
            format!("{:>6}", stats.errors).if_supports_color(Stdout, |t| t.red()),
        );
    }

    for fix in result.fixes.iter().filter(|f| f.error.is_none()) {
        log::debug!(
            "  {} {:?} \u{2192} {} ({})",
            fix.sku,
            fix.old_slug,
            fix.new_slug,
            fix.issues
        );
    }

    let deduplicated: Vec<_> = result
        .fixes
        .iter()
        .filter(|f| f.deduplicated && f.error.is_none())
        .collect();
    if !deduplicated.is_empty() {
        crate::log_blank();
        log::info!("Deduplicated slugs:");
        for fix in deduplicated.iter().take(DEDUPLICATED_SHOWN) {
            log::info!(
                "  {:<40} {}",
                truncate_str(&fix.name, 40),
                fix.new_slug.if_supports_color(Stdout, |t| t.cyan()),
            );
        }
        if deduplicated.len() > DEDUPLICATED_SHOWN {
            log::info!("  ... and {} more", deduplicated.len() - DEDUPLICATED_SHOWN);
        }
    }

    if dry_run && stats.fixed > 0 {
        crate::log_blank();
        log::info!("Run without --dry-run to apply these fixes.");
    }

    Ok(())
}
