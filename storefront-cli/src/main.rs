//! storefront CLI
//!
//! Command-line interface for the storefront product catalog: slug tools,
//! CSV imports, and catalog statistics.

mod cli_types;
mod commands;
mod config;
mod error;

use std::io::Write;

use clap::Parser;

use cli_types::{Cli, Commands, SlugsAction};
use config::Config;
pub(crate) use error::CliError;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    if let Err(e) = run(cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Slugs { action } => match action {
            SlugsAction::Normalize { text } => commands::slugs::run_normalize(&config, &text),
            SlugsAction::Validate { slugs } => commands::slugs::run_validate(&slugs),
            SlugsAction::Check { db } => commands::slugs::run_check(config.db_path(db.db)),
            SlugsAction::Fix { db, dry_run } => {
                commands::slugs::run_fix(&config, config.db_path(db.db), dry_run)
            }
        },
        Commands::Import {
            csv,
            db,
            skip_existing,
            update_existing,
        } => {
            let mode = if update_existing {
                storefront_import::ExistingMode::Update
            } else if skip_existing {
                storefront_import::ExistingMode::Skip
            } else {
                config.existing_mode()
            };
            commands::import::run_import(&config, &csv, config.db_path(db.db), mode)
        }
        Commands::Stats { db } => commands::stats::run_stats(config.db_path(db.db)),
    }
}

/// Install the logger.
///
/// Normal output goes through `log::info!` as bare messages on stdout.
/// `--verbose` adds timestamps and debug output, `--quiet` keeps only
/// warnings and errors. `RUST_LOG` overrides the level when set.
fn init_logging(quiet: bool, verbose: bool) {
    let level = if quiet {
        log::LevelFilter::Warn
    } else if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).target(env_logger::Target::Stdout);

    if verbose {
        builder.format(|buf, record| {
            writeln!(
                buf,
                "{} {:<5} {}",
                buf.timestamp_millis(),
                record.level(),
                record.args()
            )
        });
    } else {
        builder.format(|buf, record| match record.level() {
            log::Level::Warn | log::Level::Error => {
                writeln!(buf, "{}: {}", record.level().as_str().to_lowercase(), record.args())
            }
            _ => writeln!(buf, "{}", record.args()),
        });
    }

    builder.parse_env("RUST_LOG");
    builder.init();
}

/// Log an empty line (used as visual separator in output).
pub(crate) fn log_blank() {
    log::info!("");
}
