//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "storefront")]
#[command(about = "Manage product slugs and imports for the storefront catalog", long_about = None)]
pub(crate) struct Cli {
    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Database location shared by commands that touch the catalog.
#[derive(Args, Clone)]
pub(crate) struct DbArgs {
    /// Path to the catalog database file
    #[arg(long)]
    pub db: Option<PathBuf>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Normalize, validate, and repair product slugs
    Slugs {
        #[command(subcommand)]
        action: SlugsAction,
    },

    /// Import products from a CSV file
    Import {
        /// CSV file with a header row
        csv: PathBuf,

        #[command(flatten)]
        db: DbArgs,

        /// Leave products whose SKU already exists untouched
        #[arg(long, group = "existing")]
        skip_existing: bool,

        /// Overwrite products whose SKU already exists
        #[arg(long, group = "existing")]
        update_existing: bool,
    },

    /// Show catalog database statistics
    Stats {
        #[command(flatten)]
        db: DbArgs,
    },
}

#[derive(Subcommand)]
pub(crate) enum SlugsAction {
    /// Show the slug generated for each text
    Normalize {
        /// Product names or other display text
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Check slugs against the slug rules
    Validate {
        /// Slugs to check
        #[arg(required = true)]
        slugs: Vec<String>,
    },

    /// List invalid and duplicated slugs in the catalog
    Check {
        #[command(flatten)]
        db: DbArgs,
    },

    /// Regenerate every invalid slug from its product name
    Fix {
        #[command(flatten)]
        db: DbArgs,

        /// Show planned fixes without writing them
        #[arg(short = 'n', long)]
        dry_run: bool,
    },
}
