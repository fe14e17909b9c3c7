//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Sheetguard: validate client, worker and task datasets
#[derive(Parser)]
#[command(name = "sheetguard")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a dataset and report errors and suggested fixes
    Validate {
        /// Path to the dataset (JSON object of sheet name to rows)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,

        /// Configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Maximum number of suggestions to show
        #[arg(long)]
        max_suggestions: Option<usize>,

        /// Skip checks that compare sheets with each other
        #[arg(long)]
        no_cross_sheet: bool,
    },

    /// Apply every suggested fix and write the fixed dataset
    Fix {
        /// Path to the dataset (JSON object of sheet name to rows)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path (default: <file>.fixed.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Show what would change without writing
        #[arg(long)]
        dry_run: bool,
    },
}
