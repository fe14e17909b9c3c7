//! Sheetguard CLI - validate scheduling datasets.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Validate {
            file,
            json,
            config,
            max_suggestions,
            no_cross_sheet,
        } => commands::validate::run(file, json, config, max_suggestions, no_cross_sheet, cli.verbose),

        Commands::Fix {
            file,
            output,
            config,
            dry_run,
        } => commands::fix::run(file, output, config, dry_run, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
