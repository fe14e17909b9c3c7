//! Validate command - report errors and suggested fixes for a dataset.

use std::path::PathBuf;

use colored::Colorize;
use sheetguard::{Dataset, Severity, Sheetguard, ValidationReport};

use super::load_config;

pub fn run(
    file: PathBuf,
    json_output: bool,
    config: Option<PathBuf>,
    max_suggestions: Option<usize>,
    no_cross_sheet: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(config.as_deref())?;
    if let Some(max) = max_suggestions {
        config = config.with_max_suggestions(max);
    }
    if no_cross_sheet {
        config = config.with_cross_sheet(false);
    }

    let dataset = Dataset::load(&file)?;
    let report = Sheetguard::with_config(config).validate(&dataset);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{} {}", "Validating".cyan().bold(), file.display().to_string().white());
    if verbose {
        println!("  Snapshot: {}", report.snapshot.fingerprint.dimmed());
        println!(
            "  Sheets: {}, rows: {}",
            report.snapshot.sheets.len(),
            report.snapshot.total_rows
        );
    }
    println!();

    print_errors(&report, verbose);
    print_suggestions(&report);
    print_summary(&report);

    Ok(())
}

fn print_errors(report: &ValidationReport, verbose: bool) {
    for analysis in &report.summary.sheets {
        let header = format!("{} ({} errors)", analysis.sheet_name, analysis.error_count);
        if analysis.error_count == 0 {
            println!("{} {}", "✓".green(), header.green());
            continue;
        }
        println!("{} {}", "✗".red(), header.yellow().bold());

        let errors = report.errors.get(&analysis.sheet_name).map_or(&[][..], Vec::as_slice);
        let shown = if verbose { errors.len() } else { analysis.sample_issues.len() };
        for error in errors.iter().take(shown) {
            let severity = match error.severity {
                Severity::Critical => error.severity.label().red(),
                Severity::Warning => error.severity.label().yellow(),
            };
            println!(
                "  [{}] {} {}",
                severity,
                error.location().dimmed(),
                error.message
            );
        }
        if shown < errors.len() {
            println!("  ... and {} more (use -v to show all)", errors.len() - shown);
        }
    }
    println!();
}

fn print_suggestions(report: &ValidationReport) {
    if report.suggestions.is_empty() {
        return;
    }

    println!("{}", "Suggested fixes:".yellow().bold());
    for (i, suggestion) in report.suggestions.iter().enumerate() {
        let changes: Vec<String> = suggestion
            .changes
            .iter()
            .map(|(column, value)| format!("{} = {}", column, value))
            .collect();
        let rows = if suggestion.is_bulk() {
            format!("{} rows", suggestion.affected_rows.len())
        } else {
            format!("row {}", suggestion.applies_to_row)
        };
        println!(
            "  {}. {} {}",
            i + 1,
            suggestion.description,
            format!("[{}: {}]", suggestion.sheet_name, rows).dimmed()
        );
        println!("     {} {}", "→".cyan(), changes.join(", ").green());
    }
    println!();
}

fn print_summary(report: &ValidationReport) {
    let summary = &report.summary;
    println!("{}", "Summary:".yellow().bold());
    println!("  Critical: {}", summary.critical.to_string().red());
    println!("  Warnings: {}", summary.warning.to_string().yellow());
    for (kind, count) in &summary.by_kind {
        println!("    {}: {}", kind, count);
    }

    let score = report.data_quality_score.to_string();
    let score = match report.data_quality_score {
        90..=100 => score.green(),
        60..=89 => score.yellow(),
        _ => score.red(),
    };
    println!("  Data quality score: {}/100", score.bold());
}
