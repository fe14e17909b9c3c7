//! Fix command - apply every suggested fix and write a new dataset.

use std::path::PathBuf;

use colored::Colorize;
use sheetguard::transform::apply_suggestions;
use sheetguard::{Dataset, Sheetguard, SuggestionEngine};

use super::load_config;

pub fn run(
    file: PathBuf,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    dry_run: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config.as_deref())?;
    let guard = Sheetguard::with_config(config);

    let dataset = Dataset::load(&file)?;
    let errors = guard.validate_errors(&dataset);
    let suggestions = SuggestionEngine::generate_all(&dataset, &errors);

    let before: usize = errors.values().map(Vec::len).sum();
    let changed_cells: usize = suggestions
        .iter()
        .map(|s| s.affected_rows.len() * s.changes.len())
        .sum();

    println!(
        "{} {} suggestions ({} cell changes) for {}",
        "Applying".cyan().bold(),
        suggestions.len(),
        changed_cells,
        file.display()
    );
    if verbose {
        for suggestion in &suggestions {
            println!(
                "  {} {} [{}: rows {:?}]",
                "→".cyan(),
                suggestion.description,
                suggestion.sheet_name,
                suggestion.affected_rows
            );
        }
    }

    let fixed = apply_suggestions(&dataset, &suggestions);
    let after: usize = guard.validate_errors(&fixed).values().map(Vec::len).sum();

    println!("  Errors before: {}", before.to_string().red());
    println!("  Errors after:  {}", after.to_string().yellow());

    if dry_run {
        println!("{}", "Dry run, nothing written.".dimmed());
        return Ok(());
    }

    let output_path = output.unwrap_or_else(|| {
        let mut p = file.clone();
        let stem = p.file_stem().unwrap_or_default().to_string_lossy().to_string();
        p.set_file_name(format!("{}.fixed.json", stem));
        p
    });
    fixed.save(&output_path)?;

    println!(
        "{} {}",
        "Wrote".green().bold(),
        output_path.display().to_string().white()
    );
    Ok(())
}
