use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use crate::commands::{detect_target, load_project, Target};
use crate::config::InputConfig;
use crate::converter::{ConversionOutcome, ConvertOptions, MappingTable};
use crate::pipeline;

pub fn execute(target: &str, json: bool) -> Result<()> {
    match detect_target(target) {
        Target::Project(root) => execute_project(&root, json),
        Target::SingleFile(file) => execute_single_file(&file, json),
    }
}

/// Convert a whole project and write units to its output directory
fn execute_project(root: &Path, json: bool) -> Result<()> {
    let config = load_project(root)?;
    let report = pipeline::execute_convert(root, &config, !json)?;

    if json {
        print_json(&report.outcome)?;
    } else {
        print_warnings(&report.outcome);
        for path in &report.written {
            let display = path.strip_prefix(root).unwrap_or(path);
            println!("   {} {}", "Converted".green().bold(), display.display());
        }
        if report.outcome.success {
            println!(
                "{}",
                format!(
                    "   Finished converting {} form(s) from {} file(s) into {}",
                    report.outcome.units.len(),
                    report.files_read,
                    config.output.dir
                )
                .green()
                .bold()
            );
        }
    }

    fail_on_errors(&report.outcome)
}

/// Convert one markup file and print the generated code
fn execute_single_file(file: &Path, json: bool) -> Result<()> {
    if !file.is_file() {
        anyhow::bail!("File '{}' not found", file.display());
    }

    let outcome = pipeline::convert_file(
        file,
        &InputConfig::default(),
        &MappingTable::builtin(),
        &ConvertOptions::default(),
    )
    .with_context(|| format!("Failed to convert {}", file.display()))?;

    if json {
        print_json(&outcome)?;
    } else {
        print_warnings(&outcome);
        for unit in &outcome.units {
            if outcome.units.len() > 1 {
                println!("// {}", unit.path);
            }
            print!("{}", unit.code);
        }
    }

    fail_on_errors(&outcome)
}

fn print_json(outcome: &ConversionOutcome) -> Result<()> {
    let text = serde_json::to_string_pretty(outcome).context("Failed to serialize outcome")?;
    println!("{}", text);
    Ok(())
}

pub(crate) fn print_warnings(outcome: &ConversionOutcome) {
    for warning in &outcome.warnings {
        eprintln!("{} {}", "warning:".yellow().bold(), warning);
    }
}

pub(crate) fn fail_on_errors(outcome: &ConversionOutcome) -> Result<()> {
    if outcome.errors.is_empty() {
        return Ok(());
    }

    for error in &outcome.errors {
        match &error.component_id {
            Some(id) => eprintln!("  {} - {}", id, error.message),
            None => eprintln!("  {}", error.message),
        }
    }
    anyhow::bail!("conversion failed with {} error(s)", outcome.errors.len())
}
