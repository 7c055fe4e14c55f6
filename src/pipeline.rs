use anyhow::{Context, Result};
use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{Config, InputConfig};
use crate::converter::{convert_sources, ConversionOutcome, ConvertOptions, MappingTable};
use crate::project::{discover_sources, sibling_script, SourceFile};

/// Represents the result of a project conversion
#[derive(Debug)]
pub struct ConvertReport {
    pub files_read: usize,
    pub output_dir: PathBuf,
    pub written: Vec<PathBuf>,
    pub outcome: ConversionOutcome,
}

/// Core conversion pipeline - used by convert and watch commands
///
/// # Arguments
/// * `root` - Project root holding formshift.toml
/// * `config` - Parsed formshift.toml configuration
/// * `write` - If false, convert only and leave the output directory alone
pub fn execute_convert(root: &Path, config: &Config, write: bool) -> Result<ConvertReport> {
    let output_dir = root.join(&config.output.dir);

    let files = discover_sources(root, &config.input)
        .context("Failed to discover input files")?;
    tracing::debug!(
        "discovered {} markup and {} script file(s)",
        files.markup.len(),
        files.scripts.len()
    );

    let documents = read_all(&files.markup)?;
    let scripts = read_all(&files.scripts)?;

    let table = config.mapping_table();
    let options = config.convert_options();
    let outcome = convert_sources(&documents, &scripts, &table, &options);

    let written = if write {
        write_units(&output_dir, &outcome)?
    } else {
        Vec::new()
    };

    Ok(ConvertReport {
        files_read: files.len(),
        output_dir,
        written,
        outcome,
    })
}

/// Convert one markup file plus its sibling script, if any
pub fn convert_file(
    markup: &Path,
    input: &InputConfig,
    table: &MappingTable,
    options: &ConvertOptions,
) -> Result<ConversionOutcome> {
    let mut documents = IndexMap::new();
    documents.insert(display_key(markup), read_source(markup)?);

    let mut scripts = IndexMap::new();
    if let Some(script) = sibling_script(markup, &input.script_extensions) {
        tracing::debug!("using sibling script {}", script.display());
        scripts.insert(display_key(&script), read_source(&script)?);
    }

    Ok(convert_sources(&documents, &scripts, table, options))
}

/// Write every unit to `{output_dir}/{unit.path}`
pub fn write_units(output_dir: &Path, outcome: &ConversionOutcome) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    for unit in &outcome.units {
        let target = output_dir.join(&unit.path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&target, &unit.code)
            .with_context(|| format!("Failed to write {}", target.display()))?;
        written.push(target);
    }

    Ok(written)
}

fn read_all(files: &[SourceFile]) -> Result<IndexMap<String, String>> {
    files
        .iter()
        .map(|file| Ok((file.key.clone(), read_source(&file.path)?)))
        .collect()
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn display_key(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}
