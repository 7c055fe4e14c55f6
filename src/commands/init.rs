use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;

use crate::config::MANIFEST_FILE;

const MANIFEST_TEMPLATE: &str = include_str!("../../templates/formshift.toml");
const MAIN_FORM_TEMPLATE: &str = include_str!("../../templates/legacy/main.xfdl");
const MAIN_SCRIPT_TEMPLATE: &str = include_str!("../../templates/legacy/main.xjs");
const GITIGNORE_TEMPLATE: &str = include_str!("../../templates/.gitignore");

pub fn execute(project_name: &str) -> Result<()> {
    let project_path = Path::new(project_name);

    if project_path.exists() {
        anyhow::bail!("Directory '{}' already exists", project_name);
    }

    fs::create_dir_all(project_path.join("legacy"))
        .context("Failed to create project directories")?;

    let manifest_content = MANIFEST_TEMPLATE.replace("{{PROJECT_NAME}}", project_name);
    fs::write(project_path.join(MANIFEST_FILE), manifest_content)
        .with_context(|| format!("Failed to write {}", MANIFEST_FILE))?;

    // Sample form and its script
    let form_content =
        MAIN_FORM_TEMPLATE.replace("{{PROJECT_NAME}}", &escape_attribute(project_name));
    fs::write(project_path.join("legacy/main.xfdl"), form_content)
        .context("Failed to write legacy/main.xfdl")?;

    fs::write(project_path.join("legacy/main.xjs"), MAIN_SCRIPT_TEMPLATE)
        .context("Failed to write legacy/main.xjs")?;

    fs::write(project_path.join(".gitignore"), GITIGNORE_TEMPLATE)
        .context("Failed to write .gitignore")?;

    println!(
        "     {} formshift project `{}`",
        "Created".green().bold(),
        project_name
    );

    Ok(())
}

fn escape_attribute(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}
