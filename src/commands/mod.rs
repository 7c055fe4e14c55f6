pub mod convert;
pub mod init;
pub mod mappings;
pub mod watch;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::{self, Config, InputConfig, MANIFEST_FILE};

/// Represents the type of target we're working with
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// A formshift project directory (contains formshift.toml)
    Project(PathBuf), // project root
    /// A single legacy markup file
    SingleFile(PathBuf),
}

/// Detect whether the target is a project directory or a single markup file
pub fn detect_target(target: &str) -> Target {
    let path = Path::new(target);

    if path.is_dir() {
        return Target::Project(path.to_path_buf());
    }

    // A manifest path points at its project
    if path.file_name().map_or(false, |name| name == MANIFEST_FILE) {
        let root = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        return Target::Project(root.to_path_buf());
    }

    let markup_extensions = InputConfig::default().markup_extensions;
    let is_markup = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| markup_extensions.iter().any(|m| m.eq_ignore_ascii_case(ext)));

    if is_markup {
        return Target::SingleFile(path.to_path_buf());
    }

    // Default to project mode
    Target::Project(path.to_path_buf())
}

/// Load `formshift.toml` from a project root
pub fn load_project(root: &Path) -> Result<Config> {
    let manifest = root.join(MANIFEST_FILE);
    let manifest = manifest
        .to_str()
        .context("Project path is not valid UTF-8")?;
    config::load_config(manifest)
}
