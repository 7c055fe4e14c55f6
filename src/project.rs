use anyhow::{Context, Result};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::InputConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Markup,
    Script,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub path: PathBuf, // legacy/forms/login.xfdl
    pub key: String,   // forms/login.xfdl
}

/// Input files of a project, each set sorted by key
#[derive(Debug, Default)]
pub struct SourceFiles {
    pub markup: Vec<SourceFile>,
    pub scripts: Vec<SourceFile>,
}

impl SourceFiles {
    pub fn len(&self) -> usize {
        self.markup.len() + self.scripts.len()
    }
}

/// Discover markup and script files under `{root}/{input.dir}`
pub fn discover_sources(root: &Path, input: &InputConfig) -> Result<SourceFiles> {
    let input_dir = root.join(&input.dir);

    if !input_dir.is_dir() {
        anyhow::bail!(
            "Input directory '{}' not found. Are you in a formshift project root?",
            input.dir
        );
    }

    let gitignore = load_gitignore(root);
    let mut files = SourceFiles::default();

    for entry in WalkDir::new(&input_dir)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !gitignore.matched(e.path(), e.file_type().is_dir()).is_ignore())
    {
        let entry = entry.with_context(|| format!("Failed to walk {}", input_dir.display()))?;
        let path = entry.path();

        if !entry.file_type().is_file() {
            continue;
        }

        let Some(kind) = classify(path, input) else {
            continue;
        };

        let file = SourceFile {
            path: path.to_path_buf(),
            key: relative_key(&input_dir, path),
        };

        match kind {
            SourceKind::Markup => files.markup.push(file),
            SourceKind::Script => files.scripts.push(file),
        }
    }

    files.markup.sort_by(|a, b| a.key.cmp(&b.key));
    files.scripts.sort_by(|a, b| a.key.cmp(&b.key));

    Ok(files)
}

/// Markup or script by extension, case-insensitive
pub fn classify(path: &Path, input: &InputConfig) -> Option<SourceKind> {
    let ext = path.extension()?.to_str()?;

    if has_extension(ext, &input.markup_extensions) {
        Some(SourceKind::Markup)
    } else if has_extension(ext, &input.script_extensions) {
        Some(SourceKind::Script)
    } else {
        None
    }
}

/// Script next to a markup file with the same stem, e.g. login.xfdl → login.xjs
pub fn sibling_script(markup: &Path, script_extensions: &[String]) -> Option<PathBuf> {
    script_extensions
        .iter()
        .map(|ext| markup.with_extension(ext))
        .find(|candidate| candidate.is_file())
}

/// Load gitignore from the directory if it exists
pub fn load_gitignore(dir: &Path) -> Gitignore {
    let gitignore_path = dir.join(".gitignore");
    let mut builder = GitignoreBuilder::new(dir);

    if gitignore_path.exists() {
        if let Some(err) = builder.add(&gitignore_path) {
            tracing::debug!("ignoring unreadable {}: {}", gitignore_path.display(), err);
        }
    }

    builder.build().unwrap_or_else(|_| Gitignore::empty())
}

fn has_extension(ext: &str, list: &[String]) -> bool {
    list.iter().any(|candidate| candidate.eq_ignore_ascii_case(ext))
}

/// Path relative to `base` with `/` separators
fn relative_key(base: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(base).unwrap_or(path);
    relative
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .collect::<Vec<_>>()
        .join("/")
}
