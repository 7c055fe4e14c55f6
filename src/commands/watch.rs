use anyhow::Result;
use colored::Colorize;
use ignore::gitignore::Gitignore;
use notify::{Event, RecursiveMode, Watcher};
use std::path::Path;
use std::sync::mpsc::channel;
use std::time::Duration;

use crate::commands::convert::{fail_on_errors, print_warnings};
use crate::commands::{detect_target, load_project, Target};
use crate::config::{Config, InputConfig, MANIFEST_FILE};
use crate::keyboard::{self, KeyAction, RawModeGuard};
use crate::pipeline;
use crate::project::{classify, load_gitignore};

pub fn execute(target: &str) -> Result<()> {
    match detect_target(target) {
        Target::Project(root) => execute_project(&root),
        Target::SingleFile(file) => anyhow::bail!(
            "watch needs a project directory, not a single file ('{}'). Use `formshift convert` instead",
            file.display()
        ),
    }
}

fn execute_project(root: &Path) -> Result<()> {
    let mut config = load_project(root)?;

    // Initial conversion
    match run_convert(root, &config) {
        Ok(_) => println!("{}", "   Watching for changes...".green().bold()),
        Err(e) => {
            eprintln!("{} initial conversion failed: {}", "error:".red().bold(), e);
            eprintln!("Watching anyway (will retry on file changes)...");
        }
    }

    keyboard::print_shortcuts();

    let (tx, rx) = channel();
    let mut watcher = notify::recommended_watcher(move |res: Result<Event, _>| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    let input_dir = root.join(&config.input.dir);
    if input_dir.is_dir() {
        watcher.watch(&input_dir, RecursiveMode::Recursive)?;
    }
    watcher.watch(&root.join(MANIFEST_FILE), RecursiveMode::NonRecursive)?;

    let gitignore = load_gitignore(root);
    let _raw_guard = RawModeGuard::new()?;

    loop {
        // Check for keyboard input first
        match keyboard::poll_key(Duration::from_millis(100))? {
            KeyAction::Quit => {
                print!("\r\n   Exiting watch mode\r\n");
                return Ok(());
            }
            KeyAction::Reconvert => {
                print!("\r\n   Reconverting...\r\n");
                report(run_convert(root, &config));
                continue;
            }
            KeyAction::None => {}
        }

        // Drain pending file system events, converting at most once per batch
        let events: Vec<Event> = rx.try_iter().collect();
        if let Some(change) = summarize_changes(&events, &config.input, &gitignore) {
            print!("\r\nChange detected in {}\r\n", change.first_file);

            if change.manifest_changed {
                match load_project(root) {
                    Ok(reloaded) => config = reloaded,
                    Err(e) => {
                        eprint!("{} {}\r\n", "error:".red().bold(), e);
                        continue;
                    }
                }
            }

            report(run_convert(root, &config));
        }
    }
}

fn run_convert(root: &Path, config: &Config) -> Result<()> {
    let report = pipeline::execute_convert(root, config, true)?;
    print_warnings(&report.outcome);
    fail_on_errors(&report.outcome)?;
    Ok(())
}

fn report(result: Result<()>) {
    match result {
        Ok(_) => print!("   {}\r\n", "Finished".green().bold()),
        Err(e) => eprint!("{} conversion failed: {}\r\n", "error:".red().bold(), e),
    }
}

/// What a batch of file system events touched
#[derive(Debug, PartialEq)]
struct ChangeSet {
    first_file: String,
    manifest_changed: bool,
}

fn summarize_changes(
    events: &[Event],
    input: &InputConfig,
    gitignore: &Gitignore,
) -> Option<ChangeSet> {
    let relevant: Vec<&Event> = events
        .iter()
        .filter(|event| should_reconvert(event, input, gitignore))
        .collect();

    let first_file = relevant
        .first()?
        .paths
        .first()
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
        .unwrap_or("file")
        .to_string();

    let manifest_changed = relevant
        .iter()
        .flat_map(|event| &event.paths)
        .any(|p| p.file_name().map_or(false, |name| name == MANIFEST_FILE));

    Some(ChangeSet {
        first_file,
        manifest_changed,
    })
}

fn should_reconvert(event: &notify::Event, input: &InputConfig, gitignore: &Gitignore) -> bool {
    use notify::EventKind::*;

    match event.kind {
        Modify(_) | Create(_) | Remove(_) => event.paths.iter().any(|p| {
            let is_relevant = classify(p, input).is_some()
                || p.file_name().map_or(false, |name| name == MANIFEST_FILE);

            is_relevant && !gitignore.matched(p, p.is_dir()).is_ignore()
        }),
        _ => false,
    }
}
