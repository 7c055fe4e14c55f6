//! Keyboard input handling for watch mode
//!
//! Non-blocking polling so the watch loop can react to `r` (reconvert) and
//! `q` (quit) between file system events.

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use std::io;
use std::time::Duration;

/// Actions that can be triggered by keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Run the conversion again
    Reconvert,
    /// Quit watch mode
    Quit,
    /// No action (timeout or unrecognized key)
    None,
}

/// Guard that restores terminal state when dropped
pub struct RawModeGuard {
    enabled: bool,
}

impl RawModeGuard {
    /// Enable raw mode and return a guard that will restore on drop
    pub fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self { enabled: true })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if self.enabled {
            let _ = disable_raw_mode();
        }
    }
}

/// Poll for keyboard input with a timeout
///
/// # Keyboard shortcuts
/// - `r` - Reconvert
/// - `q` / `Esc` / `Ctrl+C` - Quit
pub fn poll_key(timeout: Duration) -> io::Result<KeyAction> {
    if event::poll(timeout)? {
        if let Event::Key(key_event) = event::read()? {
            return Ok(key_to_action(key_event));
        }
    }
    Ok(KeyAction::None)
}

fn key_to_action(key: KeyEvent) -> KeyAction {
    // Windows reports releases too
    if key.kind == KeyEventKind::Release {
        return KeyAction::None;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
        KeyCode::Char('r') => KeyAction::Reconvert,
        KeyCode::Char('q') => KeyAction::Quit,
        KeyCode::Esc => KeyAction::Quit,
        _ => KeyAction::None,
    }
}

pub fn print_shortcuts() {
    println!("   Press {} to reconvert, {} to quit", "r", "q");
}
