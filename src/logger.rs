//! Logging utilities with colored output and step display.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` macro gated by `--verbose`
//! - `StepLine` for the single-line capture progress display
//!
//! # Example
//!
//! ```ignore
//! // Simple logging
//! log!("serve"; "not found: {}", path.display());
//!
//! // Step line for a capture session
//! let steps = StepLine::new("capture", &["serve", "launch", "load", "print"]);
//! steps.advance();
//! steps.finish();
//! ```

use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use parking_lot::Mutex;
use std::{
    io::{Write, stdout},
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// Whether a step line currently occupies the last terminal row
static STEP_ACTIVE: AtomicBool = AtomicBool::new(false);

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);

    let mut stdout = stdout().lock();

    // A log line printed while a step line is visible replaces it; the step
    // line is redrawn on its next update.
    if STEP_ACTIVE.load(Ordering::SeqCst) {
        execute!(stdout, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
    } else {
        execute!(stdout, Clear(ClearType::UntilNewLine)).ok();
    }

    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

/// Apply color to a module prefix based on module type
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let prefix = format!("[{module}]");
    match module_lower {
        "serve" => prefix.bright_blue().bold().to_string(),
        "capture" => prefix.bright_green().bold().to_string(),
        "error" => prefix.bright_red().bold().to_string(),
        _ => prefix.bright_yellow().bold().to_string(),
    }
}

// ============================================================================
// Step Line (single-line sequence progress)
// ============================================================================

/// Single-line display of a fixed sequence of steps
///
/// Displays: `[capture] load (3/6)`
///
/// The line is redrawn in place on every `advance`. Dropping an unfinished
/// step line clears it, so an aborted sequence leaves no stale status behind.
pub struct StepLine {
    module: &'static str,
    steps: &'static [&'static str],
    current: AtomicUsize,
    lock: Mutex<()>,
}

impl StepLine {
    /// Create a step line positioned on the first step.
    pub fn new(module: &'static str, steps: &'static [&'static str]) -> Self {
        STEP_ACTIVE.store(true, Ordering::SeqCst);
        let line = Self {
            module,
            steps,
            current: AtomicUsize::new(0),
            lock: Mutex::new(()),
        };
        line.display();
        line
    }

    /// Move to the next step and redraw.
    pub fn advance(&self) {
        let next = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        if next < self.steps.len() {
            self.display();
        }
    }

    /// Name of the step currently shown.
    pub fn current(&self) -> &'static str {
        let index = self.current.load(Ordering::SeqCst);
        self.steps.get(index).copied().unwrap_or("done")
    }

    fn render(&self) -> String {
        let index = self.current.load(Ordering::SeqCst);
        format!(
            "{} ({}/{})",
            self.current(),
            (index + 1).min(self.steps.len()),
            self.steps.len()
        )
    }

    fn display(&self) {
        let _guard = self.lock.lock();
        let prefix = colorize_prefix(self.module, self.module);

        let mut stdout = stdout().lock();
        execute!(
            stdout,
            cursor::MoveToColumn(0),
            Clear(ClearType::CurrentLine)
        )
        .ok();
        write!(stdout, "{} {}", prefix, self.render()).ok();
        stdout.flush().ok();
    }

    /// Clear the step line; the caller logs the outcome.
    pub fn finish(self) {
        // Drop does the clearing
    }
}

impl Drop for StepLine {
    fn drop(&mut self) {
        STEP_ACTIVE.store(false, Ordering::SeqCst);

        let mut stdout = stdout().lock();
        execute!(
            stdout,
            cursor::MoveToColumn(0),
            Clear(ClearType::CurrentLine)
        )
        .ok();
        stdout.flush().ok();
    }
}

// ============================================================================
// Tests
// ============================================================================
