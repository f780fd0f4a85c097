//! Rendering: driving a headless browser to capture the served page.
//!
//! # Module Structure
//!
//! - `capture` - the capture sequence and browser mode
//! - `chrome` - locating, launching and driving Chrome over DevTools
//! - `cdp` - DevTools protocol connection (WebSocket + JSON)
//! - `print` - page layout parameters for `Page.printToPDF`

pub mod capture;
mod cdp;
pub mod chrome;
pub mod print;

pub use capture::{CaptureJob, browse, capture};
pub use chrome::ChromeEngine;
pub use print::PrintOptions;

use anyhow::Result;
use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;

/// A paginating renderer the capture sequence can drive.
///
/// Every call blocks until the engine has finished the step.
pub trait RenderEngine {
    /// Handle to one open page.
    type Page;

    fn open_page(&mut self) -> Result<Self::Page>;

    /// Load `url` and return once the page reports network quiescence.
    fn navigate(&mut self, page: &Self::Page, url: &str) -> Result<()>;

    /// Evaluate a script expression in the page and return its value.
    fn evaluate(&mut self, page: &Self::Page, expression: &str) -> Result<Value>;

    /// Capture the page as a paginated PDF.
    fn print(&mut self, page: &Self::Page, options: &PrintOptions) -> Result<Vec<u8>>;

    fn close_page(&mut self, page: Self::Page) -> Result<()>;

    /// Stop the engine.
    fn shutdown(self) -> Result<()>;
}

/// Rendering-related errors
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no Chrome or Chromium executable found; tried {0} (use --chrome or [render] browser)")]
    NotFound(String),

    #[error("failed to launch `{0}`")]
    Launch(PathBuf, #[source] std::io::Error),

    #[error("browser did not report a DevTools address within {0}s")]
    LaunchTimeout(u64),

    #[error("browser exited before reporting a DevTools address")]
    LaunchExited,

    #[error("DevTools connection error")]
    WebSocket(#[from] tungstenite::Error),

    #[error("DevTools connection closed")]
    Closed,

    #[error("DevTools call `{method}` failed: {message}")]
    Protocol { method: String, message: String },

    #[error("malformed DevTools message: {0}")]
    Malformed(String),

    #[error("failed to load {url}: {reason}")]
    Navigation { url: String, reason: String },

    #[error("page script failed: {0}")]
    Script(String),
}
