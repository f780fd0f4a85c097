//! `[render]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [render]
//! browser = "/usr/bin/chromium"      # default: $CHROME, then PATH lookup
//! args = ["--no-sandbox"]            # extra browser flags
//! launch_timeout = 30                # seconds to wait for the browser
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Headless browser settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Chrome or Chromium executable.
    pub browser: Option<PathBuf>,

    /// Extra command-line flags for the browser.
    pub args: Vec<String>,

    /// Seconds to wait for the browser to report its DevTools address.
    pub launch_timeout: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            browser: None,
            args: Vec::new(),
            launch_timeout: 30,
        }
    }
}
