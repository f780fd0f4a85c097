//! `[style]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [style]
//! stylesheet = "print-overrides.css"   # relative to this config file
//! highlight = true                     # highlight fenced code blocks
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Document styling.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// User stylesheet, linked after the bundled ones.
    pub stylesheet: Option<PathBuf>,

    /// Highlight fenced code blocks that name a language.
    pub highlight: bool,
}
