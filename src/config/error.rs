//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("unknown paper size `{0}` (expected A0-A6, Letter, Legal, Tabloid or Ledger)")]
    Paper(String),

    #[error("invalid length `{0}` (expected a number with mm, cm, in or px)")]
    Length(String),

    #[error("Config validation error: {0}")]
    Validation(String),
}
