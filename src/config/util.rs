//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from `start`
///
/// Walks up parent directories until finding `config_name`
///
/// # Example
/// ```text
/// /home/user/notes/design/        ← start (directory of the document)
/// /home/user/notes/markdown-pdf.toml  ← found!
/// ```
pub fn find_config_file(start: &Path, config_name: &str) -> Option<PathBuf> {
    let mut current = start;
    loop {
        let candidate = current.join(config_name);
        if candidate.is_file() {
            return Some(candidate);
        }

        // Move to parent directory
        match current.parent() {
            Some(parent) => current = parent,
            None => return None, // Reached filesystem root
        }
    }
}

/// Make `path` absolute against `base`, without touching the filesystem.
pub fn absolute_from(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

// ============================================================================
// tests
// ============================================================================
