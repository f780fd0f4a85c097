//! Request routing.
//!
//! Three route classes, checked in fixed order:
//!
//! 1. `/` - the assembled document
//! 2. `/@markdown-pdf/<name>` - bundled and configured stylesheets
//! 3. anything else - a file relative to the source document's directory

use super::assets::ASSET_PREFIX;
use percent_encoding::percent_decode_str;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Root,
    /// Internal asset name, up to the next `/`.
    Internal(String),
    /// Decoded path relative to the source directory.
    File(String),
}

/// Classify a request URL.
pub fn classify(url: &str) -> Route {
    if url == "/" {
        return Route::Root;
    }

    let path = url.split(['?', '#']).next().unwrap_or_default();

    if let Some(rest) = path.strip_prefix(ASSET_PREFIX) {
        let name = rest.split('/').next().unwrap_or_default();
        return Route::Internal(name.to_owned());
    }

    let decoded = percent_decode_str(path).decode_utf8_lossy();
    Route::File(decoded.trim_start_matches('/').to_owned())
}
