//! Metadata markers substituted before any numbering happens.

use crate::{log, utils::git};
use anyhow::Result;
use std::path::Path;

/// Replaced by the date of the last commit touching the source file.
pub const LAST_UPDATED_MARKER: &str = "@git:lastUpdated";

/// Stand-in for a marker whose value could not be looked up.
pub const METADATA_ERROR: &str = "(last update unknown)";

/// Source of document metadata.
pub trait MetadataSource {
    /// Last modification date of `path`, already formatted for display.
    fn last_updated(&self, path: &Path) -> Result<String>;
}

/// Metadata from the git history of the repository containing the document.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitHistory;

impl MetadataSource for GitHistory {
    fn last_updated(&self, path: &Path) -> Result<String> {
        git::last_commit_date(path)
    }
}

/// Replace every metadata marker in `text`.
///
/// The source is queried at most once. A failed query is logged and the
/// markers become [`METADATA_ERROR`].
pub fn substitute(text: &str, path: &Path, source: &dyn MetadataSource) -> String {
    if !text.contains(LAST_UPDATED_MARKER) {
        return text.to_owned();
    }

    let value = match source.last_updated(path) {
        Ok(date) => date,
        Err(e) => {
            log!("meta"; "last update of {} unavailable: {e:#}", path.display());
            METADATA_ERROR.to_owned()
        }
    };

    text.replace(LAST_UPDATED_MARKER, &value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use std::cell::Cell;

    struct Fixed(&'static str, Cell<usize>);

    impl MetadataSource for Fixed {
        fn last_updated(&self, _: &Path) -> Result<String> {
            self.1.set(self.1.get() + 1);
            Ok(self.0.to_owned())
        }
    }

    struct Failing;

    impl MetadataSource for Failing {
        fn last_updated(&self, _: &Path) -> Result<String> {
            bail!("not a repository")
        }
    }

    #[test]
    fn test_substitutes_every_marker_with_one_query() {
        let source = Fixed("2024-06-15", Cell::new(0));
        let text = "Updated @git:lastUpdated.\n\nFooter: @git:lastUpdated";

        let out = substitute(text, Path::new("doc.md"), &source);
        assert_eq!(out, "Updated 2024-06-15.\n\nFooter: 2024-06-15");
        assert_eq!(source.1.get(), 1);
    }

    #[test]
    fn test_no_marker_skips_query() {
        let source = Fixed("2024-06-15", Cell::new(0));
        let out = substitute("# Title", Path::new("doc.md"), &source);
        assert_eq!(out, "# Title");
        assert_eq!(source.1.get(), 0);
    }

    #[test]
    fn test_failure_substitutes_error_string() {
        let out = substitute("As of @git:lastUpdated", Path::new("doc.md"), &Failing);
        assert_eq!(out, format!("As of {METADATA_ERROR}"));
    }
}
