//! Internal assets served under [`ASSET_PREFIX`].

use crate::embed::css::{HIGHLIGHT_CSS, MARKDOWN_CSS, PRINT_CSS};
use crate::log;
use std::fs;
use std::path::PathBuf;

/// Virtual path prefix for internal assets.
pub const ASSET_PREFIX: &str = "/@markdown-pdf/";

/// The closed set of internal asset names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternalAsset {
    Markdown,
    Print,
    Highlight,
    Style,
}

impl InternalAsset {
    /// Every asset, in cascade order.
    pub const ALL: [Self; 4] = [Self::Markdown, Self::Print, Self::Highlight, Self::Style];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Markdown => "markdown.css",
            Self::Print => "print.css",
            Self::Highlight => "highlight.css",
            Self::Style => "style.css",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|asset| asset.name() == name)
    }

    pub fn href(self) -> String {
        format!("{ASSET_PREFIX}{}", self.name())
    }
}

/// Stylesheets available to one document.
#[derive(Debug, Clone, Default)]
pub struct StyleBundle {
    highlight: bool,
    stylesheet: Option<PathBuf>,
    /// User stylesheet contents, read by [`StyleBundle::load`].
    user: Option<Vec<u8>>,
}

impl StyleBundle {
    pub fn new(highlight: bool, stylesheet: Option<PathBuf>) -> Self {
        Self {
            highlight,
            stylesheet,
            user: None,
        }
    }

    /// Whether `asset` is part of this bundle.
    pub fn is_enabled(&self, asset: InternalAsset) -> bool {
        match asset {
            InternalAsset::Markdown | InternalAsset::Print => true,
            InternalAsset::Highlight => self.highlight,
            InternalAsset::Style => self.stylesheet.is_some(),
        }
    }

    /// Stylesheet links for the document head, in cascade order.
    pub fn links(&self) -> Vec<String> {
        InternalAsset::ALL
            .into_iter()
            .filter(|asset| self.is_enabled(*asset))
            .map(InternalAsset::href)
            .collect()
    }

    /// Read the user stylesheet. An unreadable file is logged and left
    /// unavailable.
    pub fn load(&mut self) {
        let Some(path) = &self.stylesheet else { return };
        match fs::read(path) {
            Ok(content) => self.user = Some(content),
            Err(e) => log!("serve"; "cannot read stylesheet {}: {e}", path.display()),
        }
    }

    /// Body for `asset`, or `None` when it is disabled or unavailable.
    pub fn content(&self, asset: InternalAsset) -> Option<&[u8]> {
        if !self.is_enabled(asset) {
            return None;
        }
        match asset {
            InternalAsset::Markdown => Some(MARKDOWN_CSS.as_bytes()),
            InternalAsset::Print => Some(PRINT_CSS.as_bytes()),
            InternalAsset::Highlight => Some(HIGHLIGHT_CSS.as_bytes()),
            InternalAsset::Style => self.user.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_names_round_trip() {
        for asset in InternalAsset::ALL {
            assert_eq!(InternalAsset::from_name(asset.name()), Some(asset));
        }
        assert_eq!(InternalAsset::from_name("github-markdown.css"), None);
        assert_eq!(InternalAsset::Print.href(), "/@markdown-pdf/print.css");
    }

    #[test]
    fn test_default_links() {
        let bundle = StyleBundle::new(false, None);
        assert_eq!(
            bundle.links(),
            ["/@markdown-pdf/markdown.css", "/@markdown-pdf/print.css"]
        );
        assert!(bundle.content(InternalAsset::Highlight).is_none());
        assert!(bundle.content(InternalAsset::Style).is_none());
    }

    #[test]
    fn test_all_links_in_cascade_order() {
        let bundle = StyleBundle::new(true, Some(PathBuf::from("custom.css")));
        assert_eq!(
            bundle.links(),
            [
                "/@markdown-pdf/markdown.css",
                "/@markdown-pdf/print.css",
                "/@markdown-pdf/highlight.css",
                "/@markdown-pdf/style.css",
            ]
        );
    }

    #[test]
    fn test_user_stylesheet_loaded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.css");
        fs::write(&path, "h1 { color: red }").unwrap();

        let mut bundle = StyleBundle::new(false, Some(path));
        assert!(bundle.content(InternalAsset::Style).is_none());

        bundle.load();
        assert_eq!(
            bundle.content(InternalAsset::Style),
            Some(b"h1 { color: red }".as_slice())
        );
    }

    #[test]
    fn test_unreadable_user_stylesheet_stays_linked() {
        let mut bundle = StyleBundle::new(false, Some(PathBuf::from("/nonexistent/custom.css")));
        bundle.load();
        assert!(bundle.links().iter().any(|l| l.ends_with("style.css")));
        assert!(bundle.content(InternalAsset::Style).is_none());
    }

    #[test]
    fn test_bundled_content_present() {
        let bundle = StyleBundle::new(true, None);
        assert!(!bundle.content(InternalAsset::Markdown).unwrap().is_empty());
        assert!(
            String::from_utf8_lossy(bundle.content(InternalAsset::Print).unwrap())
                .contains("keep-together")
        );
    }
}
