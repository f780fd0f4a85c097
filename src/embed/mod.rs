//! Embedded static resources.
//!
//! # Module Structure
//!
//! - `template` - Template types for typed variable injection
//! - `document` - The HTML shell every rendered page is built from
//! - `css` - Bundled stylesheets (minified by `build.rs`)
//! - `script` - The in-page grouping hook (minified by `build.rs`)

mod template;

pub use template::{Template, TemplateVars};

pub mod document {
    use super::{Template, TemplateVars};

    /// Variables for document.html.
    pub struct DocumentVars<'a> {
        /// Already escaped page title.
        pub title: &'a str,
        /// One `<link>` element per line, in cascade order.
        pub stylesheets: &'a str,
        pub script: &'a str,
        pub content: &'a str,
    }

    impl TemplateVars for DocumentVars<'_> {
        fn apply(&self, content: &str) -> String {
            // Content goes in last so placeholder-like text inside the
            // document body is never substituted.
            content
                .replace("__MDPDF_TITLE__", self.title)
                .replace("__MDPDF_STYLESHEETS__", self.stylesheets)
                .replace("__MDPDF_SCRIPT__", self.script)
                .replace("__MDPDF_CONTENT__", self.content)
        }
    }

    const DOCUMENT_HTML: &str = include_str!("assets/document.html");

    /// Document shell template.
    pub const fn document<'a>() -> Template<DocumentVars<'a>> {
        Template::new(DOCUMENT_HTML)
    }
}

pub mod css {
    /// Base typography and block styles.
    pub const MARKDOWN_CSS: &str = include_str!(concat!(env!("OUT_DIR"), "/markdown.min.css"));

    /// Page-break rules for grouped layout units.
    pub const PRINT_CSS: &str = include_str!(concat!(env!("OUT_DIR"), "/print.min.css"));

    /// Token colors for highlighted code blocks.
    pub const HIGHLIGHT_CSS: &str = include_str!(concat!(env!("OUT_DIR"), "/highlight.min.css"));
}

pub mod script {
    /// Defines `window.markdownPdfGroup` without running it.
    pub const GROUPING_JS: &str = include_str!(concat!(env!("OUT_DIR"), "/grouping.min.js"));

    /// Expression evaluated in the page to run the grouping hook.
    pub const GROUPING_CALL: &str = "markdownPdfGroup()";
}
