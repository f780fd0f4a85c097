//! Layout parameters for `Page.printToPDF`.

use crate::config::PageConfig;
use serde::Serialize;

/// Print parameters, lengths in inches.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintOptions {
    pub paper_width: f64,
    pub paper_height: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    pub display_header_footer: bool,
    pub header_template: String,
    pub footer_template: String,
    pub print_background: bool,
    #[serde(rename = "preferCSSPageSize")]
    pub prefer_css_page_size: bool,
}

impl PrintOptions {
    pub fn from_page(page: &PageConfig) -> Self {
        let (paper_width, paper_height) = page.size.inches();
        Self {
            paper_width,
            paper_height,
            margin_top: page.margin.top.to_inches(),
            margin_bottom: page.margin.bottom.to_inches(),
            margin_left: page.margin.left.to_inches(),
            margin_right: page.margin.right.to_inches(),
            display_header_footer: true,
            header_template: page.header.clone(),
            footer_template: page.footer.clone(),
            print_background: page.print_background,
            prefer_css_page_size: false,
        }
    }
}
