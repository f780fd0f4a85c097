//! Document assembly: converted markup wrapped in the HTML shell.

use crate::embed::document::{DocumentVars, document};
use crate::utils::html::escape;

/// Build the complete page served at the root address.
///
/// Stylesheets are linked in the order given, so later entries win on equal
/// specificity. `script` is embedded inert; nothing in it runs until the
/// capture session calls the hook it defines.
pub fn assemble(title: &str, content: &str, stylesheets: &[String], script: &str) -> String {
    let links = stylesheets
        .iter()
        .map(|href| format!("        <link rel=\"stylesheet\" href=\"{}\">", escape(href)))
        .collect::<Vec<_>>()
        .join("\n");

    document().render(&DocumentVars {
        title: &escape(title),
        stylesheets: &links,
        script,
        content,
    })
}
