//! `@define` and `@reference` directives and their rendered markup.
//!
//! ```text
//! @define(figure, arch, "System overview")
//!   -> <div class="caption" id="figure-arch" data-type="figure">
//!        <span class="caption-label">figure 1</span> System overview</div>
//!
//! see figure @reference(figure, arch)
//!   -> see figure <a class="reference" href="#figure-arch">1</a>
//! ```

use super::table::ReferenceTable;
use crate::utils::html::escape;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Shown in place of a number when a reference cannot be resolved.
pub const UNRESOLVED: &str = "??";

static DEFINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"@define\(\s*([A-Za-z][\w-]*)\s*,\s*([^\s,()]+)\s*,\s*"((?:[^"\\]|\\.)*)"\s*\)"#)
        .unwrap()
});

static REFERENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@reference\(\s*([A-Za-z][\w-]*)\s*,\s*([^\s,()]+)\s*\)").unwrap()
});

/// A reference whose id had no definition under its type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unresolved {
    pub kind: String,
    pub id: String,
}

/// Replace every `@define` with a numbered caption, recording ids in `table`.
///
/// A caption always starts a new line and ends with an extra newline, so
/// markdown treats it as an HTML block rather than inline markup.
pub fn substitute_defines(text: &str, table: &mut ReferenceTable) -> String {
    DEFINE_RE
        .replace_all(text, |caps: &Captures| {
            let kind = &caps[1];
            let id = &caps[2];
            let ordinal = table.define(kind, id);

            let start = caps.get(0).map_or(0, |m| m.start());
            let at_line_start = start == 0 || text[..start].ends_with('\n');
            format!(
                "{}{}\n",
                if at_line_start { "" } else { "\n" },
                caption(kind, id, ordinal, &unescape_caption(&caps[3]))
            )
        })
        .into_owned()
}

/// Replace every `@reference` with its ordinal, or the sentinel when the id
/// was never defined under that type.
pub fn substitute_references(text: &str, table: &ReferenceTable) -> (String, Vec<Unresolved>) {
    let mut unresolved = Vec::new();
    let text = REFERENCE_RE
        .replace_all(text, |caps: &Captures| {
            let kind = &caps[1];
            let id = &caps[2];
            match table.ordinal(kind, id) {
                Some(ordinal) => reference(kind, id, ordinal),
                None => {
                    unresolved.push(Unresolved {
                        kind: kind.to_owned(),
                        id: id.to_owned(),
                    });
                    unresolved_reference(kind, id)
                }
            }
        })
        .into_owned();
    (text, unresolved)
}

/// Fragment id shared by a caption and the references pointing at it.
fn anchor(kind: &str, id: &str) -> String {
    format!("{}-{}", kind.to_lowercase(), escape(id))
}

fn caption(kind: &str, id: &str, ordinal: usize, text: &str) -> String {
    format!(
        r#"<div class="caption" id="{anchor}" data-type="{key}"><span class="caption-label">{kind} {ordinal}</span> {text}</div>"#,
        anchor = anchor(kind, id),
        key = kind.to_lowercase(),
    )
}

fn reference(kind: &str, id: &str, ordinal: usize) -> String {
    format!(
        r##"<a class="reference" href="#{anchor}">{ordinal}</a>"##,
        anchor = anchor(kind, id),
    )
}

fn unresolved_reference(kind: &str, id: &str) -> String {
    format!(
        r#"<span class="reference unresolved" title="{key}:{id}">{UNRESOLVED}</span>"#,
        key = kind.to_lowercase(),
        id = escape(id),
    )
}

/// Undo `\"` and `\\` escapes in quoted caption text.
fn unescape_caption(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\'
            && let Some(next) = chars.next()
        {
            out.push(next);
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_renders_caption_with_ordinal() {
        let mut table = ReferenceTable::new();
        let out = substitute_defines(r#"@define(figure, arch, "System overview")"#, &mut table);

        assert_eq!(
            out,
            concat!(
                r#"<div class="caption" id="figure-arch" data-type="figure">"#,
                r#"<span class="caption-label">figure 1</span> System overview</div>"#,
                "\n",
            )
        );
        assert_eq!(table.ordinal("figure", "arch"), Some(1));
    }

    #[test]
    fn test_inline_define_moves_to_own_block() {
        let mut table = ReferenceTable::new();
        let out = substitute_defines("Intro @define(figure, a, \"x\")\nNext line", &mut table);
        assert!(out.starts_with("Intro \n<div class=\"caption\""));
        assert!(out.ends_with("</div>\n\nNext line"));
    }

    #[test]
    fn test_define_keeps_display_case() {
        let mut table = ReferenceTable::new();
        let out = substitute_defines(
            r#"@define(Figure, a, "one") @define(FIGURE, b, "two")"#,
            &mut table,
        );

        assert!(out.contains(r#"<span class="caption-label">Figure 1</span>"#));
        assert!(out.contains(r#"<span class="caption-label">FIGURE 2</span>"#));
        assert!(out.contains(r#"id="figure-b""#));
    }

    #[test]
    fn test_define_tolerates_spacing() {
        let mut table = ReferenceTable::new();
        let out = substitute_defines(r#"@define(  table ,t1,   "Results"  )"#, &mut table);
        assert!(out.contains("table 1</span> Results"));
    }

    #[test]
    fn test_caption_escapes() {
        let mut table = ReferenceTable::new();
        let out = substitute_defines(r#"@define(figure, q, "The \"quoted\" path C:\\tmp")"#, &mut table);
        assert!(out.contains(r#"The "quoted" path C:\tmp</div>"#));
    }

    #[test]
    fn test_malformed_define_is_left_alone() {
        let mut table = ReferenceTable::new();
        let text = "@define(figure, a) and @define(figure, b, unquoted)";
        assert_eq!(substitute_defines(text, &mut table), text);
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn test_reference_renders_link() {
        let mut table = ReferenceTable::new();
        table.define("figure", "a");
        table.define("figure", "b");

        let (out, unresolved) = substitute_references("see @reference(Figure, b)", &table);
        assert_eq!(out, r##"see <a class="reference" href="#figure-b">2</a>"##);
        assert!(unresolved.is_empty());
    }

    #[test]
    fn test_unresolved_reference_renders_sentinel() {
        let table = ReferenceTable::new();
        let (out, unresolved) = substitute_references("see @reference(figure, z)", &table);

        assert_eq!(
            out,
            r#"see <span class="reference unresolved" title="figure:z">??</span>"#
        );
        assert_eq!(unresolved, vec![Unresolved {
            kind: "figure".into(),
            id: "z".into(),
        }]);
    }

    #[test]
    fn test_unescape_caption() {
        assert_eq!(unescape_caption(r#"a \"b\" \\ c"#), r#"a "b" \ c"#);
        assert_eq!(unescape_caption(r"trailing \"), r"trailing \");
    }
}
