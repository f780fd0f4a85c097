//! HTML utility functions.
//!
//! Provides common HTML processing functions:
//! - `escape()` - text content escaping
//! - `escape_attr_value()` - quoting for attribute values that are already markup
//! - `is_void_element()`, `is_heading()` - element classification
//! - `has_class()` - class list lookup
//! - `start_tag()`, `parse_attributes()` - start tag parsing

use std::borrow::Cow;

// =============================================================================
// HTML Escaping
// =============================================================================

/// Characters that require HTML escaping.
const ESCAPE_CHARS: [char; 5] = ['<', '>', '&', '"', '\''];

/// Get the HTML entity for a special character.
#[inline]
fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        _ => None,
    }
}

/// Escape HTML special characters in text content.
///
/// Uses `Cow` to avoid allocation when no escaping is needed.
///
/// # Example
/// ```ignore
/// assert_eq!(escape("<script>"), "&lt;script&gt;");
/// assert_eq!(escape("hello"), "hello"); // No allocation
/// ```
#[inline]
pub fn escape(s: &str) -> Cow<'_, str> {
    if !s.contains(ESCAPE_CHARS) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match escape_char(c) {
            Some(entity) => result.push_str(entity),
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Prepare a raw attribute value for re-emission inside double quotes.
///
/// The value comes straight from parsed markup, so entities in it are kept
/// as written; only the delimiter itself needs escaping.
#[inline]
pub fn escape_attr_value(s: &str) -> Cow<'_, str> {
    if s.contains('"') {
        Cow::Owned(s.replace('"', "&quot;"))
    } else {
        Cow::Borrowed(s)
    }
}

// =============================================================================
// Element Classification
// =============================================================================

/// Check if an HTML tag is a void element (self-closing).
///
/// Void elements cannot have children and are rendered without a close tag.
#[inline]
pub fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Check if tag is a heading of any level.
#[inline]
pub fn is_heading(tag: &str) -> bool {
    matches!(tag, "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

/// Check whether a `class` attribute value contains `class`.
#[inline]
pub fn has_class(class_attr: &str, class: &str) -> bool {
    class_attr.split_ascii_whitespace().any(|c| c == class)
}

// =============================================================================
// Start Tag Parsing
// =============================================================================

/// Slice the start tag off the front of raw element markup.
///
/// `raw` begins at `<`; the start tag ends at the first `>` outside a
/// quoted attribute value. Unterminated markup yields the whole input.
pub fn start_tag(raw: &str) -> &str {
    let mut quote = None;
    for (i, c) in raw.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '>') => return &raw[..=i],
            _ => {}
        }
    }
    raw
}

/// Parse an attribute string like `class="a b" id=x hidden`.
///
/// Values are returned as written, without entity decoding. Attributes
/// without a value (`hidden`) have `None`.
pub fn parse_attributes(s: &str) -> Vec<(String, Option<String>)> {
    let mut attrs = Vec::new();
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_whitespace() || c == '/' {
            continue;
        }

        // Read attribute name
        let mut name = String::from(c);
        while let Some(&next) = chars.peek() {
            if next == '=' || next == '/' || next.is_whitespace() {
                break;
            }
            name.push(next);
            chars.next();
        }

        // Skip whitespace
        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }

        if chars.peek() != Some(&'=') {
            // Boolean attribute (no value)
            attrs.push((name, None));
            continue;
        }
        chars.next(); // consume '='

        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }

        let mut value = String::new();
        match chars.peek().copied() {
            Some(quote @ ('"' | '\'')) => {
                chars.next();
                for c in chars.by_ref() {
                    if c == quote {
                        break;
                    }
                    value.push(c);
                }
            }
            _ => {
                // Unquoted value (read until whitespace)
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() {
                        break;
                    }
                    value.push(c);
                    chars.next();
                }
            }
        }
        attrs.push((name, Some(value)));
    }

    attrs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("<b>\"x\" & 'y'</b>"), "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;");
        assert!(matches!(escape("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_attr_value_keeps_entities() {
        assert_eq!(escape_attr_value("a &amp; b"), "a &amp; b");
        assert_eq!(escape_attr_value("say \"hi\""), "say &quot;hi&quot;");
    }

    #[test]
    fn test_classification() {
        assert!(is_void_element("img"));
        assert!(!is_void_element("div"));
        assert!(is_heading("h1"));
        assert!(is_heading("h6"));
        assert!(!is_heading("header"));
    }

    #[test]
    fn test_has_class() {
        assert!(has_class("caption wide", "caption"));
        assert!(has_class("  caption ", "caption"));
        assert!(!has_class("captioned", "caption"));
        assert!(!has_class("", "caption"));
    }

    #[test]
    fn test_start_tag() {
        assert_eq!(start_tag("<p class=\"a\">text</p>"), "<p class=\"a\">");
        assert_eq!(start_tag("<img alt=\"a > b\" src='x>y' />"), "<img alt=\"a > b\" src='x>y' />");
        assert_eq!(start_tag("<div"), "<div");
    }

    #[test]
    fn test_parse_attributes() {
        let attrs = parse_attributes(r#"class="caption wide" id=fig-1 hidden data-x='say "hi"'"#);
        assert_eq!(
            attrs,
            vec![
                ("class".to_string(), Some("caption wide".to_string())),
                ("id".to_string(), Some("fig-1".to_string())),
                ("hidden".to_string(), None),
                ("data-x".to_string(), Some("say \"hi\"".to_string())),
            ]
        );
    }

    #[test]
    fn test_parse_attributes_self_closing() {
        let attrs = parse_attributes(r#"src="a.png" alt="" /"#);
        assert_eq!(
            attrs,
            vec![
                ("src".to_string(), Some("a.png".to_string())),
                ("alt".to_string(), Some(String::new())),
            ]
        );
    }
}
