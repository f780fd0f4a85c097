//! Abstract node tree for markup fragments.
//!
//! Parsing goes through `tl`; the tree keeps text, comments and attribute
//! values exactly as written so that serializing an untouched tree gives
//! back equivalent markup.

use crate::utils::html::{escape_attr_value, has_class, is_void_element, parse_attributes, start_tag};
use anyhow::{Context, Result};

/// A node in a markup fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Raw text, entities and comments included, emitted verbatim.
    Text(String),
}

/// An element with its attributes in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lower-cased tag name.
    pub tag: String,
    pub attrs: Vec<(String, Option<String>)>,
    pub children: Vec<Node>,
    /// Written as `<tag ... />` in the source.
    pub self_closing: bool,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
            self_closing: false,
        }
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.attrs.push(("class".into(), Some(class.into())));
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .and_then(|(_, value)| value.as_deref())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class").is_some_and(|attr| has_class(attr, class))
    }
}

impl Node {
    pub fn element(&self) -> Option<&Element> {
        match self {
            Self::Element(elem) => Some(elem),
            Self::Text(_) => None,
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.element().is_some_and(|elem| elem.has_class(class))
    }
}

/// Parse a markup fragment into top-level nodes.
pub fn parse(html: &str) -> Result<Vec<Node>> {
    let dom = tl::parse(html, tl::ParserOptions::default()).context("Failed to parse markup")?;
    let parser = dom.parser();
    Ok(dom
        .children()
        .iter()
        .filter_map(|handle| convert(*handle, parser))
        .collect())
}

fn convert(handle: tl::NodeHandle, parser: &tl::Parser) -> Option<Node> {
    match handle.get(parser)? {
        tl::Node::Tag(tag) => {
            let raw = tag.raw().as_utf8_str();
            let open = start_tag(&raw);
            let name = tag.name().as_utf8_str();

            let inner = open.trim_start_matches('<').trim_end_matches('>');
            let self_closing = inner.ends_with('/');
            let attrs_src = inner.get(name.len()..).unwrap_or_default();

            let children = tag
                .children()
                .top()
                .iter()
                .filter_map(|child| convert(*child, parser))
                .collect();

            Some(Node::Element(Element {
                tag: name.to_ascii_lowercase(),
                attrs: parse_attributes(attrs_src),
                children,
                self_closing,
            }))
        }
        tl::Node::Raw(bytes) => Some(Node::Text(bytes.as_utf8_str().into_owned())),
        tl::Node::Comment(bytes) => {
            let comment = bytes.as_utf8_str();
            if comment.starts_with("<!--") {
                Some(Node::Text(comment.into_owned()))
            } else {
                Some(Node::Text(format!("<!--{comment}-->")))
            }
        }
    }
}

/// Serialize nodes back to markup.
pub fn serialize(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(&mut out, node);
    }
    out
}

fn write_node(out: &mut String, node: &Node) {
    let elem = match node {
        Node::Text(text) => {
            out.push_str(text);
            return;
        }
        Node::Element(elem) => elem,
    };

    out.push('<');
    out.push_str(&elem.tag);
    for (name, value) in &elem.attrs {
        out.push(' ');
        out.push_str(name);
        if let Some(value) = value {
            out.push_str("=\"");
            out.push_str(&escape_attr_value(value));
            out.push('"');
        }
    }

    if elem.self_closing {
        out.push_str(" />");
        return;
    }
    out.push('>');

    for child in &elem.children {
        write_node(out, child);
    }
    if is_void_element(&elem.tag) {
        return;
    }
    out.push_str("</");
    out.push_str(&elem.tag);
    out.push('>');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_structure() {
        let nodes = parse("<h2 id=\"a\">Title</h2>\n<p>text <em>here</em></p>").unwrap();
        assert_eq!(nodes.len(), 3);

        let h2 = nodes[0].element().unwrap();
        assert_eq!(h2.tag, "h2");
        assert_eq!(h2.attr("id"), Some("a"));
        assert_eq!(h2.children, vec![Node::Text("Title".into())]);

        assert_eq!(nodes[1], Node::Text("\n".into()));
        assert_eq!(nodes[2].element().unwrap().children.len(), 2);
    }

    #[test]
    fn test_serialize_preserves_markup() {
        let html = concat!(
            "<p><img src=\"a.png\" alt=\"a &amp; b\" /></p>\n",
            "<div class=\"caption\" id=\"figure-a\" data-type=\"figure\">",
            "<span class=\"caption-label\">figure 1</span> A &lt;b&gt;</div>\n",
            "<pre><code class=\"language-rust\">let x = 1;\n</code></pre>\n",
            "<p>line<br>break</p>",
        );
        assert_eq!(serialize(&parse(html).unwrap()), html);
    }

    #[test]
    fn test_element_class_lookup() {
        let nodes = parse("<div class=\"caption wide\"></div><div class=\"captioned\"></div>").unwrap();
        assert!(nodes[0].has_class("caption"));
        assert!(!nodes[0].has_class("captioned"));
        assert!(nodes[1].has_class("captioned"));
        assert!(!Node::Text("caption".into()).has_class("caption"));
    }

    #[test]
    fn test_built_element_serializes() {
        let elem = Element::new("div")
            .with_class("keep-together")
            .with_children(vec![Node::Text("x".into())]);
        assert_eq!(
            serialize(&[Node::Element(elem)]),
            "<div class=\"keep-together\">x</div>"
        );
    }
}
