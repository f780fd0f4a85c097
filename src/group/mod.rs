//! Layout grouping as a pure tree rewrite.
//!
//! Mirrors the in-page hook shipped in `grouping.js`: captions are glued to
//! the element they describe, and a captioned group directly following a
//! heading is glued to that heading. `print.css` keeps both kinds of group
//! on a single page.
//!
//! ```text
//! [H2, CAPTION, H2, FIGURE, CAPTION]
//!   sweep 1 -> [captioned(H2, CAPTION), H2, captioned(FIGURE, CAPTION)]
//!   sweep 2 -> [captioned(H2, CAPTION), keep-together(H2, captioned(FIGURE, CAPTION))]
//! ```

pub mod tree;

pub use tree::{Element, Node};

use crate::utils::html::is_heading;
use anyhow::Result;
use serde::Deserialize;

pub const CAPTION: &str = "caption";
pub const CAPTIONED: &str = "captioned";
pub const KEEP_TOGETHER: &str = "keep-together";

/// Number of groups created by [`regroup`] or the in-page hook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GroupStats {
    pub captioned: usize,
    pub kept: usize,
}

/// Run both sweeps over `nodes`, at every depth.
pub fn regroup(nodes: &mut Vec<Node>) -> GroupStats {
    let captioned = wrap_captions(nodes);
    let kept = keep_headings(nodes);
    GroupStats { captioned, kept }
}

/// Parse, regroup and serialize a markup fragment.
pub fn regroup_html(html: &str) -> Result<(String, GroupStats)> {
    let mut nodes = tree::parse(html)?;
    let stats = regroup(&mut nodes);
    Ok((tree::serialize(&nodes), stats))
}

/// Sweep 1: wrap each caption with its preceding element.
fn wrap_captions(nodes: &mut Vec<Node>) -> usize {
    let mut count = nested(nodes, wrap_captions);

    let mut i = 0;
    while i < nodes.len() {
        if nodes[i].has_class(CAPTION)
            && let Some(prev) = previous_element(nodes, i)
            && !nodes[prev].has_class(CAPTIONED)
        {
            // The pair collapses into one node, so `i` already points past it.
            wrap(nodes, prev, i, CAPTIONED);
            count += 1;
            continue;
        }
        i += 1;
    }

    count
}

/// Sweep 2: wrap each captioned group with a directly preceding heading.
fn keep_headings(nodes: &mut Vec<Node>) -> usize {
    let mut count = nested(nodes, keep_headings);

    let mut i = 0;
    while i < nodes.len() {
        if nodes[i].has_class(CAPTIONED)
            && let Some(prev) = previous_element(nodes, i)
            && nodes[prev].element().is_some_and(|e| is_heading(&e.tag))
        {
            wrap(nodes, prev, i, KEEP_TOGETHER);
            count += 1;
            continue;
        }
        i += 1;
    }

    count
}

fn nested(nodes: &mut [Node], sweep: fn(&mut Vec<Node>) -> usize) -> usize {
    nodes
        .iter_mut()
        .map(|node| match node {
            Node::Element(elem) => sweep(&mut elem.children),
            Node::Text(_) => 0,
        })
        .sum()
}

/// Index of the closest element sibling before `index`, skipping text.
fn previous_element(nodes: &[Node], index: usize) -> Option<usize> {
    nodes[..index]
        .iter()
        .rposition(|node| matches!(node, Node::Element(_)))
}

/// Replace the elements at `first` and `second` with a `div.class` holding
/// both. Text between them stays behind, after the new group.
fn wrap(nodes: &mut Vec<Node>, first: usize, second: usize, class: &str) {
    let second_node = nodes.remove(second);
    let first_node = nodes.remove(first);
    let group = Element::new("div")
        .with_class(class)
        .with_children(vec![first_node, second_node]);
    nodes.insert(first, Node::Element(group));
}
