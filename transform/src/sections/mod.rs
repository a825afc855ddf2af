//! Section wrapping: a heading and the siblings it governs become one
//! `Base { BaseHeader, BaseContent }` component stamped with `data-depth`.
//!
//! Headings are processed last-to-first so a nested section is already a
//! single component by the time its parent captures content. A parent
//! consumes wrapped sections deeper than itself and stops at one of equal
//! or lower depth.

pub mod directive;
pub mod slug;

use codedoc::document::names::{
    ATTR_COLLAPSIBLE, ATTR_DEFAULT_EXPANDED, ATTR_DEPTH, TABLE_OF_CONTENTS, content_of, header_of,
};
use codedoc::document::{Component, Heading, Node};
use tracing::debug;

use directive::{Directive, take_directive};
use slug::Slugger;

/// A heading selected for wrapping, with its directive already removed.
struct Target {
    index: usize,
    directive: Directive,
    heading: Heading,
}

/// Wrap the top-level headings whose rank is in `levels`. Headings whose
/// text equals `toc_title` (ignoring case) are left in place but still end
/// the sections before them.
pub fn wrap_sections(mut nodes: Vec<Node>, levels: &[u8], toc_title: &str) -> Vec<Node> {
    let mut slugger = Slugger::new();
    for node in &nodes {
        if let Node::Heading(Heading { id: Some(id), .. }) = node {
            slugger.reserve(id);
        }
    }

    let mut targets = Vec::new();
    for (index, node) in nodes.iter().enumerate() {
        let Node::Heading(heading) = node else {
            continue;
        };
        if !levels.contains(&heading.level) {
            continue;
        }
        let mut heading = heading.clone();
        let directive = take_directive(&mut heading.content);
        let text = heading.text();
        if text.trim().to_lowercase() == toc_title.trim().to_lowercase() {
            debug!(title = %text, "skipping table of contents heading");
            continue;
        }
        if heading.id.is_none() {
            heading.id = Some(slugger.slug(&text));
        }
        targets.push(Target {
            index,
            directive,
            heading,
        });
    }

    for target in targets.into_iter().rev() {
        let rank = target.heading.level;
        let end = capture_end(&nodes, target.index + 1, rank);
        let index = target.index;
        let content: Vec<Node> = nodes.drain(index + 1..end).collect();
        nodes[index] = Node::Component(section(target, content));
    }
    nodes
}

/// One past the last node a section of `rank` starting at `from` captures.
fn capture_end(nodes: &[Node], from: usize, rank: u8) -> usize {
    nodes[from..]
        .iter()
        .position(|node| ends_section(node, rank))
        .map(|p| from + p)
        .unwrap_or(nodes.len())
}

fn ends_section(node: &Node, rank: u8) -> bool {
    match node {
        Node::Heading(heading) => heading.level <= rank,
        Node::Component(component) if component.is(TABLE_OF_CONTENTS) => true,
        Node::Component(component) => component
            .attribute(ATTR_DEPTH)
            .and_then(|depth| depth.as_int())
            .is_some_and(|depth| depth <= i64::from(rank)),
        _ => false,
    }
}

fn section(target: Target, content: Vec<Node>) -> Component {
    let Target {
        directive, heading, ..
    } = target;
    let base = directive.base().to_string();
    let rank = heading.level;

    let header = Component::new(header_of(&base)).with_children(vec![Node::Heading(heading)]);
    let body = Component::new(content_of(&base)).with_children(content);

    let mut wrapper = Component::new(base).with_attribute(ATTR_DEPTH, rank);
    if directive.name.is_some() && directive.collapsible {
        wrapper = wrapper.with_attribute(ATTR_COLLAPSIBLE, true);
    }
    if directive.collapsible && directive.expanded {
        wrapper = wrapper.with_attribute(ATTR_DEFAULT_EXPANDED, true);
    }
    wrapper.with_children(vec![Node::Component(header), Node::Component(body)])
}
