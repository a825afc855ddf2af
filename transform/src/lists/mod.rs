//! List restructuring: markdown lists become `OrderedList`/`UnorderedList`
//! components whose items carry `level`, `number` and `headerItem`.

pub mod cleanup;
pub mod numbering;

use codedoc::document::names::{
    ATTR_HEADER_ITEM, ATTR_LEVEL, ATTR_NUMBER, ORDERED_LIST, UNORDERED_LIST, item_component,
};
use codedoc::document::{Component, List, ListItem, Node};

use cleanup::{strip_number_prefix, take_header_colon};
use numbering::{display_numbers, line_at, recover_ordinal};

/// Rewrite every list reachable from `nodes`. `source` is the text the
/// document was parsed from; item numbers are read back from it.
pub fn restructure_lists(nodes: Vec<Node>, source: &str) -> Vec<Node> {
    rewrite_nodes(nodes, source, 0)
}

/// `depth` counts the lists enclosing `nodes`.
fn rewrite_nodes(nodes: Vec<Node>, source: &str, depth: i64) -> Vec<Node> {
    nodes
        .into_iter()
        .map(|node| match node {
            Node::List(list) => Node::Component(rewrite_list(list, source, depth + 1)),
            Node::Blockquote(children) => Node::Blockquote(rewrite_nodes(children, source, depth)),
            Node::Component(mut component) => {
                component.children = rewrite_nodes(component.children, source, depth);
                Node::Component(component)
            }
            other => other,
        })
        .collect()
}

fn rewrite_list(list: List, source: &str, level: i64) -> Component {
    let numbers = if list.ordered {
        let ordinals: Vec<_> = list
            .items
            .iter()
            .map(|item| recover_ordinal(line_at(source, item.span.start)))
            .collect();
        display_numbers(&ordinals).into_iter().map(Some).collect()
    } else {
        vec![None; list.items.len()]
    };

    let items = list
        .items
        .into_iter()
        .zip(numbers)
        .map(|(item, number)| Node::Component(rewrite_item(item, number, source, level)))
        .collect();

    let name = if list.ordered {
        ORDERED_LIST
    } else {
        UNORDERED_LIST
    };
    Component::new(name)
        .with_attribute(ATTR_LEVEL, level)
        .with_children(items)
}

fn rewrite_item(item: ListItem, number: Option<String>, source: &str, level: i64) -> Component {
    let mut children = rewrite_nodes(item.children, source, level);

    let mut header = false;
    if let Some(Node::Paragraph(inlines)) = children.first_mut() {
        strip_number_prefix(inlines);
        header = take_header_colon(inlines);
    }

    let mut component =
        Component::new(item_component(item.variant.as_deref())).with_attribute(ATTR_LEVEL, level);
    if let Some(number) = number {
        component = component.with_attribute(ATTR_NUMBER, number);
    }
    if header {
        component = component.with_attribute(ATTR_HEADER_ITEM, true);
    }
    component.with_children(children)
}
