use codedoc::document::{Component, Heading, Inline, Node};
use codedoc::Parser;
use transform::wrap_sections;

fn wrap(source: &str) -> Vec<Node> {
    let (doc, warnings) = Parser::new(source.to_string(), 0).parse();
    assert!(warnings.is_empty());
    wrap_sections(doc.nodes, &[2, 3], "Table of Contents")
}

fn component(node: &Node) -> &Component {
    node.as_component()
        .unwrap_or_else(|| panic!("expected component, got {:?}", node))
}

/// (header heading, content children) of a wrapped section.
fn parts(section: &Component) -> (&Heading, &[Node]) {
    let header = component(&section.children[0]);
    let content = component(&section.children[1]);
    let Node::Heading(heading) = &header.children[0] else {
        panic!("header without heading");
    };
    (heading, &content.children)
}

fn depth(c: &Component) -> Option<i64> {
    c.attribute("data-depth").and_then(|v| v.as_int())
}

#[test]
fn ranks_two_three_two_nest_once() {
    let nodes = wrap("## A\n\ntext a\n\n### B\n\ntext b\n\n## C\n\ntext c\n");
    assert_eq!(nodes.len(), 2);

    let first = component(&nodes[0]);
    assert!(first.is("Section"));
    assert_eq!(depth(first), Some(2));
    let (heading, content) = parts(first);
    assert_eq!(heading.id.as_deref(), Some("a"));
    assert_eq!(content.len(), 2);
    let nested = component(&content[1]);
    assert_eq!(depth(nested), Some(3));
    assert_eq!(parts(nested).0.id.as_deref(), Some("b"));

    let second = component(&nodes[1]);
    assert_eq!(depth(second), Some(2));
    assert_eq!(parts(second).1.len(), 1);
}

#[test]
fn collapsible_directives() {
    let nodes = wrap("## [!collapsible:expand] Complexity\n\nO(n)\n\n## [!collapsible] Notes\n\nx\n");
    let open = component(&nodes[0]);
    assert!(open.is("Collapsible"));
    assert_eq!(
        open.attribute("defaultExpanded").and_then(|v| v.as_bool()),
        Some(true)
    );
    assert!(component(&open.children[0]).is("CollapsibleHeader"));
    assert!(component(&open.children[1]).is("CollapsibleContent"));
    let (heading, _) = parts(open);
    assert_eq!(heading.content, vec![Inline::Text("Complexity".into())]);
    assert_eq!(heading.id.as_deref(), Some("complexity"));

    let closed = component(&nodes[1]);
    assert!(closed.is("Collapsible"));
    assert!(closed.attribute("defaultExpanded").is_none());
}

#[test]
fn named_directives() {
    let nodes = wrap("## [!(Hint)] Try sorting\n\nx\n\n## [!collapsible(Solution)] Code\n\ny\n");
    let hint = component(&nodes[0]);
    assert!(hint.is("Hint"));
    assert!(component(&hint.children[0]).is("HintHeader"));
    assert!(component(&hint.children[1]).is("HintContent"));
    assert!(hint.attribute("collapsible").is_none());
    assert_eq!(parts(hint).0.id.as_deref(), Some("try-sorting"));

    let solution = component(&nodes[1]);
    assert!(solution.is("Solution"));
    assert_eq!(
        solution.attribute("collapsible").and_then(|v| v.as_bool()),
        Some(true)
    );
    assert!(solution.attribute("defaultExpanded").is_none());
}

#[test]
fn wrappers_carry_only_documented_attributes() {
    fn names(c: &Component) -> Vec<&str> {
        c.attributes.iter().map(|a| a.name.as_str()).collect()
    }
    let nodes = wrap(
        "## Plain\n\nx\n\n## [!collapsible:expand(Solution)] Code\n\ny\n\n## [!collapsible] Notes\n\nz\n",
    );
    let plain = component(&nodes[0]);
    assert_eq!(names(plain), vec!["data-depth"]);
    let solution = component(&nodes[1]);
    assert_eq!(
        names(solution),
        vec!["data-depth", "collapsible", "defaultExpanded"]
    );
    assert_eq!(names(component(&nodes[2])), vec!["data-depth"]);
    for section in [plain, solution] {
        assert!(component(&section.children[0]).attributes.is_empty());
        assert!(component(&section.children[1]).attributes.is_empty());
    }
}

#[test]
fn directive_only_headings_get_fallback_slugs() {
    let nodes = wrap("## [!collapsible]\n\nx\n\n## [!collapsible]\n\ny\n");
    assert_eq!(parts(component(&nodes[0])).0.id.as_deref(), Some("section"));
    assert_eq!(parts(component(&nodes[1])).0.id.as_deref(), Some("section-1"));
}

#[test]
fn malformed_directive_is_plain_text() {
    let nodes = wrap("## [!collapse] Title\n");
    let section = component(&nodes[0]);
    assert!(section.is("Section"));
    assert_eq!(
        parts(section).0.content,
        vec![Inline::Text("[!collapse] Title".into())]
    );
}

#[test]
fn toc_heading_is_skipped_but_bounds_sections() {
    let nodes = wrap("## Intro\n\nhello\n\n## table of contents\n\n- a\n\n## A\n\nbody\n");
    assert_eq!(nodes.len(), 4);
    assert_eq!(parts(component(&nodes[0])).1.len(), 1);
    assert!(matches!(&nodes[1], Node::Heading(h) if h.id.is_none()));
    assert!(matches!(nodes[2], Node::List(_)));
    assert!(component(&nodes[3]).is("Section"));
}

#[test]
fn toc_component_stops_capture() {
    let (doc, _) = Parser::new("## A\n\none\n".to_string(), 0).parse();
    let mut nodes = doc.nodes;
    nodes.push(Node::Component(Component::new("TableOfContents")));
    nodes.push(Node::Paragraph(vec![Inline::Text("after".into())]));
    let out = wrap_sections(nodes, &[2, 3], "Table of Contents");
    assert_eq!(out.len(), 3);
    assert_eq!(parts(component(&out[0])).1.len(), 1);
}

#[test]
fn other_ranks_bound_or_join_sections() {
    let nodes = wrap("# Title\n\n## A\n\n#### Deep\n\nx\n\n# Next\n\ny\n");
    assert_eq!(nodes.len(), 4);
    let a = component(&nodes[1]);
    let (_, content) = parts(a);
    assert!(matches!(&content[0], Node::Heading(h) if h.level == 4));
    assert_eq!(content.len(), 2);
    assert!(matches!(&nodes[2], Node::Heading(h) if h.level == 1));
}

#[test]
fn slugs_are_unique_and_respect_authored_ids() {
    let nodes = wrap("## Approach\n\n## Approach\n\n## Custom {#approach-2}\n\n## Approach\n");
    let ids: Vec<&str> = nodes
        .iter()
        .map(|n| parts(component(n)).0.id.as_deref().unwrap())
        .collect();
    assert_eq!(ids, vec!["approach", "approach-1", "approach-2", "approach-3"]);
}

#[test]
fn deeper_wrapped_sections_are_captured_shallower_are_not() {
    let nodes = wrap("### Lead\n\n## Main\n\n### Sub\n\ntext\n");
    assert_eq!(nodes.len(), 2);
    assert_eq!(parts(component(&nodes[0])).1.len(), 0);
    let main = component(&nodes[1]);
    assert_eq!(depth(component(&parts(main).1[0])), Some(3));
}
