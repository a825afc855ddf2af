use codedoc::document::{Inline, Node};
use codedoc::Parser;

fn parse(source: &str) -> codedoc::Document {
    let (doc, warnings) = Parser::new(source.to_string(), 0).parse();
    assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
    doc
}

#[test]
fn headings_record_level_id_and_span() {
    let src = "intro\n\n## Two Sum {#two-sum}\n\nbody\n";
    let doc = parse(src);
    let Node::Heading(heading) = &doc.nodes[1] else {
        panic!("expected heading, got {:?}", doc.nodes[1]);
    };
    assert_eq!(heading.level, 2);
    assert_eq!(heading.id.as_deref(), Some("two-sum"));
    assert_eq!(heading.text(), "Two Sum");
    assert!(src[heading.span.clone()].starts_with("## Two Sum"));
}

#[test]
fn tight_items_wrap_text_in_paragraphs() {
    let doc = parse("- one\n- two\n  - nested\n");
    let Node::List(list) = &doc.nodes[0] else {
        panic!("expected list");
    };
    assert!(!list.ordered);
    assert_eq!(list.items.len(), 2);
    assert_eq!(
        list.items[0].children,
        vec![Node::Paragraph(vec![Inline::Text("one".into())])]
    );
    assert!(matches!(list.items[1].children[1], Node::List(_)));
}

#[test]
fn item_spans_start_on_marker_line() {
    let src = "1. first\n2. second\n1. again\n";
    let doc = parse(src);
    let Node::List(list) = &doc.nodes[0] else {
        panic!("expected list");
    };
    assert!(list.ordered);
    assert_eq!(list.start, Some(1));
    assert_eq!(list.items.len(), 3);
    let third = list.items[2].span.start;
    let line_start = src[..third].rfind('\n').map(|p| p + 1).unwrap_or(0);
    assert!(src[line_start..].starts_with("1. again"));
}

#[test]
fn decimal_lines_split_into_their_own_items() {
    let src = "1. Setup\n2. Build\n2.1. Detail\n2.2. More\n3. Ship\n";
    let doc = parse(src);
    let Node::List(list) = &doc.nodes[0] else {
        panic!("expected list");
    };
    assert_eq!(list.items.len(), 5);
    assert_eq!(
        list.items[1].children,
        vec![Node::Paragraph(vec![Inline::Text("Build".into())])]
    );
    assert_eq!(
        list.items[2].children,
        vec![Node::Paragraph(vec![Inline::Text("2.1. Detail".into())])]
    );
    assert!(src[list.items[1].span.clone()].starts_with("2. Build"));
    assert!(src[list.items[2].span.clone()].starts_with("2.1. Detail"));
    assert!(src[list.items[3].span.clone()].starts_with("2.2. More"));
}

#[test]
fn decimal_lines_stay_in_unordered_items() {
    let doc = parse("- Build\n2.1. Detail\n");
    let Node::List(list) = &doc.nodes[0] else {
        panic!("expected list");
    };
    assert_eq!(list.items.len(), 1);
}

#[test]
fn variant_marker_becomes_tag() {
    let doc = parse("- O(1) lookups {.feature}\n- plain\n");
    let Node::List(list) = &doc.nodes[0] else {
        panic!("expected list");
    };
    assert_eq!(list.items[0].variant.as_deref(), Some("feature"));
    assert_eq!(
        list.items[0].children,
        vec![Node::Paragraph(vec![Inline::Text("O(1) lookups".into())])]
    );
    assert_eq!(list.items[1].variant, None);
}

#[test]
fn unknown_variant_is_a_warning() {
    let (doc, warnings) = Parser::new("- item {.sparkly}\n".to_string(), 3).parse();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message.contains("sparkly"));
    assert_eq!(warnings[0].file_id, 3);
    let Node::List(list) = &doc.nodes[0] else {
        panic!("expected list");
    };
    assert_eq!(list.items[0].variant, None);
}

#[test]
fn code_fence_info_is_split() {
    let doc = parse("```python file=solutions/lru/py/solution.py:LRUCache.get title=\"LRU\"\nplaceholder\n```\n");
    let Node::CodeBlock(block) = &doc.nodes[0] else {
        panic!("expected code block");
    };
    assert_eq!(block.language.as_deref(), Some("python"));
    assert_eq!(
        block.meta_value("file"),
        Some("solutions/lru/py/solution.py:LRUCache.get")
    );
    assert_eq!(block.meta_value("title"), Some("LRU"));
    assert_eq!(block.content, "placeholder\n");
}

#[test]
fn bracket_text_is_merged_into_one_run() {
    let doc = parse("## [!collapsible] Details\n");
    let Node::Heading(heading) = &doc.nodes[0] else {
        panic!("expected heading");
    };
    assert_eq!(
        heading.content,
        vec![Inline::Text("[!collapsible] Details".into())]
    );
}

#[test]
fn display_reparses_to_same_structure() {
    let src = "## Title\n\n1. one\n2. two\n   - sub\n\n```rust\nfn main() {}\n```\n";
    let doc = parse(src);
    let again = parse(&doc.to_string());
    assert_eq!(doc.nodes.len(), again.nodes.len());
    assert_eq!(doc.to_string(), again.to_string());
}

#[test]
fn serializes_with_type_tags() {
    let doc = parse("# Hi\n");
    let json = serde_json::to_value(&doc).unwrap();
    assert_eq!(json["nodes"][0]["type"], "heading");
    assert_eq!(json["nodes"][0]["value"]["level"], 1);
}
