use codedoc::document::{Component, Inline, Node};
use codedoc::{Document, Parser};
use symbols::{SolutionsIndex, SymbolIndex};
use transform::{Options, Pipeline, restructure_lists};

fn transform(source: &str) -> Document {
    let (doc, warnings) = Parser::new(source.to_string(), 0).parse();
    assert!(warnings.is_empty(), "{:?}", warnings);
    let symbols = SymbolIndex::new();
    let solutions = SolutionsIndex::new();
    let pipeline = Pipeline::new(&symbols, &solutions, Options::default()).unwrap();
    let out = pipeline.run(doc, source);
    assert!(out.warnings.is_empty());
    out.document
}

fn component(node: &Node) -> &Component {
    node.as_component()
        .unwrap_or_else(|| panic!("expected component, got {:?}", node))
}

fn numbers(list: &Component) -> Vec<&str> {
    list.children
        .iter()
        .map(|item| {
            component(item)
                .attribute("number")
                .and_then(|v| v.as_str())
                .unwrap_or("")
        })
        .collect()
}

fn first_paragraph(item: &Component) -> &[Inline] {
    match &item.children[0] {
        Node::Paragraph(inlines) => inlines,
        other => panic!("expected paragraph, got {:?}", other),
    }
}

#[test]
fn restart_numbering() {
    let doc = transform("1. one\n2. two\n3. three\n1. again\n2. more\n");
    let list = component(&doc.nodes[0]);
    assert!(list.is("OrderedList"));
    assert_eq!(list.attribute("level").and_then(|v| v.as_int()), Some(1));
    assert_eq!(numbers(list), vec!["1", "2", "3", "1", "2"]);
}

#[test]
fn decimal_sub_numbers_pass_through() {
    let doc = transform("1. Setup\n2. Build\n2. 2.1. Detail\n");
    let list = component(&doc.nodes[0]);
    assert_eq!(numbers(list), vec!["1", "2", "2.1"]);
    let third = component(&list.children[2]);
    assert_eq!(first_paragraph(third), &[Inline::Text("Detail".into())]);
}

#[test]
fn decimal_source_lines_become_items() {
    let doc = transform("1. Setup\n2. Build\n2.1. Detail\n3. Ship\n");
    let list = component(&doc.nodes[0]);
    assert_eq!(numbers(list), vec!["1", "2", "2.1", "3"]);
    assert_eq!(
        first_paragraph(component(&list.children[1])),
        &[Inline::Text("Build".into())]
    );
    assert_eq!(
        first_paragraph(component(&list.children[2])),
        &[Inline::Text("Detail".into())]
    );
}

#[test]
fn colon_inside_item_text_is_not_a_header() {
    let doc = transform("1. Complexity: `O(n)` overall\n2. Steps:\n");
    let list = component(&doc.nodes[0]);
    let plain = component(&list.children[0]);
    assert!(plain.attribute("headerItem").is_none());
    assert_eq!(
        first_paragraph(plain),
        &[
            Inline::Text("Complexity: ".into()),
            Inline::CodeSpan("O(n)".into()),
            Inline::Text(" overall".into()),
        ]
    );

    let header = component(&list.children[1]);
    assert_eq!(header.attribute("headerItem").and_then(|v| v.as_bool()), Some(true));
    assert_eq!(first_paragraph(header), &[Inline::Text("Steps".into())]);
}

#[test]
fn start_number_is_kept() {
    let doc = transform("4. four\n5. five\n");
    assert_eq!(numbers(component(&doc.nodes[0])), vec!["4", "5"]);
}

#[test]
fn level_increases_only_for_nested_lists() {
    let doc = transform("- a\n\n  > quoted\n\n  1. x\n  2. y:\n- b\n");
    let outer = component(&doc.nodes[0]);
    assert!(outer.is("UnorderedList"));
    let first = component(&outer.children[0]);
    assert!(first.is("ListItem"));
    assert_eq!(first.attribute("level").and_then(|v| v.as_int()), Some(1));
    assert!(first.attribute("number").is_none());

    let inner = first
        .children
        .iter()
        .filter_map(Node::as_component)
        .find(|c| c.is("OrderedList"))
        .expect("nested ordered list");
    assert_eq!(inner.attribute("level").and_then(|v| v.as_int()), Some(2));

    let header = component(&inner.children[1]);
    assert_eq!(header.attribute("headerItem").and_then(|v| v.as_bool()), Some(true));
    assert_eq!(first_paragraph(header), &[Inline::Text("y".into())]);
    assert!(component(&inner.children[0]).attribute("headerItem").is_none());
}

#[test]
fn variant_tags_select_item_components() {
    let doc = transform("- Fast {.feature}\n- Simple {.advantage}\n- Slow {.disadvantage}\n- Plain\n");
    let names: Vec<&str> = component(&doc.nodes[0])
        .children
        .iter()
        .map(|n| component(n).name.as_str())
        .collect();
    assert_eq!(
        names,
        vec!["FeatureListItem", "AdvantageListItem", "DisadvantageListItem", "ListItem"]
    );
}

#[test]
fn lists_inside_components_are_restructured() {
    let source = "- inner\n";
    let (doc, _) = Parser::new(source.to_string(), 0).parse();
    let wrapped = vec![Node::Component(Component::new("Aside").with_children(doc.nodes))];
    let out = restructure_lists(wrapped, source);
    let aside = component(&out[0]);
    assert!(component(&aside.children[0]).is("UnorderedList"));
}

#[test]
fn rendered_output_shows_attributes() {
    let doc = transform("1. one\n");
    let text = doc.to_string();
    assert!(text.starts_with("<OrderedList level=1>\n<ListItem level=1 number=\"1\">\n"));
    assert!(text.contains("one\n</ListItem>\n</OrderedList>"));
}
