use std::ops::Range;

use pulldown_cmark::{
    CodeBlockKind, Event, HeadingLevel, Options, Parser as CmarkParser, Tag, TagEnd,
};

use crate::document::names::ITEM_VARIANTS;
use crate::document::{
    CodeBlock, ColumnAlignment, Document, Heading, Inline, List, ListItem, Node,
};
use crate::parser::error::ParseError;
use crate::parser::fence_info::parse_info_string;

type Events<'a> = [(Event<'a>, Range<usize>)];

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse Markdown source text into a Document plus front-end warnings.
pub fn parse_document(source: &str, file_id: usize) -> (Document, Vec<ParseError>) {
    let options = Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TABLES
        | Options::ENABLE_HEADING_ATTRIBUTES;
    let parser = CmarkParser::new_ext(source, options);
    let events: Vec<(Event<'_>, Range<usize>)> = parser.into_offset_iter().collect();

    let mut state = ParseState::new(source, file_id);
    let mut i = 0;
    let nodes = state.collect_blocks(&events, &mut i, &|_| false);
    (Document { nodes }, state.warnings)
}

// ---------------------------------------------------------------------------
// Parse state
// ---------------------------------------------------------------------------

struct ParseState<'s> {
    source: &'s str,
    file_id: usize,
    warnings: Vec<ParseError>,
}

impl<'s> ParseState<'s> {
    fn new(source: &'s str, file_id: usize) -> Self {
        ParseState {
            source,
            file_id,
            warnings: Vec::new(),
        }
    }

    /// Collect block nodes until a matching End tag (or the end of input).
    /// Inline runs found directly in a container (tight list items) become
    /// paragraphs.
    fn collect_blocks(
        &mut self,
        events: &Events<'_>,
        i: &mut usize,
        is_end: &dyn Fn(&TagEnd) -> bool,
    ) -> Vec<Node> {
        let mut nodes = Vec::new();

        while *i < events.len() {
            let (ref ev, ref range) = events[*i];

            match ev {
                Event::End(tag_end) if is_end(tag_end) => {
                    *i += 1;
                    break;
                }

                Event::Start(Tag::Heading { level, id, .. }) => {
                    let span = range.clone();
                    let level = heading_level_to_u8(level);
                    let id = id.as_ref().map(|s| s.to_string());
                    *i += 1;
                    let content =
                        collect_inlines(events, i, &|e| matches!(e, TagEnd::Heading(_)));
                    nodes.push(Node::Heading(Heading {
                        level,
                        id,
                        content,
                        span,
                    }));
                }

                Event::Start(Tag::Paragraph) => {
                    *i += 1;
                    let inlines = collect_inlines(events, i, &|e| matches!(e, TagEnd::Paragraph));
                    nodes.push(Node::Paragraph(inlines));
                }

                Event::Start(Tag::CodeBlock(kind)) => {
                    let (language, meta) = match kind {
                        CodeBlockKind::Fenced(info) => parse_info_string(info),
                        CodeBlockKind::Indented => (None, Vec::new()),
                    };
                    let span = range.clone();
                    *i += 1;
                    let content =
                        collect_text_until(events, i, |e| matches!(e, TagEnd::CodeBlock));
                    nodes.push(Node::CodeBlock(CodeBlock {
                        language,
                        meta,
                        content,
                        span,
                    }));
                }

                Event::Start(Tag::List(start)) => {
                    let span = range.clone();
                    *i += 1;
                    let list = self.collect_list(events, i, *start, span);
                    nodes.push(Node::List(list));
                }

                Event::Start(Tag::BlockQuote(_)) => {
                    *i += 1;
                    let children =
                        self.collect_blocks(events, i, &|e| matches!(e, TagEnd::BlockQuote(_)));
                    nodes.push(Node::Blockquote(children));
                }

                Event::Start(Tag::Table(alignments)) => {
                    let aligns: Vec<ColumnAlignment> = alignments
                        .iter()
                        .map(|a| match a {
                            pulldown_cmark::Alignment::None => ColumnAlignment::None,
                            pulldown_cmark::Alignment::Left => ColumnAlignment::Left,
                            pulldown_cmark::Alignment::Center => ColumnAlignment::Center,
                            pulldown_cmark::Alignment::Right => ColumnAlignment::Right,
                        })
                        .collect();
                    *i += 1;
                    let (headers, rows) = collect_table(events, i);
                    nodes.push(Node::Table {
                        alignments: aligns,
                        headers,
                        rows,
                    });
                }

                Event::Start(Tag::HtmlBlock) => {
                    *i += 1;
                    let html = collect_text_until(events, i, |e| matches!(e, TagEnd::HtmlBlock));
                    nodes.push(Node::Html(html));
                }

                Event::Html(html) => {
                    nodes.push(Node::Html(html.to_string()));
                    *i += 1;
                }

                Event::Rule => {
                    nodes.push(Node::HorizontalRule);
                    *i += 1;
                }

                ev if starts_inline(ev) => {
                    let inlines = collect_inlines(events, i, &|_| false);
                    if !inlines.is_empty() {
                        nodes.push(Node::Paragraph(inlines));
                    }
                }

                _ => {
                    *i += 1;
                }
            }
        }

        nodes
    }

    /// Collect list items until End(List). `i` points just past Start(List).
    fn collect_list(
        &mut self,
        events: &Events<'_>,
        i: &mut usize,
        start: Option<u64>,
        span: Range<usize>,
    ) -> List {
        let mut items = Vec::new();

        while *i < events.len() {
            let (ref ev, ref range) = events[*i];
            match ev {
                Event::End(TagEnd::List(_)) => {
                    *i += 1;
                    break;
                }
                Event::Start(Tag::Item) => {
                    let item_span = range.clone();
                    *i += 1;
                    let children = self.collect_blocks(events, i, &|e| matches!(e, TagEnd::Item));
                    let item = ListItem {
                        children,
                        variant: None,
                        span: item_span,
                    };
                    let pieces = if start.is_some() {
                        split_decimal_items(item, self.source)
                    } else {
                        vec![item]
                    };
                    for mut piece in pieces {
                        piece.variant = self.take_variant(&mut piece.children, &piece.span);
                        items.push(piece);
                    }
                }
                _ => {
                    *i += 1;
                }
            }
        }

        List {
            ordered: start.is_some(),
            start,
            items,
            span,
        }
    }

    /// Read and strip a `{.variant}` marker from the item's first line.
    fn take_variant(&mut self, children: &mut [Node], span: &Range<usize>) -> Option<String> {
        let Some(Node::Paragraph(content)) = children.first_mut() else {
            return None;
        };
        let tag = take_trailing_tag(content)?;
        if ITEM_VARIANTS.contains(&tag.as_str()) {
            return Some(tag);
        }
        self.warnings.push(
            ParseError::warning(
                format!("unknown list item variant `{{.{}}}`", tag),
                span.clone(),
                self.file_id,
            )
            .with_note(format!("known variants: {}", ITEM_VARIANTS.join(", "))),
        );
        None
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn heading_level_to_u8(level: &HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn is_inline_tag(tag: &Tag<'_>) -> bool {
    matches!(
        tag,
        Tag::Emphasis | Tag::Strong | Tag::Strikethrough | Tag::Link { .. } | Tag::Image { .. }
    )
}

fn starts_inline(ev: &Event<'_>) -> bool {
    match ev {
        Event::Text(_)
        | Event::Code(_)
        | Event::InlineHtml(_)
        | Event::SoftBreak
        | Event::HardBreak => true,
        Event::Start(tag) => is_inline_tag(tag),
        _ => false,
    }
}

fn push_text(inlines: &mut Vec<Inline>, s: &str) {
    if let Some(Inline::Text(last)) = inlines.last_mut() {
        last.push_str(s);
    } else {
        inlines.push(Inline::Text(s.to_string()));
    }
}

/// Collect inline nodes until a matching End tag, which is consumed. Any
/// other End tag or a block-level Start stops the run without consuming it.
/// Adjacent text events are merged.
fn collect_inlines(
    events: &Events<'_>,
    i: &mut usize,
    is_end: &dyn Fn(&TagEnd) -> bool,
) -> Vec<Inline> {
    let mut inlines = Vec::new();

    while *i < events.len() {
        let (ref ev, _) = events[*i];
        match ev {
            Event::End(tag_end) if is_end(tag_end) => {
                *i += 1;
                break;
            }
            Event::End(_) => break,
            Event::Start(tag) if !is_inline_tag(tag) => break,
            Event::Text(s) | Event::InlineHtml(s) => {
                push_text(&mut inlines, s);
                *i += 1;
            }
            Event::Code(s) => {
                inlines.push(Inline::CodeSpan(s.to_string()));
                *i += 1;
            }
            Event::SoftBreak => {
                inlines.push(Inline::SoftBreak);
                *i += 1;
            }
            Event::HardBreak => {
                inlines.push(Inline::HardBreak);
                *i += 1;
            }
            Event::Start(Tag::Strong) => {
                *i += 1;
                let children = collect_inlines(events, i, &|e| matches!(e, TagEnd::Strong));
                inlines.push(Inline::Strong(children));
            }
            Event::Start(Tag::Emphasis) => {
                *i += 1;
                let children = collect_inlines(events, i, &|e| matches!(e, TagEnd::Emphasis));
                inlines.push(Inline::Emphasis(children));
            }
            Event::Start(Tag::Strikethrough) => {
                *i += 1;
                let children =
                    collect_inlines(events, i, &|e| matches!(e, TagEnd::Strikethrough));
                inlines.push(Inline::Strikethrough(children));
            }
            Event::Start(Tag::Link {
                dest_url, title, ..
            }) => {
                let dest = dest_url.to_string();
                let title = title.to_string();
                *i += 1;
                let content = collect_inlines(events, i, &|e| matches!(e, TagEnd::Link));
                inlines.push(Inline::Link {
                    dest,
                    title,
                    content,
                });
            }
            Event::Start(Tag::Image {
                dest_url, title, ..
            }) => {
                let dest = dest_url.to_string();
                let title = title.to_string();
                *i += 1;
                let alt = collect_inlines(events, i, &|e| matches!(e, TagEnd::Image));
                inlines.push(Inline::Image { dest, title, alt });
            }
            _ => {
                *i += 1;
            }
        }
    }

    inlines
}

/// Collect table headers and rows.
fn collect_table(
    events: &Events<'_>,
    i: &mut usize,
) -> (Vec<Vec<Inline>>, Vec<Vec<Vec<Inline>>>) {
    let mut headers: Vec<Vec<Inline>> = Vec::new();
    let mut rows: Vec<Vec<Vec<Inline>>> = Vec::new();
    let mut in_head = false;
    let mut current_row: Vec<Vec<Inline>> = Vec::new();

    while *i < events.len() {
        let (ref ev, _) = events[*i];
        match ev {
            Event::End(TagEnd::Table) => {
                *i += 1;
                break;
            }
            Event::Start(Tag::TableHead) => {
                in_head = true;
                *i += 1;
            }
            Event::End(TagEnd::TableHead) => {
                in_head = false;
                headers = std::mem::take(&mut current_row);
                *i += 1;
            }
            Event::Start(Tag::TableRow) => {
                current_row = Vec::new();
                *i += 1;
            }
            Event::End(TagEnd::TableRow) => {
                if !in_head {
                    rows.push(std::mem::take(&mut current_row));
                }
                *i += 1;
            }
            Event::Start(Tag::TableCell) => {
                *i += 1;
                let cell = collect_inlines(events, i, &|e| matches!(e, TagEnd::TableCell));
                current_row.push(cell);
            }
            _ => {
                *i += 1;
            }
        }
    }

    (headers, rows)
}

/// Collect raw text (code or HTML) until a matching End tag.
fn collect_text_until(
    events: &Events<'_>,
    i: &mut usize,
    is_end: impl Fn(&TagEnd) -> bool,
) -> String {
    let mut text = String::new();
    while *i < events.len() {
        let (ref ev, _) = events[*i];
        match ev {
            Event::End(tag_end) if is_end(tag_end) => {
                *i += 1;
                break;
            }
            Event::Text(s) | Event::Html(s) => {
                text.push_str(s);
                *i += 1;
            }
            _ => {
                *i += 1;
            }
        }
    }
    text
}

/// `N.N.` sub-numbering (two or more parts) at the start of `text`,
/// followed by whitespace.
fn decimal_marker(text: &str) -> Option<&str> {
    let end = text.find(char::is_whitespace)?;
    let marker = &text[..end];
    let parts: Vec<&str> = marker.strip_suffix('.')?.split('.').collect();
    let numeric = parts
        .iter()
        .all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()));
    (parts.len() > 1 && numeric).then_some(marker)
}

/// Position of the first soft break followed by a `N.N.` line, and that
/// marker.
fn decimal_break(inlines: &[Inline]) -> Option<(usize, String)> {
    inlines.windows(2).enumerate().find_map(|(at, pair)| match pair {
        [Inline::SoftBreak, Inline::Text(text)] => {
            decimal_marker(text).map(|marker| (at, marker.to_string()))
        }
        _ => None,
    })
}

/// Offset of the first line after the first in `span` that starts with
/// `marker`.
fn continuation_line(source: &str, span: &Range<usize>, marker: &str) -> Option<usize> {
    let text = source.get(span.start..span.end.min(source.len()))?;
    let mut offset = span.start;
    for (n, line) in text.split_inclusive('\n').enumerate() {
        if n > 0 && line.trim_start().starts_with(marker) {
            return Some(offset);
        }
        offset += line.len();
    }
    None
}

/// Split `2.1. text` lines out of an ordered item into items of their own.
/// CommonMark reads such a line as continuation text of the item above.
/// Blocks after the first paragraph stay with the last piece.
fn split_decimal_items(mut item: ListItem, source: &str) -> Vec<ListItem> {
    let mut pieces = Vec::new();
    loop {
        let Some(Node::Paragraph(inlines)) = item.children.first_mut() else {
            break;
        };
        let Some((at, marker)) = decimal_break(inlines) else {
            break;
        };
        let Some(start) = continuation_line(source, &item.span, &marker) else {
            break;
        };
        let rest = inlines.split_off(at + 1);
        inlines.truncate(at);

        let mut children = vec![Node::Paragraph(rest)];
        children.extend(item.children.split_off(1));
        let next = ListItem {
            children,
            variant: None,
            span: start..item.span.end,
        };
        item.span.end = start;
        pieces.push(item);
        item = next;
    }
    pieces.push(item);
    pieces
}

/// Strip a trailing `{.name}` marker from the first line of `content`.
fn take_trailing_tag(content: &mut Vec<Inline>) -> Option<String> {
    let line_end = content
        .iter()
        .position(|n| matches!(n, Inline::SoftBreak | Inline::HardBreak))
        .unwrap_or(content.len());
    let idx = line_end.checked_sub(1)?;
    let Inline::Text(text) = &mut content[idx] else {
        return None;
    };

    let trimmed = text.trim_end();
    let inner = trimmed.strip_suffix('}')?;
    let open = inner.rfind("{.")?;
    let name = &inner[open + 2..];
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return None;
    }

    let name = name.to_string();
    let kept = inner[..open].trim_end().len();
    text.truncate(kept);
    if text.is_empty() {
        content.remove(idx);
    }
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_tag_is_stripped() {
        let mut content = vec![Inline::Text("Fast lookups {.feature}".into())];
        assert_eq!(take_trailing_tag(&mut content).as_deref(), Some("feature"));
        assert_eq!(content, vec![Inline::Text("Fast lookups".into())]);
    }

    #[test]
    fn tag_only_on_first_line() {
        let mut content = vec![
            Inline::Text("first".into()),
            Inline::SoftBreak,
            Inline::Text("second {.feature}".into()),
        ];
        assert_eq!(take_trailing_tag(&mut content), None);
        assert_eq!(content.len(), 3);
    }

    #[test]
    fn decimal_markers() {
        assert_eq!(decimal_marker("2.1. Detail"), Some("2.1."));
        assert_eq!(decimal_marker("1.2.3. Deep"), Some("1.2.3."));
        assert_eq!(decimal_marker("2. Whole"), None);
        assert_eq!(decimal_marker("2.1 no dot"), None);
        assert_eq!(decimal_marker("v2.1. text"), None);
    }

    #[test]
    fn braces_without_dot_are_text() {
        let mut content = vec![Inline::Text("set {a, b}".into())];
        assert_eq!(take_trailing_tag(&mut content), None);
    }
}
