pub mod component;
pub mod names;

use std::fmt;
use std::ops::Range;

use serde::Serialize;

pub use component::{AttrValue, Attribute, Component};

/// A Document is a sequence of block nodes produced by the markdown front-end
/// and rewritten in place by the transformation passes.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Document {
    pub nodes: Vec<Node>,
}

impl Document {
    pub fn empty() -> Self {
        Document { nodes: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// A single block-level node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Node {
    Paragraph(Vec<Inline>),
    Heading(Heading),
    CodeBlock(CodeBlock),
    List(List),
    Blockquote(Vec<Node>),
    Table {
        alignments: Vec<ColumnAlignment>,
        headers: Vec<Vec<Inline>>,
        rows: Vec<Vec<Vec<Inline>>>,
    },
    Html(String),
    HorizontalRule,
    /// A node synthesized by a transformation pass.
    Component(Component),
}

impl Node {
    pub fn as_component(&self) -> Option<&Component> {
        match self {
            Node::Component(c) => Some(c),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heading {
    /// Heading rank, 1 (`#`) to 6 (`######`).
    pub level: u8,
    /// Anchor id, either authored (`{#id}`) or assigned by the section pass.
    pub id: Option<String>,
    pub content: Vec<Inline>,
    pub span: Range<usize>,
}

impl Heading {
    pub fn text(&self) -> String {
        plain_text(&self.content)
    }
}

/// A fenced or indented code block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeBlock {
    /// First word of the info string.
    pub language: Option<String>,
    /// Remaining info string entries, in authored order.
    pub meta: Vec<MetaEntry>,
    pub content: String,
    pub span: Range<usize>,
}

impl CodeBlock {
    pub fn meta_value(&self, key: &str) -> Option<&str> {
        self.meta
            .iter()
            .find(|m| m.key == key)
            .and_then(|m| m.value.as_deref())
    }

    pub fn has_meta(&self, key: &str) -> bool {
        self.meta.iter().any(|m| m.key == key)
    }

    /// Replace the value of `key`, appending the entry if absent.
    pub fn set_meta(&mut self, key: &str, value: impl Into<String>) {
        let value = Some(value.into());
        match self.meta.iter_mut().find(|m| m.key == key) {
            Some(entry) => entry.value = value,
            None => self.meta.push(MetaEntry {
                key: key.to_string(),
                value,
            }),
        }
    }

    pub fn remove_meta(&mut self, key: &str) {
        self.meta.retain(|m| m.key != key);
    }

    /// Reassemble the fence info string.
    pub fn info_string(&self) -> String {
        let mut parts = Vec::with_capacity(self.meta.len() + 1);
        if let Some(lang) = &self.language {
            parts.push(lang.clone());
        }
        parts.extend(self.meta.iter().map(|m| m.to_string()));
        parts.join(" ")
    }
}

/// One `key=value` or bare `flag` entry of a fence info string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetaEntry {
    pub key: String,
    pub value: Option<String>,
}

impl fmt::Display for MetaEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(v) if v.contains(char::is_whitespace) || v.is_empty() => {
                write!(f, "{}=\"{}\"", self.key, v)
            }
            Some(v) => write!(f, "{}={}", self.key, v),
            None => write!(f, "{}", self.key),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct List {
    pub ordered: bool,
    /// Start number reported by the parser (ordered lists only).
    pub start: Option<u64>,
    pub items: Vec<ListItem>,
    pub span: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItem {
    pub children: Vec<Node>,
    /// Structural tag selecting the rendered item component.
    pub variant: Option<String>,
    /// Byte span in source; `span.start` lies on the item's marker line.
    pub span: Range<usize>,
}

/// Inline elements that appear within a line of text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Inline {
    Text(String),
    Strong(Vec<Inline>),
    Emphasis(Vec<Inline>),
    Strikethrough(Vec<Inline>),
    CodeSpan(String),
    Link {
        dest: String,
        title: String,
        content: Vec<Inline>,
    },
    Image {
        dest: String,
        title: String,
        alt: Vec<Inline>,
    },
    SoftBreak,
    HardBreak,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ColumnAlignment {
    None,
    Left,
    Center,
    Right,
}

/// Concatenate the visible text of a run of inlines.
pub fn plain_text(inlines: &[Inline]) -> String {
    let mut out = String::new();
    push_plain_text(inlines, &mut out);
    out
}

fn push_plain_text(inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        match inline {
            Inline::Text(s) | Inline::CodeSpan(s) => out.push_str(s),
            Inline::Strong(children)
            | Inline::Emphasis(children)
            | Inline::Strikethrough(children) => push_plain_text(children, out),
            Inline::Link { content, .. } => push_plain_text(content, out),
            Inline::Image { alt, .. } => push_plain_text(alt, out),
            Inline::SoftBreak | Inline::HardBreak => out.push(' '),
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", node)?;
        }
        Ok(())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Paragraph(inlines) => {
                write_inlines(f, inlines)?;
                writeln!(f)
            }
            Node::Heading(heading) => {
                for _ in 0..heading.level {
                    write!(f, "#")?;
                }
                write!(f, " ")?;
                write_inlines(f, &heading.content)?;
                if let Some(id) = &heading.id {
                    write!(f, " {{#{}}}", id)?;
                }
                writeln!(f)
            }
            Node::CodeBlock(block) => {
                writeln!(f, "```{}", block.info_string())?;
                write!(f, "{}", block.content)?;
                if !block.content.is_empty() && !block.content.ends_with('\n') {
                    writeln!(f)?;
                }
                writeln!(f, "```")
            }
            Node::List(list) => {
                let first = list.start.unwrap_or(1);
                for (i, item) in list.items.iter().enumerate() {
                    let marker = if list.ordered {
                        format!("{}. ", first + i as u64)
                    } else {
                        "- ".to_string()
                    };
                    write_item(f, &marker, &item.children)?;
                }
                Ok(())
            }
            Node::Blockquote(children) => {
                let text: String = children.iter().map(|n| n.to_string()).collect();
                for line in text.lines() {
                    writeln!(f, "> {}", line)?;
                }
                Ok(())
            }
            Node::Table { headers, rows, .. } => {
                write!(f, "|")?;
                for header in headers {
                    write!(f, " ")?;
                    write_inlines(f, header)?;
                    write!(f, " |")?;
                }
                writeln!(f)?;
                write!(f, "|")?;
                for _ in headers {
                    write!(f, "---|")?;
                }
                writeln!(f)?;
                for row in rows {
                    write!(f, "|")?;
                    for cell in row {
                        write!(f, " ")?;
                        write_inlines(f, cell)?;
                        write!(f, " |")?;
                    }
                    writeln!(f)?;
                }
                Ok(())
            }
            Node::Html(html) => {
                write!(f, "{}", html)?;
                if !html.ends_with('\n') {
                    writeln!(f)?;
                }
                Ok(())
            }
            Node::HorizontalRule => writeln!(f, "---"),
            Node::Component(component) => write!(f, "{}", component),
        }
    }
}

/// Write a list item, indenting continuation lines under the marker.
fn write_item(f: &mut fmt::Formatter<'_>, marker: &str, children: &[Node]) -> fmt::Result {
    let body: String = children.iter().map(|n| n.to_string()).collect();
    if body.is_empty() {
        return writeln!(f, "{}", marker.trim_end());
    }
    let pad = " ".repeat(marker.len());
    for (i, line) in body.lines().enumerate() {
        if i == 0 {
            writeln!(f, "{}{}", marker, line)?;
        } else if line.is_empty() {
            writeln!(f)?;
        } else {
            writeln!(f, "{}{}", pad, line)?;
        }
    }
    Ok(())
}

fn write_inlines(f: &mut fmt::Formatter<'_>, inlines: &[Inline]) -> fmt::Result {
    for inline in inlines {
        write!(f, "{}", inline)?;
    }
    Ok(())
}

impl fmt::Display for Inline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Inline::Text(s) => write!(f, "{}", s),
            Inline::Strong(children) => {
                write!(f, "**")?;
                write_inlines(f, children)?;
                write!(f, "**")
            }
            Inline::Emphasis(children) => {
                write!(f, "*")?;
                write_inlines(f, children)?;
                write!(f, "*")
            }
            Inline::Strikethrough(children) => {
                write!(f, "~~")?;
                write_inlines(f, children)?;
                write!(f, "~~")
            }
            Inline::CodeSpan(code) => write!(f, "`{}`", code),
            Inline::Link { dest, content, .. } => {
                write!(f, "[")?;
                write_inlines(f, content)?;
                write!(f, "]({})", dest)
            }
            Inline::Image { dest, alt, .. } => {
                write!(f, "![")?;
                write_inlines(f, alt)?;
                write!(f, "]({})", dest)
            }
            Inline::SoftBreak | Inline::HardBreak => writeln!(f),
        }
    }
}
