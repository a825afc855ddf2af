//! Range extraction: find the text of a `def`/`class` block by indentation.
//!
//! This is a line heuristic, not a grammar. A definition starts at its
//! keyword line (plus any decorators directly above it) and runs until the
//! next non-blank line at the same or a shallower indentation that itself
//! starts a definition or decorator, or until the end of the searched range.
//! Module-level statements between definitions therefore stay attached to
//! the preceding definition.
//!
//! Qualified lookups (`Class.method`) search for the method only inside the
//! class body, taking the first match at any depth. A nested class that
//! defines a method of the same name before the outer class does will shadow
//! the outer method; this is a known gap.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::docstring;
use crate::span::SourceSpan;

static DEFINITION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(async\s+def|def|class)\s+([A-Za-z_][A-Za-z0-9_]*)").unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Keyword {
    Def,
    Class,
}

/// Keyword and name of a definition line (already left-trimmed).
pub(crate) fn definition(trimmed: &str) -> Option<(Keyword, &str)> {
    let caps = DEFINITION.captures(trimmed)?;
    let keyword = if &caps[1] == "class" {
        Keyword::Class
    } else {
        Keyword::Def
    };
    Some((keyword, caps.get(2)?.as_str()))
}

fn starts_block(trimmed: &str) -> bool {
    trimmed.starts_with('@') || definition(trimmed).is_some()
}

pub(crate) fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start_matches([' ', '\t']).len()
}

pub(crate) fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Lines of a buffer, terminators included, with their byte offsets.
pub(crate) struct LineTable<'a> {
    source: &'a str,
    lines: Vec<&'a str>,
    offsets: Vec<usize>,
}

impl<'a> LineTable<'a> {
    pub(crate) fn new(source: &'a str) -> Self {
        let mut lines = Vec::new();
        let mut offsets = Vec::new();
        let mut at = 0;
        for line in source.split_inclusive('\n') {
            offsets.push(at);
            at += line.len();
            lines.push(line);
        }
        LineTable {
            source,
            lines,
            offsets,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.lines.len()
    }

    pub(crate) fn line(&self, n: usize) -> &'a str {
        self.lines[n]
    }

    fn offset(&self, n: usize) -> usize {
        self.offsets.get(n).copied().unwrap_or(self.source.len())
    }

    /// Byte span covering lines `range.start..range.end`.
    pub(crate) fn span(&self, range: &Range<usize>) -> SourceSpan {
        let start = self.offset(range.start);
        SourceSpan::covering(start, self.offset(range.end))
    }

    pub(crate) fn text(&self, range: &Range<usize>) -> &'a str {
        let span = self.span(range);
        &self.source[span.start()..span.end()]
    }
}

/// Line coordinates of one definition block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Block {
    /// First line, decorators included.
    pub first: usize,
    /// The `def`/`class` line.
    pub keyword: usize,
    /// One past the last line.
    pub end: usize,
}

impl Block {
    pub(crate) fn lines(&self) -> Range<usize> {
        self.first..self.end
    }

    pub(crate) fn body(&self) -> Range<usize> {
        self.keyword + 1..self.end
    }
}

/// The block whose keyword line is `keyword`, searched within `within`.
pub(crate) fn block_at(lines: &LineTable<'_>, keyword: usize, within: &Range<usize>) -> Block {
    let indent = indent_of(lines.line(keyword));
    let end = (keyword + 1..within.end)
        .find(|&n| {
            let line = lines.line(n);
            !is_blank(line) && indent_of(line) <= indent && starts_block(line.trim_start())
        })
        .unwrap_or(within.end);

    let mut first = keyword;
    while first > within.start {
        let prev = lines.line(first - 1);
        if prev.trim_start().starts_with('@') && indent_of(prev) == indent {
            first -= 1;
        } else {
            break;
        }
    }

    Block {
        first,
        keyword,
        end,
    }
}

/// The first definition of `name` within `within`.
pub(crate) fn find_block(
    lines: &LineTable<'_>,
    within: &Range<usize>,
    name: &str,
    classes_only: bool,
) -> Option<Block> {
    let keyword = within.clone().find(|&n| {
        matches!(
            definition(lines.line(n).trim_start()),
            Some((kw, found)) if found == name && (!classes_only || kw == Keyword::Class)
        )
    })?;
    Some(block_at(lines, keyword, within))
}

/// Byte span of the definition of `qualified_name` (`name` or `Class.method`).
pub fn locate_symbol(source: &str, qualified_name: &str) -> Option<SourceSpan> {
    let lines = LineTable::new(source);
    let all = 0..lines.len();
    let block = match qualified_name.split_once('.') {
        Some((class, method)) => {
            let class_block = find_block(&lines, &all, class, true)?;
            find_block(&lines, &class_block.body(), method, false)?
        }
        None => find_block(&lines, &all, qualified_name, false)?,
    };
    Some(lines.span(&block.lines()))
}

/// Text of the definition of `qualified_name`, or an empty string when the
/// symbol is not defined in `source`.
pub fn extract_symbol(source: &str, qualified_name: &str, strip_docstring: bool) -> String {
    let Some(text) = locate_symbol(source, qualified_name).and_then(|span| span.slice(source))
    else {
        return String::new();
    };
    if strip_docstring {
        docstring::strip_docstring(text)
    } else {
        text.to_string()
    }
}

/// Remove the indentation shared by every non-blank line.
pub fn dedent(code: &str) -> String {
    let common = code
        .lines()
        .filter(|l| !is_blank(l))
        .map(indent_of)
        .min()
        .unwrap_or(0);
    if common == 0 {
        return code.to_string();
    }
    code.split_inclusive('\n')
        .map(|line| {
            if is_blank(line) {
                line.trim_start_matches([' ', '\t'])
            } else {
                &line[common..]
            }
        })
        .collect()
}
