//! Occurrence annotation of rendered code against the symbol index.
//!
//! Every indexed symbol is searched under its bare name, so `get` in a code
//! block is decorated as `LRUCache.get` even when the code means some other
//! `get`. Consumers decide which candidates apply; this module only records
//! them.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::extract::locate_symbol;
use crate::index::SymbolIndex;
use crate::record::{SymbolKind, SymbolRecord};
use crate::span::SourceSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DecorationKind {
    Class,
    Function,
    Method,
    Parameter,
}

impl DecorationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecorationKind::Class => "class",
            DecorationKind::Function => "function",
            DecorationKind::Method => "method",
            DecorationKind::Parameter => "parameter",
        }
    }
}

impl From<SymbolKind> for DecorationKind {
    fn from(kind: SymbolKind) -> Self {
        match kind {
            SymbolKind::Class => DecorationKind::Class,
            SymbolKind::Function => DecorationKind::Function,
            SymbolKind::Method => DecorationKind::Method,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Decoration {
    pub span: SourceSpan,
    pub kind: DecorationKind,
    /// Qualified name of the symbol, or the parameter name.
    pub symbol: String,
    /// The matched identifier.
    pub name: String,
    /// Owning class for methods, owning definition for parameters.
    pub parent: Option<String>,
    /// Qualified names from the outermost owner down to the symbol itself.
    pub parent_chain: Vec<String>,
    pub css_class: String,
}

impl Decoration {
    fn new(
        span: SourceSpan,
        kind: DecorationKind,
        symbol: &str,
        name: &str,
        parent: Option<&str>,
        parent_chain: Vec<String>,
    ) -> Self {
        Decoration {
            span,
            kind,
            symbol: symbol.to_string(),
            name: name.to_string(),
            parent: parent.map(str::to_string),
            parent_chain,
            css_class: format!("symbol-{}", kind.as_str()),
        }
    }
}

/// Start offsets of every occurrence of `needle`, overlapping ones included.
pub fn find_all_substring_indexes(haystack: &str, needle: &str) -> Vec<usize> {
    if needle.is_empty() {
        return Vec::new();
    }
    haystack
        .char_indices()
        .map(|(at, _)| at)
        .filter(|&at| haystack[at..].starts_with(needle))
        .collect()
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Occurrences of `name` not glued to neighbouring identifier characters.
fn identifier_occurrences(code: &str, name: &str) -> Vec<SourceSpan> {
    find_all_substring_indexes(code, name)
        .into_iter()
        .filter(|&at| {
            let before = code[..at].chars().next_back();
            let after = code[at + name.len()..].chars().next();
            !before.is_some_and(is_identifier_char) && !after.is_some_and(is_identifier_char)
        })
        .filter_map(|at| SourceSpan::new(at, at + name.len()))
        .collect()
}

fn chain_of(record: &SymbolRecord) -> Vec<String> {
    match &record.parent {
        Some(parent) => vec![parent.clone(), record.qualified_name.clone()],
        None => vec![record.qualified_name.clone()],
    }
}

/// Decorate every occurrence of every indexed symbol in `code`.
///
/// Parameters are decorated only inside their owner's definition when that
/// definition appears in `code`. The result is sorted by span start, outer
/// spans first, so repeated runs over the same text are identical.
pub fn annotate(code: &str, index: &SymbolIndex) -> Vec<Decoration> {
    let mut out = Vec::new();

    for record in index.iter() {
        let kind = DecorationKind::from(record.kind);
        let chain = chain_of(record);
        let name = record.name();

        for span in identifier_occurrences(code, name) {
            out.push(Decoration::new(
                span,
                kind,
                &record.qualified_name,
                name,
                record.parent.as_deref(),
                chain.clone(),
            ));
        }

        if record.parameters.is_empty() {
            continue;
        }
        let owner = locate_symbol(code, &record.qualified_name).or_else(|| {
            if record.parent.is_some() {
                locate_symbol(code, name)
            } else {
                None
            }
        });
        let Some(owner) = owner else {
            continue;
        };
        let Some(body) = owner.slice(code) else {
            continue;
        };
        for param in &record.parameters {
            let mut param_chain = chain.clone();
            param_chain.push(param.name.clone());
            for local in identifier_occurrences(body, &param.name) {
                let Some(span) =
                    SourceSpan::new(owner.start() + local.start(), owner.start() + local.end())
                else {
                    continue;
                };
                out.push(Decoration::new(
                    span,
                    DecorationKind::Parameter,
                    &param.name,
                    &param.name,
                    Some(&record.qualified_name),
                    param_chain.clone(),
                ));
            }
        }
    }

    out.sort_by(|a, b| {
        a.span
            .start()
            .cmp(&b.span.start())
            .then(b.span.end().cmp(&a.span.end()))
            .then(a.kind.cmp(&b.kind))
            .then(a.symbol.cmp(&b.symbol))
    });
    out.dedup();
    out
}

/// A run of code text and the decorations covering all of it.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub span: SourceSpan,
    /// Outermost first; empty for plain text.
    pub decorations: Vec<&'a Decoration>,
}

/// Split `code` at every decoration boundary. Concatenating the segment
/// texts gives back `code`. Decorations that do not fit `code` are ignored.
pub fn segments<'a>(code: &'a str, decorations: &'a [Decoration]) -> Vec<Segment<'a>> {
    let fitting: Vec<&Decoration> = decorations
        .iter()
        .filter(|d| d.span.slice(code).is_some())
        .collect();

    let mut cuts = BTreeSet::from([0, code.len()]);
    for d in &fitting {
        cuts.insert(d.span.start());
        cuts.insert(d.span.end());
    }

    let cuts: Vec<usize> = cuts.into_iter().collect();
    cuts.windows(2)
        .filter_map(|pair| {
            let span = SourceSpan::new(pair[0], pair[1])?;
            let text = span.slice(code)?;
            let mut covering: Vec<&Decoration> = fitting
                .iter()
                .copied()
                .filter(|d| d.span.contains(&span))
                .collect();
            covering.sort_by_key(|d| std::cmp::Reverse(d.span.len()));
            Some(Segment {
                text,
                span,
                decorations: covering,
            })
        })
        .collect()
}
