//! Code-fence resolution: replace locator fences with the code they name.
//!
//! Lookup order for a locator `path[:symbol]`:
//!
//! 1. `path` matches the indexed pattern and names a symbol: the symbol
//!    index record, if it was defined in that very file; otherwise the
//!    symbol extracted from the solutions index entry for the file.
//! 2. `path` matches the indexed pattern without a symbol: the whole file
//!    from the solutions index.
//! 3. Any other path is read from the project root (once per run) and the
//!    symbol, if any, extracted from it.
//!
//! A fence nothing resolves keeps its authored content and info string.

pub mod locator;

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use codedoc::document::{CodeBlock, Node};
use once_cell::sync::Lazy;
use regex::Regex;
use symbols::{SolutionsIndex, SymbolIndex, dedent, extract_symbol};
use tracing::debug;

use crate::error::{Warning, WarningKind};
use crate::options::Options;
use locator::{FILE_KEY, Locator, locator_of, normalize};

pub const SOURCE_KEY: &str = "source";
pub const RESOLVED_KEY: &str = "resolved";

static BLANK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n(?:[ \t]*\n){2,}").unwrap());

/// Where resolved code came from; recorded in the fence's `resolved` meta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    SymbolIndex,
    SolutionsIndex,
    File,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::SymbolIndex => "symbol-index",
            Provenance::SolutionsIndex => "solutions-index",
            Provenance::File => "file",
        }
    }
}

/// Resolves fences for one pipeline run. The file cache lives as long as
/// the resolver.
pub struct FenceResolver<'a> {
    symbols: &'a SymbolIndex,
    solutions: &'a SolutionsIndex,
    options: &'a Options,
    indexed: &'a Regex,
    /// Cache of project files, keyed by path; `Err` holds the read error.
    file_cache: HashMap<PathBuf, Result<String, String>>,
    warnings: Vec<Warning>,
}

impl<'a> FenceResolver<'a> {
    pub fn new(
        symbols: &'a SymbolIndex,
        solutions: &'a SolutionsIndex,
        options: &'a Options,
        indexed: &'a Regex,
    ) -> Self {
        FenceResolver {
            symbols,
            solutions,
            options,
            indexed,
            file_cache: HashMap::new(),
            warnings: Vec::new(),
        }
    }

    /// Resolve every fence in `nodes`, descending into lists, quotes and
    /// components.
    pub fn resolve_nodes(&mut self, nodes: &mut [Node]) {
        for node in nodes {
            match node {
                Node::CodeBlock(block) => self.resolve_block(block),
                Node::List(list) => {
                    for item in &mut list.items {
                        self.resolve_nodes(&mut item.children);
                    }
                }
                Node::Blockquote(children) => self.resolve_nodes(children),
                Node::Component(component) => self.resolve_nodes(&mut component.children),
                _ => {}
            }
        }
    }

    /// Resolve one fence in place. Non-locator fences are untouched.
    pub fn resolve_block(&mut self, block: &mut CodeBlock) {
        let mut normalized = block.clone();
        normalize(&mut normalized);
        let Some(locator) = locator_of(&normalized) else {
            return;
        };

        match self.lookup(&locator) {
            Ok((code, provenance)) => {
                debug!(locator = %locator, resolved = provenance.as_str(), "resolved fence");
                normalized.content = self.finish(&code);
                normalized.remove_meta(FILE_KEY);
                normalized.set_meta(SOURCE_KEY, locator.to_string());
                normalized.set_meta(RESOLVED_KEY, provenance.as_str());
                *block = normalized;
            }
            Err(kind) => {
                debug!(locator = %locator, reason = %kind, "fence left unresolved");
                self.warnings.push(Warning::new(kind, block.span.clone()));
            }
        }
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }

    /// `group/item/file` when `path` matches the indexed pattern.
    fn indexed_key(&self, path: &str) -> Option<String> {
        let caps = self.indexed.captures(path)?;
        Some(format!(
            "{}/{}/{}",
            caps.name("group")?.as_str(),
            caps.name("item")?.as_str(),
            caps.name("file")?.as_str()
        ))
    }

    fn lookup(&mut self, locator: &Locator) -> Result<(String, Provenance), WarningKind> {
        if let Some(key) = self.indexed_key(&locator.path) {
            return self.lookup_indexed(&key, locator);
        }

        let text = self.read_project_file(&locator.path)?;
        match &locator.symbol {
            Some(symbol) => {
                let code = extract_symbol(&text, symbol, false);
                if code.is_empty() {
                    return Err(not_found(locator, symbol));
                }
                Ok((code, Provenance::File))
            }
            None => Ok((text, Provenance::File)),
        }
    }

    fn lookup_indexed(
        &self,
        key: &str,
        locator: &Locator,
    ) -> Result<(String, Provenance), WarningKind> {
        let Some(symbol) = &locator.symbol else {
            return self
                .solutions
                .get(key)
                .map(|text| (text.to_string(), Provenance::SolutionsIndex))
                .ok_or_else(|| WarningKind::NotIndexed(locator.path.clone()));
        };

        if let Some(record) = self.symbols.get(symbol).filter(|r| r.file == key) {
            return Ok((record.code.clone(), Provenance::SymbolIndex));
        }
        debug!(symbol = %symbol, key = %key, "symbol index miss, trying solutions index");

        self.solutions
            .get(key)
            .map(|text| extract_symbol(text, symbol, false))
            .filter(|code| !code.is_empty())
            .map(|code| (code, Provenance::SolutionsIndex))
            .ok_or_else(|| not_found(locator, symbol))
    }

    fn read_project_file(&mut self, path: &str) -> Result<String, WarningKind> {
        let full = self.options.project_root.join(path);
        let cached = self.file_cache.entry(full).or_insert_with_key(|full| {
            debug!(path = %full.display(), "reading fence source");
            fs::read_to_string(full).map_err(|e| e.to_string())
        });
        cached.clone().map_err(|reason| WarningKind::UnreadableFile {
            path: path.to_string(),
            reason,
        })
    }

    /// Docstring stripping (if configured), dedent, blank-run collapsing and
    /// a single trailing newline.
    fn finish(&self, code: &str) -> String {
        let code = if self.options.strip_docstrings {
            symbols::docstring::strip_docstring(code)
        } else {
            code.to_string()
        };
        normalize_code(&dedent(&code))
    }
}

fn not_found(locator: &Locator, symbol: &str) -> WarningKind {
    WarningKind::SymbolNotFound {
        symbol: symbol.to_string(),
        path: locator.path.clone(),
    }
}

/// Collapse runs of blank lines to one and end with exactly one newline.
pub fn normalize_code(code: &str) -> String {
    let collapsed = BLANK_RUN.replace_all(code, "\n\n");
    let trimmed = collapsed.trim_end_matches(['\n', ' ', '\t']);
    if trimmed.is_empty() {
        return String::new();
    }
    format!("{}\n", trimmed)
}
