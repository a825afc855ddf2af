use std::ops::Range;

use codedoc::Document;
use codedoc::document::Node;
use regex::Regex;
use serde::Serialize;
use symbols::{Decoration, SolutionsIndex, SymbolIndex, annotate};
use tracing::debug;

use crate::error::{TransformError, Warning};
use crate::fence::FenceResolver;
use crate::lists::restructure_lists;
use crate::options::Options;
use crate::sections::wrap_sections;

/// The result of one pipeline run.
#[derive(Debug, Clone)]
pub struct Transformed {
    pub document: Document,
    pub warnings: Vec<Warning>,
}

/// Runs fence resolution, list restructuring and section wrapping, in that
/// order, over one document at a time. Indexes are borrowed read-only, so
/// one pipeline can serve many documents.
pub struct Pipeline<'a> {
    symbols: &'a SymbolIndex,
    solutions: &'a SolutionsIndex,
    options: Options,
    indexed: Regex,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        symbols: &'a SymbolIndex,
        solutions: &'a SolutionsIndex,
        options: Options,
    ) -> Result<Self, TransformError> {
        let indexed =
            Regex::new(&options.indexed_pattern).map_err(|error| TransformError::InvalidPattern {
                pattern: options.indexed_pattern.clone(),
                error,
            })?;
        for name in ["group", "item", "file"] {
            if !indexed.capture_names().flatten().any(|n| n == name) {
                return Err(TransformError::MissingCapture {
                    pattern: options.indexed_pattern.clone(),
                    name,
                });
            }
        }
        Ok(Pipeline {
            symbols,
            solutions,
            options,
            indexed,
        })
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Transform `document`, parsed from `source`.
    pub fn run(&self, document: Document, source: &str) -> Transformed {
        let mut nodes = document.nodes;

        let mut fences =
            FenceResolver::new(self.symbols, self.solutions, &self.options, &self.indexed);
        fences.resolve_nodes(&mut nodes);
        let warnings = fences.into_warnings();

        let nodes = restructure_lists(nodes, source);
        let nodes = wrap_sections(nodes, &self.options.section_levels, &self.options.toc_title);

        debug!(warnings = warnings.len(), "pipeline finished");
        Transformed {
            document: Document { nodes },
            warnings,
        }
    }
}

/// Decorations for one code block of a transformed document.
#[derive(Debug, Clone, Serialize)]
pub struct BlockAnnotations {
    pub span: Range<usize>,
    pub language: Option<String>,
    pub decorations: Vec<Decoration>,
}

/// Annotate every code block in `document`, in document order.
pub fn annotate_code_blocks(document: &Document, index: &SymbolIndex) -> Vec<BlockAnnotations> {
    let mut out = Vec::new();
    collect_annotations(&document.nodes, index, &mut out);
    out
}

fn collect_annotations(nodes: &[Node], index: &SymbolIndex, out: &mut Vec<BlockAnnotations>) {
    for node in nodes {
        match node {
            Node::CodeBlock(block) => out.push(BlockAnnotations {
                span: block.span.clone(),
                language: block.language.clone(),
                decorations: annotate(&block.content, index),
            }),
            Node::List(list) => {
                for item in &list.items {
                    collect_annotations(&item.children, index, out);
                }
            }
            Node::Blockquote(children) => collect_annotations(children, index, out),
            Node::Component(component) => collect_annotations(&component.children, index, out),
            _ => {}
        }
    }
}
