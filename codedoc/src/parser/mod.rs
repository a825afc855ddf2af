pub mod error;
mod fence_info;
mod structural;

pub use error::ParseError;
pub use fence_info::parse_info_string;

use crate::document::Document;

/// Markdown front-end entry point.
pub struct Parser {
    source: String,
    file_id: usize,
}

impl Parser {
    pub fn new(source: String, file_id: usize) -> Self {
        Parser { source, file_id }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Parse the source Markdown into a Document.
    ///
    /// Markdown has no invalid input, so a document is always produced; the
    /// returned diagnostics are warnings about authoring markers the
    /// front-end recognised but could not honour.
    pub fn parse(&self) -> (Document, Vec<ParseError>) {
        structural::parse_document(&self.source, self.file_id)
    }
}
