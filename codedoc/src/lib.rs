pub mod document;
pub mod parser;

pub use document::{Document, Inline, Node};
pub use parser::{ParseError, Parser};
