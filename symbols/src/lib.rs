pub mod annotate;
pub mod corpus;
pub mod docstring;
pub mod error;
pub mod extract;
pub mod index;
pub mod record;
pub mod signature;
pub mod solutions;
pub mod span;

pub use annotate::{Decoration, DecorationKind, Segment, annotate, find_all_substring_indexes, segments};
pub use corpus::{Corpus, SourceFile};
pub use error::IndexError;
pub use extract::{dedent, extract_symbol, locate_symbol};
pub use index::SymbolIndex;
pub use record::{ParameterRecord, SymbolKind, SymbolRecord};
pub use solutions::SolutionsIndex;
pub use span::SourceSpan;
