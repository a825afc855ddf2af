use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Paths of the form `solutions/{group}/{item}/{file}` resolve through the
/// symbol and solutions indexes.
pub const DEFAULT_INDEXED_PATTERN: &str =
    r"^solutions/(?P<group>[^/]+)/(?P<item>[^/]+)/(?P<file>[^/]+)$";

pub const DEFAULT_TOC_TITLE: &str = "Table of Contents";

/// Pipeline settings. Every field has a default, so a partial `[pipeline]`
/// table deserializes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Base directory for fence paths outside the indexed pattern.
    pub project_root: PathBuf,
    /// Regex with `group`, `item` and `file` captures.
    pub indexed_pattern: String,
    /// Remove leading docstrings from resolved code.
    pub strip_docstrings: bool,
    /// Heading ranks that open sections.
    pub section_levels: Vec<u8>,
    /// Headings with this text (any case) are never wrapped.
    pub toc_title: String,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            project_root: PathBuf::from("."),
            indexed_pattern: DEFAULT_INDEXED_PATTERN.to_string(),
            strip_docstrings: false,
            section_levels: vec![2, 3],
            toc_title: DEFAULT_TOC_TITLE.to_string(),
        }
    }
}
