//! Fence locators: `python file=path/to/file.py:Class.method`.
//!
//! The compact form `python:path/to/file.py:Class.method` carries the same
//! locator in the language slot and is normalized to the `file=` form.

use std::fmt;

use codedoc::document::CodeBlock;

pub const FILE_KEY: &str = "file";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    pub path: String,
    pub symbol: Option<String>,
}

impl Locator {
    /// Split `path[:symbol]`. A suffix containing `/` is part of the path.
    pub fn parse(raw: &str) -> Option<Locator> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        let (path, symbol) = match raw.rsplit_once(':') {
            Some((path, symbol)) if !path.is_empty() && !symbol.contains('/') => {
                (path, (!symbol.is_empty()).then(|| symbol.to_string()))
            }
            _ => (raw, None),
        };
        Some(Locator {
            path: path.to_string(),
            symbol,
        })
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.symbol {
            Some(symbol) => write!(f, "{}:{}", self.path, symbol),
            None => write!(f, "{}", self.path),
        }
    }
}

/// Rewrite a compact `lang:path[:symbol]` language slot into
/// `lang file=path[:symbol]`. Blocks that already carry `file=` are left
/// alone.
pub fn normalize(block: &mut CodeBlock) {
    if block.has_meta(FILE_KEY) {
        return;
    }
    let Some((language, rest)) = block
        .language
        .as_deref()
        .and_then(|slot| slot.split_once(':'))
    else {
        return;
    };
    if language.is_empty() || rest.is_empty() {
        return;
    }
    let (language, rest) = (language.to_string(), rest.to_string());
    block.language = Some(language);
    block.set_meta(FILE_KEY, rest);
}

/// The locator of a fence directive, after normalization.
pub fn locator_of(block: &CodeBlock) -> Option<Locator> {
    block.meta_value(FILE_KEY).and_then(Locator::parse)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(language: Option<&str>, info: &[(&str, Option<&str>)]) -> CodeBlock {
        CodeBlock {
            language: language.map(str::to_string),
            meta: info
                .iter()
                .map(|(k, v)| codedoc::document::MetaEntry {
                    key: k.to_string(),
                    value: v.map(str::to_string),
                })
                .collect(),
            content: String::new(),
            span: 0..0,
        }
    }

    #[test]
    fn parses_path_and_symbol() {
        let loc = Locator::parse("solutions/arrays/two_sum/sol.py:Solution.twoSum").unwrap();
        assert_eq!(loc.path, "solutions/arrays/two_sum/sol.py");
        assert_eq!(loc.symbol.as_deref(), Some("Solution.twoSum"));
        assert_eq!(loc.to_string(), "solutions/arrays/two_sum/sol.py:Solution.twoSum");
    }

    #[test]
    fn path_without_symbol() {
        let loc = Locator::parse("src/util.py").unwrap();
        assert_eq!(loc.symbol, None);
        assert_eq!(Locator::parse("src/util.py:").unwrap().symbol, None);
        assert_eq!(Locator::parse("c:/tmp/x.py").unwrap().path, "c:/tmp/x.py");
        assert!(Locator::parse("  ").is_none());
    }

    #[test]
    fn compact_form_moves_into_meta() {
        let mut b = block(Some("python:src/util.py:helper"), &[("title", Some("Util"))]);
        normalize(&mut b);
        assert_eq!(b.language.as_deref(), Some("python"));
        assert_eq!(b.meta_value(FILE_KEY), Some("src/util.py:helper"));
        assert_eq!(b.meta_value("title"), Some("Util"));
    }

    #[test]
    fn explicit_file_wins_over_language_slot() {
        let mut b = block(Some("python:ignored.py"), &[(FILE_KEY, Some("kept.py"))]);
        normalize(&mut b);
        assert_eq!(b.language.as_deref(), Some("python:ignored.py"));
        assert_eq!(locator_of(&b).unwrap().path, "kept.py");
    }

    #[test]
    fn plain_language_is_not_a_locator() {
        let mut b = block(Some("rust"), &[]);
        normalize(&mut b);
        assert_eq!(locator_of(&b), None);
    }
}
