use std::collections::BTreeMap;

use serde::Serialize;

use crate::corpus::Corpus;

/// Whole-file contents keyed by `{group}/{item}/{filename}`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct SolutionsIndex {
    files: BTreeMap<String, String>,
}

impl SolutionsIndex {
    pub fn new() -> Self {
        SolutionsIndex::default()
    }

    /// Register every corpus file whose relative path has exactly three
    /// components.
    pub fn build(corpus: &Corpus) -> Self {
        let mut index = SolutionsIndex::new();
        for file in corpus.files() {
            if file.path.split('/').count() == 3 {
                index.insert(&file.path, &file.text);
            }
        }
        index
    }

    pub fn insert(&mut self, key: &str, text: &str) {
        self.files.insert(key.to_string(), text.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.files.get(key).map(String::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
