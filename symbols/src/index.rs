use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::{debug, info, warn};

use crate::corpus::Corpus;
use crate::docstring::{arg_descriptions, docstring_text};
use crate::extract::{Block, Keyword, LineTable, block_at, definition, indent_of, is_blank};
use crate::record::{SymbolKind, SymbolRecord};
use crate::signature::parse_signature;

/// Qualified name to [`SymbolRecord`]. Built once, then only read.
#[derive(Debug, Clone, Default)]
pub struct SymbolIndex {
    records: Vec<SymbolRecord>,
    by_name: HashMap<String, usize>,
    duplicates: usize,
}

impl SymbolIndex {
    pub fn new() -> Self {
        SymbolIndex::default()
    }

    /// Index every file of the corpus in path order.
    pub fn build(corpus: &Corpus) -> Self {
        let mut index = SymbolIndex::new();
        for file in corpus.files() {
            index.add_source(&file.path, &file.text);
        }
        info!(
            files = corpus.len(),
            symbols = index.len(),
            duplicates = index.duplicates,
            "built symbol index"
        );
        index
    }

    pub fn from_source(file: &str, source: &str) -> Self {
        let mut index = SymbolIndex::new();
        index.add_source(file, source);
        index
    }

    /// Register the top-level classes (with their methods), then the
    /// top-level functions, of one file. Nested definitions are not indexed.
    pub fn add_source(&mut self, file: &str, source: &str) {
        let lines = LineTable::new(source);
        let all = 0..lines.len();
        for (n, class) in top_level(&lines, Keyword::Class) {
            let block = block_at(&lines, n, &all);
            self.insert(build_record(&lines, &block, class, SymbolKind::Class, file, None));

            let body = block.body();
            let Some(body_indent) = body
                .clone()
                .map(|m| lines.line(m))
                .find(|l| !is_blank(l))
                .map(indent_of)
            else {
                continue;
            };
            for m in body.clone() {
                let line = lines.line(m);
                if indent_of(line) != body_indent {
                    continue;
                }
                if let Some((Keyword::Def, method)) = definition(line.trim_start()) {
                    let method_block = block_at(&lines, m, &body);
                    self.insert(build_record(
                        &lines,
                        &method_block,
                        &format!("{}.{}", class, method),
                        SymbolKind::Method,
                        file,
                        Some(class),
                    ));
                }
            }
        }

        for (n, function) in top_level(&lines, Keyword::Def) {
            let block = block_at(&lines, n, &all);
            self.insert(build_record(&lines, &block, function, SymbolKind::Function, file, None));
        }
    }

    /// Add a record unless its qualified name is already taken. Returns
    /// whether the record was stored.
    pub fn insert(&mut self, record: SymbolRecord) -> bool {
        if let Some(&existing) = self.by_name.get(&record.qualified_name) {
            warn!(
                symbol = %record.qualified_name,
                kept = %self.records[existing].file,
                ignored = %record.file,
                "duplicate symbol"
            );
            self.duplicates += 1;
            return false;
        }
        debug!(symbol = %record.qualified_name, file = %record.file, line = record.line, "indexed");
        self.by_name
            .insert(record.qualified_name.clone(), self.records.len());
        self.records.push(record);
        true
    }

    pub fn get(&self, qualified_name: &str) -> Option<&SymbolRecord> {
        self.by_name.get(qualified_name).map(|&i| &self.records[i])
    }

    pub fn contains(&self, qualified_name: &str) -> bool {
        self.by_name.contains_key(qualified_name)
    }

    /// Records in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &SymbolRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of definitions dropped because their name was already indexed.
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }
}

impl Serialize for SymbolIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.records.len()))?;
        for record in &self.records {
            map.serialize_entry(&record.qualified_name, record)?;
        }
        map.end()
    }
}

/// Definitions of `kind` starting at column zero.
fn top_level<'a>(
    lines: &LineTable<'a>,
    kind: Keyword,
) -> impl Iterator<Item = (usize, &'a str)> {
    (0..lines.len()).filter_map(move |n| match definition(lines.line(n)) {
        Some((kw, name)) if kw == kind => Some((n, name)),
        _ => None,
    })
}

fn build_record(
    lines: &LineTable<'_>,
    block: &Block,
    qualified_name: &str,
    kind: SymbolKind,
    file: &str,
    parent: Option<&str>,
) -> SymbolRecord {
    let code = lines.text(&block.lines()).to_string();
    let signature = parse_signature(&code).unwrap_or_default();

    let mut parameters = signature.parameters;
    if let Some(doc) = docstring_text(&code) {
        for (name, description) in arg_descriptions(&doc) {
            if let Some(param) = parameters.iter_mut().find(|p| p.name == name) {
                param.description = description;
            }
        }
    }

    SymbolRecord {
        qualified_name: qualified_name.to_string(),
        kind,
        signature: signature.text,
        parameters,
        return_type: signature.return_type,
        code,
        file: file.to_string(),
        line: block.keyword + 1,
        parent: parent.map(str::to_string),
    }
}
