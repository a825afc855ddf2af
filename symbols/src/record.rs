use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Function,
    Class,
    Method,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Function => "function",
            SymbolKind::Class => "class",
            SymbolKind::Method => "method",
        }
    }
}

/// An indexed definition. Immutable once the index is built.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolRecord {
    /// `name` for classes and free functions, `Class.method` for methods.
    pub qualified_name: String,
    pub kind: SymbolKind,
    /// Definition header without the trailing colon, whitespace-normalized.
    pub signature: String,
    pub parameters: Vec<ParameterRecord>,
    /// Empty when the definition has no `->` annotation.
    pub return_type: String,
    /// Raw definition text, decorators and docstring included.
    pub code: String,
    /// Corpus-relative path of the defining file.
    pub file: String,
    /// 1-based line of the `def`/`class` keyword.
    pub line: usize,
    /// Owning class, set only for methods.
    pub parent: Option<String>,
}

impl SymbolRecord {
    /// The unqualified name (`get` for `LRUCache.get`).
    pub fn name(&self) -> &str {
        self.qualified_name
            .rsplit_once('.')
            .map(|(_, name)| name)
            .unwrap_or(&self.qualified_name)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ParameterRecord {
    pub name: String,
    /// Annotation text; empty when unannotated.
    #[serde(rename = "type")]
    pub ty: String,
    pub description: String,
    pub default: Option<String>,
}
