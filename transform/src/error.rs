use std::fmt;
use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label};

/// Why a pass left part of the document as authored.
#[derive(Debug, Clone, PartialEq)]
pub enum WarningKind {
    /// The locator names a symbol found in neither index nor file.
    SymbolNotFound { symbol: String, path: String },
    /// An indexed path with no entry in the solutions index.
    NotIndexed(String),
    /// A project file that could not be read.
    UnreadableFile { path: String, reason: String },
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningKind::SymbolNotFound { symbol, path } => {
                write!(f, "symbol `{}` not found in {}", symbol, path)
            }
            WarningKind::NotIndexed(path) => write!(f, "no indexed source for {}", path),
            WarningKind::UnreadableFile { path, reason } => {
                write!(f, "cannot read {}: {}", path, reason)
            }
        }
    }
}

/// A soft failure with the source span of the node it concerns. Warnings
/// never stop a pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    pub kind: WarningKind,
    pub span: Range<usize>,
}

impl Warning {
    pub fn new(kind: WarningKind, span: Range<usize>) -> Self {
        Warning { kind, span }
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    /// Convert to a codespan-reporting Diagnostic for display.
    pub fn to_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        Diagnostic::warning()
            .with_message(self.message())
            .with_labels(vec![
                Label::primary(file_id, self.span.clone()).with_message("left unresolved"),
            ])
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

impl std::error::Error for Warning {}

/// Configuration problems detected before any document is touched.
#[derive(Debug)]
pub enum TransformError {
    InvalidPattern { pattern: String, error: regex::Error },
    MissingCapture { pattern: String, name: &'static str },
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformError::InvalidPattern { pattern, error } => {
                write!(f, "invalid indexed path pattern `{}`: {}", pattern, error)
            }
            TransformError::MissingCapture { pattern, name } => {
                write!(
                    f,
                    "indexed path pattern `{}` has no `{}` capture group",
                    pattern, name
                )
            }
        }
    }
}

impl std::error::Error for TransformError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransformError::InvalidPattern { error, .. } => Some(error),
            TransformError::MissingCapture { .. } => None,
        }
    }
}
