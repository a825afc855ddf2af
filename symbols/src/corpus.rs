use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::IndexError;

/// One corpus file; `path` is relative to the corpus root and uses `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: String,
    pub text: String,
}

/// The source files symbol indexes are built from, in sorted path order.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    files: Vec<SourceFile>,
}

impl Corpus {
    pub fn from_files(mut files: Vec<SourceFile>) -> Self {
        files.sort_by(|a, b| a.path.cmp(&b.path));
        Corpus { files }
    }

    /// Walk `root` recursively, keeping files whose extension is in
    /// `extensions` (without the dot).
    pub fn load(root: &Path, extensions: &[String]) -> Result<Self, IndexError> {
        if !root.is_dir() {
            return Err(IndexError::NotADirectory(root.to_path_buf()));
        }
        let mut files = Vec::new();
        walk(root, root, extensions, &mut files)?;
        debug!(root = %root.display(), files = files.len(), "loaded corpus");
        Ok(Corpus::from_files(files))
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn get(&self, path: &str) -> Option<&SourceFile> {
        self.files.iter().find(|f| f.path == path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

fn walk(
    root: &Path,
    dir: &Path,
    extensions: &[String],
    out: &mut Vec<SourceFile>,
) -> Result<(), IndexError> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(io_error(dir))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<_, _>>()
        .map_err(io_error(dir))?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            walk(root, &path, extensions, out)?;
            continue;
        }
        let wanted = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| extensions.iter().any(|x| x == ext));
        if !wanted {
            continue;
        }
        let bytes = fs::read(&path).map_err(io_error(&path))?;
        let text = String::from_utf8(bytes).map_err(|_| IndexError::InvalidUtf8(path.clone()))?;
        out.push(SourceFile {
            path: relative(root, &path),
            text,
        });
    }
    Ok(())
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> IndexError + use<> {
    let path = path.to_path_buf();
    move |error| IndexError::Io { path, error }
}

fn relative(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
