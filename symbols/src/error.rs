use std::fmt;
use std::path::PathBuf;

/// Fatal corpus problems. Lookup misses are never errors.
#[derive(Debug)]
pub enum IndexError {
    NotADirectory(PathBuf),
    Io { path: PathBuf, error: std::io::Error },
    InvalidUtf8(PathBuf),
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexError::NotADirectory(path) => {
                write!(f, "corpus root is not a directory: {}", path.display())
            }
            IndexError::Io { path, error } => {
                write!(f, "cannot read {}: {}", path.display(), error)
            }
            IndexError::InvalidUtf8(path) => {
                write!(f, "source file is not valid UTF-8: {}", path.display())
            }
        }
    }
}

impl std::error::Error for IndexError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IndexError::Io { error, .. } => Some(error),
            _ => None,
        }
    }
}
