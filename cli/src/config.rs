use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use transform::Options;

/// Contents of `codedoc.toml`. Relative paths are resolved against the
/// directory holding the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the code corpus to index.
    pub corpus: Option<PathBuf>,
    /// File extensions (without the dot) loaded from the corpus.
    pub source_extensions: Vec<String>,
    pub pipeline: Options,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            corpus: None,
            source_extensions: vec!["py".to_string()],
            pipeline: Options::default(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, error: io::Error },
    Toml { path: PathBuf, error: toml::de::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, error } => {
                write!(f, "cannot read '{}': {}", path.display(), error)
            }
            ConfigError::Toml { path, error } => {
                write!(f, "invalid config '{}': {}", path.display(), error)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Load `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Config::default());
            }
            Err(error) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    error,
                });
            }
        };
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Config::from_toml(&text, base).map_err(|error| ConfigError::Toml {
            path: path.to_path_buf(),
            error,
        })
    }

    pub fn from_toml(text: &str, base: &Path) -> Result<Config, toml::de::Error> {
        let mut config: Config = toml::from_str(text)?;
        config.corpus = config.corpus.map(|corpus| base.join(corpus));
        config.pipeline.project_root = base.join(&config.pipeline.project_root);
        Ok(config)
    }
}
