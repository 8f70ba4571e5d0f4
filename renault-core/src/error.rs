//! Error types for renault-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from manifest and workspace configuration operations.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Underlying I/O failure, annotated with the path being touched.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML serialization error (save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on load: includes file path and line context from serde_yaml.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The `.renault` control directory does not exist under the workspace root.
    #[error("workspace at {root} is not initialized; run `renault workspace init` first")]
    NotInitialized { root: PathBuf },

    /// A project with the same name is already registered.
    #[error("project '{name}' already exists in the workspace")]
    DuplicateProject { name: String },

    /// The project name cannot be used as a directory name.
    #[error("invalid project name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    /// The remote URL is not a recognizable git remote.
    #[error("invalid remote url '{url}': {reason}")]
    InvalidUrl { url: String, reason: &'static str },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ManifestError {
    ManifestError::Io {
        path: path.into(),
        source,
    }
}
