//! Error types for renault-scaffold.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while rendering or writing a project skeleton.
#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// Tera template engine error.
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// The project root is already present; nothing was written.
    #[error("project root {path} already exists")]
    RootExists { path: PathBuf },

    /// The module path has no usable last segment.
    #[error("invalid module path '{0}'")]
    InvalidModule(String),

    /// Filesystem error while writing the skeleton.
    #[error("scaffold io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ScaffoldError {
    ScaffoldError::Io {
        path: path.into(),
        source,
    }
}
