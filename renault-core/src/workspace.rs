//! The workspace context value.
//!
//! # Layout
//!
//! ```text
//! <root>/
//!   .renault/
//!     project.yaml   (manifest: list of {name, url})
//!     config.yaml    (optional sync settings)
//!   <project>/       (one git checkout per manifest entry)
//! ```
//!
//! A [`Workspace`] is built once by the binary (from `--workspace` or the
//! current directory) and handed to every component that resolves paths.

use std::path::{Path, PathBuf};

use crate::types::ProjectName;

pub const CONTROL_DIR: &str = ".renault";
pub const MANIFEST_FILE: &str = "project.yaml";
pub const CONFIG_FILE: &str = "config.yaml";

/// Root directory of a multi-project workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/.renault`
    pub fn control_dir(&self) -> PathBuf {
        self.root.join(CONTROL_DIR)
    }

    /// `<root>/.renault/project.yaml`
    pub fn manifest_path(&self) -> PathBuf {
        self.control_dir().join(MANIFEST_FILE)
    }

    /// `<root>/.renault/config.yaml`
    pub fn config_path(&self) -> PathBuf {
        self.control_dir().join(CONFIG_FILE)
    }

    /// `<root>/<name>`: where the project's checkout lives.
    pub fn project_dir(&self, name: &ProjectName) -> PathBuf {
        self.root.join(&name.0)
    }

    /// True once `workspace init` has created the control directory.
    pub fn is_initialized(&self) -> bool {
        self.control_dir().is_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_hang_off_the_root() {
        let ws = Workspace::new("/work");
        assert_eq!(ws.control_dir(), PathBuf::from("/work/.renault"));
        assert_eq!(ws.manifest_path(), PathBuf::from("/work/.renault/project.yaml"));
        assert_eq!(ws.config_path(), PathBuf::from("/work/.renault/config.yaml"));
        assert_eq!(
            ws.project_dir(&ProjectName::from("api")),
            PathBuf::from("/work/api")
        );
    }

    #[test]
    fn initialized_only_when_control_dir_exists() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let ws = Workspace::new(dir.path());
        assert!(!ws.is_initialized());
        std::fs::create_dir(ws.control_dir()).expect("mkdir");
        assert!(ws.is_initialized());
    }
}
