//! Renault core library: domain types, workspace context, manifest persistence.
//!
//! - [`types`]: [`ProjectName`] newtype and the [`Project`] record
//! - [`workspace`]: the [`Workspace`] context value threaded through every command
//! - [`manifest`]: load / save / init / add against `.renault/project.yaml`
//! - [`config`]: optional `.renault/config.yaml` sync settings
//! - [`error`]: [`ManifestError`]

pub mod config;
pub mod error;
pub mod manifest;
pub mod types;
pub mod workspace;

pub use config::{SyncSettings, WorkspaceConfig};
pub use error::ManifestError;
pub use manifest::{ManifestStore, YamlManifest};
pub use types::{Project, ProjectName};
pub use workspace::Workspace;
