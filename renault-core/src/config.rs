//! Optional per-workspace settings at `<root>/.renault/config.yaml`.
//!
//! ```yaml
//! sync:
//!   concurrency: 5
//!   timeout_secs: 15
//!   force_pull: false
//! ```
//!
//! Every field is defaulted, so a missing file or a partial file is fine.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{io_err, ManifestError};
use crate::workspace::Workspace;

pub const DEFAULT_CONCURRENCY: usize = 5;
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Root of `config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WorkspaceConfig {
    #[serde(default)]
    pub sync: SyncSettings,
}

/// Settings for `workspace sync`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Worker pool width.
    pub concurrency: usize,
    /// Upper bound for each git invocation.
    pub timeout_secs: u64,
    /// Pull even when the checkout is dirty, ahead, or has untracked files.
    pub force_pull: bool,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            force_pull: false,
        }
    }
}

impl SyncSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.concurrency == 0 {
            return Err(ManifestError::InvalidConfig(
                "sync.concurrency must be at least 1".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ManifestError::InvalidConfig(
                "sync.timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl WorkspaceConfig {
    /// Load `<root>/.renault/config.yaml`, falling back to defaults when absent.
    pub fn load(workspace: &Workspace) -> Result<Self, ManifestError> {
        Self::load_at(&workspace.config_path())
    }

    pub fn load_at(path: &Path) -> Result<Self, ManifestError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(&contents).map_err(|source| {
            ManifestError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        config.sync.validate()?;
        Ok(config)
    }
}
