//! Template context: the placeholder values substituted into names and contents.

use serde::{Deserialize, Serialize};

use crate::error::ScaffoldError;

/// Placeholder values available to every template as `{{ project_name }}`
/// and `{{ module }}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaffoldContext {
    /// Last segment of the module path; also the root directory name.
    pub project_name: String,
    /// Full module path, e.g. `github.com/acme/payments`.
    pub module: String,
}

impl ScaffoldContext {
    /// Build from a module path. `github.com/acme/payments` → project `payments`.
    pub fn from_module(module: &str) -> Self {
        let module = module.trim().trim_end_matches('/');
        let project_name = module.rsplit('/').next().unwrap_or(module);
        Self {
            project_name: project_name.to_string(),
            module: module.to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), ScaffoldError> {
        let name = &self.project_name;
        if name.is_empty() || name == "." || name == ".." || name.contains('\\') {
            return Err(ScaffoldError::InvalidModule(self.module.clone()));
        }
        Ok(())
    }

    pub(crate) fn to_tera_context(&self) -> Result<tera::Context, ScaffoldError> {
        Ok(tera::Context::from_serialize(self)?)
    }
}
