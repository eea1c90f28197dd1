//! Loads and merges the three config tiers from disk (§4.9): built-in
//! defaults, an optional workspace-level `foreman.yaml`, and an optional
//! per-project `projects/<slug>.yaml`.

use std::path::Path;

use serde_yaml::Value;

use foreman_core::ResolvedConfig;

use crate::builtin::builtin_config;
use crate::error::ConfigError;
use crate::merge::{merge_values, normalize_roles};

const WORKSPACE_FILE: &str = "foreman.yaml";
const PROJECTS_DIR: &str = "projects";

/// Load and resolve the configuration for `project_slug` rooted at
/// `workspace_dir`. A missing workspace or project file is not an error —
/// the merge simply skips that tier and the built-ins (or workspace
/// overrides) stand.
pub fn load(workspace_dir: &Path, project_slug: &str) -> Result<ResolvedConfig, ConfigError> {
    let mut merged = serde_yaml::to_value(builtin_config()).map_err(ConfigError::serialize)?;

    if let Some(workspace_doc) = read_optional(&workspace_dir.join(WORKSPACE_FILE))? {
        merged = merge_values(merged, workspace_doc);
    }

    let project_path = workspace_dir.join(PROJECTS_DIR).join(format!("{project_slug}.yaml"));
    if let Some(project_doc) = read_optional(&project_path)? {
        merged = merge_values(merged, project_doc);
    }

    normalize_roles(&mut merged);

    let resolved: ResolvedConfig = serde_yaml::from_value(merged).map_err(ConfigError::deserialize)?;
    resolved.workflow.validate()?;
    Ok(resolved)
}

fn read_optional(path: &Path) -> Result<Option<Value>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            let value: Value = serde_yaml::from_str(&contents)
                .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
            Ok(Some(value))
        }
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ConfigError::Io { path: path.to_path_buf(), source }),
    }
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
