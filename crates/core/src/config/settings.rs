use crate::{
    context::{FeatureFlags, ProjectContext, ProjectFramework, ProjectLanguage, ProjectType},
    error::{Error, Result},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::{FlagOverrides, VersionPolicy};

pub const CONFIG_FILE_NAME: &str = "projectcfg.json";

/// Declared configuration of a (multi-module) project
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ProjectConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub language: ProjectLanguage,
    #[serde(rename = "type")]
    pub project_type: ProjectType,
    pub framework: ProjectFramework,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
    pub flags: FlagOverrides,
    pub versions: VersionPolicy,

    // State the user already declared in the host build
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub dependencies: BTreeMap<String, Vec<String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subprojects: Vec<SubprojectConfig>,
}

/// A subproject; every unset field is inherited from the root
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SubprojectConfig {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub project_type: Option<ProjectType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framework: Option<ProjectFramework>,
    pub flags: FlagOverrides,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub dependencies: BTreeMap<String, Vec<String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<String>,
}

impl ProjectConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&contents).map_err(|e| {
            Error::configuration(
                "config",
                path.display().to_string(),
                format!("Failed to parse config: {e}"),
            )
        })?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents + "\n")?;
        Ok(())
    }

    /// Walk up from `start_path` looking for a configuration file
    pub fn find_config_file(start_path: &Path) -> Option<PathBuf> {
        let mut current = start_path;

        loop {
            let config_path = current.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return Some(config_path);
            }

            current = current.parent()?;
        }
    }

    /// Context for the root project located at `root_dir`
    pub fn root_context(&self, root_dir: &Path) -> ProjectContext {
        let name = self
            .name
            .clone()
            .unwrap_or_else(|| dir_name(root_dir, "root"));

        ProjectContext::root(
            name,
            root_dir,
            self.language,
            self.project_type,
            self.framework,
            self.flags.resolve(&FeatureFlags::default()),
        )
    }

    /// One context per declared subproject, inheriting unset values from `root`
    pub fn subproject_contexts(&self, root: &ProjectContext) -> Vec<ProjectContext> {
        self.subprojects
            .iter()
            .map(|sub| {
                let dir = root.root_dir().join(&sub.path);
                let name = sub.name.clone().unwrap_or_else(|| dir_name(&dir, &sub.path));
                ProjectContext::subproject(
                    root,
                    name,
                    dir,
                    sub.project_type.unwrap_or(root.project_type()),
                    sub.framework.unwrap_or(root.framework()),
                    sub.flags.resolve(root.flags()),
                )
            })
            .collect()
    }
}

fn dir_name(path: &Path, fallback: &str) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| fallback.to_string())
}
