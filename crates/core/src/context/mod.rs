//! Project declaration shared by every convention module
//!
//! A [`ProjectContext`] is built once per project unit (root or subproject)
//! and never changes during a run.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectLanguage {
    #[default]
    Java,
    Kotlin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    #[default]
    Application,
    Library,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectFramework {
    #[default]
    None,
    SpringBoot,
    Quarkus,
}

impl fmt::Display for ProjectLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectLanguage::Java => write!(f, "java"),
            ProjectLanguage::Kotlin => write!(f, "kotlin"),
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectType::Application => write!(f, "application"),
            ProjectType::Library => write!(f, "library"),
        }
    }
}

impl fmt::Display for ProjectFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectFramework::None => write!(f, "none"),
            ProjectFramework::SpringBoot => write!(f, "spring_boot"),
            ProjectFramework::Quarkus => write!(f, "quarkus"),
        }
    }
}

/// Resolved feature flags, every field carrying its final value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct FeatureFlags {
    pub framework_metrics: bool,
    pub framework_db_migrate: bool,
    pub native: bool,
    pub checkstyle_rule_set: String,
    pub checkstyle_tool_version: String,
    pub java_version: String,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            framework_metrics: true,
            framework_db_migrate: false,
            native: false,
            checkstyle_rule_set: String::new(),
            checkstyle_tool_version: "10.3.1".to_string(),
            java_version: "17".to_string(),
        }
    }
}

/// Immutable declaration of what a project is
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectContext {
    name: String,
    language: ProjectLanguage,
    project_type: ProjectType,
    framework: ProjectFramework,
    flags: FeatureFlags,
    project_dir: PathBuf,
    root_dir: PathBuf,
}

impl ProjectContext {
    /// Context for a root project
    pub fn root(
        name: impl Into<String>,
        dir: impl Into<PathBuf>,
        language: ProjectLanguage,
        project_type: ProjectType,
        framework: ProjectFramework,
        flags: FeatureFlags,
    ) -> Self {
        let dir = dir.into();
        Self {
            name: name.into(),
            language,
            project_type,
            framework,
            flags,
            project_dir: dir.clone(),
            root_dir: dir,
        }
    }

    /// Context for a subproject living under `root`.
    ///
    /// Language is shared with the root. Flags must already be resolved
    /// against the root's values, see [`crate::config::FlagOverrides`].
    pub fn subproject(
        root: &ProjectContext,
        name: impl Into<String>,
        dir: impl Into<PathBuf>,
        project_type: ProjectType,
        framework: ProjectFramework,
        flags: FeatureFlags,
    ) -> Self {
        Self {
            name: name.into(),
            language: root.language,
            project_type,
            framework,
            flags,
            project_dir: dir.into(),
            root_dir: root.root_dir.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn language(&self) -> ProjectLanguage {
        self.language
    }

    pub fn project_type(&self) -> ProjectType {
        self.project_type
    }

    pub fn framework(&self) -> ProjectFramework {
        self.framework
    }

    pub fn flags(&self) -> &FeatureFlags {
        &self.flags
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn build_dir(&self) -> PathBuf {
        self.project_dir.join("build")
    }

    pub fn is_root(&self) -> bool {
        self.project_dir == self.root_dir
    }

    pub fn is_language(&self, language: ProjectLanguage) -> bool {
        self.language == language
    }

    pub fn is_type(&self, project_type: ProjectType) -> bool {
        self.project_type == project_type
    }

    pub fn is_framework(&self, framework: ProjectFramework) -> bool {
        self.framework == framework
    }
}
