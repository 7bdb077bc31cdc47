//! Host build model interface
//!
//! Convention modules never talk to a build tool directly. Every mutation of
//! the host project goes through [`ProjectModel`], which keeps the engine
//! independent of any concrete plugin API.

pub mod in_memory;

pub use in_memory::InMemoryProject;

use crate::{error::Result, ledger::Coordinate};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A task as registered in the host build
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskSpec {
    pub name: String,
    /// Host task type, e.g. `Test` or `Checkstyle`
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub excludes: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub settings: BTreeMap<String, String>,
}

impl TaskSpec {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            group: None,
            enabled: true,
            depends_on: Vec::new(),
            sources: Vec::new(),
            excludes: Vec::new(),
            settings: BTreeMap::new(),
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.sources.push(source.into());
        self
    }

    pub fn with_exclude(mut self, pattern: impl Into<String>) -> Self {
        self.excludes.push(pattern.into());
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.settings.insert(key.into(), value.into());
    }

    pub fn depend_on(&mut self, task: impl Into<String>) {
        let task = task.into();
        if !self.depends_on.contains(&task) {
            self.depends_on.push(task);
        }
    }
}

/// What the host knows about one of its subprojects
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubprojectInfo {
    pub name: String,
    pub plugins: Vec<String>,
    /// `None` when the subproject exposes no main source set
    pub main_source_dir: Option<PathBuf>,
}

impl SubprojectInfo {
    pub fn has_plugin(&self, id: &str) -> bool {
        self.plugins.iter().any(|p| p == id)
    }
}

/// Operations the engine needs from the host build model
pub trait ProjectModel {
    fn name(&self) -> &str;

    fn apply_plugin(&mut self, id: &str) -> Result<()>;

    fn is_plugin_applied(&self, id: &str) -> bool;

    fn add_dependency(&mut self, bucket: &str, coordinate: &Coordinate) -> Result<()>;

    fn add_platform_dependency(&mut self, coordinate: &Coordinate) -> Result<()>;

    fn exclude_transitive(&mut self, bucket: &str, group: &str, module: &str) -> Result<()>;

    fn add_repository(&mut self, url: &str) -> Result<()>;

    fn register_task(&mut self, task: TaskSpec) -> Result<()>;

    fn has_task(&self, name: &str) -> bool;

    /// Run `configure` against an existing task; `false` if there is no such task
    fn configure_task(&mut self, name: &str, configure: &mut dyn FnMut(&mut TaskSpec)) -> bool;

    /// Set a value on a named build extension, e.g. `checkstyle.toolVersion`
    fn configure_extension(&mut self, extension: &str, key: &str, value: &str);

    fn has_dependency(&self, buckets: &[&str], prefix: &str) -> bool;

    /// Dependencies declared before the engine ran, in declaration order
    fn declared_dependencies(&self) -> Vec<(String, Coordinate)>;

    /// Platform constraints declared before the engine ran
    fn declared_platforms(&self) -> Vec<Coordinate>;

    /// Main source directory of this project, if it has one
    fn main_source_dir(&self) -> Option<PathBuf>;

    fn subprojects(&self) -> Vec<SubprojectInfo>;
}
