//! In-memory host build model
//!
//! Records every mutation so the result of a run can be inspected or printed
//! as a build plan. It is strict in the same places a real build tool is:
//! applying a plugin twice, registering a task twice or declaring the same
//! dependency twice are errors.

use super::{ProjectModel, SubprojectInfo, TaskSpec};
use crate::{
    error::{Error, Result},
    ledger::{Coordinate, Exclusion},
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

const JAVA_PLUGINS: [&str; 2] = ["java", "java-library"];

#[derive(Debug, Clone, Serialize)]
pub struct InMemoryProject {
    name: String,
    project_dir: PathBuf,
    plugins: Vec<String>,
    dependencies: BTreeMap<String, Vec<Coordinate>>,
    platforms: Vec<Coordinate>,
    exclusions: Vec<Exclusion>,
    repositories: Vec<String>,
    tasks: BTreeMap<String, TaskSpec>,
    extensions: BTreeMap<String, BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    subprojects: Vec<SubprojectInfo>,
}

impl InMemoryProject {
    pub fn new(name: impl Into<String>, project_dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            project_dir: project_dir.into(),
            plugins: Vec::new(),
            dependencies: BTreeMap::new(),
            platforms: Vec::new(),
            exclusions: Vec::new(),
            repositories: Vec::new(),
            tasks: BTreeMap::new(),
            extensions: BTreeMap::new(),
            subprojects: Vec::new(),
        }
    }

    /// Seed a plugin the user applied themselves
    pub fn with_plugin(mut self, id: &str) -> Result<Self> {
        self.apply_plugin(id)?;
        Ok(self)
    }

    /// Seed a dependency the user declared themselves
    pub fn with_dependency(mut self, bucket: &str, coordinate: &str) -> Result<Self> {
        let coordinate = Coordinate::parse(coordinate)?;
        self.add_dependency(bucket, &coordinate)?;
        Ok(self)
    }

    pub fn with_subproject(mut self, info: SubprojectInfo) -> Self {
        self.subprojects.push(info);
        self
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn plugins(&self) -> &[String] {
        &self.plugins
    }

    pub fn dependencies(&self, bucket: &str) -> &[Coordinate] {
        self.dependencies.get(bucket).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn platforms(&self) -> &[Coordinate] {
        &self.platforms
    }

    pub fn exclusions(&self) -> &[Exclusion] {
        &self.exclusions
    }

    pub fn repositories(&self) -> &[String] {
        &self.repositories
    }

    pub fn task(&self, name: &str) -> Option<&TaskSpec> {
        self.tasks.get(name)
    }

    pub fn extension(&self, extension: &str, key: &str) -> Option<&str> {
        self.extensions
            .get(extension)
            .and_then(|values| values.get(key))
            .map(String::as_str)
    }

    fn is_java(&self) -> bool {
        JAVA_PLUGINS.iter().any(|id| self.is_plugin_applied(id))
    }

    // What the java plugins contribute to a real build
    fn add_java_conventions(&mut self) {
        for (name, kind) in [("jar", "Jar"), ("cleanTest", "Delete"), ("test", "Test")] {
            self.tasks
                .entry(name.to_string())
                .or_insert_with(|| TaskSpec::new(name, kind));
        }
    }
}

impl ProjectModel for InMemoryProject {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply_plugin(&mut self, id: &str) -> Result<()> {
        if self.is_plugin_applied(id) {
            return Err(Error::Host(format!(
                "plugin '{id}' is already applied to '{}'",
                self.name
            )));
        }
        debug!(project = %self.name, plugin = id, "plugin applied");
        self.plugins.push(id.to_string());

        if JAVA_PLUGINS.contains(&id) {
            self.add_java_conventions();
        }
        Ok(())
    }

    fn is_plugin_applied(&self, id: &str) -> bool {
        self.plugins.iter().any(|p| p == id)
    }

    fn add_dependency(&mut self, bucket: &str, coordinate: &Coordinate) -> Result<()> {
        let entries = self.dependencies.entry(bucket.to_string()).or_default();
        if entries.iter().any(|c| c.key() == coordinate.key()) {
            return Err(Error::Host(format!(
                "'{}' is already declared in '{bucket}'",
                coordinate.key()
            )));
        }
        entries.push(coordinate.clone());
        Ok(())
    }

    fn add_platform_dependency(&mut self, coordinate: &Coordinate) -> Result<()> {
        if self.platforms.iter().any(|c| c.key() == coordinate.key()) {
            return Err(Error::Host(format!(
                "platform '{}' is already declared",
                coordinate.key()
            )));
        }
        self.platforms.push(coordinate.clone());
        Ok(())
    }

    fn exclude_transitive(&mut self, bucket: &str, group: &str, module: &str) -> Result<()> {
        let exclusion = Exclusion {
            bucket: bucket.to_string(),
            group: group.to_string(),
            module: module.to_string(),
        };
        if !self.exclusions.contains(&exclusion) {
            self.exclusions.push(exclusion);
        }
        Ok(())
    }

    fn add_repository(&mut self, url: &str) -> Result<()> {
        if !self.repositories.iter().any(|r| r == url) {
            self.repositories.push(url.to_string());
        }
        Ok(())
    }

    fn register_task(&mut self, task: TaskSpec) -> Result<()> {
        if self.tasks.contains_key(&task.name) {
            return Err(Error::Host(format!(
                "task '{}' is already registered in '{}'",
                task.name, self.name
            )));
        }
        self.tasks.insert(task.name.clone(), task);
        Ok(())
    }

    fn has_task(&self, name: &str) -> bool {
        self.tasks.contains_key(name)
    }

    fn configure_task(&mut self, name: &str, configure: &mut dyn FnMut(&mut TaskSpec)) -> bool {
        match self.tasks.get_mut(name) {
            Some(task) => {
                configure(task);
                true
            }
            None => false,
        }
    }

    fn configure_extension(&mut self, extension: &str, key: &str, value: &str) {
        self.extensions
            .entry(extension.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    fn has_dependency(&self, buckets: &[&str], prefix: &str) -> bool {
        buckets.iter().any(|bucket| {
            self.dependencies(bucket)
                .iter()
                .any(|c| c.matches_prefix(prefix))
        })
    }

    fn declared_dependencies(&self) -> Vec<(String, Coordinate)> {
        self.dependencies
            .iter()
            .flat_map(|(bucket, coords)| coords.iter().map(|c| (bucket.clone(), c.clone())))
            .collect()
    }

    fn declared_platforms(&self) -> Vec<Coordinate> {
        self.platforms.clone()
    }

    fn main_source_dir(&self) -> Option<PathBuf> {
        self.is_java()
            .then(|| self.project_dir.join("src").join("main").join("java"))
    }

    fn subprojects(&self) -> Vec<SubprojectInfo> {
        self.subprojects.clone()
    }
}
