//! Shared fixtures for the integration tests
//!
//! A [`Fixture`] is a throwaway project directory plus helpers to build
//! contexts and run the built-in conventions against an in-memory host.

use projectcfg_core::{
    FeatureFlags, InMemoryProject, Orchestrator, ProjectContext, ProjectFramework, ProjectLanguage,
    ProjectType, Result, RunReport, VersionPolicy, WriteMode,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    pub fn new() -> std::io::Result<Self> {
        Ok(Self { dir: TempDir::new()? })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root().join(relative)
    }

    pub fn write(&self, relative: impl AsRef<Path>, content: &str) -> std::io::Result<()> {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)
    }

    pub fn read(&self, relative: impl AsRef<Path>) -> std::io::Result<String> {
        fs::read_to_string(self.path(relative))
    }

    pub fn exists(&self, relative: impl AsRef<Path>) -> bool {
        self.path(relative).exists()
    }

    /// Root project context in this directory
    pub fn context(
        &self,
        language: ProjectLanguage,
        project_type: ProjectType,
        framework: ProjectFramework,
        flags: FeatureFlags,
    ) -> ProjectContext {
        ProjectContext::root("fixture", self.root(), language, project_type, framework, flags)
    }

    /// Empty host for this directory
    pub fn host(&self) -> InMemoryProject {
        InMemoryProject::new("fixture", self.root())
    }

    /// One pass of the built-in modules
    pub fn run(&self, context: &ProjectContext, host: &mut InMemoryProject) -> Result<RunReport> {
        Orchestrator::new(VersionPolicy::default()).run(context, host)
    }

    /// One pass of the built-in modules without writing anything
    pub fn check(&self, context: &ProjectContext, host: &mut InMemoryProject) -> Result<RunReport> {
        Orchestrator::new(VersionPolicy::default())
            .with_mode(WriteMode::Check)
            .run(context, host)
    }
}

/// Java application with default flags
pub fn java_application(fixture: &Fixture, framework: ProjectFramework) -> ProjectContext {
    fixture.context(
        ProjectLanguage::Java,
        ProjectType::Application,
        framework,
        FeatureFlags::default(),
    )
}
