//! Multi-project runs
//!
//! Builds one context and one in-memory host per project unit from a
//! [`ProjectConfig`] and runs a full pass for each. Subprojects run first so
//! the root sees their final plugins and source sets.

use crate::{
    config::ProjectConfig,
    context::ProjectContext,
    error::Result,
    host::{InMemoryProject, ProjectModel, SubprojectInfo},
    orchestrator::{Orchestrator, RunReport},
    reconcile::WriteMode,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Serialize)]
pub struct ProjectRun {
    pub context: ProjectContext,
    pub host: InMemoryProject,
    pub report: RunReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkspaceRun {
    pub root: ProjectRun,
    pub subprojects: Vec<ProjectRun>,
}

impl WorkspaceRun {
    pub fn runs(&self) -> impl Iterator<Item = &ProjectRun> {
        self.subprojects.iter().chain(std::iter::once(&self.root))
    }

    pub fn has_drift(&self) -> bool {
        self.runs().any(|run| run.report.has_drift())
    }
}

/// Seed a host with what the user declared
fn declared_host(
    context: &ProjectContext,
    plugins: &[String],
    dependencies: &BTreeMap<String, Vec<String>>,
) -> Result<InMemoryProject> {
    let mut host = InMemoryProject::new(context.name(), context.project_dir());
    for plugin in plugins {
        host = host.with_plugin(plugin)?;
    }
    for (bucket, coordinates) in dependencies {
        for coordinate in coordinates {
            host = host.with_dependency(bucket, coordinate)?;
        }
    }
    Ok(host)
}

/// Run the built-in conventions for the root project and every subproject
pub fn run_workspace(config: &ProjectConfig, root_dir: &Path, mode: WriteMode) -> Result<WorkspaceRun> {
    let orchestrator = Orchestrator::new(config.versions.clone()).with_mode(mode);

    let root_context = config.root_context(root_dir);
    let sub_contexts = config.subproject_contexts(&root_context);

    let mut subprojects = Vec::with_capacity(sub_contexts.len());
    for (context, sub_config) in sub_contexts.into_iter().zip(&config.subprojects) {
        info!(project = %context.name(), "running conventions for subproject");
        let mut host = declared_host(&context, &sub_config.plugins, &sub_config.dependencies)?;
        let report = orchestrator.run(&context, &mut host)?;
        subprojects.push(ProjectRun { context, host, report });
    }

    let mut root_host = declared_host(&root_context, &config.plugins, &config.dependencies)?;
    for run in &subprojects {
        root_host = root_host.with_subproject(SubprojectInfo {
            name: run.context.name().to_string(),
            plugins: run.host.plugins().to_vec(),
            main_source_dir: run.host.main_source_dir(),
        });
    }

    info!(project = %root_context.name(), "running conventions for root project");
    let report = orchestrator.run(&root_context, &mut root_host)?;

    Ok(WorkspaceRun {
        root: ProjectRun {
            context: root_context,
            host: root_host,
            report,
        },
        subprojects,
    })
}
