//! Everything a module may touch while it runs

use crate::{
    config::VersionPolicy,
    context::ProjectContext,
    error::{Error, Result},
    host::{ProjectModel, SubprojectInfo, TaskSpec},
    ledger::{DependencyLedger, Origin},
    plugins::PluginApplier,
    reconcile::{FilePlan, ManagedFileReconciler, ManagedFileRegistry, PropertySet},
};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Lifecycle step a [`ModuleContext`] was handed out for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    Apply,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Init => "init",
            Phase::Apply => "apply",
        }
    }
}

/// Mutable view of one run, scoped to a single module
pub struct ModuleContext<'a> {
    module: &'static str,
    phase: Phase,
    project: &'a ProjectContext,
    versions: &'a VersionPolicy,
    ledger: &'a mut DependencyLedger,
    host: &'a mut dyn ProjectModel,
    files: &'a mut ManagedFileRegistry,
    reconciler: &'a ManagedFileReconciler,
    generated: &'a mut Vec<FilePlan>,
}

impl<'a> ModuleContext<'a> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        module: &'static str,
        phase: Phase,
        project: &'a ProjectContext,
        versions: &'a VersionPolicy,
        ledger: &'a mut DependencyLedger,
        host: &'a mut dyn ProjectModel,
        files: &'a mut ManagedFileRegistry,
        reconciler: &'a ManagedFileReconciler,
        generated: &'a mut Vec<FilePlan>,
    ) -> Self {
        Self {
            module,
            phase,
            project,
            versions,
            ledger,
            host,
            files,
            reconciler,
            generated,
        }
    }

    pub fn module(&self) -> &'static str {
        self.module
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn project(&self) -> &ProjectContext {
        self.project
    }

    pub fn versions(&self) -> &VersionPolicy {
        self.versions
    }

    /// Declare `coordinate` in `bucket` unless already present
    pub fn ensure_dependency(&mut self, bucket: &str, coordinate: &str) -> Result<bool> {
        let added = self
            .ledger
            .ensure_dependency(bucket, coordinate, Origin::Module(self.module.to_string()))?;

        if added {
            if let Some(entry) = self.ledger.entries(bucket).last() {
                debug!(module = self.module, bucket, coordinate = %entry.coordinate, "adding dependency");
                self.host.add_dependency(bucket, &entry.coordinate)?;
            }
        }
        Ok(added)
    }

    pub fn ensure_platform_constraint(&mut self, coordinate: &str) -> Result<bool> {
        let added = self
            .ledger
            .ensure_platform_constraint(coordinate, Origin::Module(self.module.to_string()))?;

        if added {
            if let Some(entry) = self.ledger.platforms().last() {
                debug!(module = self.module, platform = %entry.coordinate, "adding platform constraint");
                self.host.add_platform_dependency(&entry.coordinate)?;
            }
        }
        Ok(added)
    }

    pub fn exclude_transitive(&mut self, bucket: &str, group: &str, module: &str) -> Result<bool> {
        let added = self.ledger.exclude_transitive(bucket, group, module);
        if added {
            debug!(module = self.module, bucket, excluded = %format!("{group}:{module}"), "excluding transitive dependency");
            self.host.exclude_transitive(bucket, group, module)?;
        }
        Ok(added)
    }

    /// Whether a dependency matching `prefix` was declared by the user or by
    /// an earlier module of this run
    pub fn has_dependency(&self, buckets: &[&str], prefix: &str) -> bool {
        self.ledger.has_dependency(buckets, prefix) || self.host.has_dependency(buckets, prefix)
    }

    pub fn ensure_plugin_applied(&mut self, plugin_id: &str) -> Result<bool> {
        PluginApplier::new(&mut *self.host).ensure_plugin_applied(plugin_id)
    }

    pub fn is_plugin_applied(&self, plugin_id: &str) -> bool {
        self.host.is_plugin_applied(plugin_id)
    }

    pub fn add_repository(&mut self, url: &str) -> Result<()> {
        self.host.add_repository(url)
    }

    /// Register `task` unless a task with its name exists
    pub fn ensure_task(&mut self, task: TaskSpec) -> Result<bool> {
        if self.host.has_task(&task.name) {
            debug!(module = self.module, task = %task.name, "task already registered");
            return Ok(false);
        }
        debug!(module = self.module, task = %task.name, kind = %task.kind, "registering task");
        self.host.register_task(task)?;
        Ok(true)
    }

    pub fn configure_task(&mut self, name: &str, mut configure: impl FnMut(&mut TaskSpec)) -> bool {
        let found = self.host.configure_task(name, &mut configure);
        if !found {
            debug!(module = self.module, task = name, "no such task, nothing to configure");
        }
        found
    }

    pub fn configure_extension(&mut self, extension: &str, key: &str, value: &str) {
        debug!(module = self.module, "setting [{extension}.{key}] to [{value}]");
        self.host.configure_extension(extension, key, value);
    }

    pub fn main_source_dir(&self) -> Option<PathBuf> {
        self.host.main_source_dir()
    }

    pub fn subprojects(&self) -> Vec<SubprojectInfo> {
        self.host.subprojects()
    }

    /// Stage managed properties for `relative_path` under the project dir.
    ///
    /// The file is written once this module's apply step has completed.
    pub fn write_managed(&mut self, relative_path: impl AsRef<Path>, properties: PropertySet) -> Result<()> {
        let path = self.project.project_dir().join(relative_path);
        self.ensure_apply_phase(&path)?;
        self.files.contribute(self.module, &path, properties)
    }

    /// Converge a file that is generated in full, such as a ruleset copy
    pub fn write_generated(&mut self, path: &Path, content: &str) -> Result<()> {
        self.ensure_apply_phase(path)?;
        let plan = self.reconciler.reconcile_owned(path, content)?;
        self.generated.push(plan);
        Ok(())
    }

    // init runs for inapplicable modules too, so it must not touch files
    fn ensure_apply_phase(&self, path: &Path) -> Result<()> {
        if self.phase == Phase::Apply {
            return Ok(());
        }
        Err(Error::reconciliation(
            path,
            format!("module '{}' may only write files during apply, not {}", self.module, self.phase.as_str()),
        ))
    }
}
