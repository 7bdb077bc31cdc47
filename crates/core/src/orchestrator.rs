//! Drives convention modules through their lifecycle
//!
//! One pass per project: for every registered module, in order, `init` runs
//! unconditionally and `apply` runs when the module is applicable. The first
//! failure aborts the pass. Nothing is rolled back; a rerun converges.

use crate::{
    config::VersionPolicy,
    context::ProjectContext,
    error::{Error, Result},
    host::ProjectModel,
    ledger::{DependencyLedger, Origin},
    modules::{ConventionModule, ModuleContext, Phase, default_modules},
    reconcile::{FilePlan, FileStatus, ManagedFileReconciler, ManagedFileRegistry, WriteMode},
};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info, info_span};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleStatus {
    Applied,
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleOutcome {
    pub name: String,
    pub status: ModuleStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub module: String,
    pub status: FileStatus,
    pub fingerprint: String,
}

impl FileReport {
    fn new(module: &str, plan: &FilePlan) -> Self {
        Self {
            path: plan.path.clone(),
            module: module.to_string(),
            status: plan.status,
            fingerprint: plan.fingerprint(),
        }
    }
}

/// What a single pass did
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub project: String,
    pub mode: WriteMode,
    pub modules: Vec<ModuleOutcome>,
    pub files: Vec<FileReport>,
    pub ledger: DependencyLedger,
}

impl RunReport {
    pub fn status_of(&self, module: &str) -> Option<ModuleStatus> {
        self.modules
            .iter()
            .find(|m| m.name == module)
            .map(|m| m.status)
    }

    pub fn applied(&self) -> impl Iterator<Item = &str> {
        self.modules
            .iter()
            .filter(|m| m.status == ModuleStatus::Applied)
            .map(|m| m.name.as_str())
    }

    /// Whether any generated file differs from what is on disk
    pub fn has_drift(&self) -> bool {
        self.files.iter().any(|f| f.status.is_drift())
    }
}

pub struct Orchestrator {
    versions: VersionPolicy,
    modules: Vec<Box<dyn ConventionModule>>,
    mode: WriteMode,
}

impl Orchestrator {
    /// Orchestrator with the built-in modules
    pub fn new(versions: VersionPolicy) -> Self {
        Self::with_modules(versions, default_modules())
    }

    /// Orchestrator with a caller-controlled module order
    pub fn with_modules(versions: VersionPolicy, modules: Vec<Box<dyn ConventionModule>>) -> Self {
        Self {
            versions,
            modules,
            mode: WriteMode::Write,
        }
    }

    pub fn with_mode(mut self, mode: WriteMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn versions(&self) -> &VersionPolicy {
        &self.versions
    }

    pub fn modules(&self) -> impl Iterator<Item = &dyn ConventionModule> {
        self.modules.iter().map(|m| m.as_ref())
    }

    /// Run every module once against `project`
    pub fn run(&self, project: &ProjectContext, host: &mut dyn ProjectModel) -> Result<RunReport> {
        let span = info_span!("convention_run", project = %project.name());
        let _enter = span.enter();

        let mut ledger = DependencyLedger::new();
        for (bucket, coordinate) in host.declared_dependencies() {
            ledger.ensure_dependency(&bucket, &coordinate.to_string(), Origin::Declared)?;
        }
        for coordinate in host.declared_platforms() {
            ledger.ensure_platform_constraint(&coordinate.to_string(), Origin::Declared)?;
        }

        let reconciler = ManagedFileReconciler::new(self.mode);
        let mut files = ManagedFileRegistry::new();
        let mut generated = Vec::new();
        let mut outcomes = Vec::with_capacity(self.modules.len());
        let mut reports = Vec::new();

        info!(modules = self.modules.len(), mode = ?self.mode, "starting convention run");

        for module in &self.modules {
            let name = module.name();

            let mut ctx = ModuleContext::new(
                name,
                Phase::Init,
                project,
                &self.versions,
                &mut ledger,
                &mut *host,
                &mut files,
                &reconciler,
                &mut generated,
            );
            module
                .init(&mut ctx)
                .map_err(|e| module_error(name, "init", e))?;

            if !module.is_applicable(project) {
                debug!(module = name, "not applicable, skipping");
                outcomes.push(ModuleOutcome {
                    name: name.to_string(),
                    status: ModuleStatus::Skipped,
                });
                continue;
            }

            let mut ctx = ModuleContext::new(
                name,
                Phase::Apply,
                project,
                &self.versions,
                &mut ledger,
                &mut *host,
                &mut files,
                &reconciler,
                &mut generated,
            );
            if let Err(e) = module.apply(&mut ctx) {
                files.discard_pending(name);
                return Err(module_error(name, "apply", e));
            }

            for (path, properties) in files.take_pending(name) {
                let plan = reconciler
                    .reconcile(&path, &properties)
                    .map_err(|e| module_error(name, "apply", e))?;
                reports.push(FileReport::new(name, &plan));
            }
            reports.extend(generated.drain(..).map(|plan| FileReport::new(name, &plan)));

            info!(module = name, "applied");
            outcomes.push(ModuleOutcome {
                name: name.to_string(),
                status: ModuleStatus::Applied,
            });
        }

        Ok(RunReport {
            project: project.name().to_string(),
            mode: self.mode,
            modules: outcomes,
            files: reports,
            ledger,
        })
    }
}

fn module_error(module: &str, operation: &'static str, source: Error) -> Error {
    Error::Module {
        module: module.to_string(),
        operation,
        source: Box::new(source),
    }
}
