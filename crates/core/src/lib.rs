//! projectcfg - convention engine for JVM build projects
//!
//! This crate provides functionality to:
//! - Declare what a project is (language, type, framework, feature flags)
//! - Decide which convention modules apply and run them in order
//! - Declare dependencies, platform constraints and plugins exactly once
//! - Reconcile managed blocks in generated property files without touching
//!   hand-written content
pub mod config;
pub mod context;
pub mod error;
pub mod host;
pub mod ledger;
pub mod modules;
pub mod orchestrator;
pub mod plugins;
pub mod reconcile;
pub mod workspace;

// Re-export commonly used types and traits
pub use error::{Error, Result};

// Re-export main API components
pub use config::{ProjectConfig, VersionPolicy};
pub use context::{FeatureFlags, ProjectContext, ProjectFramework, ProjectLanguage, ProjectType};
pub use host::{InMemoryProject, ProjectModel};
pub use ledger::DependencyLedger;
pub use modules::{ConventionModule, ModuleContext};
pub use orchestrator::{ModuleStatus, Orchestrator, RunReport};
pub use reconcile::{FileStatus, ManagedFileReconciler, PropertySet, WriteMode};
pub use workspace::{WorkspaceRun, run_workspace};
