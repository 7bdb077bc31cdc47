//! Core trait for convention modules

use super::ModuleContext;
use crate::{context::ProjectContext, error::Result};

/// One opinionated configuration concern, applied conditionally.
///
/// Modules are stateless; every run drives them through
/// `init -> is_applicable -> apply` exactly once.
pub trait ConventionModule: Send + Sync {
    /// Get the name of this module
    fn name(&self) -> &'static str;

    /// Register constraints that must exist whether or not the module applies.
    /// Always called, before [`ConventionModule::is_applicable`].
    fn init(&self, _ctx: &mut ModuleContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Pure, cheap predicate deciding whether [`ConventionModule::apply`] runs
    fn is_applicable(&self, project: &ProjectContext) -> bool;

    /// Apply the convention. Must be idempotent.
    fn apply(&self, ctx: &mut ModuleContext<'_>) -> Result<()>;
}
