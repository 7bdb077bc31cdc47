//! Idempotent plugin application over the host model

use crate::{error::Result, host::ProjectModel};
use tracing::{debug, info};

/// The only path through which convention modules apply plugins
pub struct PluginApplier<'a> {
    host: &'a mut dyn ProjectModel,
}

impl<'a> PluginApplier<'a> {
    pub fn new(host: &'a mut dyn ProjectModel) -> Self {
        Self { host }
    }

    /// Apply `plugin_id` unless the host already has it.
    ///
    /// Returns `true` when the plugin was applied by this call.
    pub fn ensure_plugin_applied(&mut self, plugin_id: &str) -> Result<bool> {
        if self.host.is_plugin_applied(plugin_id) {
            debug!(plugin = plugin_id, "plugin already applied");
            return Ok(false);
        }

        info!(plugin = plugin_id, project = %self.host.name(), "applying plugin");
        self.host.apply_plugin(plugin_id)?;
        Ok(true)
    }
}
