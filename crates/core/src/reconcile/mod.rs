//! Managed file reconciliation
//!
//! [`ManagedFileReconciler`] converges one file toward a property set.
//! [`ManagedFileRegistry`] stages, for a single run, what each module wants in
//! its managed files. A file has exactly one owning module per run and is
//! written once, after that module's apply step succeeded.

mod atomic;
pub mod managed_file;
pub mod markers;
pub mod properties;

pub use atomic::write_atomically;
pub use managed_file::{FilePlan, FileStatus, ManagedFileReconciler, WriteMode};
pub use properties::PropertySet;

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug)]
struct Contribution {
    owner: String,
    properties: PropertySet,
    flushed: bool,
}

/// Per-run staging of managed keys, keyed by target path
#[derive(Debug, Default)]
pub struct ManagedFileRegistry {
    files: BTreeMap<PathBuf, Contribution>,
}

impl ManagedFileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage `module`'s keys for `path`.
    ///
    /// Repeated contributions from the owning module accumulate in order; a
    /// key may appear only once. Any other module targeting the same path is
    /// rejected.
    pub fn contribute(&mut self, module: &str, path: &Path, properties: PropertySet) -> Result<()> {
        properties.validate(path)?;

        match self.files.get_mut(path) {
            Some(existing) if existing.owner != module => Err(Error::reconciliation(
                path,
                format!(
                    "module '{module}' cannot manage this file, it is owned by module '{}'",
                    existing.owner
                ),
            )),
            Some(existing) if existing.flushed => Err(Error::reconciliation(
                path,
                format!("module '{module}' already wrote this file during this run"),
            )),
            Some(existing) => {
                let mut combined = existing.properties.clone();
                combined.extend(properties);
                combined.validate(path)?;
                existing.properties = combined;
                Ok(())
            }
            None => {
                self.files.insert(
                    path.to_path_buf(),
                    Contribution {
                        owner: module.to_string(),
                        properties,
                        flushed: false,
                    },
                );
                Ok(())
            }
        }
    }

    /// Hand out `module`'s staged files, marking them written
    pub fn take_pending(&mut self, module: &str) -> Vec<(PathBuf, PropertySet)> {
        self.files
            .iter_mut()
            .filter(|(_, c)| c.owner == module && !c.flushed)
            .map(|(path, c)| {
                c.flushed = true;
                (path.clone(), c.properties.clone())
            })
            .collect()
    }

    /// Drop whatever `module` staged without writing it
    pub fn discard_pending(&mut self, module: &str) {
        self.files.retain(|_, c| c.owner != module || c.flushed);
    }

    pub fn owner(&self, path: &Path) -> Option<&str> {
        self.files.get(path).map(|c| c.owner.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contributions_accumulate_in_order() {
        let mut registry = ManagedFileRegistry::new();
        let path = Path::new("app.properties");

        registry
            .contribute("spring-boot", path, PropertySet::new().with("server.port", "8080"))
            .unwrap();
        registry
            .contribute("spring-boot", path, PropertySet::new().with("management.server.port", "8081"))
            .unwrap();

        let pending = registry.take_pending("spring-boot");
        assert_eq!(pending.len(), 1);
        assert_eq!(
            pending[0].1.keys().collect::<Vec<_>>(),
            vec!["server.port", "management.server.port"]
        );
        assert!(registry.take_pending("spring-boot").is_empty());
    }

    #[test]
    fn test_duplicate_key_across_contributions_is_rejected() {
        let mut registry = ManagedFileRegistry::new();
        let path = Path::new("app.properties");

        registry
            .contribute("spring-boot", path, PropertySet::new().with("server.port", "8080"))
            .unwrap();
        let err = registry
            .contribute("spring-boot", path, PropertySet::new().with("server.port", "9090"))
            .unwrap_err();

        assert!(err.to_string().contains("duplicate managed key 'server.port'"));
    }

    #[test]
    fn test_second_module_on_same_file_is_rejected() {
        let mut registry = ManagedFileRegistry::new();
        let path = Path::new("app.properties");

        registry
            .contribute("spring-boot", path, PropertySet::new().with("server.port", "8080"))
            .unwrap();
        let err = registry
            .contribute("quarkus", path, PropertySet::new().with("quarkus.http.port", "8080"))
            .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("'quarkus'"));
        assert!(message.contains("'spring-boot'"));
        assert_eq!(registry.owner(path), Some("spring-boot"));
    }

    #[test]
    fn test_discard_pending_releases_the_file() {
        let mut registry = ManagedFileRegistry::new();
        let path = Path::new("app.properties");

        registry
            .contribute("a", path, PropertySet::new().with("k", "1"))
            .unwrap();
        registry.discard_pending("a");

        assert_eq!(registry.owner(path), None);
        assert!(registry.take_pending("a").is_empty());
    }
}
