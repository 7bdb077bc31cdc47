//! Dependency ledger
//!
//! Tracks every dependency coordinate, platform constraint and exclusion
//! declared during one run. Entries are keyed by `group:artifact` per bucket,
//! so repeated declarations never duplicate. The ledger is rebuilt from
//! scratch every run and never persisted.

pub mod coordinate;

pub use coordinate::Coordinate;

use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Who put an entry into the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "name")]
pub enum Origin {
    /// Already declared by the user in the host build
    Declared,
    /// Added by a convention module
    Module(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
    pub coordinate: Coordinate,
    pub origin: Origin,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Exclusion {
    pub bucket: String,
    pub group: String,
    pub module: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DependencyLedger {
    buckets: BTreeMap<String, Vec<LedgerEntry>>,
    platforms: Vec<LedgerEntry>,
    exclusions: Vec<Exclusion>,
}

impl DependencyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `coordinate` to `bucket` unless its `group:artifact` is already there.
    ///
    /// Returns `true` when the entry was added. The first registered version
    /// wins; a later declaration with another version is ignored.
    pub fn ensure_dependency(&mut self, bucket: &str, coordinate: &str, origin: Origin) -> Result<bool> {
        let coordinate = Coordinate::parse(coordinate)?;
        let entries = self.buckets.entry(bucket.to_string()).or_default();

        if let Some(existing) = entries.iter().find(|e| e.coordinate.key() == coordinate.key()) {
            if existing.coordinate != coordinate {
                debug!(
                    bucket,
                    existing = %existing.coordinate,
                    ignored = %coordinate,
                    "dependency already present with another version, keeping first"
                );
            }
            return Ok(false);
        }

        entries.push(LedgerEntry { coordinate, origin });
        Ok(true)
    }

    /// Register a BOM-style platform constraint.
    ///
    /// Re-registering the same constraint is a no-op; registering the same
    /// platform with another version is a [`Error::DependencyConflict`].
    pub fn ensure_platform_constraint(&mut self, coordinate: &str, origin: Origin) -> Result<bool> {
        let coordinate = Coordinate::parse(coordinate)?;
        if coordinate.version.is_none() {
            return Err(Error::InvalidCoordinate(format!(
                "{coordinate} (platform constraints need a version)"
            )));
        }

        if let Some(existing) = self
            .platforms
            .iter()
            .find(|e| e.coordinate.key() == coordinate.key())
        {
            if existing.coordinate == coordinate {
                return Ok(false);
            }
            return Err(Error::DependencyConflict {
                coordinate: coordinate.key(),
                existing: existing.coordinate.to_string(),
                requested: coordinate.to_string(),
            });
        }

        self.platforms.push(LedgerEntry { coordinate, origin });
        Ok(true)
    }

    /// Record an exclusion of `group:module` from `bucket`
    pub fn exclude_transitive(&mut self, bucket: &str, group: &str, module: &str) -> bool {
        let exclusion = Exclusion {
            bucket: bucket.to_string(),
            group: group.to_string(),
            module: module.to_string(),
        };
        if self.exclusions.contains(&exclusion) {
            return false;
        }
        self.exclusions.push(exclusion);
        true
    }

    /// Whether any of `buckets` holds a coordinate starting with `prefix`
    pub fn has_dependency(&self, buckets: &[&str], prefix: &str) -> bool {
        buckets.iter().any(|bucket| {
            self.buckets
                .get(*bucket)
                .is_some_and(|entries| entries.iter().any(|e| e.coordinate.matches_prefix(prefix)))
        })
    }

    pub fn is_excluded(&self, bucket: &str, group: &str, module: &str) -> bool {
        self.exclusions
            .iter()
            .any(|e| e.bucket == bucket && e.group == group && e.module == module)
    }

    pub fn entries(&self, bucket: &str) -> &[LedgerEntry] {
        self.buckets.get(bucket).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn buckets(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    pub fn platforms(&self) -> &[LedgerEntry] {
        &self.platforms
    }

    pub fn exclusions(&self) -> &[Exclusion] {
        &self.exclusions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(name: &str) -> Origin {
        Origin::Module(name.to_string())
    }

    #[test]
    fn test_ensure_dependency_twice_keeps_one_entry() {
        let mut ledger = DependencyLedger::new();
        assert!(ledger.ensure_dependency("implementation", "g:a:1.0", module("m")).unwrap());
        assert!(!ledger.ensure_dependency("implementation", "g:a:1.0", module("m")).unwrap());

        assert_eq!(ledger.entries("implementation").len(), 1);
    }

    #[test]
    fn test_first_registered_version_wins() {
        let mut ledger = DependencyLedger::new();
        ledger.ensure_dependency("implementation", "g:a:1.0", Origin::Declared).unwrap();
        let added = ledger.ensure_dependency("implementation", "g:a:2.0", module("m")).unwrap();

        assert!(!added);
        let entries = ledger.entries("implementation");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].coordinate.version.as_deref(), Some("1.0"));
        assert_eq!(entries[0].origin, Origin::Declared);
    }

    #[test]
    fn test_buckets_are_independent() {
        let mut ledger = DependencyLedger::new();
        ledger.ensure_dependency("implementation", "g:a:1.0", module("m")).unwrap();
        ledger.ensure_dependency("testImplementation", "g:a:1.0", module("m")).unwrap();

        assert_eq!(ledger.entries("implementation").len(), 1);
        assert_eq!(ledger.entries("testImplementation").len(), 1);
        assert_eq!(ledger.buckets().collect::<Vec<_>>(), vec!["implementation", "testImplementation"]);
    }

    #[test]
    fn test_invalid_coordinate_is_rejected() {
        let mut ledger = DependencyLedger::new();
        let err = ledger.ensure_dependency("implementation", "nonsense", module("m")).unwrap_err();
        assert!(matches!(err, Error::InvalidCoordinate(_)));
        assert!(ledger.entries("implementation").is_empty());
    }

    #[test]
    fn test_platform_constraint_conflict_is_surfaced() {
        let mut ledger = DependencyLedger::new();
        assert!(ledger.ensure_platform_constraint("g:bom:1.0", module("a")).unwrap());
        assert!(!ledger.ensure_platform_constraint("g:bom:1.0", module("a")).unwrap());

        let err = ledger.ensure_platform_constraint("g:bom:2.0", module("b")).unwrap_err();
        match err {
            Error::DependencyConflict { coordinate, existing, requested } => {
                assert_eq!(coordinate, "g:bom");
                assert_eq!(existing, "g:bom:1.0");
                assert_eq!(requested, "g:bom:2.0");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(ledger.platforms().len(), 1);
    }

    #[test]
    fn test_platform_constraint_requires_version() {
        let mut ledger = DependencyLedger::new();
        assert!(ledger.ensure_platform_constraint("g:bom", module("a")).is_err());
    }

    #[test]
    fn test_exclusions_are_deduplicated() {
        let mut ledger = DependencyLedger::new();
        assert!(ledger.exclude_transitive("implementation", "g", "logging"));
        assert!(!ledger.exclude_transitive("implementation", "g", "logging"));

        assert_eq!(ledger.exclusions().len(), 1);
        assert!(ledger.is_excluded("implementation", "g", "logging"));
        assert!(!ledger.is_excluded("testImplementation", "g", "logging"));
    }

    #[test]
    fn test_has_dependency_sees_entries_from_same_run() {
        let mut ledger = DependencyLedger::new();
        assert!(!ledger.has_dependency(&["implementation"], "org.springframework.boot:spring-boot-starter-web"));

        ledger
            .ensure_dependency("implementation", "org.springframework.boot:spring-boot-starter-web:2.6.3", Origin::Declared)
            .unwrap();

        assert!(ledger.has_dependency(&["implementation"], "org.springframework.boot:spring-boot-starter-web"));
        assert!(!ledger.has_dependency(&["testImplementation"], "org.springframework.boot:spring-boot-starter-web"));
        assert!(ledger.has_dependency(&["api", "implementation"], "org.springframework.boot"));
    }
}
