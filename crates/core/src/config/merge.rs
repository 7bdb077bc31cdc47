//! Flag layering: defaults -> root -> subproject
//!
//! Unset values fall through to the layer below, explicit values replace.

use crate::context::FeatureFlags;
use serde::{Deserialize, Serialize};

/// Partially specified feature flags as written in a configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FlagOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framework_metrics: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framework_db_migrate: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkstyle_rule_set: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkstyle_tool_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub java_version: Option<String>,
}

impl FlagOverrides {
    /// Resolve these overrides on top of `base`
    pub fn resolve(&self, base: &FeatureFlags) -> FeatureFlags {
        FeatureFlags {
            framework_metrics: self.framework_metrics.unwrap_or(base.framework_metrics),
            framework_db_migrate: self
                .framework_db_migrate
                .unwrap_or(base.framework_db_migrate),
            native: self.native.unwrap_or(base.native),
            checkstyle_rule_set: self
                .checkstyle_rule_set
                .clone()
                .unwrap_or_else(|| base.checkstyle_rule_set.clone()),
            checkstyle_tool_version: self
                .checkstyle_tool_version
                .clone()
                .unwrap_or_else(|| base.checkstyle_tool_version.clone()),
            java_version: self
                .java_version
                .clone()
                .unwrap_or_else(|| base.java_version.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_falls_through_to_base() {
        let overrides = FlagOverrides {
            native: Some(true),
            ..Default::default()
        };
        let flags = overrides.resolve(&FeatureFlags::default());

        assert!(flags.native);
        assert!(flags.framework_metrics);
        assert_eq!(flags.java_version, "17");
    }

    #[test]
    fn test_subproject_inherits_root_values() {
        let root = FlagOverrides {
            framework_metrics: Some(false),
            checkstyle_rule_set: Some("google".to_string()),
            ..Default::default()
        };
        let root_flags = root.resolve(&FeatureFlags::default());

        let sub = FlagOverrides {
            framework_db_migrate: Some(true),
            ..Default::default()
        };
        let sub_flags = sub.resolve(&root_flags);

        assert!(!sub_flags.framework_metrics);
        assert!(sub_flags.framework_db_migrate);
        assert_eq!(sub_flags.checkstyle_rule_set, "google");
    }
}
