//! Version pinning for dependencies declared by convention modules

use serde::{Deserialize, Serialize};

/// Versions used by the built-in modules.
///
/// Passed into the orchestrator once per run; modules never mutate it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct VersionPolicy {
    pub kotlin: String,
    pub junit5: String,
    pub spring_boot: String,
    pub spring_native: String,
    pub quarkus: String,
    pub disruptor: String,
    pub micrometer: String,
}

impl Default for VersionPolicy {
    fn default() -> Self {
        Self {
            kotlin: "1.6.10".to_string(),
            junit5: "5.8.2".to_string(),
            spring_boot: "2.6.3".to_string(),
            // must stay compatible with spring_boot
            spring_native: "0.11.1".to_string(),
            quarkus: "2.6.3.Final".to_string(),
            disruptor: "3.4.4".to_string(),
            micrometer: "1.8.1".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let policy: VersionPolicy = serde_json::from_str(r#"{"spring_boot": "2.7.0"}"#).unwrap();
        assert_eq!(policy.spring_boot, "2.7.0");
        assert_eq!(policy.junit5, VersionPolicy::default().junit5);
    }
}
