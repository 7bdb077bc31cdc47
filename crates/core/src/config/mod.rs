//! Declared configuration for projectcfg

pub mod merge;
mod settings;
pub mod versions;

// Re-export main types
pub use merge::FlagOverrides;
pub use settings::{CONFIG_FILE_NAME, ProjectConfig, SubprojectConfig};
pub use versions::VersionPolicy;
