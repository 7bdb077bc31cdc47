use std::io;
use std::path::PathBuf;

/// Errors that can occur while applying project conventions
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A module's hard precondition is unmet
    #[error("Configuration error in module '{module}': {reason} [{resource}]")]
    Configuration {
        module: String,
        resource: String,
        reason: String,
    },

    /// Two declarations disagree on the version of one coordinate
    #[error("Dependency conflict for '{coordinate}': '{existing}' already registered, refusing '{requested}'")]
    DependencyConflict {
        coordinate: String,
        existing: String,
        requested: String,
    },

    #[error("Reconciliation error for {}: {reason}", path.display())]
    Reconciliation { path: PathBuf, reason: String },

    #[error("Invalid dependency coordinate: {0}")]
    InvalidCoordinate(String),

    /// The host build model refused an operation
    #[error("Host model error: {0}")]
    Host(String),

    /// Wraps a failure with the module and lifecycle phase it came from
    #[error("Module '{module}' failed during {operation}: {source}")]
    Module {
        module: String,
        operation: &'static str,
        #[source]
        source: Box<Error>,
    },

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl Error {
    pub fn configuration(
        module: impl Into<String>,
        resource: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Error::Configuration {
            module: module.into(),
            resource: resource.into(),
            reason: reason.into(),
        }
    }

    pub fn reconciliation(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::Reconciliation {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// The innermost error, skipping module attribution
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Module { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Result type alias for projectcfg operations
pub type Result<T> = std::result::Result<T, Error>;
