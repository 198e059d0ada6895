use thiserror::Error;

use crate::dist::ModuleKind;

/// Modpack error types
#[derive(Error, Debug)]
pub enum ModpackError {
    /// A required label is absent from the package
    #[error("could not find label '{0}'")]
    LabelNotFound(String),

    /// A label is present but its value does not decode
    #[error("failed to decode label '{label}': {source}")]
    LabelDecode {
        label: String,
        #[source]
        source: serde_json::Error,
    },

    /// Opening a module's layer failed
    #[error("extracting {kind} '{module}' layer (diffID '{diff_id}'): {source}")]
    LayerOpen {
        kind: ModuleKind,
        module: String,
        diff_id: String,
        #[source]
        source: Box<ModpackError>,
    },

    /// The package has no layer with the requested diff ID
    #[error("layer not found: {0}")]
    LayerNotFound(String),

    /// Layer content does not hash to its diff ID
    #[error("digest mismatch: expected {expected}, got {actual}")]
    DigestMismatch { expected: String, actual: String },

    /// OCI image error
    #[error("OCI image error: {0}")]
    OciImageError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for ModpackError {
    fn from(err: serde_json::Error) -> Self {
        ModpackError::SerializationError(err.to_string())
    }
}

impl From<serde_yaml::Error> for ModpackError {
    fn from(err: serde_yaml::Error) -> Self {
        ModpackError::SerializationError(err.to_string())
    }
}

/// Result type alias for modpack operations
pub type Result<T> = std::result::Result<T, ModpackError>;
