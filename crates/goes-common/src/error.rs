//! Error types shared by the imagery crates.

use thiserror::Error;

/// Result type alias using GoesError.
pub type GoesResult<T> = Result<T, GoesError>;

/// Primary error type for the imagery pipeline.
#[derive(Debug, Error)]
pub enum GoesError {
    // === Configuration Errors ===
    #[error("Unknown satellite '{key}'. Valid options: {}", valid.join(", "))]
    UnknownSatellite { key: String, valid: Vec<String> },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // === Discovery Errors ===
    #[error("Could not find all required bands. Found: {found:?}, missing: {missing:?}")]
    MissingBands { found: Vec<u8>, missing: Vec<u8> },

    #[error("Invalid archive key '{key}': {message}")]
    InvalidKey { key: String, message: String },

    // === Retrieval Errors ===
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Invalid NetCDF data: {0}")]
    DecodeError(String),

    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    // === Rendering Errors ===
    #[error("Encoding failed: {0}")]
    EncodeError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GoesError {
    /// True for failures of the archive transport itself.
    pub fn is_storage(&self) -> bool {
        matches!(self, GoesError::StorageError(_))
    }
}

impl From<serde_yaml::Error> for GoesError {
    fn from(err: serde_yaml::Error) -> Self {
        GoesError::InvalidConfig(format!("YAML error: {}", err))
    }
}
