//! Error types for dependency engine operations

use thiserror::Error;

/// Errors that can occur during dependency analysis and export
#[derive(Error, Debug)]
pub enum DepsError {
    /// An explicitly selected story or frame does not exist in the source
    #[error("Not found: {0}")]
    NotFound(String),

    /// Error from the package layer
    #[error(transparent)]
    Package(#[from] idsnip_idml::IdmlError),
}

/// Result type for dependency engine operations
pub type Result<T> = std::result::Result<T, DepsError>;
