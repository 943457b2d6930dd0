//! Error types for IDML package operations

use thiserror::Error;

/// Errors that can occur while reading or writing IDML packages
#[derive(Error, Debug)]
pub enum IdmlError {
    /// Error reading or writing the ZIP container
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Error reading or writing files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing XML content
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Required file not found in the package
    #[error("Required file not found: {0}")]
    MissingFile(String),

    /// A referenced story, spread, or resource definition does not exist
    #[error("Resource not found: {0}")]
    MissingResource(String),

    /// Invalid package or document structure
    #[error("Invalid package structure: {0}")]
    InvalidStructure(String),
}

/// Result type for IDML package operations
pub type Result<T> = std::result::Result<T, IdmlError>;
