//! View engine error types

use thiserror::Error;

/// Template loading and rendering errors
#[derive(Debug, Error)]
pub enum ViewError {
    /// No template registered under this name
    #[error("Template not found: {0}")]
    NotFound(String),

    /// Template failed to parse or render
    #[error("Template error: {0}")]
    TemplateError(String),

    /// IO error while reading the override directory
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
