//! Error types for sandboxed directory operations.

use std::path::PathBuf;

/// Result type for sandboxed directory operations.
pub type Result<T> = std::result::Result<T, SandboxedDirError>;

/// Errors that can occur while listing, resolving or sniffing files.
#[derive(Debug, thiserror::Error)]
pub enum SandboxedDirError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Path validation failed - potential security issue
    #[error("Path validation failed: {path:?} - {reason}")]
    PathValidation { path: PathBuf, reason: String },

    /// Unsupported content type
    #[error("Unsupported content type: {content_type}")]
    UnsupportedContentType { content_type: String },

    /// Directory creation failed
    #[error("Failed to create directory: {path:?} - {source}")]
    DirectoryCreation {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Permissions error
    #[error("Permission denied: {operation} on {path:?}")]
    Permission { operation: String, path: PathBuf },
}
