//! Error type definitions for icon creation, lookup and caching
//!
//! Parsing failures surface as [`TagParseError`], factories wrap them into
//! [`CreateIconError`], and resolvers report everything they cannot serve as
//! [`IconNotFoundError`] with the creation failure attached as its source.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Markup could not be parsed into a tag
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid markup at byte {position}: {message}")]
pub struct TagParseError {
    pub message: String,
    pub position: u64,
}

impl TagParseError {
    pub fn new<S: Into<String>>(message: S, position: u64) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

/// An icon could not be created from markup or from a file
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct CreateIconError {
    icon: String,
    html: Option<String>,
    filename: Option<PathBuf>,
    message: String,
    #[source]
    source: Option<TagParseError>,
}

impl CreateIconError {
    pub fn new<S: Into<String>>(icon: S) -> Self {
        let icon = icon.into();
        Self {
            message: format!("Could not create icon [{icon}]"),
            icon,
            html: None,
            filename: None,
            source: None,
        }
    }

    /// Markup that failed to parse, with the parse error as source
    pub fn from_parse_error<S: Into<String>>(icon: S, html: &str, error: TagParseError) -> Self {
        Self {
            html: Some(html.to_string()),
            source: Some(error),
            ..Self::new(icon)
        }
    }

    /// A file that is not an SVG document
    pub fn invalid_file<S: Into<String>>(icon: S, filename: &Path) -> Self {
        Self::new(icon)
            .with_filename(filename)
            .with_message("Invalid svg file!")
    }

    #[must_use]
    pub fn with_filename(mut self, filename: &Path) -> Self {
        self.filename = Some(filename.to_path_buf());
        self
    }

    #[must_use]
    pub fn with_message<S: Into<String>>(mut self, message: S) -> Self {
        self.message = message.into();
        self
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    pub fn html(&self) -> Option<&str> {
        self.html.as_deref()
    }

    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// No backing markup could be found or created for an icon
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct IconNotFoundError {
    icon: String,
    message: String,
    #[source]
    source: Option<Arc<CreateIconError>>,
}

impl IconNotFoundError {
    pub fn new<S: Into<String>>(icon: S) -> Self {
        let icon = icon.into();
        Self {
            message: format!("Icon [{icon}] not found"),
            icon,
            source: None,
        }
    }

    /// Not found because creation failed; keeps the creation message and cause
    pub fn from_create_error<S: Into<String>>(icon: S, error: CreateIconError) -> Self {
        Self {
            icon: icon.into(),
            message: error.message().to_string(),
            source: Some(Arc::new(error)),
        }
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    pub fn cause(&self) -> Option<&CreateIconError> {
        self.source.as_deref()
    }
}

/// Cache building failures
#[derive(Error, Debug)]
pub enum CacheError {
    /// Filesystem errors while reading sources or writing cache files
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Cache document could not be encoded or decoded
    #[error("Cache serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Sandbox or content-type failures from the directory layer
    #[error("Cache directory error: {0}")]
    Sandbox(#[from] sandboxed_dirs::SandboxedDirError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_create_icon_error_defaults() {
        let error = CreateIconError::new("edit");

        assert_eq!(error.icon(), "edit");
        assert_eq!(error.to_string(), "Could not create icon [edit]");
        assert!(error.html().is_none());
        assert!(error.filename().is_none());
        assert!(error.source().is_none());
    }

    #[test]
    fn test_invalid_file_error() {
        let error = CreateIconError::invalid_file("edit", Path::new("/icons/edit.svg"));

        assert_eq!(error.to_string(), "Invalid svg file!");
        assert_eq!(error.filename(), Some(Path::new("/icons/edit.svg")));
    }

    #[test]
    fn test_parse_error_is_chained() {
        let error = CreateIconError::from_parse_error(
            "edit",
            "<svg>",
            TagParseError::new("root element is not closed", 5),
        );

        assert_eq!(error.html(), Some("<svg>"));
        let source = error.source().unwrap();
        assert_eq!(
            source.to_string(),
            "Invalid markup at byte 5: root element is not closed"
        );
    }

    #[test]
    fn test_not_found_error() {
        let error = IconNotFoundError::new("cart");
        assert_eq!(error.icon(), "cart");
        assert_eq!(error.to_string(), "Icon [cart] not found");
        assert!(error.cause().is_none());

        let wrapped = IconNotFoundError::from_create_error(
            "edit",
            CreateIconError::invalid_file("edit", Path::new("edit.svg")),
        );
        assert_eq!(wrapped.to_string(), "Invalid svg file!");
        assert_eq!(wrapped.cause().unwrap().icon(), "edit");
        assert!(wrapped.source().is_some());
    }
}
