//! Content-based file type detection
//!
//! Binary formats are recognised by magic number through the `infer` crate. Text formats
//! such as SVG have no magic number, so they are recognised by custom matchers that run
//! before the `infer` lookup. File names and extensions are never consulted.

use crate::error::{Result, SandboxedDirError};
use crate::security;
use infer::Infer;
use std::collections::HashSet;
use std::path::Path;
use tokio::{fs, io::AsyncReadExt};

/// MIME type reported for SVG documents.
pub const SVG_MIME_TYPE: &str = "image/svg+xml";

/// Signature of a content matcher.
pub type Matcher = fn(&[u8]) -> bool;

/// Configuration for file type validation
#[derive(Debug, Clone)]
pub struct FileTypeConfig {
    /// Set of allowed MIME types (empty means allow all)
    pub allowed_mime_types: HashSet<String>,
    /// Maximum bytes to read for detection
    pub max_detection_bytes: usize,
}

impl Default for FileTypeConfig {
    fn default() -> Self {
        Self {
            allowed_mime_types: HashSet::new(),
            max_detection_bytes: 8192,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct CustomMatcher {
    mime_type: &'static str,
    extension: &'static str,
    matcher: Matcher,
}

/// File type validator combining custom text matchers with magic number detection
pub struct FileTypeValidator {
    config: FileTypeConfig,
    custom: Vec<CustomMatcher>,
    infer: Infer,
}

impl FileTypeValidator {
    /// Create a new validator with default configuration and no custom matchers
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(FileTypeConfig::default())
    }

    /// Create a new validator with custom configuration
    #[must_use]
    pub fn with_config(config: FileTypeConfig) -> Self {
        Self {
            config,
            custom: Vec::new(),
            infer: Infer::new(),
        }
    }

    /// Validator that accepts SVG documents only.
    #[must_use]
    pub fn svg() -> Self {
        Self::with_config(
            FileTypeConfigBuilder::new()
                .allow_mime_type(SVG_MIME_TYPE)
                .build(),
        )
        .with_matcher(SVG_MIME_TYPE, "svg", is_svg)
    }

    /// Register a custom matcher; custom matchers are consulted in registration order
    /// before magic number detection.
    #[must_use]
    pub fn with_matcher(
        mut self,
        mime_type: &'static str,
        extension: &'static str,
        matcher: Matcher,
    ) -> Self {
        self.custom.push(CustomMatcher {
            mime_type,
            extension,
            matcher,
        });
        self
    }

    /// Validate the type of a file by reading its leading bytes.
    ///
    /// # Errors
    /// Returns an error if the path contains null bytes, the file cannot be read, or the
    /// detected type is unknown or not allowed.
    pub async fn validate_file_type<P: AsRef<Path>>(&self, path: P) -> Result<FileTypeInfo> {
        let path = path.as_ref();
        security::validate_file_path_security(path)?;

        let buffer = self.read_head(path).await?;
        self.validate_from_bytes(&buffer)
    }

    /// Validate the type of a file that must resolve inside `sandbox_base`.
    ///
    /// # Errors
    /// Same as [`Self::validate_file_type`], plus a path validation error when the file
    /// resolves outside the sandbox.
    pub async fn validate_file_type_sandboxed<P: AsRef<Path>, B: AsRef<Path>>(
        &self,
        path: P,
        sandbox_base: B,
    ) -> Result<FileTypeInfo> {
        let path = path.as_ref();
        security::validate_path_within_sandbox(path, sandbox_base.as_ref())?;

        let buffer = self.read_head(path).await?;
        self.validate_from_bytes(&buffer)
    }

    /// Validate file type from byte content
    ///
    /// # Errors
    /// Returns an error if the content cannot be classified or its type is not allowed.
    pub fn validate_from_bytes(&self, content: &[u8]) -> Result<FileTypeInfo> {
        let detected = self
            .custom
            .iter()
            .find(|custom| (custom.matcher)(content))
            .map(|custom| (custom.mime_type, custom.extension, DetectionMethod::Custom))
            .or_else(|| {
                self.infer.get(content).map(|kind| {
                    (
                        kind.mime_type(),
                        kind.extension(),
                        DetectionMethod::MagicNumber,
                    )
                })
            });

        let Some((mime_type, extension, detection_method)) = detected else {
            return Err(SandboxedDirError::UnsupportedContentType {
                content_type: "unknown".to_string(),
            });
        };

        if !self.is_mime_type_allowed(mime_type) {
            return Err(SandboxedDirError::UnsupportedContentType {
                content_type: mime_type.to_string(),
            });
        }

        Ok(FileTypeInfo {
            mime_type: mime_type.to_string(),
            extension: extension.to_string(),
            detection_method,
        })
    }

    /// Check if a MIME type is allowed (empty set means allow all)
    #[must_use]
    pub fn is_mime_type_allowed(&self, mime_type: &str) -> bool {
        self.config.allowed_mime_types.is_empty()
            || self.config.allowed_mime_types.contains(mime_type)
    }

    async fn read_head(&self, path: &Path) -> Result<Vec<u8>> {
        let mut buffer = vec![0u8; self.config.max_detection_bytes];
        let mut file = fs::File::open(path).await?;

        let mut filled = 0;
        while filled < buffer.len() {
            let read = file.read(&mut buffer[filled..]).await?;
            if read == 0 {
                break;
            }
            filled += read;
        }
        buffer.truncate(filled);

        Ok(buffer)
    }
}

impl Default for FileTypeValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Information about a detected file type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTypeInfo {
    /// MIME type of the file
    pub mime_type: String,
    /// Conventional extension for this type (informational only)
    pub extension: String,
    /// Method used for detection
    pub detection_method: DetectionMethod,
}

/// Method used for file type detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionMethod {
    /// Detected by a registered custom matcher
    Custom,
    /// Detected using magic number/file signature
    MagicNumber,
}

/// Builder for creating custom file type configurations
pub struct FileTypeConfigBuilder {
    config: FileTypeConfig,
}

impl FileTypeConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: FileTypeConfig::default(),
        }
    }

    /// Add a single allowed MIME type
    #[must_use]
    pub fn allow_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.config.allowed_mime_types.insert(mime_type.into());
        self
    }

    /// Set maximum bytes to read for detection
    #[must_use]
    pub fn max_detection_bytes(mut self, bytes: usize) -> Self {
        self.config.max_detection_bytes = bytes;
        self
    }

    #[must_use]
    pub fn build(self) -> FileTypeConfig {
        self.config
    }
}

impl Default for FileTypeConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Recognises SVG documents: optional BOM and whitespace, then markup that opens an
/// `<svg` element, possibly after an XML declaration, comments or a doctype.
#[must_use]
pub fn is_svg(buf: &[u8]) -> bool {
    let buf = buf.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(buf);
    let start = buf
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(buf.len());
    let buf = &buf[start..];

    if !buf.starts_with(b"<") {
        return false;
    }

    // Skip prolog constructs until the first element is reached.
    let mut rest = buf;
    loop {
        let offset = rest
            .iter()
            .position(|b| !b.is_ascii_whitespace())
            .unwrap_or(rest.len());
        rest = &rest[offset..];

        let end = if rest.starts_with(b"<?") {
            find(rest, b"?>").map(|end| end + 2)
        } else if rest.starts_with(b"<!--") {
            find(rest, b"-->").map(|end| end + 3)
        } else if rest.starts_with(b"<!") {
            declaration_end(rest)
        } else {
            break;
        };

        match end {
            Some(end) => rest = &rest[end..],
            None => return false,
        }
    }

    if !rest.starts_with(b"<") {
        return false;
    }
    let Some(name) = rest.get(1..4) else {
        return false;
    };
    name.eq_ignore_ascii_case(b"svg")
        && rest
            .get(4)
            .is_none_or(|b| b.is_ascii_whitespace() || matches!(b, b'>' | b'/'))
}

/// Offset just past the `>` closing a `<!...>` declaration. Quoted strings and an
/// internal `[...]` subset may contain `>`.
fn declaration_end(buf: &[u8]) -> Option<usize> {
    let mut quote: Option<u8> = None;
    let mut depth = 0usize;

    for (i, &b) in buf.iter().enumerate().skip(2) {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None => match b {
                b'"' | b'\'' => quote = Some(b),
                b'[' => depth += 1,
                b']' => depth = depth.saturating_sub(1),
                b'>' if depth == 0 => return Some(i + 1),
                _ => {}
            },
        }
    }

    None
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
