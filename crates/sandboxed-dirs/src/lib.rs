//! # Sandboxed Dirs
//!
//! Ordered search directories with sandboxed name resolution and content-based file
//! type detection.
//!
//! ## Features
//!
//! - **Ordered directory sets**: earlier directories take precedence over later ones
//! - **Non-recursive listing**: files filtered by extension, sorted by file name
//! - **Lexical sandbox checks**: reject `../` escapes before touching the disk
//! - **Canonical sandbox checks**: reject symlinks that resolve outside the base
//! - **Content sniffing**: SVG detection by content, binary formats via the `infer` crate
//!
//! ## Basic Usage
//!
//! ```rust
//! use sandboxed_dirs::{Dirs, FileTypeValidator, security::is_within_dir};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let dirs = Dirs::new().with("/app/icons").with("/app/vendor-icons");
//! let validator = FileTypeValidator::svg();
//!
//! for dir in &dirs {
//!     let candidate = dir.candidate("edit", "svg");
//!     if is_within_dir(&candidate, dir.path()) && candidate.is_file() {
//!         let info = validator.validate_file_type(&candidate).await?;
//!         println!("{} is {}", candidate.display(), info.mime_type);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod file_types;
pub mod listing;
pub mod security;

pub use error::{Result, SandboxedDirError};
pub use file_types::{
    DetectionMethod, FileTypeConfig, FileTypeConfigBuilder, FileTypeInfo, FileTypeValidator,
    SVG_MIME_TYPE,
};
pub use listing::{Dir, DirFile, Dirs};
