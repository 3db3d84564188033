//! Centralized error handling for icon creation and resolution
//!
//! # Error Categories
//!
//! - **Parse Errors**: malformed SVG/XML markup
//! - **Create Errors**: markup or files that cannot become an icon
//! - **Not Found Errors**: lookups a resolver cannot serve (memoized per resolver)
//! - **Cache Errors**: failures while building the JSON cache

pub mod types;

pub use types::*;

/// Convenience type alias for resolver lookups
pub type IconResult<T> = Result<T, IconNotFoundError>;

/// Convenience type alias for icon creation
pub type CreateResult<T> = Result<T, CreateIconError>;

/// Convenience type alias for cache building
pub type CacheResult<T> = Result<T, CacheError>;
