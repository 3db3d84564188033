//! JSON icon cache
//!
//! Icons from the search directories are normalized once and persisted either as a
//! single aggregate document (`icons.json`) or as one `<name>.json` file per icon.
//! Cache keys are file names without extension.

pub mod builder;
pub mod entry;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

pub use builder::{BuildReport, CacheBuilder, CollectedIcons};
pub use entry::CacheEntry;

/// File name of the aggregate cache document
pub const AGGREGATE_FILE_NAME: &str = "icons.json";

/// How cached icons are laid out in the cache directory
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum CacheLayout {
    /// A single `icons.json` document
    #[default]
    Aggregate,
    /// One `<name>.json` file per icon
    PerFile,
}

/// True for names that can appear in the flat cache key space: non-empty, no path
/// separators or null bytes, not `.` or `..`.
#[must_use]
pub fn is_cache_key(name: &str) -> bool {
    !name.is_empty() && !name.contains(['/', '\\', '\0']) && name != "." && name != ".."
}
