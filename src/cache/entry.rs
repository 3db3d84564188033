//! Persisted form of a normalized tag

use crate::tag::{Attributes, Tag};
use serde::{Deserialize, Serialize};

/// One cached icon: the normalized tag's name, inner HTML and ordered attributes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub attributes: Attributes,
}

impl From<&Tag> for CacheEntry {
    fn from(tag: &Tag) -> Self {
        Self {
            name: tag.name().to_string(),
            html: tag.html().to_string(),
            attributes: tag.attributes().cloned().unwrap_or_default(),
        }
    }
}

impl From<CacheEntry> for Tag {
    fn from(entry: CacheEntry) -> Self {
        Tag::new(entry.name, entry.html, entry.attributes)
    }
}
