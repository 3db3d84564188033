//! Tag factories
//!
//! [`TagFactory`] is the seam icon factories use to turn markup into tags.
//! [`HtmlTagFactory`] is the generic best-effort implementation; the SVG-aware one lives
//! in [`crate::svg`].

use super::markup::parse_root;
use super::{Attributes, Tag};
use crate::errors::TagParseError;
use tracing::debug;

pub trait TagFactory: Send + Sync {
    /// Creates a tag; an empty name yields a fragment.
    fn create_tag(&self, name: &str, html: &str, attributes: Attributes) -> Tag {
        Tag::new(name, html, attributes)
    }

    /// Parses markup into a tag.
    ///
    /// # Errors
    /// Returns [`TagParseError`] when the markup cannot be represented as a tag.
    fn create_tag_from_html(&self, html: &str) -> Result<Tag, TagParseError>;
}

/// Best-effort parser for arbitrary markup.
///
/// A single well-formed element becomes that element; anything else becomes a fragment
/// holding the markup unchanged. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlTagFactory;

impl HtmlTagFactory {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl TagFactory for HtmlTagFactory {
    fn create_tag_from_html(&self, html: &str) -> Result<Tag, TagParseError> {
        if !html.trim_start().starts_with('<') {
            return Ok(Tag::fragment_with(html));
        }

        match parse_root(html.trim()) {
            Ok(root) => Ok(Tag::new(
                root.name,
                root.inner_html,
                root.attributes.into_iter().collect(),
            )),
            Err(e) => {
                debug!("Markup is not a single element, keeping it as a fragment: {}", e);
                Ok(Tag::fragment_with(html))
            }
        }
    }
}
