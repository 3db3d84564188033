//! Icon rendering with SVG normalization and JSON-backed icon caches.
//!
//! Resolvers in [`sources`] map icon names to [`icon::Icon`] values, which render to
//! HTML. SVG markup is normalized by [`svg::SvgTagFactory`] and can be persisted by
//! [`cache::CacheBuilder`].

pub mod cache;
pub mod config;
pub mod errors;
pub mod icon;
pub mod sources;
pub mod svg;
pub mod tag;

pub use errors::{CacheError, CreateIconError, IconNotFoundError, TagParseError};
pub use icon::{Icon, IconFactory, LabelPosition};
pub use sources::IconResolver;
pub use tag::{AttrValue, Attributes, Tag, TagFactory};
