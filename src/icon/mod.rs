//! Renderable icon values
//!
//! An [`Icon`] wraps an inner glyph tag with an optional label and an optional parent
//! tag. Every mutator returns a new icon and leaves the original untouched.

pub mod factory;

use crate::tag::{AttrValue, Tag};
use indexmap::IndexMap;
use quick_xml::escape::escape;
use std::fmt;
use strum::{Display, EnumString};

pub use factory::{
    DefaultIconFactory, IconFactory, MapTranslator, TranslatingIconFactory, Translator,
    default_size_class_map,
};

/// Where a label is placed relative to the icon
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LabelPosition {
    Left,
    #[default]
    Right,
}

/// Size key to CSS class, e.g. `m` to `text-m`
pub type SizeClassMap = IndexMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icon {
    name: String,
    tag: Tag,
    label_tag: Option<Tag>,
    parent_tag: Option<Tag>,
    size_class_map: SizeClassMap,
    size: Option<String>,
    label_size: Option<String>,
    label_position: LabelPosition,
}

impl Icon {
    pub fn new(name: impl Into<String>, tag: Tag) -> Self {
        Self {
            name: name.into(),
            tag,
            label_tag: None,
            parent_tag: None,
            size_class_map: SizeClassMap::new(),
            size: None,
            label_size: None,
            label_position: LabelPosition::Right,
        }
    }

    #[must_use]
    pub fn with_label_tag(mut self, label_tag: Tag) -> Self {
        self.label_tag = Some(label_tag);
        self
    }

    #[must_use]
    pub fn with_parent_tag(mut self, parent_tag: Tag) -> Self {
        self.parent_tag = Some(parent_tag);
        self
    }

    #[must_use]
    pub fn with_size_class_map(mut self, size_class_map: SizeClassMap) -> Self {
        self.size_class_map = size_class_map;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// A copy of the inner tag
    #[must_use]
    pub fn tag(&self) -> Tag {
        self.tag.clone()
    }

    fn size_class(&self, size: Option<&String>) -> Option<&str> {
        size.and_then(|s| self.size_class_map.get(s))
            .map(String::as_str)
    }

    #[must_use]
    pub fn render(&self) -> String {
        let mut parent = self.parent_tag.clone().unwrap_or_default();
        let mut tag = self.tag.clone();

        if let Some(class) = self.size_class(self.size.as_ref()) {
            if parent.is_fragment() {
                tag.add_class(class);
            } else {
                parent.add_class(class);
            }
        }

        parent.set_html(tag.render());

        let mut label = self.label_tag.clone().unwrap_or_default();
        if let Some(class) = self.size_class(self.label_size.as_ref()) {
            label.add_class(class);
        }

        if !label.html().is_empty() {
            match self.label_position {
                LabelPosition::Right => parent.append_html(&label.render()),
                LabelPosition::Left => parent.prepend_html(&label.render()),
            }
        }

        parent.render()
    }

    #[must_use]
    pub fn size(&self, size: &str) -> Self {
        let mut new = self.clone();
        new.size = Some(size.to_string());
        new
    }

    /// Sets an attribute on the inner tag. `class` with a single string merges.
    #[must_use]
    pub fn attr(&self, name: &str, value: impl Into<AttrValue>) -> Self {
        let mut new = self.clone();
        new.tag.apply_attr(name, value.into());
        new
    }

    /// Sets the label text (escaped), placed right of the icon
    #[must_use]
    pub fn label(&self, text: &str) -> Self {
        self.label_at(text, LabelPosition::Right)
    }

    #[must_use]
    pub fn label_at(&self, text: &str, position: LabelPosition) -> Self {
        let mut new = self.clone();
        new.label_tag
            .get_or_insert_with(Tag::fragment)
            .set_html(escape(text));
        new.label_position = position;
        new
    }

    #[must_use]
    pub fn label_size(&self, size: &str) -> Self {
        let mut new = self.clone();
        new.label_size = Some(size.to_string());
        new
    }

    #[must_use]
    pub fn label_attr(&self, name: &str, value: impl Into<AttrValue>) -> Self {
        let mut new = self.clone();
        new.label_tag
            .get_or_insert_with(Tag::fragment)
            .apply_attr(name, value.into());
        new
    }

    #[must_use]
    pub fn parent_attr(&self, name: &str, value: impl Into<AttrValue>) -> Self {
        let mut new = self.clone();
        new.parent_tag
            .get_or_insert_with(Tag::fragment)
            .apply_attr(name, value.into());
        new
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
