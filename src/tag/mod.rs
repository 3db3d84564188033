//! Minimal HTML tag values
//!
//! A [`Tag`] is either a real element with a name, trusted inner HTML and ordered
//! attributes, or a fragment that renders only its inner HTML. Attribute values are
//! escaped on render; inner HTML is not.

pub mod attributes;
pub mod factory;
pub(crate) mod markup;

use std::fmt;

pub use attributes::{AttrValue, Attributes};
pub use factory::{HtmlTagFactory, TagFactory};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    Element {
        name: String,
        html: String,
        attributes: Attributes,
    },
    Fragment {
        html: String,
    },
}

impl Default for Tag {
    fn default() -> Self {
        Self::fragment()
    }
}

impl Tag {
    /// Creates an element, or a fragment when `name` is empty (attributes are dropped).
    pub fn new(name: impl Into<String>, html: impl Into<String>, attributes: Attributes) -> Self {
        let name = name.into();
        let html = html.into();

        if name.is_empty() {
            Self::Fragment { html }
        } else {
            Self::Element {
                name,
                html,
                attributes,
            }
        }
    }

    pub fn element(name: impl Into<String>) -> Self {
        Self::new(name, String::new(), Attributes::new())
    }

    #[must_use]
    pub fn fragment() -> Self {
        Self::Fragment {
            html: String::new(),
        }
    }

    pub fn fragment_with(html: impl Into<String>) -> Self {
        Self::Fragment { html: html.into() }
    }

    /// Element name, empty for fragments
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Element { name, .. } => name,
            Self::Fragment { .. } => "",
        }
    }

    #[must_use]
    pub fn html(&self) -> &str {
        match self {
            Self::Element { html, .. } | Self::Fragment { html } => html,
        }
    }

    #[must_use]
    pub fn attributes(&self) -> Option<&Attributes> {
        match self {
            Self::Element { attributes, .. } => Some(attributes),
            Self::Fragment { .. } => None,
        }
    }

    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes().and_then(|a| a.get(name))
    }

    #[must_use]
    pub fn is_fragment(&self) -> bool {
        matches!(self, Self::Fragment { .. })
    }

    fn html_mut(&mut self) -> &mut String {
        match self {
            Self::Element { html, .. } | Self::Fragment { html } => html,
        }
    }

    pub fn set_html(&mut self, html: impl Into<String>) {
        *self.html_mut() = html.into();
    }

    pub fn append_html(&mut self, html: &str) {
        self.html_mut().push_str(html);
    }

    pub fn prepend_html(&mut self, html: &str) {
        self.html_mut().insert_str(0, html);
    }

    /// Overwrites an attribute. No-op on fragments.
    pub fn set_attr(&mut self, name: &str, value: impl Into<AttrValue>) {
        if let Self::Element { attributes, .. } = self {
            attributes.set(name, value);
        }
    }

    /// Merges class tokens. No-op on fragments.
    pub fn add_class(&mut self, class: &str) {
        if let Self::Element { attributes, .. } = self {
            attributes.add_class(class);
        }
    }

    /// `class` with a single string merges, anything else overwrites. No-op on fragments.
    pub fn apply_attr(&mut self, name: &str, value: AttrValue) {
        if let Self::Element { attributes, .. } = self {
            attributes.apply(name, value);
        }
    }

    #[must_use]
    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.set_html(html);
        self
    }

    #[must_use]
    pub fn with_attr(mut self, name: &str, value: impl Into<AttrValue>) -> Self {
        self.set_attr(name, value);
        self
    }

    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Element {
                name,
                html,
                attributes,
            } => format!("<{name}{}>{html}</{name}>", attributes.render()),
            Self::Fragment { html } => html.clone(),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
