//! Insertion-ordered tag attributes with `class` merge semantics

use indexmap::IndexMap;
use quick_xml::escape::escape;
use serde::{Deserialize, Serialize};

/// Value accepted by attribute setters.
///
/// A single string merges into `class` when applied with [`Attributes::apply`]; a list
/// always overwrites and is joined with single spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    Text(String),
    List(Vec<String>),
}

impl AttrValue {
    /// The value as it is stored on the tag
    #[must_use]
    pub fn joined(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::List(items) => items.join(" "),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for AttrValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<Vec<String>> for AttrValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<Vec<&str>> for AttrValue {
    fn from(value: Vec<&str>) -> Self {
        Self::List(value.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for AttrValue {
    fn from(value: [&str; N]) -> Self {
        Self::List(value.into_iter().map(str::to_string).collect())
    }
}

/// Ordered attribute map. Re-setting an existing attribute keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(IndexMap<String, String>);

impl Attributes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Overwrites `name`; lists are joined with spaces.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        self.0.insert(name.into(), value.into().joined());
    }

    /// Appends the whitespace-separated tokens of `value` to `class`, skipping tokens
    /// already present.
    pub fn add_class(&mut self, value: &str) {
        let class = self.0.entry("class".to_string()).or_default();
        let mut tokens: Vec<&str> = class.split_whitespace().collect();

        for token in value.split_whitespace() {
            if !tokens.contains(&token) {
                tokens.push(token);
            }
        }

        *class = tokens.join(" ");
    }

    /// `class` with a single string merges, everything else overwrites.
    pub fn apply(&mut self, name: &str, value: AttrValue) {
        match value {
            AttrValue::Text(text) if name == "class" => self.add_class(&text),
            value => self.set(name, value),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.0.shift_remove(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All attributes as an ordered map
    #[must_use]
    pub fn all(&self) -> &IndexMap<String, String> {
        &self.0
    }

    /// Renders ` name="value"` pairs with escaped values. Names that could break out
    /// of the tag are skipped.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();

        for (name, value) in &self.0 {
            if !is_valid_name(name) {
                continue;
            }
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape(value.as_str()));
            out.push('"');
        }

        out
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && !name.chars().any(|c| {
            c.is_whitespace() || c.is_control() || matches!(c, '"' | '\'' | '<' | '>' | '/' | '=')
        })
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<const N: usize> From<[(&str, &str); N]> for Attributes {
    fn from(pairs: [(&str, &str); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl From<IndexMap<String, String>> for Attributes {
    fn from(map: IndexMap<String, String>) -> Self {
        Self(map)
    }
}

impl From<Attributes> for IndexMap<String, String> {
    fn from(attributes: Attributes) -> Self {
        attributes.0
    }
}
