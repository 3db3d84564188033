//! Icon factories
//!
//! [`IconFactory`] builds [`Icon`] values from a name plus an explicit tag, raw markup,
//! or an SVG file. [`TranslatingIconFactory`] decorates any factory and translates
//! `<title>` text of SVG tags once, when the icon is created.

use super::{Icon, SizeClassMap};
use crate::errors::{CreateIconError, CreateResult, TagParseError};
use crate::svg::SvgTagFactory;
use crate::tag::{Attributes, Tag, TagFactory};
use async_trait::async_trait;
use quick_xml::escape::{escape, unescape};
use regex::Regex;
use sandboxed_dirs::FileTypeValidator;
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Size keys `xxs` to `xxl` plus `body`, each mapped to `text-<key>`
#[must_use]
pub fn default_size_class_map() -> SizeClassMap {
    ["xxs", "xs", "s", "m", "l", "xl", "xxl", "body"]
        .into_iter()
        .map(|size| (size.to_string(), format!("text-{size}")))
        .collect()
}

#[async_trait]
pub trait IconFactory: Send + Sync {
    /// Creates an icon. Missing tags are replaced by defaults: an empty fragment for
    /// the glyph, `span.icon-label` for the label and `span.icon.icon-<name>` as parent.
    fn create_icon(
        &self,
        name: &str,
        tag: Option<Tag>,
        label_tag: Option<Tag>,
        parent_tag: Option<Tag>,
    ) -> Icon;

    /// Parses markup into the icon's glyph tag.
    ///
    /// # Errors
    /// Returns [`TagParseError`] for markup the tag factory rejects.
    fn create_tag_from_html(&self, html: &str) -> Result<Tag, TagParseError>;

    /// # Errors
    /// Returns [`CreateIconError`] carrying the markup and the parse error.
    fn create_icon_from_html(&self, name: &str, html: &str) -> CreateResult<Icon> {
        let tag = self
            .create_tag_from_html(html)
            .map_err(|e| CreateIconError::from_parse_error(name, html, e))?;

        Ok(self.create_icon(name, Some(tag), None, None))
    }

    /// Creates an icon from a file whose content sniffs as SVG.
    ///
    /// # Errors
    /// Returns [`CreateIconError`] with message `Invalid svg file!` for non-SVG content,
    /// or when the file cannot be read or parsed.
    async fn create_icon_from_file(&self, name: &str, path: &Path) -> CreateResult<Icon> {
        if let Err(e) = FileTypeValidator::svg().validate_file_type(path).await {
            debug!("Rejecting icon file {}: {}", path.display(), e);
            return Err(CreateIconError::invalid_file(name, path));
        }

        self.create_icon_from_svg_file(name, path).await
    }

    /// Like [`Self::create_icon_from_file`] for a file the caller already sniffed as SVG.
    ///
    /// # Errors
    /// Returns [`CreateIconError`] when the file cannot be read or parsed.
    async fn create_icon_from_svg_file(&self, name: &str, path: &Path) -> CreateResult<Icon> {
        let html = tokio::fs::read_to_string(path).await.map_err(|e| {
            CreateIconError::new(name)
                .with_filename(path)
                .with_message(format!("Could not read icon file: {e}"))
        })?;

        self.create_icon_from_html(name, &html)
            .map_err(|e| e.with_filename(path))
    }
}

/// Factory backed by a [`TagFactory`], the SVG normalizer unless configured otherwise
#[derive(Debug, Clone)]
pub struct DefaultIconFactory<T = SvgTagFactory> {
    tag_factory: T,
    size_class_map: SizeClassMap,
}

impl Default for DefaultIconFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultIconFactory {
    #[must_use]
    pub fn new() -> Self {
        Self::with_tag_factory(SvgTagFactory::new())
    }
}

impl<T: TagFactory> DefaultIconFactory<T> {
    pub fn with_tag_factory(tag_factory: T) -> Self {
        Self {
            tag_factory,
            size_class_map: default_size_class_map(),
        }
    }

    #[must_use]
    pub fn with_size_class_map(mut self, size_class_map: SizeClassMap) -> Self {
        self.size_class_map = size_class_map;
        self
    }

    #[must_use]
    pub fn size_class_map(&self) -> &SizeClassMap {
        &self.size_class_map
    }
}

#[async_trait]
impl<T: TagFactory> IconFactory for DefaultIconFactory<T> {
    fn create_icon(
        &self,
        name: &str,
        tag: Option<Tag>,
        label_tag: Option<Tag>,
        parent_tag: Option<Tag>,
    ) -> Icon {
        let tag = tag.unwrap_or_else(|| self.tag_factory.create_tag("", "", Attributes::new()));

        let label_tag = label_tag.unwrap_or_else(|| {
            self.tag_factory
                .create_tag("span", "", Attributes::new())
                .with_class("icon-label")
        });

        let parent_tag = parent_tag.unwrap_or_else(|| {
            self.tag_factory
                .create_tag("span", "", Attributes::new())
                .with_class("icon")
                .with_class(&format!("icon-{}", name.to_lowercase()))
        });

        Icon::new(name, tag)
            .with_label_tag(label_tag)
            .with_parent_tag(parent_tag)
            .with_size_class_map(self.size_class_map.clone())
    }

    fn create_tag_from_html(&self, html: &str) -> Result<Tag, TagParseError> {
        self.tag_factory.create_tag_from_html(html)
    }
}

/// Text translation used for SVG titles
pub trait Translator: Send + Sync {
    fn translate(&self, text: &str) -> String;
}

impl<F> Translator for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn translate(&self, text: &str) -> String {
        self(text)
    }
}

/// Looks texts up in a map; unknown texts are returned unchanged
#[derive(Debug, Clone, Default)]
pub struct MapTranslator {
    translations: HashMap<String, String>,
}

impl MapTranslator {
    pub fn new(translations: HashMap<String, String>) -> Self {
        Self { translations }
    }
}

impl Translator for MapTranslator {
    fn translate(&self, text: &str) -> String {
        self.translations
            .get(text)
            .cloned()
            .unwrap_or_else(|| text.to_string())
    }
}

fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(regex) => Some(regex),
        Err(e) => {
            warn!("Invalid regex pattern '{}': {}, title translation disabled", pattern, e);
            None
        }
    }
}

fn title_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| compile(r"(?is)<title>.+?</title>"))
        .as_ref()
}

fn tag_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| compile(r"<[^>]*>")).as_ref()
}

/// Wraps another factory and translates the `<title>` elements of `svg` tags
#[derive(Debug, Clone)]
pub struct TranslatingIconFactory<F, T> {
    inner: F,
    translator: T,
}

impl<F: IconFactory, T: Translator> TranslatingIconFactory<F, T> {
    pub fn new(inner: F, translator: T) -> Self {
        Self { inner, translator }
    }

    fn translate_title(&self, title: &str) -> String {
        let text = tag_pattern().map_or_else(
            || title.to_string(),
            |pattern| pattern.replace_all(title, "").into_owned(),
        );
        let text = unescape(&text).map_or_else(|_| text.clone(), |t| t.into_owned());

        format!("<title>{}</title>", escape(self.translator.translate(&text).as_str()))
    }

    fn translate_svg_titles(&self, tag: Tag) -> Tag {
        if tag.name() != "svg" {
            return tag;
        }
        let Some(pattern) = title_pattern() else {
            return tag;
        };

        let html = pattern
            .replace_all(tag.html(), |caps: &regex::Captures<'_>| {
                self.translate_title(&caps[0])
            })
            .into_owned();

        tag.with_html(html)
    }
}

#[async_trait]
impl<F: IconFactory, T: Translator> IconFactory for TranslatingIconFactory<F, T> {
    fn create_icon(
        &self,
        name: &str,
        tag: Option<Tag>,
        label_tag: Option<Tag>,
        parent_tag: Option<Tag>,
    ) -> Icon {
        let tag = tag.map(|tag| self.translate_svg_titles(tag));
        self.inner.create_icon(name, tag, label_tag, parent_tag)
    }

    fn create_tag_from_html(&self, html: &str) -> Result<Tag, TagParseError> {
        self.inner.create_tag_from_html(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::HtmlTagFactory;
    use std::error::Error as _;

    const PATH: &str = r#"<path d="M0,100H100V90H0ZM100,50H66.67V0H33.33V50H0L50,83.33Z"/>"#;

    fn translator() -> MapTranslator {
        MapTranslator::new(HashMap::from([("edit".to_string(), "bearbeiten".to_string())]))
    }

    #[test]
    fn test_translation_patterns_compile() {
        assert!(title_pattern().is_some_and(|p| p.is_match("<TITLE>a\nb</TITLE>")));
        assert!(tag_pattern().is_some_and(|p| p.is_match("<b>")));
        assert!(compile("(unclosed").is_none());
    }

    #[test]
    fn test_create_icon_defaults() {
        let icon = DefaultIconFactory::new().create_icon("Download", None, None, None);

        assert_eq!(icon.to_string(), r#"<span class="icon icon-download"></span>"#);
        assert_eq!(
            icon.label("Download").to_string(),
            r#"<span class="icon icon-download"><span class="icon-label">Download</span></span>"#
        );
        assert_eq!(
            icon.size("m").to_string(),
            r#"<span class="icon icon-download text-m"></span>"#
        );
    }

    #[test]
    fn test_create_icon_with_tags() {
        let factory = DefaultIconFactory::new();

        let icon = factory.create_icon("download", Some(Tag::element("i")), None, None);
        assert_eq!(icon.to_string(), r#"<span class="icon icon-download"><i></i></span>"#);

        let icon = factory.create_icon("download", None, Some(Tag::element("span")), None);
        assert_eq!(
            icon.label("download").to_string(),
            r#"<span class="icon icon-download"><span>download</span></span>"#
        );

        let icon = factory.create_icon("download", None, Some(Tag::fragment()), None);
        assert_eq!(
            icon.label("download").to_string(),
            r#"<span class="icon icon-download">download</span>"#
        );

        let icon = factory.create_icon("download", None, None, Some(Tag::element("span")));
        assert_eq!(icon.to_string(), "<span></span>");

        let icon = factory.create_icon("download", None, None, Some(Tag::fragment()));
        assert_eq!(icon.to_string(), "");
        assert_eq!(
            icon.label("download").to_string(),
            r#"<span class="icon-label">download</span>"#
        );
    }

    #[test]
    fn test_create_icon_from_html() {
        let factory = DefaultIconFactory::new();

        let icon = factory.create_icon_from_html("download", PATH).unwrap();
        assert_eq!(
            icon.to_string(),
            format!(
                r#"<span class="icon icon-download"><svg xmlns="http://www.w3.org/2000/svg" width="20" height="20" viewBox="0 0 100 100">{PATH}</svg></span>"#
            )
        );

        let icon = factory.create_icon_from_html("download", "<p>lorem</p>").unwrap();
        assert_eq!(
            icon.label("Download").to_string(),
            r#"<span class="icon icon-download"><p>lorem</p><span class="icon-label">Download</span></span>"#
        );
    }

    #[test]
    fn test_create_icon_from_invalid_html() {
        let error = DefaultIconFactory::new()
            .create_icon_from_html("edit", "<svg><g></svg>")
            .unwrap_err();

        assert_eq!(error.icon(), "edit");
        assert_eq!(error.html(), Some("<svg><g></svg>"));
        assert_eq!(error.to_string(), "Could not create icon [edit]");
        assert!(error.source().is_some());
    }

    #[test]
    fn test_custom_tag_factory_and_sizes() {
        let factory = DefaultIconFactory::with_tag_factory(HtmlTagFactory)
            .with_size_class_map(SizeClassMap::from([("big".to_string(), "fs-1".to_string())]));

        let icon = factory.create_icon_from_html("x", PATH).unwrap();
        assert_eq!(icon.tag().name(), "path");
        assert_eq!(
            icon.size("big").to_string(),
            format!(r#"<span class="icon icon-x fs-1">{}</span>"#, icon.tag())
        );
    }

    #[tokio::test]
    async fn test_create_icon_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let svg = temp_dir.path().join("edit.svg");
        let text = temp_dir.path().join("edit.txt");
        std::fs::write(&svg, format!("<svg>{PATH}</svg>")).unwrap();
        std::fs::write(&text, "lorem ipsum").unwrap();

        let factory = DefaultIconFactory::new();

        let icon = factory.create_icon_from_file("edit", &svg).await.unwrap();
        assert_eq!(icon.tag().html(), PATH);

        let error = factory.create_icon_from_file("edit", &text).await.unwrap_err();
        assert_eq!(error.to_string(), "Invalid svg file!");
        assert_eq!(error.filename(), Some(text.as_path()));

        let missing = temp_dir.path().join("missing.svg");
        assert!(factory.create_icon_from_file("edit", &missing).await.is_err());
    }

    #[test]
    fn test_translates_svg_titles() {
        let factory = TranslatingIconFactory::new(DefaultIconFactory::new(), translator());

        let icon = factory
            .create_icon_from_html("edit", "<svg><title>edit</title></svg>")
            .unwrap();
        assert_eq!(icon.tag().to_string(), "<svg><title>bearbeiten</title></svg>");

        let icon = factory.create_icon(
            "edit",
            Some(Tag::element("svg").with_html("<TITLE>edit</TITLE>")),
            None,
            None,
        );
        assert_eq!(icon.tag().to_string(), "<svg><title>bearbeiten</title></svg>");
    }

    #[test]
    fn test_translation_escapes_and_skips_other_tags() {
        let factory = TranslatingIconFactory::new(DefaultIconFactory::new(), |text: &str| {
            format!("{text} <&>")
        });

        let icon = factory
            .create_icon_from_html("edit", "<svg><title>a &amp; <b>b</b></title></svg>")
            .unwrap();
        assert_eq!(
            icon.tag().html(),
            "<title>a &amp; b &lt;&amp;&gt;</title>"
        );

        let icon = factory.create_icon(
            "edit",
            Some(Tag::element("div").with_html("<title>edit</title>")),
            None,
            None,
        );
        assert_eq!(icon.tag().html(), "<title>edit</title>");
    }
}
