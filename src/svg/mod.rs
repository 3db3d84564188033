//! SVG-aware tag factory
//!
//! Normalizes raw SVG markup into a canonical `svg` [`Tag`]:
//!
//! - an XML prolog is stripped and the rest is parsed as an SVG document; entities
//!   declared in a doctype's internal subset resolve in root attribute values
//! - `<svg ...>` documents keep namespace declarations first, then plain root
//!   attributes, then `xml:*` attributes; the root's children become the inner HTML
//! - bare `<path ...>` markup is wrapped with default `svg` attributes
//! - anything else is handed to the fallback factory

use crate::errors::TagParseError;
use crate::tag::markup::parse_root;
use crate::tag::{Attributes, HtmlTagFactory, Tag, TagFactory};
use sandboxed_dirs::file_types::is_svg;
use tracing::trace;

pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Attributes used when wrapping bare `<path>` markup
#[must_use]
pub fn default_svg_attributes() -> Attributes {
    Attributes::from([
        ("xmlns", SVG_NAMESPACE),
        ("width", "20"),
        ("height", "20"),
        ("viewBox", "0 0 100 100"),
    ])
}

#[derive(Debug, Clone, Default)]
pub struct SvgTagFactory<F = HtmlTagFactory> {
    fallback: F,
}

impl SvgTagFactory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<F: TagFactory> SvgTagFactory<F> {
    /// Uses `fallback` for markup that is neither an SVG document nor a bare path
    pub fn with_fallback(fallback: F) -> Self {
        Self { fallback }
    }

    fn create_svg_tag(&self, markup: &str) -> Result<Tag, TagParseError> {
        let root = parse_root(markup)?;
        let mut attributes = Attributes::new();

        for (key, value) in &root.attributes {
            if key == "xmlns" || key.starts_with("xmlns:") {
                attributes.set(key.as_str(), value.as_str());
            }
        }
        for (key, value) in &root.attributes {
            if !key.contains(':') && key != "xmlns" {
                attributes.set(key.as_str(), value.as_str());
            }
        }
        for (key, value) in &root.attributes {
            if key.starts_with("xml:") {
                attributes.set(key.as_str(), value.as_str());
            }
        }

        Ok(self.create_tag("svg", &root.inner_html, attributes))
    }
}

impl<F: TagFactory> TagFactory for SvgTagFactory<F> {
    fn create_tag_from_html(&self, html: &str) -> Result<Tag, TagParseError> {
        let markup = html.trim_start_matches('\u{feff}').trim_start();

        if markup.starts_with("<?xml") {
            let rest = markup
                .find("?>")
                .map_or(markup, |end| &markup[end + 2..])
                .trim();
            trace!("Stripped XML prolog, parsing as svg document");
            return self.create_svg_tag(rest);
        }

        let doctype_first = markup.starts_with("<!") && is_svg(markup.as_bytes());
        if markup.starts_with("<svg") || doctype_first {
            return self.create_svg_tag(markup);
        }

        if markup.starts_with("<path") {
            return Ok(self.create_tag("svg", html, default_svg_attributes()));
        }

        self.fallback.create_tag_from_html(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PATH: &str = r#"<path d="M0,100H100V90H0ZM100,50H66.67V0H33.33V50H0L50,83.33Z"/>"#;

    fn names(tag: &Tag) -> Vec<&str> {
        tag.attributes()
            .map(|a| a.iter().map(|(k, _)| k).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_non_svg_markup_uses_fallback() {
        let tag = SvgTagFactory::new()
            .create_tag_from_html("<p>lorem</p>")
            .unwrap();

        assert_eq!(tag.to_string(), "<p>lorem</p>");
    }

    #[test]
    fn test_svg_document() {
        let html = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="20" viewBox="0 0 100 100">{PATH}</svg>"#
        );
        let tag = SvgTagFactory::new().create_tag_from_html(&html).unwrap();

        assert_eq!(tag.name(), "svg");
        assert_eq!(tag.html(), PATH);
        assert_eq!(tag.attributes(), Some(&default_svg_attributes()));
    }

    #[test]
    fn test_bare_path() {
        let tag = SvgTagFactory::new().create_tag_from_html(PATH).unwrap();

        assert_eq!(tag.name(), "svg");
        assert_eq!(tag.html(), PATH);
        assert_eq!(names(&tag), vec!["xmlns", "width", "height", "viewBox"]);
    }

    #[test]
    fn test_namespaces() {
        let tag = SvgTagFactory::new()
            .create_tag_from_html(
                r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink"></svg>"#,
            )
            .unwrap();

        assert_eq!(tag.html(), "");
        assert_eq!(tag.attr("xmlns"), Some(SVG_NAMESPACE));
        assert_eq!(tag.attr("xmlns:xlink"), Some("http://www.w3.org/1999/xlink"));
        assert_eq!(names(&tag), vec!["xmlns", "xmlns:xlink"]);
    }

    #[test]
    fn test_svg_within_svg() {
        let tag = SvgTagFactory::new()
            .create_tag_from_html(
                r#"<svg><circle cx="50" cy="50" r="40" /><circle cx="150" cy="50" r="4"/><svg><circle cx="5" cy="5" r="4"/></svg></svg>"#,
            )
            .unwrap();

        assert_eq!(
            tag.html(),
            r#"<circle cx="50" cy="50" r="40"/><circle cx="150" cy="50" r="4"/><svg><circle cx="5" cy="5" r="4"/></svg>"#
        );
        assert!(tag.attributes().unwrap().is_empty());
    }

    #[test]
    fn test_xml_prolog_document() {
        let html = "<?xml version=\"1.0\" encoding=\"utf-8\"?><!-- Generator: Adobe Illustrator 27.0.0  --><svg version=\"1.1\" xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" x=\"0px\" y=\"0px\"\n viewBox=\"0 0 100 100\" style=\"enable-background:new 0 0 100 100;\" xml:space=\"preserve\" xlink:href=\"#a\"><g id=\"copy\"><path d=\"M72,72V30h28v70H30V72H72z\"/></g></svg>";
        let tag = SvgTagFactory::new().create_tag_from_html(html).unwrap();

        assert_eq!(tag.name(), "svg");
        assert_eq!(
            tag.html(),
            r#"<g id="copy"><path d="M72,72V30h28v70H30V72H72z"/></g>"#
        );
        assert_eq!(
            names(&tag),
            vec![
                "xmlns",
                "xmlns:xlink",
                "version",
                "x",
                "y",
                "viewBox",
                "style",
                "xml:space"
            ]
        );
    }

    #[test]
    fn test_doctype_internal_subset_document() {
        let html = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
            <!-- Generator: Adobe Illustrator 16.0.0, SVG Export Plug-In  -->\n\
            <!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\" [\n\
            \t<!ENTITY ns_svg \"http://www.w3.org/2000/svg\">\n\
            \t<!ENTITY ns_xlink \"http://www.w3.org/1999/xlink\">\n\
            ]>\n\
            <svg version=\"1.1\" xmlns=\"&ns_svg;\" xmlns:xlink=\"&ns_xlink;\" width=\"20\" height=\"20\" viewBox=\"0 0 100 100\"><path d=\"X\"/></svg>\n";

        for markup in [html, &html[html.find("<!DOCTYPE").unwrap()..]] {
            let tag = SvgTagFactory::new().create_tag_from_html(markup).unwrap();

            assert_eq!(tag.name(), "svg");
            assert_eq!(tag.html(), r#"<path d="X"/>"#);
            assert_eq!(tag.attr("xmlns"), Some(SVG_NAMESPACE));
            assert_eq!(tag.attr("xmlns:xlink"), Some("http://www.w3.org/1999/xlink"));
            assert_eq!(
                names(&tag),
                vec!["xmlns", "xmlns:xlink", "version", "width", "height", "viewBox"]
            );
        }
    }

    #[test]
    fn test_leading_whitespace_and_bom() {
        let tag = SvgTagFactory::new()
            .create_tag_from_html("\u{feff}\n  <svg width=\"24\"></svg>")
            .unwrap();

        assert_eq!(tag.name(), "svg");
        assert_eq!(tag.attr("width"), Some("24"));
    }

    #[test]
    fn test_malformed_svg_fails() {
        let factory = SvgTagFactory::new();

        let error = factory.create_tag_from_html("<svg><g></svg>").unwrap_err();
        assert!(error.to_string().starts_with("Invalid markup at byte"));
        assert!(factory.create_tag_from_html("<svg>").is_err());
        assert!(factory
            .create_tag_from_html("<?xml version=\"1.0\"?>lorem")
            .is_err());
    }
}
