//! Single-root markup reader built on quick-xml
//!
//! Extracts the root element's name and attributes and re-serializes its children.
//! Child elements are written as `<name key="value">` with attribute values kept as
//! written; text, references, CDATA and comments are copied verbatim. Root attribute
//! values are unescaped, resolving entities declared in the doctype's internal subset.

use crate::errors::TagParseError;
use quick_xml::Reader;
use quick_xml::escape::{resolve_predefined_entity, unescape_with};
use quick_xml::events::{BytesStart, Event};
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RootElement {
    pub name: String,
    /// Root attributes in document order, values unescaped
    pub attributes: Vec<(String, String)>,
    pub inner_html: String,
}

pub(crate) fn parse_root(markup: &str) -> Result<RootElement, TagParseError> {
    let mut reader = Reader::from_str(markup);

    let mut root: Option<RootElement> = None;
    let mut entities: HashMap<String, String> = HashMap::new();
    let mut inner = String::new();
    let mut depth: usize = 0;
    let mut closed = false;

    loop {
        let position = reader.buffer_position() as u64;
        let event = reader
            .read_event()
            .map_err(|e| TagParseError::new(e.to_string(), reader.buffer_position() as u64))?;
        let inside = root.is_some() && !closed;

        match event {
            Event::Start(start) => {
                if closed {
                    return Err(TagParseError::new("content after root element", position));
                }
                if root.is_none() {
                    root = Some(root_element(&start, &entities, position)?);
                } else {
                    write_start(&mut inner, &start, false, position)?;
                }
                depth += 1;
            }
            Event::Empty(start) => {
                if closed {
                    return Err(TagParseError::new("content after root element", position));
                }
                if root.is_none() {
                    root = Some(root_element(&start, &entities, position)?);
                    closed = true;
                } else {
                    write_start(&mut inner, &start, true, position)?;
                }
            }
            Event::End(end) => {
                if !inside {
                    return Err(TagParseError::new("unexpected closing tag", position));
                }
                depth -= 1;
                if depth == 0 {
                    closed = true;
                } else {
                    inner.push_str("</");
                    inner.push_str(utf8(end.name().as_ref(), position)?);
                    inner.push('>');
                }
            }
            Event::Text(text) => {
                let raw = utf8(&text, position)?;
                if inside {
                    inner.push_str(raw);
                } else if !raw.trim().is_empty() {
                    return Err(TagParseError::new("text outside root element", position));
                }
            }
            Event::GeneralRef(reference) => {
                if !inside {
                    return Err(TagParseError::new("text outside root element", position));
                }
                let name = reference
                    .decode()
                    .map_err(|e| TagParseError::new(e.to_string(), position))?;
                inner.push('&');
                inner.push_str(&name);
                inner.push(';');
            }
            Event::CData(data) => {
                if !inside {
                    return Err(TagParseError::new("CDATA outside root element", position));
                }
                inner.push_str("<![CDATA[");
                inner.push_str(utf8(&data, position)?);
                inner.push_str("]]>");
            }
            Event::Comment(comment) => {
                if inside {
                    inner.push_str("<!--");
                    inner.push_str(utf8(&comment, position)?);
                    inner.push_str("-->");
                }
            }
            Event::DocType(doctype) => {
                if root.is_none() {
                    collect_entities(utf8(&doctype, position)?, &mut entities);
                }
            }
            Event::Decl(_) | Event::PI(_) => {}
            Event::Eof => break,
        }
    }

    match root {
        Some(mut root) if closed => {
            root.inner_html = inner;
            Ok(root)
        }
        Some(root) => Err(TagParseError::new(
            format!("root element <{}> is not closed", root.name),
            reader.buffer_position() as u64,
        )),
        None => Err(TagParseError::new(
            "no root element",
            reader.buffer_position() as u64,
        )),
    }
}

fn utf8(bytes: &[u8], position: u64) -> Result<&str, TagParseError> {
    std::str::from_utf8(bytes).map_err(|e| TagParseError::new(e.to_string(), position))
}

fn entity_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            match Regex::new(r#"<!ENTITY\s+([^\s%"'>]+)\s+(?:"([^"]*)"|'([^']*)')\s*>"#) {
                Ok(regex) => Some(regex),
                Err(e) => {
                    warn!("Invalid entity declaration pattern: {}", e);
                    None
                }
            }
        })
        .as_ref()
}

/// Internal general entities declared as `<!ENTITY name "value">` in a doctype
fn collect_entities(doctype: &str, entities: &mut HashMap<String, String>) {
    let Some(pattern) = entity_pattern() else {
        return;
    };

    for caps in pattern.captures_iter(doctype) {
        let value = caps.get(2).or_else(|| caps.get(3)).map_or("", |m| m.as_str());
        entities
            .entry(caps[1].to_string())
            .or_insert_with(|| value.to_string());
    }
}

fn root_element(
    start: &BytesStart<'_>,
    entities: &HashMap<String, String>,
    position: u64,
) -> Result<RootElement, TagParseError> {
    let name = utf8(start.name().as_ref(), position)?.to_string();
    let mut attributes = Vec::new();

    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| TagParseError::new(e.to_string(), position))?;
        let key = utf8(attribute.key.as_ref(), position)?.to_string();
        let raw = utf8(&attribute.value, position)?;
        let value = match unescape_with(raw, |entity| {
            entities
                .get(entity)
                .map(String::as_str)
                .or_else(|| resolve_predefined_entity(entity))
        }) {
            Ok(value) => value.into_owned(),
            Err(e) => {
                debug!("Keeping attribute {} as written: {}", key, e);
                raw.to_string()
            }
        };
        attributes.push((key, value));
    }

    Ok(RootElement {
        name,
        attributes,
        inner_html: String::new(),
    })
}

fn write_start(
    out: &mut String,
    start: &BytesStart<'_>,
    empty: bool,
    position: u64,
) -> Result<(), TagParseError> {
    out.push('<');
    out.push_str(utf8(start.name().as_ref(), position)?);

    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| TagParseError::new(e.to_string(), position))?;
        out.push(' ');
        out.push_str(utf8(attribute.key.as_ref(), position)?);
        out.push_str("=\"");
        out.push_str(&utf8(&attribute.value, position)?.replace('"', "&quot;"));
        out.push('"');
    }

    out.push_str(if empty { "/>" } else { ">" });
    Ok(())
}
