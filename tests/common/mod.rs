#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const EDIT_PATH: &str = r#"<path d="M80,40L30,90L0,100l10-30l50-50 M90,30l10-10L80,0L70,10L90,30z"/>"#;

pub const EDIT_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="20" viewBox="0 0 100 100"><title>edit</title><path d="M80,40L30,90L0,100l10-30l50-50 M90,30l10-10L80,0L70,10L90,30z"/></svg>"#;

const DELETE_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="20" viewBox="0 0 100 100"><title>delete</title><path d="M10,10L90,90M90,10L10,90"/></svg>"#;

const XML_SVG: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"20\" height=\"20\" viewBox=\"0 0 100 100\">\n  <path d=\"M0,0H100V100H0Z\"/>\n</svg>\n";

const XML_SPACEFREE_SVG: &str = r#"<?xml version="1.0" encoding="UTF-8"?><svg xmlns="http://www.w3.org/2000/svg" width="20" height="20" viewBox="0 0 100 100"><path d="M0,0H100V100H0Z"/></svg>"#;

const COPY_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 100 100"><title>copy</title><path d="M30,30H90V90H30Z"/></svg>"#;

const BAR_EDIT_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 100 100"><title>edit</title><path d="M80,40L30,90L0,100l10-30l50-50"/></svg>"#;

/// Icon directories laid out as:
///
/// ```text
/// svg-icons/{delete,edit,xml,xml-spacefree,invalid}.svg
/// svg-icons/foo/{copy,edit}.svg
/// svg-icons/bar/edit.svg
/// ```
pub struct Fixture {
    pub temp_dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path().join("svg-icons");
        let foo = root.join("foo");
        let bar = root.join("bar");
        fs::create_dir_all(&foo).unwrap();
        fs::create_dir_all(&bar).unwrap();

        fs::write(root.join("delete.svg"), DELETE_SVG).unwrap();
        fs::write(root.join("edit.svg"), EDIT_SVG).unwrap();
        fs::write(root.join("xml.svg"), XML_SVG).unwrap();
        fs::write(root.join("xml-spacefree.svg"), XML_SPACEFREE_SVG).unwrap();
        fs::write(root.join("invalid.svg"), "lorem ipsum").unwrap();

        fs::write(foo.join("copy.svg"), COPY_SVG).unwrap();
        fs::write(foo.join("edit.svg"), EDIT_SVG).unwrap();
        fs::write(bar.join("edit.svg"), BAR_EDIT_SVG).unwrap();

        Self { temp_dir }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn icons(&self) -> PathBuf {
        self.path().join("svg-icons")
    }

    pub fn foo(&self) -> PathBuf {
        self.icons().join("foo")
    }

    pub fn bar(&self) -> PathBuf {
        self.icons().join("bar")
    }

    pub fn cache(&self, name: &str) -> PathBuf {
        self.path().join("cache").join(name)
    }
}
