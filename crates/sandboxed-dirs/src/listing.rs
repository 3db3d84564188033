//! Ordered directory sets and non-recursive file listing.

use crate::error::Result;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// A single search directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dir {
    path: PathBuf,
}

impl Dir {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Candidate path for `<dir>/<name>.<extension>`. The name is joined verbatim, so the
    /// result must be checked with [`crate::security::is_within_dir`] before use.
    #[must_use]
    pub fn candidate(&self, name: &str, extension: &str) -> PathBuf {
        self.path.join(format!("{name}.{extension}"))
    }

    /// Lists regular files directly inside this directory whose extension matches one of
    /// `extensions` (case-insensitive), sorted by file name.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be read.
    pub async fn list_files(&self, extensions: &[&str]) -> Result<Vec<DirFile>> {
        let mut entries = fs::read_dir(&self.path).await?;
        let mut files = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();

            let Some(extension) = path.extension().and_then(|e| e.to_str()) else {
                continue;
            };
            if !extensions
                .iter()
                .any(|wanted| wanted.eq_ignore_ascii_case(extension))
            {
                continue;
            }

            match fs::metadata(&path).await {
                Ok(metadata) if metadata.is_file() => {}
                Ok(_) => continue,
                Err(e) => {
                    debug!("Skipping unreadable entry {}: {}", path.display(), e);
                    continue;
                }
            }

            if let Some(file) = DirFile::from_path(path) {
                files.push(file);
            }
        }

        files.sort_by(|a, b| a.basename.cmp(&b.basename));
        Ok(files)
    }
}

impl From<&str> for Dir {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<PathBuf> for Dir {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&Path> for Dir {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}

/// Search directories in precedence order: earlier directories win.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dirs {
    dirs: Vec<Dir>,
}

impl Dirs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, dir: impl Into<Dir>) -> Self {
        self.dirs.push(dir.into());
        self
    }

    pub fn push(&mut self, dir: impl Into<Dir>) {
        self.dirs.push(dir.into());
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Dir> {
        self.dirs.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }
}

impl<D: Into<Dir>> FromIterator<D> for Dirs {
    fn from_iter<I: IntoIterator<Item = D>>(iter: I) -> Self {
        Self {
            dirs: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Dirs {
    type Item = &'a Dir;
    type IntoIter = std::slice::Iter<'a, Dir>;

    fn into_iter(self) -> Self::IntoIter {
        self.dirs.iter()
    }
}

/// A file found by [`Dir::list_files`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirFile {
    /// Full path of the file
    pub path: PathBuf,
    /// File name including extension, e.g. `edit.svg`
    pub basename: String,
    /// File name without extension, e.g. `edit`
    pub filename: String,
    /// Extension without the dot, e.g. `svg`
    pub extension: String,
}

impl DirFile {
    fn from_path(path: PathBuf) -> Option<Self> {
        let basename = path.file_name()?.to_str()?.to_string();
        let filename = path.file_stem()?.to_str()?.to_string();
        let extension = path.extension()?.to_str()?.to_string();

        Some(Self {
            path,
            basename,
            filename,
            extension,
        })
    }

    /// Reads the whole file as UTF-8 text.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not valid UTF-8.
    pub async fn read_to_string(&self) -> Result<String> {
        Ok(fs::read_to_string(&self.path).await?)
    }
}
