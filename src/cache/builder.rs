//! Builds the JSON icon cache from search directories

use super::{AGGREGATE_FILE_NAME, CacheEntry, CacheLayout, is_cache_key};
use crate::errors::CacheResult;
use crate::svg::SvgTagFactory;
use crate::tag::TagFactory;
use indexmap::IndexMap;
use sandboxed_dirs::security::set_secure_permissions;
use sandboxed_dirs::{DirFile, Dirs, FileTypeValidator, SandboxedDirError};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::fs;
use tracing::{debug, info, warn};

/// Outcome of a cache build
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Icons written to the cache
    pub written: usize,
    /// Source files that were not cached: failed sniffing, reading, parsing or writing
    pub skipped: usize,
}

/// Normalized icons collected from the search directories, keyed by file name
#[derive(Debug, Clone, Default)]
pub struct CollectedIcons {
    pub entries: IndexMap<String, CacheEntry>,
    pub skipped: usize,
}

pub struct CacheBuilder {
    dirs: Dirs,
    tag_factory: Arc<dyn TagFactory>,
    validator: FileTypeValidator,
}

impl CacheBuilder {
    pub fn new(dirs: Dirs) -> Self {
        Self {
            dirs,
            tag_factory: Arc::new(SvgTagFactory::new()),
            validator: FileTypeValidator::svg(),
        }
    }

    #[must_use]
    pub fn with_tag_factory(mut self, tag_factory: Arc<dyn TagFactory>) -> Self {
        self.tag_factory = tag_factory;
        self
    }

    /// Clears the cache directory when `clear` is set and reports whether it has to be
    /// built, i.e. whether it is missing afterwards.
    ///
    /// # Errors
    /// Returns an error when the directory cannot be removed or inspected.
    pub async fn prepare(cache_dir: &Path, clear: bool) -> CacheResult<bool> {
        if clear && fs::try_exists(cache_dir).await? {
            info!("Clearing icon cache at {}", cache_dir.display());
            fs::remove_dir_all(cache_dir).await?;
        }

        Ok(!fs::try_exists(cache_dir).await?)
    }

    /// Builds the cache in the given layout.
    ///
    /// # Errors
    /// See [`Self::write_aggregate`] and [`Self::write_per_file`].
    pub async fn build(&self, cache_dir: &Path, layout: CacheLayout) -> CacheResult<BuildReport> {
        match layout {
            CacheLayout::Aggregate => self.write_aggregate(cache_dir).await,
            CacheLayout::PerFile => self.write_per_file(cache_dir).await,
        }
    }

    /// Prepares the cache directory and builds it when missing. Returns `None` when an
    /// existing cache was kept.
    ///
    /// # Errors
    /// Returns an error when clearing or building fails.
    pub async fn ensure(
        &self,
        cache_dir: &Path,
        clear: bool,
        layout: CacheLayout,
    ) -> CacheResult<Option<BuildReport>> {
        if !Self::prepare(cache_dir, clear).await? {
            debug!("Reusing icon cache at {}", cache_dir.display());
            return Ok(None);
        }

        self.build(cache_dir, layout).await.map(Some)
    }

    /// Scans every directory for `*.svg` files, non-recursively, in file name order.
    /// The first file with a given name wins; files that fail sniffing or parsing are
    /// skipped.
    pub async fn collect(&self) -> CollectedIcons {
        let mut collected = CollectedIcons::default();

        for dir in &self.dirs {
            let files = match dir.list_files(&["svg"]).await {
                Ok(files) => files,
                Err(e) => {
                    warn!("Skipping icon directory {}: {}", dir.path().display(), e);
                    continue;
                }
            };

            for file in files {
                if collected.entries.contains_key(&file.filename) {
                    debug!(
                        "Icon '{}' already collected, ignoring {}",
                        file.filename,
                        file.path.display()
                    );
                    continue;
                }

                match self.normalize(&file, dir.path()).await {
                    Some(entry) => {
                        collected.entries.insert(file.filename, entry);
                    }
                    None => collected.skipped += 1,
                }
            }
        }

        collected
    }

    async fn normalize(&self, file: &DirFile, base: &Path) -> Option<CacheEntry> {
        if let Err(e) = self
            .validator
            .validate_file_type_sandboxed(&file.path, base)
            .await
        {
            debug!("Skipping {}: {}", file.path.display(), e);
            return None;
        }

        let html = match file.read_to_string().await {
            Ok(html) => html,
            Err(e) => {
                debug!("Skipping unreadable {}: {}", file.path.display(), e);
                return None;
            }
        };

        match self.tag_factory.create_tag_from_html(&html) {
            Ok(tag) => Some(CacheEntry::from(&tag)),
            Err(e) => {
                debug!("Skipping unparsable {}: {}", file.path.display(), e);
                None
            }
        }
    }

    /// Writes all icons into `<cache_dir>/icons.json`.
    ///
    /// # Errors
    /// Returns an error when the directory or the document cannot be written.
    pub async fn write_aggregate(&self, cache_dir: &Path) -> CacheResult<BuildReport> {
        let start_time = Instant::now();
        let collected = self.collect().await;

        create_cache_dir(cache_dir).await?;
        let document = serde_json::to_vec(&collected.entries)?;
        fs::write(cache_dir.join(AGGREGATE_FILE_NAME), document).await?;

        let report = BuildReport {
            written: collected.entries.len(),
            skipped: collected.skipped,
        };
        info!(
            "Icon cache built at {}: {} icons, {} skipped in {:.2}s",
            cache_dir.display(),
            report.written,
            report.skipped,
            start_time.elapsed().as_secs_f64()
        );

        Ok(report)
    }

    /// Writes one `<cache_dir>/<name>.json` file per icon.
    ///
    /// # Errors
    /// Returns an error when the cache directory cannot be created. Failures writing
    /// single files are counted as skipped.
    pub async fn write_per_file(&self, cache_dir: &Path) -> CacheResult<BuildReport> {
        let start_time = Instant::now();
        let collected = self.collect().await;

        create_cache_dir(cache_dir).await?;

        let mut report = BuildReport {
            written: 0,
            skipped: collected.skipped,
        };

        for (name, entry) in &collected.entries {
            if !is_cache_key(name) {
                report.skipped += 1;
                continue;
            }

            let path = cache_dir.join(format!("{name}.json"));
            let written = match serde_json::to_vec(entry) {
                Ok(json) => fs::write(&path, json).await.map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            };

            match written {
                Ok(()) => report.written += 1,
                Err(e) => {
                    warn!("Failed to write icon cache file {}: {}", path.display(), e);
                    report.skipped += 1;
                }
            }
        }

        info!(
            "Icon cache files built at {}: {} icons, {} skipped in {:.2}s",
            cache_dir.display(),
            report.written,
            report.skipped,
            start_time.elapsed().as_secs_f64()
        );

        Ok(report)
    }
}

async fn create_cache_dir(cache_dir: &Path) -> CacheResult<()> {
    fs::create_dir_all(cache_dir)
        .await
        .map_err(|source| SandboxedDirError::DirectoryCreation {
            path: cache_dir.to_path_buf(),
            source,
        })?;
    set_secure_permissions(cache_dir).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;

    const EDIT: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="20" viewBox="0 0 100 100"><path d="M80,40L30,90"/></svg>"#;

    fn fixture() -> (tempfile::TempDir, Dirs) {
        let temp_dir = tempfile::tempdir().unwrap();
        let first = temp_dir.path().join("first");
        let second = temp_dir.path().join("second");
        std_fs::create_dir_all(&first).unwrap();
        std_fs::create_dir_all(&second).unwrap();

        std_fs::write(first.join("edit.svg"), EDIT).unwrap();
        std_fs::write(first.join("broken.svg"), "<svg><g></svg>").unwrap();
        std_fs::write(first.join("text.svg"), "lorem ipsum").unwrap();
        std_fs::write(second.join("edit.svg"), r#"<svg width="24"></svg>"#).unwrap();
        std_fs::write(second.join("copy.svg"), "<svg><path d=\"C\"/></svg>").unwrap();
        std_fs::write(second.join("copy.txt"), "<svg/>").unwrap();

        let dirs = Dirs::new().with(first).with(second);
        (temp_dir, dirs)
    }

    #[tokio::test]
    async fn test_collect_first_wins_and_skips_invalid() {
        let (_temp_dir, dirs) = fixture();
        let collected = CacheBuilder::new(dirs).collect().await;

        let names: Vec<&str> = collected.entries.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["edit", "copy"]);
        assert_eq!(collected.entries["edit"].attributes.get("width"), Some("20"));
        assert_eq!(collected.skipped, 2);
    }

    #[tokio::test]
    async fn test_missing_directory_is_skipped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dirs = Dirs::new().with(temp_dir.path().join("missing"));

        let collected = CacheBuilder::new(dirs).collect().await;
        assert!(collected.entries.is_empty());
    }

    #[tokio::test]
    async fn test_write_aggregate() {
        let (temp_dir, dirs) = fixture();
        let cache_dir = temp_dir.path().join("cache");

        let report = CacheBuilder::new(dirs)
            .write_aggregate(&cache_dir)
            .await
            .unwrap();
        assert_eq!(report, BuildReport { written: 2, skipped: 2 });

        let json = std_fs::read_to_string(cache_dir.join(AGGREGATE_FILE_NAME)).unwrap();
        let document: IndexMap<String, CacheEntry> = serde_json::from_str(&json).unwrap();
        assert_eq!(document.len(), 2);
        assert_eq!(document["copy"].html, "<path d=\"C\"/>");
    }

    #[tokio::test]
    async fn test_write_per_file() {
        let (temp_dir, dirs) = fixture();
        let cache_dir = temp_dir.path().join("cache");

        let report = CacheBuilder::new(dirs)
            .write_per_file(&cache_dir)
            .await
            .unwrap();
        assert_eq!(report.written, 2);

        let json = std_fs::read_to_string(cache_dir.join("edit.json")).unwrap();
        let entry: CacheEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry.name, "svg");
        assert!(cache_dir.join("copy.json").is_file());
        assert!(!cache_dir.join("broken.json").exists());
    }

    #[tokio::test]
    async fn test_prepare() {
        let temp_dir = tempfile::tempdir().unwrap();
        let cache_dir = temp_dir.path().join("cache");

        assert!(CacheBuilder::prepare(&cache_dir, false).await.unwrap());

        std_fs::create_dir_all(&cache_dir).unwrap();
        std_fs::write(cache_dir.join(AGGREGATE_FILE_NAME), "{}").unwrap();
        assert!(!CacheBuilder::prepare(&cache_dir, false).await.unwrap());
        assert!(CacheBuilder::prepare(&cache_dir, true).await.unwrap());
        assert!(!cache_dir.exists());
    }

    #[tokio::test]
    async fn test_ensure_builds_once() {
        let (temp_dir, dirs) = fixture();
        let cache_dir = temp_dir.path().join("cache");
        let builder = CacheBuilder::new(dirs);

        let report = builder
            .ensure(&cache_dir, false, CacheLayout::PerFile)
            .await
            .unwrap();
        assert_eq!(report.map(|r| r.written), Some(2));

        let report = builder
            .ensure(&cache_dir, false, CacheLayout::PerFile)
            .await
            .unwrap();
        assert!(report.is_none());

        let report = builder
            .ensure(&cache_dir, true, CacheLayout::Aggregate)
            .await
            .unwrap();
        assert_eq!(report.map(|r| r.written), Some(2));
        assert!(cache_dir.join(AGGREGATE_FILE_NAME).is_file());
        assert!(!cache_dir.join("edit.json").exists());
    }
}
