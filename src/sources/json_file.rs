//! Icons served from the aggregate `icons.json` cache document

use super::IconResolver;
use crate::cache::{AGGREGATE_FILE_NAME, CacheBuilder, CacheEntry, CacheLayout};
use crate::errors::{IconNotFoundError, IconResult};
use crate::icon::{DefaultIconFactory, Icon, IconFactory};
use crate::tag::Tag;
use async_trait::async_trait;
use indexmap::IndexMap;
use sandboxed_dirs::Dirs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

/// Resolves icons from a single cache document keyed by file name.
///
/// The cache is built on construction when its directory is missing or `clear_cache`
/// is set. The document is loaded lazily on the first lookup and kept in memory.
pub struct JsonFileIcons {
    cache_dir: PathBuf,
    factory: Arc<dyn IconFactory>,
    icons: OnceCell<IndexMap<String, CacheEntry>>,
}

impl JsonFileIcons {
    pub async fn new(dirs: Dirs, cache_dir: impl AsRef<Path>, clear_cache: bool) -> Self {
        Self::from_builder(
            CacheBuilder::new(dirs),
            cache_dir,
            clear_cache,
            Arc::new(DefaultIconFactory::new()),
        )
        .await
    }

    /// Never fails: build errors are logged and leave the resolver without icons.
    pub async fn from_builder(
        builder: CacheBuilder,
        cache_dir: impl AsRef<Path>,
        clear_cache: bool,
        factory: Arc<dyn IconFactory>,
    ) -> Self {
        let cache_dir = cache_dir.as_ref().to_path_buf();

        if let Err(e) = builder
            .ensure(&cache_dir, clear_cache, CacheLayout::Aggregate)
            .await
        {
            warn!("Failed to build icon cache at {}: {}", cache_dir.display(), e);
        }

        Self {
            cache_dir,
            factory,
            icons: OnceCell::new(),
        }
    }

    async fn load(&self) -> IndexMap<String, CacheEntry> {
        let path = self.cache_dir.join(AGGREGATE_FILE_NAME);

        let contents = match tokio::fs::read(&path).await {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Icon cache {} is not readable: {}", path.display(), e);
                return IndexMap::new();
            }
        };

        match serde_json::from_slice(&contents) {
            Ok(icons) => icons,
            Err(e) => {
                warn!("Icon cache {} is corrupt: {}", path.display(), e);
                IndexMap::new()
            }
        }
    }

    async fn icons(&self) -> &IndexMap<String, CacheEntry> {
        self.icons.get_or_init(|| self.load()).await
    }
}

#[async_trait]
impl IconResolver for JsonFileIcons {
    async fn get(&self, name: &str) -> IconResult<Icon> {
        let Some(entry) = self.icons().await.get(name) else {
            debug!("Icon '{}' is not in the cache", name);
            return Err(IconNotFoundError::new(name));
        };

        let tag = Tag::from(entry.clone());
        Ok(self.factory.create_icon(name, Some(tag), None, None))
    }
}
