//! Icons served from one `<name>.json` cache file per icon

use super::IconResolver;
use crate::cache::{CacheBuilder, CacheEntry, CacheLayout, is_cache_key};
use crate::errors::{IconNotFoundError, IconResult};
use crate::icon::{DefaultIconFactory, Icon, IconFactory};
use crate::tag::Tag;
use async_trait::async_trait;
use sandboxed_dirs::Dirs;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Resolves icons from per-icon cache files, loading each on first use.
///
/// Construction builds the cache like [`super::JsonFileIcons`]. Loaded icons and
/// not-found errors are memoized by the exact lookup name.
pub struct JsonFilesIcons {
    cache_dir: PathBuf,
    factory: Arc<dyn IconFactory>,
    icons: RwLock<HashMap<String, Icon>>,
    errors: RwLock<HashMap<String, IconNotFoundError>>,
}

impl JsonFilesIcons {
    pub async fn new(dirs: Dirs, cache_dir: impl AsRef<Path>, clear_cache: bool) -> Self {
        Self::from_builder(
            CacheBuilder::new(dirs),
            cache_dir,
            clear_cache,
            Arc::new(DefaultIconFactory::new()),
        )
        .await
    }

    pub async fn from_builder(
        builder: CacheBuilder,
        cache_dir: impl AsRef<Path>,
        clear_cache: bool,
        factory: Arc<dyn IconFactory>,
    ) -> Self {
        let cache_dir = cache_dir.as_ref().to_path_buf();

        if let Err(e) = builder
            .ensure(&cache_dir, clear_cache, CacheLayout::PerFile)
            .await
        {
            warn!("Failed to build icon cache at {}: {}", cache_dir.display(), e);
        }

        Self {
            cache_dir,
            factory,
            icons: RwLock::new(HashMap::new()),
            errors: RwLock::new(HashMap::new()),
        }
    }

    async fn load(&self, name: &str) -> IconResult<Icon> {
        if !is_cache_key(name) {
            debug!("Icon name '{}' is not a cache key", name);
            return Err(IconNotFoundError::new(name));
        }

        let path = self.cache_dir.join(format!("{name}.json"));
        let contents = tokio::fs::read(&path).await.map_err(|e| {
            debug!("No cache file {}: {}", path.display(), e);
            IconNotFoundError::new(name)
        })?;

        let entry: CacheEntry = serde_json::from_slice(&contents).map_err(|e| {
            warn!("Icon cache file {} is corrupt: {}", path.display(), e);
            IconNotFoundError::new(name)
        })?;

        Ok(self
            .factory
            .create_icon(name, Some(Tag::from(entry)), None, None))
    }
}

#[async_trait]
impl IconResolver for JsonFilesIcons {
    async fn get(&self, name: &str) -> IconResult<Icon> {
        if let Some(icon) = self.icons.read().await.get(name) {
            return Ok(icon.clone());
        }

        if let Some(error) = self.errors.read().await.get(name) {
            return Err(error.clone());
        }

        match self.load(name).await {
            Ok(icon) => {
                self.icons
                    .write()
                    .await
                    .insert(name.to_string(), icon.clone());
                Ok(icon)
            }
            Err(error) => {
                self.errors
                    .write()
                    .await
                    .insert(name.to_string(), error.clone());
                Err(error)
            }
        }
    }
}
