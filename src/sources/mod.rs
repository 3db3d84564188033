//! Icon resolvers
//!
//! Every resolver maps an icon name to an [`Icon`] or fails with
//! [`IconNotFoundError`]:
//!
//! - [`FactoryIcons`]: builds an empty icon for any name
//! - [`InMemoryHtmlIcons`]: markup held in memory
//! - [`StackIcons`]: ordered fallback over other resolvers
//! - [`SvgFileIcons`]: `<dir>/<name>.svg` lookups across search directories
//! - [`JsonFileIcons`]: aggregate `icons.json` cache
//! - [`JsonFilesIcons`]: one `<name>.json` cache file per icon

pub mod factory;
pub mod json_file;
pub mod json_files;
pub mod memory;
pub mod stack;
pub mod svg_files;

use crate::cache::{CacheBuilder, CacheLayout};
use crate::config::Config;
use crate::errors::IconResult;
use crate::icon::{DefaultIconFactory, Icon, IconFactory, MapTranslator, TranslatingIconFactory};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

pub use factory::FactoryIcons;
pub use json_file::JsonFileIcons;
pub use json_files::JsonFilesIcons;
pub use memory::InMemoryHtmlIcons;
pub use stack::StackIcons;
pub use svg_files::SvgFileIcons;

#[async_trait]
pub trait IconResolver: Send + Sync {
    /// Resolves an icon by name.
    ///
    /// # Errors
    /// Returns [`IconNotFoundError`](crate::errors::IconNotFoundError) when no icon can
    /// be found or created for `name`.
    async fn get(&self, name: &str) -> IconResult<Icon>;

    /// True when [`Self::get`] succeeds. Never fails.
    async fn has(&self, name: &str) -> bool {
        self.get(name).await.is_ok()
    }
}

/// Icon factory for the configured size classes and translations
pub fn icon_factory_from_config(config: &Config) -> Arc<dyn IconFactory> {
    let factory =
        DefaultIconFactory::new().with_size_class_map(config.render.size_classes.clone());

    if config.translations.is_empty() {
        return Arc::new(factory);
    }

    let translations: HashMap<String, String> = config
        .translations
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    Arc::new(TranslatingIconFactory::new(
        factory,
        MapTranslator::new(translations),
    ))
}

/// Wires the resolver described by the configuration: a cache-backed resolver in the
/// configured layout, or a direct filesystem resolver, optionally stacked over
/// placeholder icons.
pub async fn resolver_from_config(config: &Config) -> Arc<dyn IconResolver> {
    let icon_factory = icon_factory_from_config(config);
    let dirs = config.icons.search_dirs();

    let resolver: Arc<dyn IconResolver> = if config.cache.enabled {
        debug!(
            "Using {} icon cache at {}",
            config.cache.layout,
            config.cache.dir.display()
        );
        let builder = CacheBuilder::new(dirs);
        match config.cache.layout {
            CacheLayout::Aggregate => Arc::new(
                JsonFileIcons::from_builder(
                    builder,
                    &config.cache.dir,
                    config.cache.clear_on_start,
                    icon_factory.clone(),
                )
                .await,
            ),
            CacheLayout::PerFile => Arc::new(
                JsonFilesIcons::from_builder(
                    builder,
                    &config.cache.dir,
                    config.cache.clear_on_start,
                    icon_factory.clone(),
                )
                .await,
            ),
        }
    } else {
        debug!("Icon cache disabled, resolving from svg files");
        Arc::new(SvgFileIcons::with_factory(dirs, icon_factory.clone()))
    };

    if config.render.fallback_to_placeholder {
        Arc::new(StackIcons::new(vec![
            resolver,
            Arc::new(FactoryIcons::new(icon_factory)),
        ]))
    } else {
        resolver
    }
}
