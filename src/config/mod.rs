use anyhow::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

pub mod defaults;

use crate::cache::CacheLayout;
use crate::icon::{SizeClassMap, default_size_class_map};
use defaults::*;
use sandboxed_dirs::Dirs;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub icons: IconsConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub render: RenderConfig,
    /// SVG `<title>` translations; a non-empty map enables translation
    #[serde(default)]
    pub translations: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconsConfig {
    /// Search directories, earlier ones take precedence
    #[serde(default = "default_icon_dirs")]
    pub dirs: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub layout: CacheLayout,
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,
    /// Wipe and rebuild the cache when the resolver is created
    #[serde(default = "default_clear_on_start")]
    pub clear_on_start: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Size key to CSS class
    #[serde(default = "default_size_class_map")]
    pub size_classes: SizeClassMap,
    /// Render unknown icons as empty `span.icon` placeholders instead of failing
    #[serde(default = "default_fallback_to_placeholder")]
    pub fallback_to_placeholder: bool,
}

fn default_icon_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from(DEFAULT_ICON_DIR)]
}
fn default_cache_enabled() -> bool {
    DEFAULT_CACHE_ENABLED
}
fn default_cache_dir() -> PathBuf {
    PathBuf::from(DEFAULT_CACHE_DIR)
}
fn default_clear_on_start() -> bool {
    DEFAULT_CLEAR_CACHE_ON_START
}
fn default_fallback_to_placeholder() -> bool {
    DEFAULT_FALLBACK_TO_PLACEHOLDER
}

impl Default for IconsConfig {
    fn default() -> Self {
        Self {
            dirs: default_icon_dirs(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            layout: CacheLayout::default(),
            dir: default_cache_dir(),
            clear_on_start: default_clear_on_start(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            size_classes: default_size_class_map(),
            fallback_to_placeholder: default_fallback_to_placeholder(),
        }
    }
}

impl IconsConfig {
    #[must_use]
    pub fn search_dirs(&self) -> Dirs {
        self.dirs.iter().cloned().collect()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_file =
            std::env::var(CONFIG_FILE_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from_file(&config_file)
    }

    pub fn load_from_file(config_file: &str) -> Result<Self> {
        if std::path::Path::new(&config_file).exists() {
            let contents = std::fs::read_to_string(config_file)?;
            Ok(toml::from_str(&contents)?)
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            std::fs::write(config_file, contents)?;
            info!("Created default config file: {}", config_file);
            Ok(default_config)
        }
    }
}
