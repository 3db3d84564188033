/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.
// Config file
pub const DEFAULT_CONFIG_FILE: &str = "icons.toml";
pub const CONFIG_FILE_ENV: &str = "SVG_ICONS_CONFIG";

// Icon source defaults
pub const DEFAULT_ICON_DIR: &str = "./icons";

// Cache defaults
pub const DEFAULT_CACHE_ENABLED: bool = true;
pub const DEFAULT_CACHE_DIR: &str = "./data/icon-cache";
pub const DEFAULT_CLEAR_CACHE_ON_START: bool = false;

// Render defaults
pub const DEFAULT_FALLBACK_TO_PLACEHOLDER: bool = false;
