//! Direct lookups of `<dir>/<name>.svg` across search directories

use super::IconResolver;
use crate::errors::{IconNotFoundError, IconResult};
use crate::icon::{DefaultIconFactory, Icon, IconFactory};
use async_trait::async_trait;
use sandboxed_dirs::security::{is_within_dir, validate_path_within_sandbox};
use sandboxed_dirs::{Dirs, FileTypeValidator};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::debug;

/// Resolves icons from SVG files. The first directory holding a valid file wins.
/// Icons and not-found errors are memoized per instance.
pub struct SvgFileIcons {
    dirs: Dirs,
    factory: Arc<dyn IconFactory>,
    validator: FileTypeValidator,
    icons: RwLock<HashMap<String, Icon>>,
    errors: RwLock<HashMap<String, IconNotFoundError>>,
}

impl SvgFileIcons {
    pub fn new(dirs: Dirs) -> Self {
        Self::with_factory(dirs, Arc::new(DefaultIconFactory::new()))
    }

    pub fn with_factory(dirs: Dirs, factory: Arc<dyn IconFactory>) -> Self {
        Self {
            dirs,
            factory,
            validator: FileTypeValidator::svg(),
            icons: RwLock::new(HashMap::new()),
            errors: RwLock::new(HashMap::new()),
        }
    }

    /// Finds the file backing `name`. A name escaping a directory stops the search.
    async fn find_file(&self, name: &str) -> Option<PathBuf> {
        for dir in &self.dirs {
            let candidate = dir.candidate(name, "svg");

            if !is_within_dir(&candidate, dir.path()) {
                debug!("Icon name '{}' escapes {}", name, dir.path().display());
                return None;
            }

            match fs::metadata(&candidate).await {
                Ok(metadata) if metadata.is_file() => {}
                _ => continue,
            }

            if let Err(e) = validate_path_within_sandbox(&candidate, dir.path()) {
                debug!("Ignoring {}: {}", candidate.display(), e);
                continue;
            }

            if let Err(e) = self.validator.validate_file_type(&candidate).await {
                debug!("Ignoring {}: {}", candidate.display(), e);
                continue;
            }

            return Some(candidate);
        }

        None
    }

    async fn resolve(&self, name: &str) -> IconResult<Icon> {
        let Some(file) = self.find_file(name).await else {
            return Err(IconNotFoundError::new(name));
        };

        self.factory
            .create_icon_from_svg_file(name, &file)
            .await
            .map_err(|e| IconNotFoundError::from_create_error(name, e))
    }
}

#[async_trait]
impl IconResolver for SvgFileIcons {
    async fn get(&self, name: &str) -> IconResult<Icon> {
        if let Some(icon) = self.icons.read().await.get(name) {
            return Ok(icon.clone());
        }

        if let Some(error) = self.errors.read().await.get(name) {
            return Err(error.clone());
        }

        match self.resolve(name).await {
            Ok(icon) => {
                self.icons
                    .write()
                    .await
                    .insert(name.to_string(), icon.clone());
                Ok(icon)
            }
            Err(error) => {
                debug!("{}", error);
                self.errors
                    .write()
                    .await
                    .insert(name.to_string(), error.clone());
                Err(error)
            }
        }
    }
}
