use super::IconResolver;
use crate::errors::{IconNotFoundError, IconResult};
use crate::icon::{DefaultIconFactory, Icon, IconFactory};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::Arc;

/// Icons defined as markup in memory, parsed on every lookup
pub struct InMemoryHtmlIcons {
    icons: IndexMap<String, String>,
    factory: Arc<dyn IconFactory>,
}

impl InMemoryHtmlIcons {
    pub fn new<I, K, V>(icons: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::with_factory(icons, Arc::new(DefaultIconFactory::new()))
    }

    pub fn with_factory<I, K, V>(icons: I, factory: Arc<dyn IconFactory>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            icons: icons
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            factory,
        }
    }
}

#[async_trait]
impl IconResolver for InMemoryHtmlIcons {
    async fn get(&self, name: &str) -> IconResult<Icon> {
        let html = self
            .icons
            .get(name)
            .ok_or_else(|| IconNotFoundError::new(name))?;

        self.factory
            .create_icon_from_html(name, html)
            .map_err(|e| IconNotFoundError::from_create_error(name, e))
    }

    /// Only checks that markup is registered; it is not parsed, so `get` may still fail.
    async fn has(&self, name: &str) -> bool {
        self.icons.contains_key(name)
    }
}
