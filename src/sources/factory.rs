use super::IconResolver;
use crate::errors::IconResult;
use crate::icon::{DefaultIconFactory, Icon, IconFactory};
use async_trait::async_trait;
use std::sync::Arc;

/// Resolves every name to a fresh factory icon without glyph markup
pub struct FactoryIcons {
    factory: Arc<dyn IconFactory>,
}

impl Default for FactoryIcons {
    fn default() -> Self {
        Self::new(Arc::new(DefaultIconFactory::new()))
    }
}

impl FactoryIcons {
    pub fn new(factory: Arc<dyn IconFactory>) -> Self {
        Self { factory }
    }
}

#[async_trait]
impl IconResolver for FactoryIcons {
    async fn get(&self, name: &str) -> IconResult<Icon> {
        Ok(self.factory.create_icon(name, None, None, None))
    }

    async fn has(&self, _name: &str) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_any_name_resolves() {
        let icons = FactoryIcons::default();

        assert!(icons.has("download").await);
        let icon = icons.get("Download").await.unwrap();
        assert_eq!(icon.name(), "Download");
        assert_eq!(icon.render(), r#"<span class="icon icon-download"></span>"#);
    }
}
