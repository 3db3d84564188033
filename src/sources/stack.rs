use super::IconResolver;
use crate::errors::{IconNotFoundError, IconResult};
use crate::icon::Icon;
use async_trait::async_trait;
use std::sync::Arc;

/// Ordered fallback over other resolvers; the first member that has an icon serves it
#[derive(Default)]
pub struct StackIcons {
    resolvers: Vec<Arc<dyn IconResolver>>,
}

impl StackIcons {
    pub fn new(resolvers: Vec<Arc<dyn IconResolver>>) -> Self {
        Self { resolvers }
    }

    #[must_use]
    pub fn with(mut self, resolver: Arc<dyn IconResolver>) -> Self {
        self.resolvers.push(resolver);
        self
    }
}

#[async_trait]
impl IconResolver for StackIcons {
    async fn get(&self, name: &str) -> IconResult<Icon> {
        for resolver in &self.resolvers {
            if resolver.has(name).await {
                return resolver.get(name).await;
            }
        }

        Err(IconNotFoundError::new(name))
    }

    async fn has(&self, name: &str) -> bool {
        for resolver in &self.resolvers {
            if resolver.has(name).await {
                return true;
            }
        }

        false
    }
}
