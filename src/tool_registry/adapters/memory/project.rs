//! Fixed project provider source.

use crate::tool_registry::{
    domain::{ProviderMap, ProviderSpec, provider_map},
    ports::{ConfigReadResult, ProjectProviderSource},
};
use async_trait::async_trait;

/// Project source backed by a map held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProjectSource {
    providers: ProviderMap,
}

impl InMemoryProjectSource {
    /// Creates a source yielding the given providers.
    #[must_use]
    pub fn new(providers: impl IntoIterator<Item = ProviderSpec>) -> Self {
        Self {
            providers: provider_map(providers),
        }
    }
}

#[async_trait]
impl ProjectProviderSource for InMemoryProjectSource {
    async fn load_providers(&self) -> ConfigReadResult<ProviderMap> {
        Ok(self.providers.clone())
    }
}
