//! Record store port for agent- and skill-scoped provider definitions.

use crate::tool_registry::domain::{ProviderMap, ProviderName, ProviderScope, ProviderSpec};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for provider record operations.
pub type ProviderRecordResult<T> = Result<T, ProviderRecordError>;

/// Persistence contract for provider definitions attached to agents and skills.
#[async_trait]
pub trait ProviderRecordRepository: Send + Sync {
    /// Finds one provider definition within a scope.
    async fn get(
        &self,
        scope: ProviderScope,
        name: &ProviderName,
    ) -> ProviderRecordResult<Option<ProviderSpec>>;

    /// Lists every provider definition within a scope, including disabled ones.
    async fn list_providers(&self, scope: ProviderScope) -> ProviderRecordResult<ProviderMap>;

    /// Inserts or replaces a provider definition within a scope.
    async fn upsert(&self, scope: ProviderScope, spec: &ProviderSpec) -> ProviderRecordResult<()>;

    /// Deletes a provider definition, returning whether one existed.
    async fn delete(&self, scope: ProviderScope, name: &ProviderName)
    -> ProviderRecordResult<bool>;
}

/// Errors returned by provider record store implementations.
#[derive(Debug, Clone, Error)]
pub enum ProviderRecordError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ProviderRecordError {
    /// Wraps a persistence-layer failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
