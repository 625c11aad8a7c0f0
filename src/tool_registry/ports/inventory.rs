//! Repository port for persisted tool inventories.

use crate::tool_registry::domain::{ProviderId, ToolInventory};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for tool inventory operations.
pub type ToolInventoryResult<T> = Result<T, ToolInventoryError>;

/// Persistence contract for per-provider tool inventories.
#[async_trait]
pub trait ToolInventoryRepository: Send + Sync {
    /// Finds the stored inventory for a provider.
    async fn find(&self, provider_id: ProviderId) -> ToolInventoryResult<Option<ToolInventory>>;

    /// Atomically replaces the stored inventory for its provider.
    async fn replace(&self, inventory: &ToolInventory) -> ToolInventoryResult<()>;

    /// Removes a provider's inventory, returning whether one existed.
    async fn delete(&self, provider_id: ProviderId) -> ToolInventoryResult<bool>;
}

/// Errors returned by tool inventory repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ToolInventoryError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ToolInventoryError {
    /// Wraps a persistence-layer failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
