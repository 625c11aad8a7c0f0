//! In-memory tool inventory store.

use super::poisoned;
use crate::tool_registry::{
    domain::{ProviderId, ToolInventory},
    ports::{ToolInventoryError, ToolInventoryRepository, ToolInventoryResult},
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory tool inventory store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryToolInventory {
    inventories: Arc<RwLock<HashMap<ProviderId, ToolInventory>>>,
}

impl InMemoryToolInventory {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored inventories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inventories
            .read()
            .map(|guard| guard.len())
            .unwrap_or(0)
    }

    /// Returns `true` if no inventories are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ToolInventoryRepository for InMemoryToolInventory {
    async fn find(&self, provider_id: ProviderId) -> ToolInventoryResult<Option<ToolInventory>> {
        let inventories = self
            .inventories
            .read()
            .map_err(|err| ToolInventoryError::persistence(poisoned(&err)))?;
        Ok(inventories.get(&provider_id).cloned())
    }

    async fn replace(&self, inventory: &ToolInventory) -> ToolInventoryResult<()> {
        let mut inventories = self
            .inventories
            .write()
            .map_err(|err| ToolInventoryError::persistence(poisoned(&err)))?;
        inventories.insert(inventory.provider_id(), inventory.clone());
        Ok(())
    }

    async fn delete(&self, provider_id: ProviderId) -> ToolInventoryResult<bool> {
        let mut inventories = self
            .inventories
            .write()
            .map_err(|err| ToolInventoryError::persistence(poisoned(&err)))?;
        Ok(inventories.remove(&provider_id).is_some())
    }
}
