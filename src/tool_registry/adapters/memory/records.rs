//! In-memory store for agent- and skill-scoped provider definitions.

use super::poisoned;
use crate::tool_registry::{
    domain::{ProviderMap, ProviderName, ProviderScope, ProviderSpec},
    ports::{ProviderRecordError, ProviderRecordRepository, ProviderRecordResult},
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory provider record store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProviderRecords {
    state: Arc<RwLock<HashMap<ProviderScope, ProviderMap>>>,
}

impl InMemoryProviderRecords {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProviderRecordRepository for InMemoryProviderRecords {
    async fn get(
        &self,
        scope: ProviderScope,
        name: &ProviderName,
    ) -> ProviderRecordResult<Option<ProviderSpec>> {
        let state = self
            .state
            .read()
            .map_err(|err| ProviderRecordError::persistence(poisoned(&err)))?;
        Ok(state
            .get(&scope)
            .and_then(|providers| providers.get(name))
            .cloned())
    }

    async fn list_providers(&self, scope: ProviderScope) -> ProviderRecordResult<ProviderMap> {
        let state = self
            .state
            .read()
            .map_err(|err| ProviderRecordError::persistence(poisoned(&err)))?;
        Ok(state.get(&scope).cloned().unwrap_or_default())
    }

    async fn upsert(&self, scope: ProviderScope, spec: &ProviderSpec) -> ProviderRecordResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| ProviderRecordError::persistence(poisoned(&err)))?;
        state
            .entry(scope)
            .or_default()
            .insert(spec.name().clone(), spec.clone());
        Ok(())
    }

    async fn delete(
        &self,
        scope: ProviderScope,
        name: &ProviderName,
    ) -> ProviderRecordResult<bool> {
        let mut state = self
            .state
            .write()
            .map_err(|err| ProviderRecordError::persistence(poisoned(&err)))?;
        Ok(state
            .get_mut(&scope)
            .and_then(|providers| providers.remove(name))
            .is_some())
    }
}
