//! Tool synchronization: discovery, reconciliation, and inventory storage.

use super::reconcile;
use crate::tool_registry::{
    domain::{
        ProviderHealthSnapshot, ProviderId, ProviderName, ProviderSpec, ToolChangeSet,
        ToolInventory,
    },
    ports::{
        CancelSignal, DiscoveryError, ProviderClient, ToolInventoryError, ToolInventoryRepository,
    },
};
use futures::future::join_all;
use mockable::Clock;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::OwnedMutexGuard;
use tracing::{info, warn};

type ProviderLocks = Mutex<HashMap<ProviderId, Arc<tokio::sync::Mutex<()>>>>;

/// Time limits applied by [`ToolSyncService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncConfig {
    /// Upper bound for one full discovery handshake.
    pub discovery_timeout: Duration,
    /// Upper bound for one health probe.
    pub probe_timeout: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            discovery_timeout: Duration::from_secs(15),
            probe_timeout: Duration::from_secs(10),
        }
    }
}

/// Service-level errors for tool synchronization.
#[derive(Debug, Error)]
pub enum ToolSyncServiceError {
    /// The provider is disabled and must not be contacted.
    #[error("provider '{0}' is disabled")]
    Disabled(ProviderName),
    /// Discovery failed; the stored inventory was left untouched.
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
    /// The inventory store failed.
    #[error(transparent)]
    Inventory(#[from] ToolInventoryError),
}

/// Result type for tool synchronization operations.
pub type ToolSyncServiceResult<T> = Result<T, ToolSyncServiceError>;

/// Outcome of one successful synchronization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    changes: ToolChangeSet,
    inventory: ToolInventory,
}

impl SyncReport {
    /// Returns the computed change-set.
    #[must_use]
    pub const fn changes(&self) -> &ToolChangeSet {
        &self.changes
    }

    /// Returns the inventory now stored for the provider.
    #[must_use]
    pub const fn inventory(&self) -> &ToolInventory {
        &self.inventory
    }

    /// Splits the report into its parts.
    #[must_use]
    pub fn into_parts(self) -> (ToolChangeSet, ToolInventory) {
        (self.changes, self.inventory)
    }
}

/// Keeps stored tool inventories in line with what providers expose.
///
/// Synchronizations of the same provider are serialized; different providers
/// proceed concurrently.
pub struct ToolSyncService<P, R, C>
where
    P: ProviderClient,
    R: ToolInventoryRepository,
    C: Clock + Send + Sync,
{
    client: Arc<P>,
    inventories: Arc<R>,
    clock: Arc<C>,
    config: SyncConfig,
    locks: ProviderLocks,
}

impl<P, R, C> ToolSyncService<P, R, C>
where
    P: ProviderClient,
    R: ToolInventoryRepository,
    C: Clock + Send + Sync,
{
    /// Creates a sync service with default time limits.
    #[must_use]
    pub fn new(client: Arc<P>, inventories: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            client,
            inventories,
            clock,
            config: SyncConfig::default(),
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Replaces the time limits.
    #[must_use]
    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the active time limits.
    #[must_use]
    pub const fn config(&self) -> SyncConfig {
        self.config
    }

    /// Discovers a provider's tools and replaces its stored inventory.
    ///
    /// # Errors
    ///
    /// Returns [`ToolSyncServiceError::Disabled`] for disabled specs,
    /// [`ToolSyncServiceError::Discovery`] when discovery fails (nothing is
    /// written), or [`ToolSyncServiceError::Inventory`] when the store fails.
    pub async fn sync(
        &self,
        provider_id: ProviderId,
        spec: &ProviderSpec,
    ) -> ToolSyncServiceResult<SyncReport> {
        self.sync_with_cancel(provider_id, spec, &CancelSignal::never())
            .await
    }

    /// Like [`Self::sync`], abandoning the discovery when `cancel` fires.
    ///
    /// # Errors
    ///
    /// See [`Self::sync`]; cancellation surfaces as
    /// [`DiscoveryError::Cancelled`].
    pub async fn sync_with_cancel(
        &self,
        provider_id: ProviderId,
        spec: &ProviderSpec,
        cancel: &CancelSignal,
    ) -> ToolSyncServiceResult<SyncReport> {
        if spec.is_disabled() {
            return Err(ToolSyncServiceError::Disabled(spec.name().clone()));
        }

        let _turn = self.exclusive(provider_id).await;

        let discovered = self
            .client
            .discover(spec, self.config.discovery_timeout, cancel)
            .await
            .inspect_err(|err| {
                warn!(provider = %spec.name(), error = %err, "discovery failed; inventory unchanged");
            })?;
        let previous = self
            .inventories
            .find(provider_id)
            .await?
            .unwrap_or_else(|| ToolInventory::empty(provider_id));
        let (changes, inventory) = reconcile(provider_id, &previous, &discovered, self.clock.utc());
        self.inventories.replace(&inventory).await?;

        info!(
            provider = %spec.name(),
            provider_id = %provider_id,
            created = changes.created().len(),
            updated = changes.updated().len(),
            deleted = changes.deleted().len(),
            "tool inventory synchronized"
        );
        Ok(SyncReport { changes, inventory })
    }

    /// Synchronizes several providers concurrently.
    ///
    /// Results are returned in input order, one per provider.
    pub async fn sync_all(
        &self,
        providers: &[(ProviderId, ProviderSpec)],
    ) -> Vec<(ProviderId, ToolSyncServiceResult<SyncReport>)> {
        join_all(providers.iter().map(|(provider_id, spec)| async move {
            (*provider_id, self.sync(*provider_id, spec).await)
        }))
        .await
    }

    /// Probes a provider's health with the configured probe timeout.
    pub async fn probe(&self, spec: &ProviderSpec) -> ProviderHealthSnapshot {
        self.client
            .probe(spec, self.config.probe_timeout, &CancelSignal::never())
            .await
    }

    /// Returns the stored inventory, or an empty one if the provider was never
    /// synchronized.
    ///
    /// # Errors
    ///
    /// Returns [`ToolSyncServiceError::Inventory`] when the store fails.
    pub async fn inventory(&self, provider_id: ProviderId) -> ToolSyncServiceResult<ToolInventory> {
        Ok(self
            .inventories
            .find(provider_id)
            .await?
            .unwrap_or_else(|| ToolInventory::empty(provider_id)))
    }

    /// Removes a provider's stored inventory, returning whether one existed.
    ///
    /// # Errors
    ///
    /// Returns [`ToolSyncServiceError::Inventory`] when the store fails.
    pub async fn forget(&self, provider_id: ProviderId) -> ToolSyncServiceResult<bool> {
        let _turn = self.exclusive(provider_id).await;
        Ok(self.inventories.delete(provider_id).await?)
    }

    /// Waits until no other operation holds `provider_id`.
    async fn exclusive(&self, provider_id: ProviderId) -> ProviderTurn<'_> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(provider_id).or_default())
        };
        ProviderTurn {
            locks: &self.locks,
            guard: Some(lock.lock_owned().await),
        }
    }

    #[cfg(test)]
    pub(crate) fn tracked_providers(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Exclusive access to one provider's inventory.
///
/// Releasing the last reference to a provider's lock removes it from the
/// table, so the table only holds providers with an operation in flight.
struct ProviderTurn<'a> {
    locks: &'a ProviderLocks,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for ProviderTurn<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
    }
}
