//! Persisted tool inventory for one provider.

use super::{ProviderId, ToolDefinition};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The set of tools last discovered for a provider.
///
/// An inventory starts empty when the provider is registered and is replaced
/// wholesale after every successful discovery run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInventory {
    provider_id: ProviderId,
    tools: Vec<ToolDefinition>,
    last_synced_at: Option<DateTime<Utc>>,
}

impl ToolInventory {
    /// Creates the empty inventory of a newly registered provider.
    #[must_use]
    pub const fn empty(provider_id: ProviderId) -> Self {
        Self {
            provider_id,
            tools: Vec::new(),
            last_synced_at: None,
        }
    }

    /// Creates an inventory synchronised at `synced_at`.
    #[must_use]
    pub const fn synced(
        provider_id: ProviderId,
        tools: Vec<ToolDefinition>,
        synced_at: DateTime<Utc>,
    ) -> Self {
        Self {
            provider_id,
            tools,
            last_synced_at: Some(synced_at),
        }
    }

    /// Returns the owning provider.
    #[must_use]
    pub const fn provider_id(&self) -> ProviderId {
        self.provider_id
    }

    /// Returns the stored tools in discovery order.
    #[must_use]
    pub fn tools(&self) -> &[ToolDefinition] {
        &self.tools
    }

    /// Looks up a tool by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.iter().find(|tool| tool.name() == name)
    }

    /// Returns the time of the last successful sync, if any.
    #[must_use]
    pub const fn last_synced_at(&self) -> Option<DateTime<Utc>> {
        self.last_synced_at
    }

    /// Returns whether the inventory holds no tools.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
