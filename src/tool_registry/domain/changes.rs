//! Change-set produced by tool reconciliation.

use super::{ProviderId, ToolDefinition};
use serde::Serialize;

/// A tool whose metadata changed between two syncs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolUpdate {
    /// The stored definition before this sync.
    pub previous: ToolDefinition,
    /// The freshly discovered definition.
    pub current: ToolDefinition,
}

/// Minimal set of writes turning a previous inventory into the discovered one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolChangeSet {
    provider_id: ProviderId,
    created: Vec<ToolDefinition>,
    updated: Vec<ToolUpdate>,
    deleted: Vec<ToolDefinition>,
    dropped_malformed: usize,
    dropped_duplicates: usize,
}

impl ToolChangeSet {
    /// Creates an empty change-set for a provider.
    #[must_use]
    pub const fn new(provider_id: ProviderId) -> Self {
        Self {
            provider_id,
            created: Vec::new(),
            updated: Vec::new(),
            deleted: Vec::new(),
            dropped_malformed: 0,
            dropped_duplicates: 0,
        }
    }

    pub(crate) fn push_created(&mut self, tool: ToolDefinition) {
        self.created.push(tool);
    }

    pub(crate) fn push_updated(&mut self, previous: ToolDefinition, current: ToolDefinition) {
        self.updated.push(ToolUpdate { previous, current });
    }

    pub(crate) fn push_deleted(&mut self, tool: ToolDefinition) {
        self.deleted.push(tool);
    }

    pub(crate) const fn record_malformed(&mut self) {
        self.dropped_malformed = self.dropped_malformed.saturating_add(1);
    }

    pub(crate) const fn record_duplicate(&mut self) {
        self.dropped_duplicates = self.dropped_duplicates.saturating_add(1);
    }

    /// Returns the provider the change-set applies to.
    #[must_use]
    pub const fn provider_id(&self) -> ProviderId {
        self.provider_id
    }

    /// Returns tools that did not exist before.
    #[must_use]
    pub fn created(&self) -> &[ToolDefinition] {
        &self.created
    }

    /// Returns tools whose description or schema changed.
    #[must_use]
    pub fn updated(&self) -> &[ToolUpdate] {
        &self.updated
    }

    /// Returns tools that the provider no longer exposes.
    #[must_use]
    pub fn deleted(&self) -> &[ToolDefinition] {
        &self.deleted
    }

    /// Returns how many discovered entries were dropped for lacking a name.
    #[must_use]
    pub const fn dropped_malformed(&self) -> usize {
        self.dropped_malformed
    }

    /// Returns how many discovered entries repeated an earlier name.
    #[must_use]
    pub const fn dropped_duplicates(&self) -> usize {
        self.dropped_duplicates
    }

    /// Returns whether applying the change-set would write nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.updated.is_empty() && self.deleted.is_empty()
    }
}
