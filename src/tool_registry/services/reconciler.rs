//! Reconciliation of discovered tools against a stored inventory.

use crate::tool_registry::domain::{
    DiscoveredTool, ProviderId, ToolChangeSet, ToolDefinition, ToolInventory,
};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Computes the change-set and replacement inventory for one provider.
///
/// The discovered list is authoritative: the returned inventory holds exactly
/// the well-formed discovered tools, in discovery order, stamped with
/// `synced_at`. Entries without a name are dropped and counted; when a name
/// repeats, the first occurrence wins. The function is pure and total.
#[must_use]
pub fn reconcile(
    provider_id: ProviderId,
    previous: &ToolInventory,
    discovered: &[DiscoveredTool],
    synced_at: DateTime<Utc>,
) -> (ToolChangeSet, ToolInventory) {
    let mut changes = ToolChangeSet::new(provider_id);
    let previous_by_name: HashMap<&str, &ToolDefinition> = previous
        .tools()
        .iter()
        .map(|tool| (tool.name(), tool))
        .collect();

    let mut seen = HashSet::new();
    let mut current = Vec::with_capacity(discovered.len());
    for entry in discovered {
        let Ok(definition) = entry.to_definition() else {
            changes.record_malformed();
            continue;
        };
        if !seen.insert(definition.name().to_owned()) {
            changes.record_duplicate();
            continue;
        }

        match previous_by_name.get(definition.name()) {
            None => changes.push_created(definition.clone()),
            Some(stored) if stored.differs_from(&definition) => {
                changes.push_updated((*stored).clone(), definition.clone());
            }
            Some(_) => {}
        }
        current.push(definition);
    }

    for stored in previous.tools() {
        if !seen.contains(stored.name()) {
            changes.push_deleted(stored.clone());
        }
    }

    if changes.dropped_malformed() > 0 || changes.dropped_duplicates() > 0 {
        warn!(
            provider_id = %provider_id,
            malformed = changes.dropped_malformed(),
            duplicates = changes.dropped_duplicates(),
            "dropped discovered tool entries"
        );
    }

    (
        changes,
        ToolInventory::synced(provider_id, current, synced_at),
    )
}
