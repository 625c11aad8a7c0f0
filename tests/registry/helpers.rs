//! Shared fixtures for in-memory registry integration tests.

use armature::tool_registry::{
    adapters::{
        InProcessProviderClient, TransportRouter,
        memory::InMemoryToolInventory,
    },
    domain::{DiscoveredTool, ProviderName, ProviderSpec, ProviderTransport},
    services::ToolSyncService,
};
use mockable::DefaultClock;
use std::sync::Arc;

/// Sync service wired to an in-process client through the transport router.
pub type RoutedSyncService = ToolSyncService<TransportRouter, InMemoryToolInventory, DefaultClock>;

/// Builds an in-process provider spec whose handle equals its name.
///
/// # Panics
///
/// Panics if `name` is not a valid provider name.
pub fn in_process_spec(name: &str) -> ProviderSpec {
    ProviderSpec::new(
        ProviderName::new(name).expect("valid provider name"),
        ProviderTransport::in_process(name).expect("valid handle"),
    )
}

/// Builds a discovered tool with a description derived from its name.
pub fn described(name: &str) -> DiscoveredTool {
    DiscoveredTool::named(name).with_description(format!("Tool {name}"))
}

/// Creates a sync service routing in-process specs to `client`.
pub fn routed_service(client: &Arc<InProcessProviderClient>) -> RoutedSyncService {
    let router = TransportRouter::new().with_in_process(Arc::<InProcessProviderClient>::clone(client));
    ToolSyncService::new(
        Arc::new(router),
        Arc::new(InMemoryToolInventory::new()),
        Arc::new(DefaultClock),
    )
}
