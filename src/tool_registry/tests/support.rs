//! Shared builders and port mocks for service tests.

use crate::tool_registry::{
    domain::{
        DiscoveredTool, ProviderHealthSnapshot, ProviderId, ProviderMap, ProviderName,
        ProviderScope, ProviderSpec, ProviderTransport, ToolDefinition, ToolInventory,
    },
    ports::{
        CancelSignal, DiscoveryResult, ProviderClient, ProviderRecordRepository,
        ProviderRecordResult, ToolInventoryRepository, ToolInventoryResult,
    },
};
use async_trait::async_trait;
use mockall::mock;
use std::time::Duration;

mock! {
    pub Client {}

    #[async_trait]
    impl ProviderClient for Client {
        async fn discover(
            &self,
            spec: &ProviderSpec,
            timeout: Duration,
            cancel: &CancelSignal,
        ) -> DiscoveryResult<Vec<DiscoveredTool>>;

        async fn probe(
            &self,
            spec: &ProviderSpec,
            timeout: Duration,
            cancel: &CancelSignal,
        ) -> ProviderHealthSnapshot;
    }
}

mock! {
    pub Inventory {}

    #[async_trait]
    impl ToolInventoryRepository for Inventory {
        async fn find(&self, provider_id: ProviderId) -> ToolInventoryResult<Option<ToolInventory>>;
        async fn replace(&self, inventory: &ToolInventory) -> ToolInventoryResult<()>;
        async fn delete(&self, provider_id: ProviderId) -> ToolInventoryResult<bool>;
    }
}

mock! {
    pub Records {}

    #[async_trait]
    impl ProviderRecordRepository for Records {
        async fn get(
            &self,
            scope: ProviderScope,
            name: &ProviderName,
        ) -> ProviderRecordResult<Option<ProviderSpec>>;
        async fn list_providers(&self, scope: ProviderScope) -> ProviderRecordResult<ProviderMap>;
        async fn upsert(&self, scope: ProviderScope, spec: &ProviderSpec) -> ProviderRecordResult<()>;
        async fn delete(
            &self,
            scope: ProviderScope,
            name: &ProviderName,
        ) -> ProviderRecordResult<bool>;
    }
}

pub(super) fn stdio_spec(name: &str, command: &str) -> ProviderSpec {
    ProviderSpec::new(
        ProviderName::new(name).expect("valid provider name"),
        ProviderTransport::stdio(command).expect("valid command"),
    )
}

pub(super) fn tool(name: &str, description: &str) -> DiscoveredTool {
    DiscoveredTool::named(name).with_description(description)
}

pub(super) fn names(tools: &[ToolDefinition]) -> Vec<&str> {
    tools.iter().map(|tool| tool.name()).collect()
}
