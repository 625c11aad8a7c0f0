//! Service orchestration tests for tool synchronization.

use super::support::{MockClient, MockInventory, names, stdio_spec, tool};
use crate::tool_registry::{
    adapters::memory::InMemoryToolInventory,
    domain::{DiscoveredTool, ProviderHealthSnapshot, ProviderId, ProviderName, ProviderSpec},
    ports::{
        CancelSignal, DiscoveryError, DiscoveryResult, ProviderClient, ToolInventoryError,
        ToolInventoryRepository,
    },
    services::{SyncConfig, ToolSyncService, ToolSyncServiceError},
};
use async_trait::async_trait;
use chrono::Utc;
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

fn service_with(
    client: MockClient,
    inventory: Arc<InMemoryToolInventory>,
) -> ToolSyncService<MockClient, InMemoryToolInventory, DefaultClock> {
    ToolSyncService::new(Arc::new(client), inventory, Arc::new(DefaultClock))
}

#[fixture]
fn inventory() -> Arc<InMemoryToolInventory> {
    Arc::new(InMemoryToolInventory::new())
}

#[fixture]
fn provider_id() -> ProviderId {
    ProviderId::new()
}

#[rstest]
#[tokio::test]
async fn first_sync_creates_every_tool(
    inventory: Arc<InMemoryToolInventory>,
    provider_id: ProviderId,
) {
    let mut client = MockClient::new();
    client
        .expect_discover()
        .times(1)
        .returning(|_, _, _| Ok(vec![tool("read", "Read a file"), tool("write", "Write a file")]));
    let service = service_with(client, Arc::clone(&inventory));

    let report = service
        .sync(provider_id, &stdio_spec("fs", "mcp-fs"))
        .await
        .expect("sync succeeds");

    assert_eq!(names(report.changes().created()), ["read", "write"]);
    assert!(report.changes().updated().is_empty());
    assert!(report.changes().deleted().is_empty());
    assert!(report.inventory().last_synced_at().is_some());
    let stored = inventory
        .find(provider_id)
        .await
        .expect("store readable")
        .expect("inventory stored");
    assert_eq!(&stored, report.inventory());
}

#[rstest]
#[tokio::test]
async fn resync_reports_updates_and_deletions(
    inventory: Arc<InMemoryToolInventory>,
    provider_id: ProviderId,
) {
    let mut client = MockClient::new();
    let mut sequence = mockall::Sequence::new();
    client
        .expect_discover()
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|_, _, _| Ok(vec![tool("read", "Read a file"), tool("write", "Write a file")]));
    client
        .expect_discover()
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|_, _, _| Ok(vec![tool("read", "Read any file"), tool("list", "List files")]));
    let service = service_with(client, Arc::clone(&inventory));
    let spec = stdio_spec("fs", "mcp-fs");

    service.sync(provider_id, &spec).await.expect("first sync succeeds");
    let report = service.sync(provider_id, &spec).await.expect("second sync succeeds");

    assert_eq!(names(report.changes().created()), ["list"]);
    let updated: Vec<&str> = report
        .changes()
        .updated()
        .iter()
        .map(|update| update.current.name())
        .collect();
    assert_eq!(updated, ["read"]);
    assert_eq!(names(report.changes().deleted()), ["write"]);
    assert_eq!(names(report.inventory().tools()), ["read", "list"]);
}

#[rstest]
#[tokio::test]
async fn failed_discovery_leaves_inventory_untouched(
    inventory: Arc<InMemoryToolInventory>,
    provider_id: ProviderId,
) {
    let mut client = MockClient::new();
    let mut sequence = mockall::Sequence::new();
    client
        .expect_discover()
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|_, _, _| Ok(vec![tool("read", "Read a file")]));
    client
        .expect_discover()
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|spec, _, _| {
            Err(DiscoveryError::Timeout {
                provider: spec.name().clone(),
            })
        });
    let service = service_with(client, Arc::clone(&inventory));
    let spec = stdio_spec("fs", "mcp-fs");
    let first = service.sync(provider_id, &spec).await.expect("first sync succeeds");

    let result = service.sync(provider_id, &spec).await;

    assert!(matches!(
        result,
        Err(ToolSyncServiceError::Discovery(DiscoveryError::Timeout { .. }))
    ));
    let stored = service.inventory(provider_id).await.expect("store readable");
    assert_eq!(&stored, first.inventory());
}

#[rstest]
#[tokio::test]
async fn disabled_provider_is_never_contacted(
    inventory: Arc<InMemoryToolInventory>,
    provider_id: ProviderId,
) {
    let mut client = MockClient::new();
    client.expect_discover().times(0);
    let service = service_with(client, Arc::clone(&inventory));

    let result = service
        .sync(provider_id, &stdio_spec("fs", "mcp-fs").with_disabled(true))
        .await;

    assert!(matches!(result, Err(ToolSyncServiceError::Disabled(_))));
    assert!(inventory.is_empty());
}

#[rstest]
#[tokio::test]
async fn empty_discovery_clears_inventory(
    inventory: Arc<InMemoryToolInventory>,
    provider_id: ProviderId,
) {
    let mut client = MockClient::new();
    let mut sequence = mockall::Sequence::new();
    client
        .expect_discover()
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|_, _, _| Ok(vec![tool("read", "Read a file")]));
    client
        .expect_discover()
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|_, _, _| Ok(Vec::new()));
    let service = service_with(client, Arc::clone(&inventory));
    let spec = stdio_spec("fs", "mcp-fs");

    service.sync(provider_id, &spec).await.expect("first sync succeeds");
    let report = service.sync(provider_id, &spec).await.expect("second sync succeeds");

    assert_eq!(names(report.changes().deleted()), ["read"]);
    assert!(report.inventory().is_empty());
}

#[rstest]
#[tokio::test]
async fn discovery_uses_configured_timeout(inventory: Arc<InMemoryToolInventory>) {
    let mut client = MockClient::new();
    client
        .expect_discover()
        .withf(|_, timeout, _| *timeout == Duration::from_millis(750))
        .times(1)
        .returning(|_, _, _| Ok(Vec::new()));
    let service = service_with(client, inventory).with_config(SyncConfig {
        discovery_timeout: Duration::from_millis(750),
        probe_timeout: Duration::from_millis(250),
    });

    let result = service.sync(ProviderId::new(), &stdio_spec("fs", "mcp-fs")).await;

    assert!(result.is_ok());
}

#[rstest]
#[tokio::test]
async fn probe_uses_probe_timeout(inventory: Arc<InMemoryToolInventory>) {
    let mut client = MockClient::new();
    client
        .expect_probe()
        .withf(|_, timeout, _| *timeout == Duration::from_millis(250))
        .times(1)
        .returning(|_, _, _| ProviderHealthSnapshot::unhealthy(Utc::now(), "timeout"));
    let service = service_with(client, inventory).with_config(SyncConfig {
        discovery_timeout: Duration::from_millis(750),
        probe_timeout: Duration::from_millis(250),
    });

    let snapshot = service.probe(&stdio_spec("fs", "mcp-fs")).await;

    assert!(!snapshot.is_ok());
    assert_eq!(snapshot.message(), "timeout");
}

#[rstest]
#[tokio::test]
async fn sync_all_reports_each_provider_in_input_order(inventory: Arc<InMemoryToolInventory>) {
    let mut client = MockClient::new();
    client.expect_discover().times(3).returning(|spec, _, _| {
        if spec.name().as_str() == "broken" {
            Err(DiscoveryError::Protocol {
                provider: spec.name().clone(),
                reason: "bad response".to_owned(),
            })
        } else {
            Ok(vec![tool(spec.name().as_str(), "tool named after provider")])
        }
    });
    let service = service_with(client, inventory);
    let providers = vec![
        (ProviderId::new(), stdio_spec("alpha", "a")),
        (ProviderId::new(), stdio_spec("broken", "b")),
        (ProviderId::new(), stdio_spec("gamma", "c")),
    ];

    let results = service.sync_all(&providers).await;

    let ids: Vec<ProviderId> = results.iter().map(|(id, _)| *id).collect();
    let expected: Vec<ProviderId> = providers.iter().map(|(id, _)| *id).collect();
    assert_eq!(ids, expected);
    let outcomes: Vec<bool> = results.iter().map(|(_, result)| result.is_ok()).collect();
    assert_eq!(outcomes, [true, false, true]);
}

#[rstest]
#[tokio::test]
async fn forget_removes_stored_inventory(
    inventory: Arc<InMemoryToolInventory>,
    provider_id: ProviderId,
) {
    let mut client = MockClient::new();
    client
        .expect_discover()
        .times(1)
        .returning(|_, _, _| Ok(vec![tool("read", "Read a file")]));
    let service = service_with(client, Arc::clone(&inventory));
    service
        .sync(provider_id, &stdio_spec("fs", "mcp-fs"))
        .await
        .expect("sync succeeds");

    assert!(service.forget(provider_id).await.expect("forget succeeds"));
    assert!(!service.forget(provider_id).await.expect("forget succeeds"));
    assert!(inventory.is_empty());
}

#[rstest]
#[tokio::test]
async fn inventory_store_failure_surfaces(provider_id: ProviderId) {
    let mut client = MockClient::new();
    client
        .expect_discover()
        .times(1)
        .returning(|_, _, _| Ok(vec![tool("read", "Read a file")]));
    let mut store = MockInventory::new();
    store
        .expect_find()
        .times(1)
        .returning(|_| Err(ToolInventoryError::persistence(std::io::Error::other("disk full"))));
    store.expect_replace().times(0);
    let service = ToolSyncService::new(Arc::new(client), Arc::new(store), Arc::new(DefaultClock));

    let result = service.sync(provider_id, &stdio_spec("fs", "mcp-fs")).await;

    assert!(matches!(result, Err(ToolSyncServiceError::Inventory(_))));
}

/// Client that records how many discoveries overlap in time.
#[derive(Default)]
struct OverlapTrackingClient {
    active: AtomicUsize,
    peak: AtomicUsize,
}

#[async_trait]
impl ProviderClient for OverlapTrackingClient {
    async fn discover(
        &self,
        _spec: &ProviderSpec,
        _timeout: Duration,
        _cancel: &CancelSignal,
    ) -> DiscoveryResult<Vec<DiscoveredTool>> {
        let now_active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now_active, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        self.active.fetch_sub(1, Ordering::SeqCst);
        Ok(Vec::new())
    }

    async fn probe(
        &self,
        _spec: &ProviderSpec,
        _timeout: Duration,
        _cancel: &CancelSignal,
    ) -> ProviderHealthSnapshot {
        ProviderHealthSnapshot::healthy(Utc::now())
    }
}

#[rstest]
#[case::same_provider(true, 1)]
#[case::different_providers(false, 2)]
#[tokio::test(flavor = "multi_thread")]
async fn syncs_serialize_per_provider(#[case] same_provider: bool, #[case] expected_peak: usize) {
    let client = Arc::new(OverlapTrackingClient::default());
    let service = ToolSyncService::new(
        Arc::clone(&client),
        Arc::new(InMemoryToolInventory::new()),
        Arc::new(DefaultClock),
    );
    let first = ProviderId::new();
    let second = if same_provider { first } else { ProviderId::new() };
    let spec = stdio_spec("fs", "mcp-fs");

    let (left, right) = tokio::join!(service.sync(first, &spec), service.sync(second, &spec));

    assert!(left.is_ok() && right.is_ok());
    assert_eq!(client.peak.load(Ordering::SeqCst), expected_peak);
    assert_eq!(service.tracked_providers(), 0);
}

#[rstest]
#[tokio::test]
async fn provider_locks_are_released_after_every_outcome(inventory: Arc<InMemoryToolInventory>) {
    let mut client = MockClient::new();
    client
        .expect_discover()
        .returning(|spec, _, _| match spec.name().as_str() {
            "fs" => Ok(vec![tool("read", "Read a file")]),
            _ => Err(DiscoveryError::Timeout {
                provider: spec.name().clone(),
            }),
        });
    let service = service_with(client, inventory);
    let healthy = ProviderId::new();
    let broken = ProviderId::new();

    let results = service
        .sync_all(&[
            (healthy, stdio_spec("fs", "mcp-fs")),
            (broken, stdio_spec("slow", "mcp-slow")),
        ])
        .await;
    let forgotten = service.forget(healthy).await.expect("store reachable");

    assert!(results.first().is_some_and(|(_, result)| result.is_ok()));
    assert!(results.get(1).is_some_and(|(_, result)| result.is_err()));
    assert!(forgotten);
    assert_eq!(service.tracked_providers(), 0);
}

#[test]
fn provider_name_is_preserved_in_disabled_error() {
    let err = ToolSyncServiceError::Disabled(ProviderName::new("Fs").expect("valid name"));

    assert_eq!(err.to_string(), "provider 'Fs' is disabled");
}
