//! Resolution followed by synchronization, wired through in-memory adapters.

use super::helpers::{described, in_process_spec, routed_service};
use armature::tool_registry::{
    adapters::{
        InProcessProviderClient, ProjectProviderFile,
        memory::{InMemoryProjectSource, InMemoryProviderRecords},
    },
    domain::{DiscoveredTool, ProviderHealthStatus, ProviderId, ProviderScope, SkillId},
    ports::{DiscoveryError, ProviderRecordRepository},
    services::{ExecutionContext, ProviderResolutionService, ToolSyncServiceError},
};
use rstest::rstest;
use std::sync::Arc;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn resolved_providers_are_synchronized() {
    let records = Arc::new(InMemoryProviderRecords::new());
    let skill = SkillId::new();
    records
        .upsert(
            ProviderScope::Skill(skill),
            &in_process_spec("search").with_disabled(true),
        )
        .await
        .expect("skill record stored");
    let resolution = ProviderResolutionService::new(
        Arc::new(InMemoryProjectSource::new([
            in_process_spec("files"),
            in_process_spec("search"),
        ])),
        records,
    );
    let client = Arc::new(InProcessProviderClient::new());
    client.publish("files", [described("read"), described("write")]);
    client.publish("search", [described("query")]);
    let service = routed_service(&client);

    let resolved = resolution
        .resolve_for(ExecutionContext::project().with_skill(skill))
        .await;
    let providers: Vec<_> = resolved
        .into_values()
        .map(|spec| (ProviderId::new(), spec))
        .collect();
    let results = service.sync_all(&providers).await;

    assert_eq!(results.len(), 1);
    let (_, outcome) = results.into_iter().next().expect("one result");
    let report = outcome.expect("files provider syncs");
    assert_eq!(report.inventory().tools().len(), 2);
    assert_eq!(report.changes().created().len(), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn malformed_and_duplicate_entries_are_dropped() {
    let client = Arc::new(InProcessProviderClient::new());
    client.publish(
        "files",
        [
            described("read"),
            DiscoveredTool::nameless(),
            described("read").with_description("second copy"),
            described("write"),
        ],
    );
    let service = routed_service(&client);

    let report = service
        .sync(ProviderId::new(), &in_process_spec("files"))
        .await
        .expect("sync succeeds");

    assert_eq!(report.changes().dropped_malformed(), 1);
    assert_eq!(report.changes().dropped_duplicates(), 1);
    let read = report.inventory().find("read").expect("read stored");
    assert_eq!(read.description(), Some("Tool read"));
    assert_eq!(report.inventory().tools().len(), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_handle_fails_without_touching_inventory() {
    let client = Arc::new(InProcessProviderClient::new());
    let service = routed_service(&client);
    let provider_id = ProviderId::new();

    let result = service.sync(provider_id, &in_process_spec("ghost")).await;

    assert!(matches!(
        result,
        Err(ToolSyncServiceError::Discovery(DiscoveryError::Launch { .. }))
    ));
    let stored = service.inventory(provider_id).await.expect("store readable");
    assert!(stored.is_empty());
    assert!(stored.last_synced_at().is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn probe_reflects_provider_health() {
    let client = Arc::new(InProcessProviderClient::new());
    client.publish("files", [described("read")]);
    let service = routed_service(&client);
    let spec = in_process_spec("files");

    let healthy = service.probe(&spec).await;
    client.set_unhealthy("files", "index rebuilding");
    let unhealthy = service.probe(&spec).await;

    assert_eq!(healthy.status(), ProviderHealthStatus::Healthy);
    assert_eq!(unhealthy.status(), ProviderHealthStatus::Unhealthy);
    assert!(unhealthy.message().contains("index rebuilding"));
}

#[rstest]
#[case::streamed_http(r#"{"type": "http", "url": "https://tools.example.com/mcp"}"#, "streamed_http")]
#[case::sse(r#"{"type": "sse", "url": "https://tools.example.com/sse"}"#, "sse")]
#[tokio::test(flavor = "multi_thread")]
async fn remote_provider_is_reported_unsupported(
    #[case] entry: &str,
    #[case] expected: &'static str,
) {
    let providers = ProjectProviderFile::parse(
        "inline.json",
        &format!(r#"{{"mcpServers": {{"remote": {entry}}}}}"#),
    )
    .expect("document parses");
    let client = Arc::new(InProcessProviderClient::new());
    let service = routed_service(&client);
    let spec = providers.into_values().next().expect("one provider");

    let result = service.sync(ProviderId::new(), &spec).await;

    match result {
        Err(ToolSyncServiceError::Discovery(DiscoveryError::UnsupportedTransport {
            transport, ..
        })) => assert_eq!(transport, expected),
        other => panic!("expected unsupported transport, got {other:?}"),
    }
}
