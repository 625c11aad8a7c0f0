//! Command-line front end for inspecting tool providers.
//!
//! Usage:
//!
//! ```text
//! armature [--project <file>] [--timeout-ms <ms>] <resolve|discover|probe> [--name <provider>]
//! ```
//!
//! `resolve` prints the enabled providers from the project file, `discover`
//! runs the discovery handshake against them and prints their tools, and
//! `probe` reports each provider's health. Output is JSON on stdout; logs go
//! to stderr and honour `RUST_LOG`.

use armature::tool_registry::{
    adapters::{
        InProcessProviderClient, ProcessEnvironment, ProjectProviderFile, StdioProviderClient,
        TransportRouter,
        memory::{InMemoryProjectSource, InMemoryProviderRecords, InMemoryToolInventory},
    },
    domain::{ProviderId, ProviderMap, ProviderName, ProviderSpec},
    ports::ProjectProviderSource,
    services::{ExecutionContext, ProviderResolutionService, SyncConfig, ToolSyncService},
};
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use mockable::DefaultClock;
use serde_json::{Value, json};
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Parser)]
#[command(name = "armature", version, about = "Resolve, discover and probe tool providers")]
struct Cli {
    /// Project provider file (`{"mcpServers": {...}}` or a bare map)
    #[arg(long, default_value = ".mcp.json")]
    project: Utf8PathBuf,

    /// Per-provider time limit for discovery and probing, in milliseconds
    #[arg(long, default_value_t = 15_000)]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the effective provider map
    Resolve,
    /// Discover the tools of each provider
    Discover {
        /// Restrict to one provider
        #[arg(long)]
        name: Option<String>,
    },
    /// Probe the health of each provider
    Probe {
        /// Restrict to one provider
        #[arg(long)]
        name: Option<String>,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("provider '{0}' is not defined or is disabled")]
    UnknownProvider(String),
    #[error("{failed} provider(s) failed")]
    ProvidersFailed { failed: usize },
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();
    init_logging();

    let providers = ProjectProviderFile::new(cli.project).load_providers().await?;
    let resolved = resolve(providers).await;
    let timeout = Duration::from_millis(cli.timeout_ms);

    let (output, failed) = match cli.command {
        Command::Resolve => (serde_json::to_value(&resolved)?, 0),
        Command::Discover { name } => discover(select(&resolved, name.as_deref())?, timeout).await,
        Command::Probe { name } => probe(select(&resolved, name.as_deref())?, timeout).await,
    };

    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &output)?;
    writeln!(stdout)?;
    if failed > 0 {
        return Err(CliError::ProvidersFailed { failed }.into());
    }
    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

async fn resolve(providers: ProviderMap) -> ProviderMap {
    let service = ProviderResolutionService::new(
        Arc::new(InMemoryProjectSource::new(providers.into_values())),
        Arc::new(InMemoryProviderRecords::new()),
    );
    service.resolve_for(ExecutionContext::project()).await
}

fn select(resolved: &ProviderMap, name: Option<&str>) -> Result<Vec<ProviderSpec>, CliError> {
    let Some(wanted) = name else {
        return Ok(resolved.values().cloned().collect());
    };
    ProviderName::new(wanted)
        .ok()
        .and_then(|key| resolved.get(&key).cloned())
        .map(|spec| vec![spec])
        .ok_or_else(|| CliError::UnknownProvider(wanted.to_owned()))
}

fn sync_service(
    timeout: Duration,
) -> ToolSyncService<TransportRouter, InMemoryToolInventory, DefaultClock> {
    let router = TransportRouter::new()
        .with_stdio(Arc::new(StdioProviderClient::new(Arc::new(ProcessEnvironment))))
        .with_in_process(Arc::new(InProcessProviderClient::new()));
    ToolSyncService::new(
        Arc::new(router),
        Arc::new(InMemoryToolInventory::new()),
        Arc::new(DefaultClock),
    )
    .with_config(SyncConfig {
        discovery_timeout: timeout,
        probe_timeout: timeout,
    })
}

async fn discover(specs: Vec<ProviderSpec>, timeout: Duration) -> (Value, usize) {
    let service = sync_service(timeout);
    let providers: Vec<(ProviderId, ProviderSpec)> = specs
        .into_iter()
        .map(|spec| (ProviderId::new(), spec))
        .collect();

    let mut failed = 0;
    let mut entries = Vec::with_capacity(providers.len());
    let results = service.sync_all(&providers).await;
    for ((_, spec), (_, result)) in providers.iter().zip(results) {
        match result {
            Ok(report) => entries.push(json!({
                "provider": spec.name(),
                "tools": report.inventory().tools(),
            })),
            Err(err) => {
                failed += 1;
                entries.push(json!({ "provider": spec.name(), "error": err.to_string() }));
            }
        }
    }
    (Value::Array(entries), failed)
}

async fn probe(specs: Vec<ProviderSpec>, timeout: Duration) -> (Value, usize) {
    let service = sync_service(timeout);
    let mut failed = 0;
    let mut entries = Vec::with_capacity(specs.len());
    for spec in &specs {
        let snapshot = service.probe(spec).await;
        if !snapshot.is_ok() {
            failed += 1;
        }
        entries.push(json!({
            "provider": spec.name(),
            "status": snapshot.status().as_str(),
            "message": snapshot.message(),
            "checked_at": snapshot.checked_at(),
        }));
    }
    (Value::Array(entries), failed)
}
