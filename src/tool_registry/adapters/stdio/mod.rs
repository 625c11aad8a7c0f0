//! STDIO transport client.
//!
//! Launches a provider as a subprocess and runs the discovery handshake over
//! its standard streams: `initialize`, then `tools/list`. Every call owns
//! exactly one subprocess and tears it down before returning, whether the
//! handshake succeeded, failed, timed out, or was cancelled. Dropping the
//! returned future also kills the subprocess.

mod process;
mod protocol;
mod session;

use crate::tool_registry::{
    domain::{
        DiscoveredTool, ProviderHealthSnapshot, ProviderName, ProviderSpec, ProviderTransport,
        StdioTransportConfig, expand_placeholders,
    },
    ports::{CancelSignal, DiscoveryError, DiscoveryResult, EnvironmentLookup, ProviderClient},
};
use async_trait::async_trait;
use chrono::Utc;
use process::ProviderProcess;
use protocol::InitializeResult;
use session::{Session, SessionError};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Tunables for the STDIO transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StdioClientConfig {
    /// Time a provider gets to exit after its input closes and it receives
    /// `SIGTERM`, before it is killed.
    pub termination_grace: Duration,
    /// Number of most recent error-stream bytes kept for diagnostics.
    pub stderr_capture_bytes: usize,
    /// Protocol version requested in `initialize`.
    pub protocol_version: String,
    /// Client name advertised in `initialize`.
    pub client_name: String,
    /// Client version advertised in `initialize`.
    pub client_version: String,
}

impl Default for StdioClientConfig {
    fn default() -> Self {
        Self {
            termination_grace: Duration::from_millis(500),
            stderr_capture_bytes: 8 * 1024,
            protocol_version: "2024-11-05".to_owned(),
            client_name: env!("CARGO_PKG_NAME").to_owned(),
            client_version: env!("CARGO_PKG_VERSION").to_owned(),
        }
    }
}

/// Provider client for the `stdio` transport.
#[derive(Clone)]
pub struct StdioProviderClient {
    config: StdioClientConfig,
    environment: Arc<dyn EnvironmentLookup>,
}

impl StdioProviderClient {
    /// Creates a client with default settings.
    #[must_use]
    pub fn new(environment: Arc<dyn EnvironmentLookup>) -> Self {
        Self::with_config(environment, StdioClientConfig::default())
    }

    /// Creates a client with explicit settings.
    #[must_use]
    pub fn with_config(environment: Arc<dyn EnvironmentLookup>, config: StdioClientConfig) -> Self {
        Self {
            config,
            environment,
        }
    }

    /// Returns the active settings.
    #[must_use]
    pub const fn config(&self) -> &StdioClientConfig {
        &self.config
    }

    fn expand_env(
        &self,
        provider: &ProviderName,
        launch: &StdioTransportConfig,
    ) -> BTreeMap<String, String> {
        launch
            .env()
            .iter()
            .map(|(key, raw)| {
                let expansion = expand_placeholders(raw, |name| self.environment.var(name));
                for variable in &expansion.unresolved {
                    warn!(
                        provider = %provider,
                        env_key = %key,
                        variable = %variable,
                        "unset placeholder expanded to an empty string"
                    );
                }
                (key.clone(), expansion.value)
            })
            .collect()
    }

    async fn run(
        &self,
        spec: &ProviderSpec,
        timeout: Duration,
        cancel: &CancelSignal,
        step: Step,
    ) -> DiscoveryResult<Handshake> {
        let provider = spec.name();
        let ProviderTransport::Stdio(launch) = spec.transport() else {
            return Err(DiscoveryError::UnsupportedTransport {
                provider: provider.clone(),
                transport: spec.transport().kind(),
            });
        };
        if cancel.is_cancelled() {
            return Err(DiscoveryError::Cancelled {
                provider: provider.clone(),
            });
        }

        let env = self.expand_env(provider, launch);
        let mut process = ProviderProcess::spawn(launch, &env, self.config.stderr_capture_bytes)
            .map_err(|err| DiscoveryError::Launch {
                provider: provider.clone(),
                reason: format!("{}: {err}", launch.command()),
            })?;
        debug!(provider = %provider, pid = ?process.id(), "launched provider process");

        let outcome = {
            let mut session = Session::new(&mut process, provider);
            let handshake = drive(&mut session, &self.config, step);
            tokio::select! {
                biased;
                () = cancel.cancelled() => Interrupted::Cancelled,
                finished = tokio::time::timeout(timeout, handshake) => {
                    finished.map_or(Interrupted::TimedOut, Interrupted::Completed)
                }
            }
        };

        match outcome {
            Interrupted::Completed(Ok(handshake)) => {
                process.shutdown(self.config.termination_grace).await;
                Ok(handshake)
            }
            Interrupted::Completed(Err(err)) => {
                let reason = self.describe_failure(&err, &mut process).await;
                process.shutdown(self.config.termination_grace).await;
                warn!(provider = %provider, reason = %reason, "provider handshake failed");
                Err(DiscoveryError::Protocol {
                    provider: provider.clone(),
                    reason,
                })
            }
            Interrupted::TimedOut => {
                process.kill().await;
                warn!(provider = %provider, timeout_ms = timeout.as_millis(), "provider handshake timed out");
                Err(DiscoveryError::Timeout {
                    provider: provider.clone(),
                })
            }
            Interrupted::Cancelled => {
                process.kill().await;
                info!(provider = %provider, "provider handshake cancelled");
                Err(DiscoveryError::Cancelled {
                    provider: provider.clone(),
                })
            }
        }
    }

    async fn describe_failure(&self, err: &SessionError, process: &mut ProviderProcess) -> String {
        let mut reason = err.to_string();
        if !err.is_disconnect() {
            return reason;
        }

        if let Some(status) = process
            .exit_status_within(self.config.termination_grace)
            .await
        {
            reason.push_str(&format!(" ({status})"));
            process.settle_stderr(self.config.termination_grace).await;
        }
        let stderr = process.stderr_tail();
        if !stderr.is_empty() {
            reason.push_str(&format!("; stderr: {stderr}"));
        }
        reason
    }
}

#[async_trait]
impl ProviderClient for StdioProviderClient {
    async fn discover(
        &self,
        spec: &ProviderSpec,
        timeout: Duration,
        cancel: &CancelSignal,
    ) -> DiscoveryResult<Vec<DiscoveredTool>> {
        let handshake = self.run(spec, timeout, cancel, Step::ListTools).await?;
        info!(
            provider = %spec.name(),
            server = %describe_server(&handshake.server),
            tools = handshake.tools.len(),
            "provider tools discovered"
        );
        Ok(handshake.tools)
    }

    async fn probe(
        &self,
        spec: &ProviderSpec,
        timeout: Duration,
        cancel: &CancelSignal,
    ) -> ProviderHealthSnapshot {
        match self.run(spec, timeout, cancel, Step::Initialize).await {
            Ok(handshake) => ProviderHealthSnapshot::healthy(Utc::now())
                .with_message(format!("initialized {}", describe_server(&handshake.server))),
            Err(err) => ProviderHealthSnapshot::unhealthy(Utc::now(), err.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Initialize,
    ListTools,
}

struct Handshake {
    server: InitializeResult,
    tools: Vec<DiscoveredTool>,
}

enum Interrupted<T> {
    Completed(T),
    TimedOut,
    Cancelled,
}

async fn drive(
    session: &mut Session<'_>,
    config: &StdioClientConfig,
    step: Step,
) -> Result<Handshake, SessionError> {
    let server = session.initialize(config).await?;
    if step == Step::Initialize {
        return Ok(Handshake {
            server,
            tools: Vec::new(),
        });
    }

    session.confirm_initialized().await?;
    let tools = session.list_tools().await?;
    Ok(Handshake { server, tools })
}

fn describe_server(server: &InitializeResult) -> String {
    let identity = server.server_info.as_ref().map_or_else(
        || "unnamed provider".to_owned(),
        |info| match info.version.as_deref() {
            Some(version) => format!("{} {version}", info.name),
            None => info.name.clone(),
        },
    );
    format!("{identity} (protocol {})", server.protocol_version)
}
