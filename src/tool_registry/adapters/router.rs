//! Dispatches provider calls to the client registered for their transport.

use crate::tool_registry::{
    domain::{DiscoveredTool, ProviderHealthSnapshot, ProviderSpec, ProviderTransport},
    ports::{CancelSignal, DiscoveryError, DiscoveryResult, ProviderClient},
};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

/// Provider client that routes each spec to a per-transport client.
///
/// Transports without a registered client fail with
/// [`DiscoveryError::UnsupportedTransport`]. The remote transports have no
/// bundled client; hosts plug one in with
/// [`TransportRouter::with_streamed_http`] or [`TransportRouter::with_sse`].
#[derive(Clone, Default)]
pub struct TransportRouter {
    stdio: Option<Arc<dyn ProviderClient>>,
    in_process: Option<Arc<dyn ProviderClient>>,
    streamed_http: Option<Arc<dyn ProviderClient>>,
    sse: Option<Arc<dyn ProviderClient>>,
}

impl TransportRouter {
    /// Creates a router with no registered clients.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the client handling `stdio` providers.
    #[must_use]
    pub fn with_stdio(mut self, client: Arc<dyn ProviderClient>) -> Self {
        self.stdio = Some(client);
        self
    }

    /// Registers the client handling `in_process` providers.
    #[must_use]
    pub fn with_in_process(mut self, client: Arc<dyn ProviderClient>) -> Self {
        self.in_process = Some(client);
        self
    }

    /// Registers the client handling `streamed_http` providers.
    #[must_use]
    pub fn with_streamed_http(mut self, client: Arc<dyn ProviderClient>) -> Self {
        self.streamed_http = Some(client);
        self
    }

    /// Registers the client handling `sse` providers.
    #[must_use]
    pub fn with_sse(mut self, client: Arc<dyn ProviderClient>) -> Self {
        self.sse = Some(client);
        self
    }

    fn route(&self, spec: &ProviderSpec) -> DiscoveryResult<&dyn ProviderClient> {
        let slot = match spec.transport() {
            ProviderTransport::Stdio(_) => self.stdio.as_deref(),
            ProviderTransport::InProcess(_) => self.in_process.as_deref(),
            ProviderTransport::StreamedHttp(_) => self.streamed_http.as_deref(),
            ProviderTransport::Sse(_) => self.sse.as_deref(),
        };
        slot.ok_or_else(|| DiscoveryError::UnsupportedTransport {
            provider: spec.name().clone(),
            transport: spec.transport().kind(),
        })
    }
}

#[async_trait]
impl ProviderClient for TransportRouter {
    async fn discover(
        &self,
        spec: &ProviderSpec,
        timeout: Duration,
        cancel: &CancelSignal,
    ) -> DiscoveryResult<Vec<DiscoveredTool>> {
        self.route(spec)?.discover(spec, timeout, cancel).await
    }

    async fn probe(
        &self,
        spec: &ProviderSpec,
        timeout: Duration,
        cancel: &CancelSignal,
    ) -> ProviderHealthSnapshot {
        match self.route(spec) {
            Ok(client) => client.probe(spec, timeout, cancel).await,
            Err(err) => ProviderHealthSnapshot::unhealthy(Utc::now(), err.to_string()),
        }
    }
}
