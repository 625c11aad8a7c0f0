//! Transport client for providers hosted inside the current process.
//!
//! Catalogs are published under a handle; a provider spec whose transport is
//! `in_process` resolves its handle against the published catalogs.

use crate::tool_registry::{
    domain::{DiscoveredTool, ProviderHealthSnapshot, ProviderSpec, ProviderTransport},
    ports::{CancelSignal, DiscoveryError, DiscoveryResult, ProviderClient},
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Default)]
struct Catalog {
    tools: Vec<DiscoveredTool>,
    failure: Option<String>,
}

/// Provider client for the `in_process` transport.
#[derive(Debug, Clone, Default)]
pub struct InProcessProviderClient {
    catalogs: Arc<RwLock<HashMap<String, Catalog>>>,
}

impl InProcessProviderClient {
    /// Creates a client with no published catalogs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes (or replaces) the tool catalog behind `handle` and marks the
    /// provider healthy.
    pub fn publish(
        &self,
        handle: impl Into<String>,
        tools: impl IntoIterator<Item = DiscoveredTool>,
    ) {
        let mut catalogs = self.catalogs.write().unwrap_or_else(PoisonError::into_inner);
        catalogs.insert(
            handle.into(),
            Catalog {
                tools: tools.into_iter().collect(),
                failure: None,
            },
        );
    }

    /// Makes subsequent calls against `handle` fail with `reason`.
    pub fn set_unhealthy(&self, handle: impl Into<String>, reason: impl Into<String>) {
        let mut catalogs = self.catalogs.write().unwrap_or_else(PoisonError::into_inner);
        catalogs.entry(handle.into()).or_default().failure = Some(reason.into());
    }

    /// Removes the catalog behind `handle`, returning whether one existed.
    pub fn withdraw(&self, handle: &str) -> bool {
        let mut catalogs = self.catalogs.write().unwrap_or_else(PoisonError::into_inner);
        catalogs.remove(handle).is_some()
    }

    fn lookup(
        &self,
        spec: &ProviderSpec,
        cancel: &CancelSignal,
    ) -> DiscoveryResult<Vec<DiscoveredTool>> {
        let ProviderTransport::InProcess(config) = spec.transport() else {
            return Err(DiscoveryError::UnsupportedTransport {
                provider: spec.name().clone(),
                transport: spec.transport().kind(),
            });
        };
        if cancel.is_cancelled() {
            return Err(DiscoveryError::Cancelled {
                provider: spec.name().clone(),
            });
        }

        let catalogs = self.catalogs.read().unwrap_or_else(PoisonError::into_inner);
        let catalog = catalogs
            .get(config.handle())
            .ok_or_else(|| DiscoveryError::Launch {
                provider: spec.name().clone(),
                reason: format!("no in-process provider published under '{}'", config.handle()),
            })?;
        if let Some(reason) = &catalog.failure {
            return Err(DiscoveryError::Protocol {
                provider: spec.name().clone(),
                reason: reason.clone(),
            });
        }
        debug!(provider = %spec.name(), handle = config.handle(), "served in-process catalog");
        Ok(catalog.tools.clone())
    }
}

#[async_trait]
impl ProviderClient for InProcessProviderClient {
    async fn discover(
        &self,
        spec: &ProviderSpec,
        _timeout: Duration,
        cancel: &CancelSignal,
    ) -> DiscoveryResult<Vec<DiscoveredTool>> {
        self.lookup(spec, cancel)
    }

    async fn probe(
        &self,
        spec: &ProviderSpec,
        _timeout: Duration,
        cancel: &CancelSignal,
    ) -> ProviderHealthSnapshot {
        match self.lookup(spec, cancel) {
            Ok(tools) => ProviderHealthSnapshot::healthy(Utc::now())
                .with_message(format!("in-process provider serving {} tools", tools.len())),
            Err(err) => ProviderHealthSnapshot::unhealthy(Utc::now(), err.to_string()),
        }
    }
}
