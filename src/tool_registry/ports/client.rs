//! Transport client port for tool discovery and health probing.

use super::CancelSignal;
use crate::tool_registry::domain::{DiscoveredTool, ProviderHealthSnapshot, ProviderName, ProviderSpec};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Result type for transport client operations.
pub type DiscoveryResult<T> = Result<T, DiscoveryError>;

/// Discovery contract implemented by every provider transport.
///
/// Each call owns whatever connection it opens and releases it on every exit
/// path, including when the returned future is dropped.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Performs the `initialize` and `tools/list` handshake.
    ///
    /// An empty tool list is a valid success. A provider that fails at any
    /// step yields an error, never a partial list.
    async fn discover(
        &self,
        spec: &ProviderSpec,
        timeout: Duration,
        cancel: &CancelSignal,
    ) -> DiscoveryResult<Vec<DiscoveredTool>>;

    /// Checks connectivity using the `initialize` step only.
    async fn probe(
        &self,
        spec: &ProviderSpec,
        timeout: Duration,
        cancel: &CancelSignal,
    ) -> ProviderHealthSnapshot;
}

/// Errors returned by transport clients.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DiscoveryError {
    /// The provider process could not be started.
    #[error("failed to launch provider '{provider}': {reason}")]
    Launch {
        /// Provider name.
        provider: ProviderName,
        /// Reason string.
        reason: String,
    },

    /// The provider answered with malformed data or a JSON-RPC error.
    #[error("protocol error from provider '{provider}': {reason}")]
    Protocol {
        /// Provider name.
        provider: ProviderName,
        /// Reason string.
        reason: String,
    },

    /// The handshake did not finish within the allotted time.
    #[error("timeout")]
    Timeout {
        /// Provider name.
        provider: ProviderName,
    },

    /// The caller cancelled the call.
    #[error("cancelled")]
    Cancelled {
        /// Provider name.
        provider: ProviderName,
    },

    /// No client is available for the provider's transport.
    #[error("unsupported transport '{transport}' for provider '{provider}'")]
    UnsupportedTransport {
        /// Provider name.
        provider: ProviderName,
        /// Canonical transport kind.
        transport: &'static str,
    },
}

impl DiscoveryError {
    /// Returns the provider the error concerns.
    #[must_use]
    pub const fn provider(&self) -> &ProviderName {
        match self {
            Self::Launch { provider, .. }
            | Self::Protocol { provider, .. }
            | Self::Timeout { provider }
            | Self::Cancelled { provider }
            | Self::UnsupportedTransport { provider, .. } => provider,
        }
    }
}
