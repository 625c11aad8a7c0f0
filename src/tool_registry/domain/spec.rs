//! Tool provider connection definition.

use super::{ProviderName, ProviderTransport};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Provider specifications keyed by provider name.
///
/// The map is ordered so that iteration, and therefore every downstream
/// discovery run, is deterministic.
pub type ProviderMap = BTreeMap<ProviderName, ProviderSpec>;

/// Connection definition for one tool provider.
///
/// Specifications are owned by the configuration source that produced them
/// and are read-only to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSpec {
    name: ProviderName,
    transport: ProviderTransport,
    #[serde(default)]
    disabled: bool,
}

impl ProviderSpec {
    /// Creates an enabled provider specification.
    #[must_use]
    pub const fn new(name: ProviderName, transport: ProviderTransport) -> Self {
        Self {
            name,
            transport,
            disabled: false,
        }
    }

    /// Sets whether the provider is excluded from discovery and invocation.
    #[must_use]
    pub const fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Returns the provider name.
    #[must_use]
    pub const fn name(&self) -> &ProviderName {
        &self.name
    }

    /// Returns the transport settings.
    #[must_use]
    pub const fn transport(&self) -> &ProviderTransport {
        &self.transport
    }

    /// Returns whether the provider is disabled.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.disabled
    }
}

/// Builds a [`ProviderMap`] keyed by each specification's own name.
///
/// When two specifications share a name the later one replaces the earlier.
#[must_use]
pub fn provider_map(specs: impl IntoIterator<Item = ProviderSpec>) -> ProviderMap {
    specs
        .into_iter()
        .map(|spec| (spec.name().clone(), spec))
        .collect()
}
