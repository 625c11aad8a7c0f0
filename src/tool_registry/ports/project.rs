//! Project-scoped provider configuration source port.

use crate::tool_registry::domain::{ProviderMap, ToolRegistryDomainError};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for configuration source reads.
pub type ConfigReadResult<T> = Result<T, ConfigReadError>;

/// Source of the project-wide provider map.
///
/// A read either yields the complete map or fails as a whole; sources never
/// return a partially parsed map.
#[async_trait]
pub trait ProjectProviderSource: Send + Sync {
    /// Loads every provider defined for the project, including disabled ones.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigReadError`] when the source cannot be read or parsed.
    async fn load_providers(&self) -> ConfigReadResult<ProviderMap>;
}

/// Errors raised while reading a configuration source.
#[derive(Debug, Clone, Error)]
pub enum ConfigReadError {
    /// The source could not be read.
    #[error("failed to read provider configuration '{source_name}': {reason}")]
    Io {
        /// Human-readable source location.
        source_name: String,
        /// Underlying error.
        reason: Arc<std::io::Error>,
    },

    /// The source is not valid JSON of the expected shape.
    #[error("malformed provider configuration '{source_name}': {reason}")]
    Malformed {
        /// Human-readable source location.
        source_name: String,
        /// Parser message.
        reason: String,
    },

    /// One entry failed domain validation.
    #[error("invalid provider '{entry}' in '{source_name}': {reason}")]
    InvalidEntry {
        /// Human-readable source location.
        source_name: String,
        /// Offending entry key.
        entry: String,
        /// Validation failure.
        reason: ToolRegistryDomainError,
    },
}
