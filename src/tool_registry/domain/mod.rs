//! Domain model for tool provider configuration and tool discovery.
//!
//! The tool registry domain models provider identity, transport
//! configuration, discovered tool metadata, persisted inventories, and the
//! change-sets computed between them. Infrastructure concerns remain outside
//! this boundary.

mod changes;
mod error;
mod health;
mod ids;
mod inventory;
mod placeholder;
mod spec;
mod tool;
mod transport;

pub use changes::{ToolChangeSet, ToolUpdate};
pub use error::ToolRegistryDomainError;
pub use health::{ProviderHealthSnapshot, ProviderHealthStatus};
pub use ids::{AgentId, ProviderId, ProviderName, ProviderScope, SkillId};
pub use inventory::ToolInventory;
pub use placeholder::{Expansion, expand_placeholders};
pub use spec::{ProviderMap, ProviderSpec, provider_map};
pub use tool::{DiscoveredTool, ToolDefinition};
pub use transport::{
    InProcessTransportConfig, ProviderTransport, RemoteTransportConfig, StdioTransportConfig,
};
