//! Port contracts for provider configuration, discovery, and inventory
//! persistence.

mod cancel;
mod client;
mod environment;
mod inventory;
mod project;
mod records;

pub use cancel::{CancelSignal, CancelTrigger};
pub use client::{DiscoveryError, DiscoveryResult, ProviderClient};
pub use environment::EnvironmentLookup;
pub use inventory::{ToolInventoryError, ToolInventoryRepository, ToolInventoryResult};
pub use project::{ConfigReadError, ConfigReadResult, ProjectProviderSource};
pub use records::{ProviderRecordError, ProviderRecordRepository, ProviderRecordResult};
