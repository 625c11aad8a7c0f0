//! Application services for provider resolution and tool synchronization.

mod reconciler;
mod resolution;
mod resolver;
mod sync;

pub use reconciler::reconcile;
pub use resolution::{ExecutionContext, ProviderResolutionService};
pub use resolver::resolve;
pub use sync::{
    SyncConfig, SyncReport, ToolSyncService, ToolSyncServiceError, ToolSyncServiceResult,
};
