//! Adapter implementations for the tool registry ports.

pub mod memory;
pub mod stdio;

mod environment;
mod in_process;
mod project_file;
mod router;

pub use environment::{MapEnvironment, ProcessEnvironment};
pub use in_process::InProcessProviderClient;
pub use project_file::ProjectProviderFile;
pub use router::TransportRouter;
pub use stdio::{StdioClientConfig, StdioProviderClient};
