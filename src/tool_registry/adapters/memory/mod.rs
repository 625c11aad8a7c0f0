//! In-memory adapter implementations.
//!
//! These adapters are thread-safe and suitable for tests and for hosts that
//! keep provider state for the lifetime of a single process.

mod inventory;
mod project;
mod records;

pub use inventory::InMemoryToolInventory;
pub use project::InMemoryProjectSource;
pub use records::InMemoryProviderRecords;

fn poisoned(err: &impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(err.to_string())
}
