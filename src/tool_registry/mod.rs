//! Tool provider registry for Armature.
//!
//! This module resolves which tool providers apply to an execution context,
//! discovers the tools each provider exposes, reconciles them against the
//! stored inventory, and probes provider health. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
