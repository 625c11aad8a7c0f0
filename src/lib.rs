//! Armature: tool provider resolution and discovery for AI agents.
//!
//! This crate decides which tool providers apply to an agent or skill
//! execution, talks to those providers to learn which tools they expose, and
//! keeps a per-provider tool inventory in line with what was discovered.
//!
//! # Architecture
//!
//! Armature follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (subprocess transport,
//!   project files, in-memory stores)
//!
//! # Modules
//!
//! - [`tool_registry`]: Provider resolution, tool discovery, reconciliation,
//!   and health probing

pub mod tool_registry;
