//! Unit tests for the tool registry services.

mod support;
mod sync_service_tests;
