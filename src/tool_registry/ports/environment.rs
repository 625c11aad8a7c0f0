//! Ambient environment lookup used for placeholder substitution.

/// Read-only view of environment variables.
pub trait EnvironmentLookup: Send + Sync {
    /// Returns the value of `name`, or `None` when it is unset or not UTF-8.
    fn var(&self, name: &str) -> Option<String>;
}
