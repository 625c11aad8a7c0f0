//! Error types for tool registry domain validation.

use thiserror::Error;

/// Errors returned while constructing tool registry domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ToolRegistryDomainError {
    /// The provider name is empty after trimming.
    #[error("provider name must not be empty")]
    EmptyProviderName,

    /// The provider name exceeds the 100-character storage limit.
    #[error("provider name exceeds 100 character limit: {0}")]
    ProviderNameTooLong(String),

    /// The STDIO command is empty.
    #[error("STDIO command must not be empty")]
    EmptyStdioCommand,

    /// The STDIO working directory is empty after trimming.
    #[error("STDIO working directory must not be empty when provided")]
    EmptyWorkingDirectory,

    /// The in-process handle is empty.
    #[error("in-process provider handle must not be empty")]
    EmptyInProcessHandle,

    /// The remote provider URL is empty.
    #[error("remote provider URL must not be empty")]
    EmptyRemoteUrl,

    /// The remote provider URL does not have an `http://` or `https://` prefix.
    #[error("remote provider URL '{0}' must start with 'http://' or 'https://'")]
    InvalidRemoteUrl(String),

    /// The transport kind is not one of the supported kinds.
    #[error("unknown transport kind '{0}'")]
    UnknownTransportKind(String),

    /// A tool definition name is empty after trimming.
    #[error("tool name must not be empty")]
    EmptyToolName,
}
