//! Tool provider transport configuration value objects.

use super::ToolRegistryDomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Launch settings for a provider hosted as a subprocess over STDIO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdioTransportConfig {
    command: String,
    #[serde(default)]
    args: Vec<String>,
    #[serde(default)]
    env: BTreeMap<String, String>,
    #[serde(default)]
    working_directory: Option<String>,
}

impl StdioTransportConfig {
    /// Creates a new STDIO transport configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryDomainError::EmptyStdioCommand`] when `command`
    /// is empty after trimming.
    pub fn new(command: impl Into<String>) -> Result<Self, ToolRegistryDomainError> {
        let normalized_command = command.into().trim().to_owned();
        if normalized_command.is_empty() {
            return Err(ToolRegistryDomainError::EmptyStdioCommand);
        }

        Ok(Self {
            command: normalized_command,
            args: Vec::new(),
            env: BTreeMap::new(),
            working_directory: None,
        })
    }

    /// Replaces command-line arguments.
    #[must_use]
    pub fn with_args<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = values.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces process environment variables.
    ///
    /// Values may contain `${VAR}` placeholders that are resolved against the
    /// ambient environment before launch.
    #[must_use]
    pub fn with_env<I, K, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env = values
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        self
    }

    /// Sets an explicit working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryDomainError::EmptyWorkingDirectory`] when the
    /// provided value is empty after trimming.
    pub fn with_working_directory(
        mut self,
        value: impl Into<String>,
    ) -> Result<Self, ToolRegistryDomainError> {
        let normalized = value.into().trim().to_owned();
        if normalized.is_empty() {
            return Err(ToolRegistryDomainError::EmptyWorkingDirectory);
        }

        self.working_directory = Some(normalized);
        Ok(self)
    }

    /// Returns the executable command.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Returns command-line arguments.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Returns the unexpanded environment variables.
    #[must_use]
    pub const fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    /// Returns the optional working directory.
    #[must_use]
    pub fn working_directory(&self) -> Option<&str> {
        self.working_directory.as_deref()
    }
}

/// Settings for a provider served from inside the host process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InProcessTransportConfig {
    handle: String,
}

impl InProcessTransportConfig {
    /// Creates an in-process transport bound to a registered handle.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryDomainError::EmptyInProcessHandle`] when the
    /// handle is empty after trimming.
    pub fn new(handle: impl Into<String>) -> Result<Self, ToolRegistryDomainError> {
        let normalized = handle.into().trim().to_owned();
        if normalized.is_empty() {
            return Err(ToolRegistryDomainError::EmptyInProcessHandle);
        }
        Ok(Self { handle: normalized })
    }

    /// Returns the registered handle name.
    #[must_use]
    pub fn handle(&self) -> &str {
        &self.handle
    }
}

/// Endpoint of a remote provider reached over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteTransportConfig {
    url: String,
}

impl RemoteTransportConfig {
    /// Creates a remote endpoint configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryDomainError`] when `url` is empty or does not
    /// start with `http://` or `https://`.
    pub fn new(url: impl Into<String>) -> Result<Self, ToolRegistryDomainError> {
        let normalized_url = url.into().trim().to_owned();
        if normalized_url.is_empty() {
            return Err(ToolRegistryDomainError::EmptyRemoteUrl);
        }

        let has_valid_prefix =
            normalized_url.starts_with("http://") || normalized_url.starts_with("https://");
        if !has_valid_prefix {
            return Err(ToolRegistryDomainError::InvalidRemoteUrl(
                normalized_url,
            ));
        }

        Ok(Self {
            url: normalized_url,
        })
    }

    /// Returns the endpoint URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Supported provider transport variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "config")]
pub enum ProviderTransport {
    /// Subprocess speaking JSON-RPC over its standard streams.
    Stdio(StdioTransportConfig),
    /// Provider implemented inside the host process.
    InProcess(InProcessTransportConfig),
    /// Remote provider over streamed HTTP.
    StreamedHttp(RemoteTransportConfig),
    /// Remote provider over HTTP with server-sent events.
    Sse(RemoteTransportConfig),
}

impl ProviderTransport {
    /// Creates a `stdio` transport.
    ///
    /// # Errors
    ///
    /// Returns validation errors from [`StdioTransportConfig::new`].
    pub fn stdio(command: impl Into<String>) -> Result<Self, ToolRegistryDomainError> {
        Ok(Self::Stdio(StdioTransportConfig::new(command)?))
    }

    /// Creates an `in_process` transport.
    ///
    /// # Errors
    ///
    /// Returns validation errors from [`InProcessTransportConfig::new`].
    pub fn in_process(handle: impl Into<String>) -> Result<Self, ToolRegistryDomainError> {
        Ok(Self::InProcess(InProcessTransportConfig::new(handle)?))
    }

    /// Creates a `streamed_http` transport.
    ///
    /// # Errors
    ///
    /// Returns validation errors from [`RemoteTransportConfig::new`].
    pub fn streamed_http(url: impl Into<String>) -> Result<Self, ToolRegistryDomainError> {
        Ok(Self::StreamedHttp(RemoteTransportConfig::new(url)?))
    }

    /// Creates an `sse` transport.
    ///
    /// # Errors
    ///
    /// Returns validation errors from [`RemoteTransportConfig::new`].
    pub fn sse(url: impl Into<String>) -> Result<Self, ToolRegistryDomainError> {
        Ok(Self::Sse(RemoteTransportConfig::new(url)?))
    }

    /// Returns the canonical transport kind name.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Stdio(_) => "stdio",
            Self::InProcess(_) => "in_process",
            Self::StreamedHttp(_) => "streamed_http",
            Self::Sse(_) => "sse",
        }
    }
}
