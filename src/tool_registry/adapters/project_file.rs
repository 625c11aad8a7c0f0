//! JSON project file holding the project-wide provider map.
//!
//! Accepted shapes:
//!
//! ```json
//! { "mcpServers": { "fs": { "command": "mcp-fs", "args": ["--root", "."] } } }
//! ```
//!
//! or the bare inner object. Each entry carries `type` (`stdio`,
//! `in_process`, `http`, `sse`), `command`, `args`, `env`, `cwd`, `url`,
//! `handle` and `disabled`. When `type` is absent it is inferred from whichever of
//! `command`, `url` or `handle` is present.

use crate::tool_registry::{
    domain::{
        ProviderMap, ProviderName, ProviderSpec, ProviderTransport, StdioTransportConfig,
        ToolRegistryDomainError,
    },
    ports::{ConfigReadError, ConfigReadResult, ProjectProviderSource},
};
use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::sync::Arc;
use tracing::debug;

const WRAPPER_KEY: &str = "mcpServers";

/// Project provider source backed by a JSON file.
///
/// A missing file yields an empty map; any other read or parse failure fails
/// the whole load. Reads run on the blocking thread pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectProviderFile {
    path: Utf8PathBuf,
}

impl ProjectProviderFile {
    /// Creates a source reading `path`.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the configured file path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Parses file contents into a provider map.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigReadError::Malformed`] when the document is not a JSON
    /// object of entries, or [`ConfigReadError::InvalidEntry`] when an entry
    /// fails validation.
    pub fn parse(source_name: &str, contents: &str) -> ConfigReadResult<ProviderMap> {
        let document: Value =
            serde_json::from_str(contents).map_err(|err| malformed(source_name, err))?;
        let Value::Object(mut root) = document else {
            return Err(malformed(source_name, "top level must be a JSON object"));
        };
        let entries = match root.remove(WRAPPER_KEY) {
            Some(Value::Object(wrapped)) => wrapped,
            Some(_) => {
                return Err(malformed(
                    source_name,
                    format!("'{WRAPPER_KEY}' must be a JSON object"),
                ));
            }
            None => root,
        };

        entries
            .into_iter()
            .map(|(key, value)| {
                let entry: ProviderEntry = serde_json::from_value(value)
                    .map_err(|err| malformed(source_name, format!("entry '{key}': {err}")))?;
                let spec = entry.into_spec(&key).map_err(|reason| {
                    ConfigReadError::InvalidEntry {
                        source_name: source_name.to_owned(),
                        entry: key.clone(),
                        reason,
                    }
                })?;
                Ok((spec.name().clone(), spec))
            })
            .collect()
    }

    fn read(&self) -> std::io::Result<Option<String>> {
        let file_name = self.path.file_name().ok_or_else(|| {
            std::io::Error::new(ErrorKind::InvalidInput, "path must include a file name")
        })?;
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };
        let dir = match Dir::open_ambient_dir(parent, ambient_authority()) {
            Ok(dir) => dir,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err),
        };
        match dir.read_to_string(file_name) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }
}

#[async_trait]
impl ProjectProviderSource for ProjectProviderFile {
    async fn load_providers(&self) -> ConfigReadResult<ProviderMap> {
        let source = self.clone();
        let read = tokio::task::spawn_blocking(move || source.read())
            .await
            .unwrap_or_else(|err| Err(std::io::Error::other(err)));
        let Some(contents) = read.map_err(|err| ConfigReadError::Io {
            source_name: self.path.to_string(),
            reason: Arc::new(err),
        })?
        else {
            debug!(path = %self.path, "project provider file not found");
            return Ok(ProviderMap::new());
        };
        Self::parse(self.path.as_str(), &contents)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProviderEntry {
    #[serde(rename = "type")]
    kind: Option<String>,
    command: Option<String>,
    args: Vec<String>,
    env: BTreeMap<String, String>,
    cwd: Option<String>,
    url: Option<String>,
    handle: Option<String>,
    disabled: bool,
}

impl ProviderEntry {
    fn into_spec(self, key: &str) -> Result<ProviderSpec, ToolRegistryDomainError> {
        let name = ProviderName::new(key)?;
        let disabled = self.disabled;
        let transport = self.into_transport()?;
        Ok(ProviderSpec::new(name, transport).with_disabled(disabled))
    }

    fn into_transport(self) -> Result<ProviderTransport, ToolRegistryDomainError> {
        let kind = match self.kind.as_deref().map(str::trim) {
            Some(declared) => declared.to_ascii_lowercase(),
            None if self.command.is_none() && self.url.is_some() => "http".to_owned(),
            None if self.command.is_none() && self.handle.is_some() => "in_process".to_owned(),
            None => "stdio".to_owned(),
        };

        match kind.as_str() {
            "stdio" => {
                let base = StdioTransportConfig::new(self.command.unwrap_or_default())?
                    .with_args(self.args)
                    .with_env(self.env);
                let config = match self.cwd {
                    Some(cwd) => base.with_working_directory(cwd)?,
                    None => base,
                };
                Ok(ProviderTransport::Stdio(config))
            }
            "in_process" | "in-process" | "inprocess" => {
                ProviderTransport::in_process(self.handle.unwrap_or_default())
            }
            "http" | "streamable_http" | "streamable-http" | "streamed_http" => {
                ProviderTransport::streamed_http(self.url.unwrap_or_default())
            }
            "sse" => ProviderTransport::sse(self.url.unwrap_or_default()),
            _ => Err(ToolRegistryDomainError::UnknownTransportKind(kind)),
        }
    }
}

fn malformed(source_name: &str, reason: impl ToString) -> ConfigReadError {
    ConfigReadError::Malformed {
        source_name: source_name.to_owned(),
        reason: reason.to_string(),
    }
}
