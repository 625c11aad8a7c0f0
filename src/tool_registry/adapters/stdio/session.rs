//! Request/response correlation over a provider's standard streams.

use super::StdioClientConfig;
use super::process::ProviderProcess;
use super::protocol::{
    Correlation, INITIALIZE, INITIALIZED, InitializeResult, JsonRpcMessage, JsonRpcNotification,
    JsonRpcRequest, TOOLS_LIST,
};
use crate::tool_registry::domain::{DiscoveredTool, ProviderName};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, info};

/// Upper bound on `tools/list` pages followed through `nextCursor`.
const MAX_TOOL_PAGES: usize = 64;

/// Failures during the handshake with a running provider.
#[derive(Debug, Error)]
pub(super) enum SessionError {
    #[error("failed to encode '{method}' request: {source}")]
    Encode {
        method: &'static str,
        source: serde_json::Error,
    },

    #[error("failed to write '{method}' to provider input: {source}")]
    Write {
        method: &'static str,
        source: std::io::Error,
    },

    #[error("failed to read provider output: {0}")]
    Read(#[source] std::io::Error),

    #[error("provider closed its output before answering '{method}'")]
    Closed { method: &'static str },

    #[error("provider returned error {code} for '{method}': {message}")]
    Rpc {
        method: &'static str,
        code: i64,
        message: String,
    },

    #[error("provider response to '{method}' has no result")]
    MissingResult { method: &'static str },

    #[error("malformed '{method}' result: {reason}")]
    MalformedResult { method: &'static str, reason: String },

    #[error("provider kept paginating 'tools/list' past the page limit")]
    TooManyPages,
}

impl SessionError {
    /// Returns whether the provider went away mid-handshake.
    pub(super) const fn is_disconnect(&self) -> bool {
        matches!(self, Self::Closed { .. } | Self::Write { .. })
    }
}

/// One handshake conversation; request ids start at 1.
pub(super) struct Session<'a> {
    process: &'a mut ProviderProcess,
    provider: &'a ProviderName,
    last_id: u64,
}

impl<'a> Session<'a> {
    pub(super) const fn new(process: &'a mut ProviderProcess, provider: &'a ProviderName) -> Self {
        Self {
            process,
            provider,
            last_id: 0,
        }
    }

    /// Sends `initialize` and validates the response.
    pub(super) async fn initialize(
        &mut self,
        config: &StdioClientConfig,
    ) -> Result<InitializeResult, SessionError> {
        let params = json!({
            "protocolVersion": config.protocol_version,
            "capabilities": {},
            "clientInfo": {
                "name": config.client_name,
                "version": config.client_version,
            },
        });
        let result = self.request(INITIALIZE, params).await?;
        let initialized: InitializeResult =
            serde_json::from_value(result).map_err(|err| SessionError::MalformedResult {
                method: INITIALIZE,
                reason: err.to_string(),
            })?;

        if initialized.protocol_version != config.protocol_version {
            info!(
                provider = %self.provider,
                requested = %config.protocol_version,
                negotiated = %initialized.protocol_version,
                "provider negotiated a different protocol version"
            );
        }
        Ok(initialized)
    }

    /// Tells the provider the handshake is complete.
    pub(super) async fn confirm_initialized(&mut self) -> Result<(), SessionError> {
        let notification = JsonRpcNotification::new(INITIALIZED, json!({}));
        let encoded =
            serde_json::to_string(&notification).map_err(|source| SessionError::Encode {
                method: INITIALIZED,
                source,
            })?;
        self.process
            .write_line(&encoded)
            .await
            .map_err(|source| SessionError::Write {
                method: INITIALIZED,
                source,
            })
    }

    /// Enumerates every tool, following `nextCursor` pagination.
    pub(super) async fn list_tools(&mut self) -> Result<Vec<DiscoveredTool>, SessionError> {
        let mut tools = Vec::new();
        let mut cursor: Option<String> = None;

        for _ in 0..MAX_TOOL_PAGES {
            let params = cursor
                .take()
                .map_or_else(|| json!({}), |next| json!({ "cursor": next }));
            let result = self.request(TOOLS_LIST, params).await?;
            let Value::Object(mut fields) = result else {
                return Err(malformed_list("result is not an object"));
            };

            match fields.remove("tools") {
                None | Some(Value::Null) => {}
                Some(Value::Array(entries)) => {
                    tools.extend(entries.into_iter().map(DiscoveredTool::from));
                }
                Some(_) => return Err(malformed_list("'tools' is not an array")),
            }

            match fields.remove("nextCursor") {
                Some(Value::String(next)) if !next.is_empty() => cursor = Some(next),
                _ => return Ok(tools),
            }
        }

        Err(SessionError::TooManyPages)
    }

    async fn request(&mut self, method: &'static str, params: Value) -> Result<Value, SessionError> {
        self.last_id = self.last_id.saturating_add(1);
        let id = self.last_id;
        let encoded = serde_json::to_string(&JsonRpcRequest::new(id, method, params))
            .map_err(|source| SessionError::Encode { method, source })?;
        self.process
            .write_line(&encoded)
            .await
            .map_err(|source| SessionError::Write { method, source })?;

        loop {
            let line = self
                .process
                .next_line()
                .await
                .map_err(SessionError::Read)?
                .ok_or(SessionError::Closed { method })?;
            let Ok(text) = std::str::from_utf8(&line) else {
                debug!(provider = %self.provider, bytes = line.len(), "skipping non-UTF-8 output line");
                continue;
            };
            let trimmed = text.trim();
            if trimmed.is_empty() {
                continue;
            }

            let message: JsonRpcMessage = match serde_json::from_str(trimmed) {
                Ok(message) => message,
                Err(err) => {
                    debug!(provider = %self.provider, error = %err, "skipping non-JSON-RPC output line");
                    continue;
                }
            };

            match message.correlate(id) {
                Correlation::Result(Some(result)) => return Ok(result),
                Correlation::Result(None) => return Err(SessionError::MissingResult { method }),
                Correlation::Error(error) => {
                    return Err(SessionError::Rpc {
                        method,
                        code: error.code,
                        message: error.message,
                    });
                }
                Correlation::Unrelated(kind) => {
                    debug!(provider = %self.provider, kind, expected_id = id, "skipping unrelated message");
                }
            }
        }
    }
}

fn malformed_list(reason: &str) -> SessionError {
    SessionError::MalformedResult {
        method: TOOLS_LIST,
        reason: reason.to_owned(),
    }
}
