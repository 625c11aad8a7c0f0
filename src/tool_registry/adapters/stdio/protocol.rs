//! JSON-RPC 2.0 message types for the provider STDIO protocol.

use serde::{Deserialize, Serialize};
use serde_json::Value;

const JSONRPC_VERSION: &str = "2.0";

/// Method name of the handshake request.
pub(super) const INITIALIZE: &str = "initialize";
/// Method name of the notification sent after a successful handshake.
pub(super) const INITIALIZED: &str = "notifications/initialized";
/// Method name of the tool enumeration request.
pub(super) const TOOLS_LIST: &str = "tools/list";

/// Outgoing request.
#[derive(Debug, Serialize)]
pub(super) struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

impl<'a> JsonRpcRequest<'a> {
    pub(super) const fn new(id: u64, method: &'a str, params: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            method,
            params,
        }
    }
}

/// Outgoing notification; carries no id and expects no response.
#[derive(Debug, Serialize)]
pub(super) struct JsonRpcNotification<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: Value,
}

impl<'a> JsonRpcNotification<'a> {
    pub(super) const fn new(method: &'a str, params: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            method,
            params,
        }
    }
}

/// Any incoming message. Fields absent from the wire decode as `None`.
#[derive(Debug, Deserialize)]
pub(super) struct JsonRpcMessage {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcError>,
}

/// JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Deserialize)]
pub(super) struct JsonRpcError {
    pub(super) code: i64,
    pub(super) message: String,
}

/// How an incoming line relates to the request currently awaited.
#[derive(Debug)]
pub(super) enum Correlation {
    /// The awaited response, successful.
    Result(Option<Value>),
    /// The awaited response, carrying an error object.
    Error(JsonRpcError),
    /// Anything else; the string names what was skipped.
    Unrelated(&'static str),
}

impl JsonRpcMessage {
    /// Matches the message against the id of the latest request.
    pub(super) fn correlate(self, expected_id: u64) -> Correlation {
        if self.method.is_some() {
            return Correlation::Unrelated(if self.id.is_some() {
                "server request"
            } else {
                "notification"
            });
        }

        let matches = match &self.id {
            Some(Value::Number(number)) => number.as_u64() == Some(expected_id),
            Some(Value::String(text)) => text.parse::<u64>().ok() == Some(expected_id),
            _ => false,
        };
        if !matches {
            return Correlation::Unrelated("uncorrelated response");
        }

        match self.error {
            Some(error) => Correlation::Error(error),
            None => Correlation::Result(self.result),
        }
    }
}

/// Result payload of `initialize`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct InitializeResult {
    pub(super) protocol_version: String,
    #[serde(default)]
    pub(super) server_info: Option<ServerInfo>,
}

/// Provider identity advertised in `initialize`.
#[derive(Debug, Clone, Deserialize)]
pub(super) struct ServerInfo {
    pub(super) name: String,
    #[serde(default)]
    pub(super) version: Option<String>,
}
