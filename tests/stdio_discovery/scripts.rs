//! Shell scripts standing in for real providers.
//!
//! Each script reads the client's requests line by line and answers with
//! canned JSON-RPC responses. Request ids are deterministic: `initialize` is
//! 1, the first `tools/list` is 2.

pub const INIT_RESPONSE: &str = r#"{"jsonrpc":"2.0","id":1,"result":{"protocolVersion":"2024-11-05","capabilities":{},"serverInfo":{"name":"fake","version":"1.0"}}}"#;

/// Answers the full handshake with two tools.
pub fn two_tools() -> String {
    format!(
        r#"read -r _init
printf '%s\n' '{INIT_RESPONSE}'
read -r _initialized
read -r _list
printf '%s\n' '{{"jsonrpc":"2.0","id":2,"result":{{"tools":[{{"name":"read","description":"Read a file","inputSchema":{{"type":"object"}}}},{{"name":"write","description":"Write a file"}}]}}}}'
"#
    )
}

/// Interleaves noise with the real responses.
pub fn noisy() -> String {
    format!(
        r#"read -r _init
echo 'starting up...'
printf '%s\n' '{{"jsonrpc":"2.0","method":"notifications/message","params":{{"level":"info"}}}}'
printf '%s\n' '{{"jsonrpc":"2.0","id":99,"result":{{}}}}'
printf '%s\n' '[1,2,3]'
printf '%s\n' '{INIT_RESPONSE}'
read -r _initialized
read -r _list
printf '%s\n' '{{"jsonrpc":"2.0","id":"x","method":"roots/list"}}'
printf '%s\n' '{{"jsonrpc":"2.0","id":2,"result":{{"tools":[{{"name":"only"}}]}}}}'
"#
    )
}

/// Writes bytes that are not UTF-8 before each real response.
pub fn binary_noise() -> String {
    format!(
        r#"read -r _init
printf '\377\376 garbage\n'
printf '%s\n' '{INIT_RESPONSE}'
read -r _initialized
read -r _list
printf '\200\n'
printf '%s\n' '{{"jsonrpc":"2.0","id":2,"result":{{"tools":[{{"name":"sturdy"}}]}}}}'
"#
    )
}

/// Answers `initialize` and records any later request in `$MARKER_FILE`.
pub fn initialize_only() -> String {
    format!(
        r#"read -r _init
printf '%s\n' '{INIT_RESPONSE}'
while read -r line; do
  case "$line" in
    *tools/list*) echo "$line" > "$MARKER_FILE" ;;
  esac
done
"#
    )
}

/// Returns a result without a `tools` field.
pub fn no_tools_field() -> String {
    format!(
        r#"read -r _init
printf '%s\n' '{INIT_RESPONSE}'
read -r _initialized
read -r _list
printf '%s\n' '{{"jsonrpc":"2.0","id":2,"result":{{}}}}'
"#
    )
}

/// Answers `tools/list` with a JSON-RPC error.
pub fn list_error() -> String {
    format!(
        r#"read -r _init
printf '%s\n' '{INIT_RESPONSE}'
read -r _initialized
read -r _list
printf '%s\n' '{{"jsonrpc":"2.0","id":2,"error":{{"code":-32601,"message":"method not found"}}}}'
"#
    )
}

/// Serves tools over two pages.
pub fn paginated() -> String {
    format!(
        r#"read -r _init
printf '%s\n' '{INIT_RESPONSE}'
read -r _initialized
read -r _first
printf '%s\n' '{{"jsonrpc":"2.0","id":2,"result":{{"tools":[{{"name":"first"}}],"nextCursor":"page-2"}}}}'
read -r second
case "$second" in
  *page-2*) printf '%s\n' '{{"jsonrpc":"2.0","id":3,"result":{{"tools":[{{"name":"second"}}]}}}}' ;;
  *) printf '%s\n' '{{"jsonrpc":"2.0","id":3,"error":{{"code":-32602,"message":"cursor missing"}}}}' ;;
esac
"#
    )
}

/// Names its single tool after `$TOOL_NAME`.
pub fn tool_from_env() -> String {
    format!(
        r#"read -r _init
printf '%s\n' '{INIT_RESPONSE}'
read -r _initialized
read -r _list
printf '{{"jsonrpc":"2.0","id":2,"result":{{"tools":[{{"name":"%s"}}]}}}}\n' "$TOOL_NAME"
"#
    )
}

/// Writes a diagnostic and exits before answering.
pub const CRASH: &str = r#"read -r _init
echo 'fatal: missing credentials' >&2
exit 3
"#;

/// Records its pid in `$PID_FILE`, then never answers.
pub const HANG: &str = r#"echo $$ > "$PID_FILE"
exec sleep 30
"#;

/// Answers `initialize` without a `protocolVersion`.
pub const NO_PROTOCOL_VERSION: &str = r#"read -r _init
printf '%s\n' '{"jsonrpc":"2.0","id":1,"result":{"capabilities":{},"serverInfo":{"name":"fake"}}}'
read -r _rest
"#;

/// Exits with a failure status without reading anything.
pub const EXIT_FAILURE: &str = r#"echo 'cannot bind socket' >&2
exit 7
"#;

/// Forks a long-running child, records the child's pid in `$PID_FILE`, and
/// waits for it without ever answering.
pub const FORKS_AND_HANGS: &str = r#"sleep 30 &
echo $! > "$PID_FILE"
wait
"#;
