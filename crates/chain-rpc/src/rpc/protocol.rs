use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC request id. Servers echo it back verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(u64),
    String(String),
}

impl RequestId {
    /// Current Unix time in milliseconds.
    ///
    /// Two calls inside the same millisecond collide, so callers that
    /// correlate concurrent in-flight requests must pass their own ids.
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(1);
        RequestId::Number(millis)
    }
}

impl From<u64> for RequestId {
    fn from(id: u64) -> Self {
        RequestId::Number(id)
    }
}

impl From<&str> for RequestId {
    fn from(id: &str) -> Self {
        RequestId::String(id.to_owned())
    }
}

impl From<String> for RequestId {
    fn from(id: String) -> Self {
        RequestId::String(id)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestId::Number(n) => write!(f, "{n}"),
            RequestId::String(s) => f.write_str(s),
        }
    }
}

/// A JSON-RPC 2.0 request envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    pub id: RequestId,
    pub jsonrpc: String,
    pub method: String,
    pub params: Vec<serde_json::Value>,
}

impl RpcRequest {
    /// Build an envelope. An empty `params` vector is sent as `[]`; a missing
    /// `id` falls back to [`RequestId::now`]. Neither `method` nor `params`
    /// is validated.
    pub fn new(
        method: impl Into<String>,
        params: Vec<serde_json::Value>,
        id: Option<RequestId>,
    ) -> Self {
        Self {
            id: id.unwrap_or_else(RequestId::now),
            jsonrpc: JSONRPC_VERSION.to_owned(),
            method: method.into(),
            params,
        }
    }
}

/// The `error` member of a JSON-RPC response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// A JSON-RPC response envelope, returned to callers as the server sent it.
///
/// `id` and `jsonrpc` are optional because pre-2.0 servers (older Bitcoin
/// Core builds) omit `jsonrpc` and some servers answer parse errors with a
/// `null` id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse<R = serde_json::Value> {
    pub id: Option<RequestId>,
    pub jsonrpc: Option<String>,
    pub result: Option<R>,
    pub error: Option<RpcErrorObject>,
}

impl<R> RpcResponse<R> {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Opt-in conversion of a server-reported `error` into
    /// [`ClientError::Server`]. A `null` or absent result yields `Ok(None)`.
    pub fn into_result(self) -> Result<Option<R>, ClientError> {
        match self.error {
            Some(err) => Err(ClientError::Server {
                code: err.code,
                message: err.message,
            }),
            None => Ok(self.result),
        }
    }
}

/// Decoded reply shapes that can tell a JSON-RPC envelope apart from an
/// arbitrary JSON object. Every envelope field is optional, so `{}` decodes.
pub(super) trait Envelope {
    /// `true` when the reply carries a `result` or an `error`.
    fn carries_payload(&self) -> bool;
}

impl<R> Envelope for RpcResponse<R> {
    fn carries_payload(&self) -> bool {
        self.result.is_some() || self.error.is_some()
    }
}

/// A batch reply is normally an array, but servers reject malformed batches
/// (including the empty one) with a single error object.
#[derive(Deserialize)]
#[serde(untagged)]
pub(super) enum BatchReply {
    Many(Vec<RpcResponse>),
    One(RpcResponse),
}

impl Envelope for BatchReply {
    fn carries_payload(&self) -> bool {
        match self {
            BatchReply::Many(items) => {
                !items.is_empty() && items.iter().all(Envelope::carries_payload)
            }
            BatchReply::One(item) => item.carries_payload(),
        }
    }
}

impl From<BatchReply> for Vec<RpcResponse> {
    fn from(reply: BatchReply) -> Self {
        match reply {
            BatchReply::Many(items) => items,
            BatchReply::One(item) => vec![item],
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;

    #[test]
    fn envelope_defaults_params_and_version() {
        let req = RpcRequest::new("getblockcount", Vec::new(), Some(7u64.into()));
        let encoded = serde_json::to_value(&req).expect("request must serialize");
        assert_eq!(
            encoded,
            json!({ "id": 7, "jsonrpc": "2.0", "method": "getblockcount", "params": [] })
        );
    }

    #[test]
    fn string_ids_are_sent_as_strings() {
        let req = RpcRequest::new("getblockhash", vec![json!(10)], Some("abc".into()));
        let encoded = serde_json::to_value(&req).expect("request must serialize");
        assert_eq!(encoded["id"], json!("abc"));
        assert_eq!(encoded["params"], json!([10]));
    }

    #[test]
    fn missing_id_falls_back_to_timestamp() {
        let first = RpcRequest::new("a", Vec::new(), None);
        std::thread::sleep(Duration::from_millis(5));
        let second = RpcRequest::new("b", Vec::new(), None);

        let (RequestId::Number(a), RequestId::Number(b)) = (&first.id, &second.id) else {
            panic!("timestamp ids must be numeric");
        };
        assert!(b > a, "ids separated in time must differ: {a} vs {b}");
    }

    #[test]
    fn response_without_jsonrpc_member_decodes() {
        let resp: RpcResponse =
            serde_json::from_value(json!({ "id": 1, "result": 812_345, "error": null }))
                .expect("bitcoind-style response must decode");
        assert_eq!(resp.jsonrpc, None);
        assert_eq!(resp.result, Some(json!(812_345)));
        assert!(!resp.is_error());
    }

    #[test]
    fn into_result_surfaces_server_error() {
        let resp: RpcResponse = serde_json::from_value(json!({
            "id": "x",
            "jsonrpc": "2.0",
            "error": { "code": -32601, "message": "Method not found" }
        }))
        .expect("error response must decode");
        assert!(resp.is_error());

        let err = resp.into_result().expect_err("error member must convert");
        match err {
            ClientError::Server { code, message } => {
                assert_eq!(code, -32601);
                assert_eq!(message, "Method not found");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn into_result_maps_null_result_to_none() {
        let resp: RpcResponse<String> =
            serde_json::from_value(json!({ "id": 1, "jsonrpc": "2.0", "result": null }))
                .expect("null result must decode");
        assert_eq!(resp.into_result().expect("no error member"), None);
    }

    #[test]
    fn batch_reply_accepts_single_object() {
        let reply: BatchReply = serde_json::from_value(json!({
            "id": null,
            "jsonrpc": "2.0",
            "error": { "code": -32600, "message": "Invalid Request" }
        }))
        .expect("single error object must decode");
        let items: Vec<RpcResponse> = reply.into();
        assert_eq!(items.len(), 1);
        assert!(items[0].is_error());
    }
}
