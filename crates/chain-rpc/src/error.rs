use reqwest::StatusCode;

/// Transport-level failures: the request never produced a usable body.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("RPC call failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("RPC call failed with HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("invalid RPC response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Rpc(#[from] RpcError),

    /// A REST-style (non JSON-RPC) call failed; carries enough context to
    /// replay the request by hand.
    #[error("[{chain}::{module}/{method}] request to {url} failed: {source}")]
    Rest {
        chain: &'static str,
        module: String,
        method: String,
        url: String,
        body: serde_json::Value,
        #[source]
        source: RpcError,
    },

    /// Produced only by [`crate::rpc::RpcResponse::into_result`]; the
    /// dispatcher itself never inspects the `error` member.
    #[error("server returned JSON-RPC error {code}: {message}")]
    Server { code: i64, message: String },

    #[error("{0}")]
    Guard(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// Shorthand for a malformed-response failure.
    pub(crate) fn invalid_response(message: impl Into<String>) -> Self {
        ClientError::Rpc(RpcError::InvalidResponse(message.into()))
    }
}
