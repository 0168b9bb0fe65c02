use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::config::ClientConfig;
use crate::error::{ClientError, RpcError};

use super::bulk::BulkQueue;
use super::protocol::{BatchReply, Envelope, RequestId, RpcRequest, RpcResponse};
use super::transport::{HttpReply, HttpRequest, HttpTransport, Transport};

// ==============================================================================
// JsonRpcClient: envelope dispatch over one Transport
// ==============================================================================

/// JSON-RPC 2.0 dispatcher with basic auth and a bulk queue.
///
/// Each call is one POST to [`ClientConfig::url`]. The parsed envelope is
/// handed back whether it carries `result` or `error`; only transport
/// failures become `Err`.
pub struct JsonRpcClient {
    config: ClientConfig,
    url: String,
    transport: Arc<dyn Transport>,
    bulk: BulkQueue,
}

impl JsonRpcClient {
    /// Client over a default [`HttpTransport`] (no request timeout).
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let transport = HttpTransport::new()?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        let url = config.url();
        Self {
            config,
            url,
            transport,
            bulk: BulkQueue::new(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send one envelope and decode the reply as `RpcResponse<R>`.
    pub async fn rpc_call<R: DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<serde_json::Value>,
        id: Option<RequestId>,
    ) -> Result<RpcResponse<R>, ClientError> {
        let request = RpcRequest::new(method, params, id);
        self.send(&request).await
    }

    pub async fn send<R: DeserializeOwned>(
        &self,
        request: &RpcRequest,
    ) -> Result<RpcResponse<R>, ClientError> {
        debug!(
            rpc.id = %request.id,
            rpc.method = %request.method,
            rpc.params = request.params.len(),
            "rpc call"
        );
        let reply = self.post(request).await?;
        debug!(
            rpc.id = %request.id,
            rpc.method = %request.method,
            status = %reply.status,
            body_len = reply.body.len(),
            "rpc response"
        );
        Ok(decode_reply(reply)?)
    }

    /// Queue an envelope for the next [`bulk_rpc_call`](Self::bulk_rpc_call).
    pub fn bulk_add(
        &mut self,
        method: impl Into<String>,
        params: Vec<serde_json::Value>,
        id: Option<RequestId>,
    ) {
        self.bulk.add(method, params, id);
    }

    /// Envelopes queued so far, in insertion order.
    pub fn pending(&self) -> &[RpcRequest] {
        self.bulk.entries()
    }

    pub fn bulk_len(&self) -> usize {
        self.bulk.len()
    }

    /// Drain the queue and send it as one batch.
    ///
    /// The queue is emptied before the request goes out, so it is empty
    /// afterwards whether or not the call succeeds. Responses come back in
    /// the server's order; their ids are not matched against the requests.
    pub async fn bulk_rpc_call(&mut self) -> Result<Vec<RpcResponse>, ClientError> {
        let batch = self.bulk.take();
        self.bulk_rpc_exec(&batch).await
    }

    /// Send a caller-supplied batch. The internal queue is not touched.
    pub async fn bulk_rpc_exec(
        &self,
        data: &[RpcRequest],
    ) -> Result<Vec<RpcResponse>, ClientError> {
        debug!(rpc.batch_size = data.len(), "rpc batch call");
        let reply = self.post(data).await?;
        debug!(
            rpc.batch_size = data.len(),
            status = %reply.status,
            body_len = reply.body.len(),
            "rpc batch response"
        );
        let decoded: BatchReply = decode_reply(reply)?;
        Ok(decoded.into())
    }

    async fn post<T>(&self, payload: &T) -> Result<HttpReply, ClientError>
    where
        T: serde::Serialize + ?Sized,
    {
        let body = serde_json::to_value(payload)
            .map_err(|e| ClientError::InvalidInput(format!("encode JSON-RPC request: {e}")))?;
        let reply = self
            .transport
            .post_json(HttpRequest {
                url: &self.url,
                body: &body,
                auth: Some((self.config.user(), self.config.pass())),
                timeout: None,
            })
            .await?;
        Ok(reply)
    }
}

/// Decode a JSON-RPC reply body.
///
/// Non-2xx replies are still decoded when the body is an envelope carrying a
/// `result` or `error` (Bitcoin Core reports RPC errors as HTTP 500 with an
/// envelope). Anything else with a failing status is a transport failure.
fn decode_reply<T: DeserializeOwned + Envelope>(reply: HttpReply) -> Result<T, RpcError> {
    let decoded = serde_json::from_str::<T>(&reply.body);
    if !reply.status.is_success() {
        return match decoded {
            Ok(envelope) if envelope.carries_payload() => Ok(envelope),
            _ => Err(RpcError::Status {
                status: reply.status,
                body: reply.body,
            }),
        };
    }
    decoded.map_err(|e| {
        trace!(body = %reply.body, "undecodable rpc response");
        RpcError::InvalidResponse(format!(
            "decode JSON-RPC response: {e}; body={}",
            reply.body
        ))
    })
}
