//! JSON-RPC plumbing shared by the Bitcoin-style and Ethereum clients.
//!
//! - [`protocol`]: request/response envelopes.
//! - [`transport`]: the HTTP seam ([`Transport`]) and its `reqwest` impl.
//! - [`bulk`]: the batch queue.
//! - [`JsonRpcClient`]: the dispatcher tying them together.

pub mod bulk;
mod client;
#[cfg(test)]
pub mod mock;
pub mod protocol;
pub mod transport;

pub use bulk::BulkQueue;
pub use client::JsonRpcClient;
pub use protocol::{RequestId, RpcErrorObject, RpcRequest, RpcResponse};
pub use transport::{HttpReply, HttpRequest, HttpTransport, Transport};
