//! The minimal read/submit surface every JSON-RPC chain client provides.

use async_trait::async_trait;

use crate::error::ClientError;
use crate::rpc::RpcResponse;

/// Chain-agnostic node queries.
///
/// Each method is one RPC round trip; the envelope comes back as the node
/// sent it, so a node-side failure shows up in [`RpcResponse::error`].
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// General node / chain status.
    async fn get_info(&self) -> Result<RpcResponse, ClientError>;

    /// Hash (or header, depending on the chain) of the block at `height`.
    async fn get_block_hash(&self, height: u64) -> Result<RpcResponse, ClientError>;

    async fn get_tx_info(&self, tx_id: &str) -> Result<RpcResponse, ClientError>;

    async fn get_block_info(&self, block_id: &str) -> Result<RpcResponse, ClientError>;

    async fn get_block_count(&self) -> Result<RpcResponse, ClientError>;

    /// Broadcast a hex-encoded signed transaction; the result is its id.
    async fn send_raw_tx(&self, tx: &str) -> Result<RpcResponse<String>, ClientError>;
}
