//! Bitcoin Core style JSON-RPC facade.

use async_trait::async_trait;
use serde_json::json;

use crate::chain::ChainClient;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::rpc::{JsonRpcClient, RpcResponse};

/// Bitcoin Core (and forks sharing its RPC surface).
pub struct BitcoinClient {
    rpc: JsonRpcClient,
}

impl BitcoinClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        Ok(Self::from_rpc(JsonRpcClient::new(config)?))
    }

    pub fn from_rpc(rpc: JsonRpcClient) -> Self {
        Self { rpc }
    }

    pub fn rpc(&self) -> &JsonRpcClient {
        &self.rpc
    }

    /// Mutable access for composing batches with the bulk queue.
    pub fn rpc_mut(&mut self) -> &mut JsonRpcClient {
        &mut self.rpc
    }
}

#[async_trait]
impl ChainClient for BitcoinClient {
    async fn get_info(&self) -> Result<RpcResponse, ClientError> {
        self.rpc.rpc_call("getblockchaininfo", Vec::new(), None).await
    }

    async fn get_block_hash(&self, height: u64) -> Result<RpcResponse, ClientError> {
        self.rpc
            .rpc_call("getblockhash", vec![json!(height)], None)
            .await
    }

    async fn get_tx_info(&self, tx_id: &str) -> Result<RpcResponse, ClientError> {
        self.rpc
            .rpc_call("getrawtransaction", vec![json!(tx_id), json!(true)], None)
            .await
    }

    async fn get_block_info(&self, block_id: &str) -> Result<RpcResponse, ClientError> {
        self.rpc
            .rpc_call("getblock", vec![json!(block_id)], None)
            .await
    }

    async fn get_block_count(&self) -> Result<RpcResponse, ClientError> {
        self.rpc.rpc_call("getblockcount", Vec::new(), None).await
    }

    async fn send_raw_tx(&self, tx: &str) -> Result<RpcResponse<String>, ClientError> {
        self.rpc
            .rpc_call("sendrawtransaction", vec![json!(tx)], None)
            .await
    }
}
