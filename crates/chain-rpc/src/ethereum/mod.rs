//! Ethereum JSON-RPC facade: the `eth_*` namespace plus geth `debug_*` and
//! Parity `trace_*` / `parity_*` extras, and ERC-20 read helpers built on
//! `eth_call`.

pub mod abi;
pub mod types;

use alloy_primitives::U256;
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::chain::ChainClient;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::rpc::{JsonRpcClient, RpcResponse};

use abi::IERC20;

pub use types::{
    BlockTag, CallRequest, SyncProgress, SyncStatus, TokenInfo, TraceOptions, TransactionRequest,
};

/// JSON-RPC codes nodes use for a reverted or failed `eth_call`.
const EXECUTION_ERROR_CODES: [i64; 2] = [-32000, 3];

pub struct EthereumClient {
    rpc: JsonRpcClient,
}

impl EthereumClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        Ok(Self::from_rpc(JsonRpcClient::new(config)?))
    }

    pub fn from_rpc(rpc: JsonRpcClient) -> Self {
        Self { rpc }
    }

    pub fn rpc(&self) -> &JsonRpcClient {
        &self.rpc
    }

    pub fn rpc_mut(&mut self) -> &mut JsonRpcClient {
        &mut self.rpc
    }

    // ==========================================================================
    // Chain state
    // ==========================================================================

    pub async fn sync_progress(&self) -> Result<RpcResponse<SyncStatus>, ClientError> {
        self.rpc.rpc_call("eth_syncing", Vec::new(), None).await
    }

    /// Balance in wei, hex encoded.
    pub async fn get_balance(
        &self,
        address: &str,
        tag: BlockTag,
    ) -> Result<RpcResponse<String>, ClientError> {
        self.rpc
            .rpc_call("eth_getBalance", vec![json!(address), json!(tag)], None)
            .await
    }

    pub async fn get_block_by_hash(
        &self,
        hash: &str,
        full_tx: bool,
    ) -> Result<RpcResponse, ClientError> {
        self.rpc
            .rpc_call("eth_getBlockByHash", vec![json!(hash), json!(full_tx)], None)
            .await
    }

    /// Block with transaction hashes only.
    pub async fn get_block(&self, tag: BlockTag) -> Result<RpcResponse, ClientError> {
        self.block_by_number(tag, false).await
    }

    /// Block with full transaction objects.
    pub async fn get_block_verbose(&self, tag: BlockTag) -> Result<RpcResponse, ClientError> {
        self.block_by_number(tag, true).await
    }

    async fn block_by_number(
        &self,
        tag: BlockTag,
        full_tx: bool,
    ) -> Result<RpcResponse, ClientError> {
        self.rpc
            .rpc_call("eth_getBlockByNumber", vec![json!(tag), json!(full_tx)], None)
            .await
    }

    pub async fn get_tx_by_hash(&self, hash: &str) -> Result<RpcResponse, ClientError> {
        self.rpc
            .rpc_call("eth_getTransactionByHash", vec![json!(hash)], None)
            .await
    }

    pub async fn get_raw_tx_by_hash(
        &self,
        hash: &str,
    ) -> Result<RpcResponse<String>, ClientError> {
        self.rpc
            .rpc_call("eth_getRawTransactionByHash", vec![json!(hash)], None)
            .await
    }

    /// `null` result while the transaction is pending or unknown.
    pub async fn get_tx_receipt(&self, hash: &str) -> Result<RpcResponse, ClientError> {
        self.rpc
            .rpc_call("eth_getTransactionReceipt", vec![json!(hash)], None)
            .await
    }

    pub async fn get_addr_nonce(
        &self,
        address: &str,
        tag: BlockTag,
    ) -> Result<RpcResponse<String>, ClientError> {
        self.rpc
            .rpc_call("eth_getTransactionCount", vec![json!(address), json!(tag)], None)
            .await
    }

    /// Next nonce including pending transactions (Parity / OpenEthereum).
    pub async fn get_addr_next_nonce(
        &self,
        address: &str,
    ) -> Result<RpcResponse<String>, ClientError> {
        self.rpc
            .rpc_call("parity_nextNonce", vec![json!(address)], None)
            .await
    }

    pub async fn get_current_gas_price(&self) -> Result<RpcResponse<String>, ClientError> {
        self.rpc.rpc_call("eth_gasPrice", Vec::new(), None).await
    }

    pub async fn get_code(
        &self,
        address: &str,
        tag: BlockTag,
    ) -> Result<RpcResponse<String>, ClientError> {
        self.rpc
            .rpc_call("eth_getCode", vec![json!(address), json!(tag)], None)
            .await
    }

    /// `true` when the address currently holds bytecode.
    ///
    /// A self-destructed contract has no code left and reads as a plain
    /// account.
    pub async fn is_contract(&self, address: &str) -> Result<bool, ClientError> {
        let code = self.get_code(address, BlockTag::Latest).await?.into_result()?;
        Ok(code.is_some_and(|code| !code.is_empty() && code != "0x"))
    }

    // ==========================================================================
    // Calls and submission
    // ==========================================================================

    pub async fn call_func(
        &self,
        call: &CallRequest,
        tag: BlockTag,
    ) -> Result<RpcResponse<String>, ClientError> {
        self.rpc
            .rpc_call("eth_call", vec![json!(call), json!(tag)], None)
            .await
    }

    pub async fn get_estimate_gas(
        &self,
        call: &CallRequest,
    ) -> Result<RpcResponse<String>, ClientError> {
        self.rpc
            .rpc_call("eth_estimateGas", vec![json!(call)], None)
            .await
    }

    /// Submit a transaction for the node to sign with an unlocked account.
    pub async fn send_tx(
        &self,
        tx: &TransactionRequest,
    ) -> Result<RpcResponse<String>, ClientError> {
        self.rpc
            .rpc_call("eth_sendTransaction", vec![json!(tx)], None)
            .await
    }

    /// `eth_sign`; `address` must be unlocked on the node.
    pub async fn sign_message(
        &self,
        address: &str,
        data: &[u8],
    ) -> Result<RpcResponse<String>, ClientError> {
        let payload = format!("0x{}", hex::encode(data));
        self.rpc
            .rpc_call("eth_sign", vec![json!(address), json!(payload)], None)
            .await
    }

    // ==========================================================================
    // Tracing
    // ==========================================================================

    /// geth `debug_traceTransaction`; needs the `debug` API enabled.
    pub async fn trace_tx(
        &self,
        tx_hash: &str,
        options: Option<&TraceOptions>,
    ) -> Result<RpcResponse, ClientError> {
        let mut params = vec![json!(tx_hash)];
        if let Some(options) = options {
            params.push(json!(options));
        }
        self.rpc
            .rpc_call("debug_traceTransaction", params, None)
            .await
    }

    /// Parity `trace_transaction`.
    pub async fn trace_tx_by_parity(&self, tx_hash: &str) -> Result<RpcResponse, ClientError> {
        self.rpc
            .rpc_call("trace_transaction", vec![json!(tx_hash)], None)
            .await
    }

    // ==========================================================================
    // ERC-20
    // ==========================================================================

    /// Token balance of `holder` in base units. `pending` reads the pending
    /// block instead of the latest one. A token returning no data reads as
    /// zero.
    pub async fn erc20_balance(
        &self,
        token: &str,
        holder: &str,
        pending: bool,
    ) -> Result<U256, ClientError> {
        let tag = if pending {
            BlockTag::Pending
        } else {
            BlockTag::Latest
        };
        let data = abi::balance_of_call_data(holder)?;
        let raw = self
            .call_func(&token_call(token, data), tag)
            .await?
            .into_result()?
            .unwrap_or_default();
        let bytes = abi::decode_hex_payload(&raw)?;
        if bytes.is_empty() {
            return Ok(U256::ZERO);
        }
        abi::decode_return::<IERC20::balanceOfCall>(&bytes)
    }

    pub async fn erc20_decimals(&self, token: &str) -> Result<Option<u8>, ClientError> {
        self.erc20_view(token, &IERC20::decimalsCall {})
            .await?
            .map(|bytes| abi::decode_return::<IERC20::decimalsCall>(&bytes))
            .transpose()
    }

    pub async fn erc20_total_supply(&self, token: &str) -> Result<Option<U256>, ClientError> {
        self.erc20_view(token, &IERC20::totalSupplyCall {})
            .await?
            .map(|bytes| abi::decode_return::<IERC20::totalSupplyCall>(&bytes))
            .transpose()
    }

    pub async fn erc20_name(&self, token: &str) -> Result<Option<String>, ClientError> {
        self.erc20_view(token, &IERC20::nameCall {})
            .await?
            .map(|bytes| abi::decode_text(&bytes))
            .transpose()
    }

    pub async fn erc20_symbol(&self, token: &str) -> Result<Option<String>, ClientError> {
        self.erc20_view(token, &IERC20::symbolCall {})
            .await?
            .map(|bytes| abi::decode_text(&bytes))
            .transpose()
    }

    /// Decimals, name, symbol and total supply, queried concurrently.
    pub async fn erc20_token_info(&self, token: &str) -> Result<TokenInfo, ClientError> {
        let (decimals, name, symbol, total_supply) = futures::try_join!(
            self.erc20_decimals(token),
            self.erc20_name(token),
            self.erc20_symbol(token),
            self.erc20_total_supply(token),
        )?;
        Ok(TokenInfo {
            address: token.to_owned(),
            decimals,
            name,
            symbol,
            total_supply,
        })
    }

    /// Zero-argument view call. `None` when the token reverts or returns no
    /// data, which is how optional ERC-20 getters show up missing.
    async fn erc20_view<C: SolCall>(
        &self,
        token: &str,
        call: &C,
    ) -> Result<Option<Vec<u8>>, ClientError> {
        let resp = self
            .call_func(&token_call(token, abi::call_data(call)), BlockTag::Latest)
            .await?;
        if let Some(err) = &resp.error {
            if EXECUTION_ERROR_CODES.contains(&err.code) {
                debug!(
                    token,
                    function = C::SIGNATURE,
                    code = err.code,
                    message = %err.message,
                    "erc20 view reverted"
                );
                return Ok(None);
            }
        }
        let Some(raw) = resp.into_result()? else {
            return Ok(None);
        };
        let bytes = abi::decode_hex_payload(&raw)?;
        Ok((!bytes.is_empty()).then_some(bytes))
    }
}

fn token_call(token: &str, data: String) -> CallRequest {
    CallRequest {
        to: Some(token.to_owned()),
        data: Some(data),
        ..Default::default()
    }
}

#[async_trait]
impl ChainClient for EthereumClient {
    /// Sync status (`eth_syncing`).
    async fn get_info(&self) -> Result<RpcResponse, ClientError> {
        self.rpc.rpc_call("eth_syncing", Vec::new(), None).await
    }

    /// The block at `height`; its `hash` member is the block hash.
    async fn get_block_hash(&self, height: u64) -> Result<RpcResponse, ClientError> {
        self.block_by_number(BlockTag::Number(height), false).await
    }

    async fn get_tx_info(&self, tx_id: &str) -> Result<RpcResponse, ClientError> {
        self.get_tx_by_hash(tx_id).await
    }

    async fn get_block_info(&self, block_id: &str) -> Result<RpcResponse, ClientError> {
        self.get_block_by_hash(block_id, false).await
    }

    /// Latest block number, hex encoded.
    async fn get_block_count(&self) -> Result<RpcResponse, ClientError> {
        self.rpc.rpc_call("eth_blockNumber", Vec::new(), None).await
    }

    async fn send_raw_tx(&self, tx: &str) -> Result<RpcResponse<String>, ClientError> {
        self.rpc
            .rpc_call("eth_sendRawTransaction", vec![json!(tx)], None)
            .await
    }
}
