//! EOS nodeos client.
//!
//! nodeos does not speak JSON-RPC: every method is its own URL,
//! `{url}/{version}/{module}/{method}`, taking a plain JSON object body.
//! Failures are re-wrapped into [`ClientError::Rest`] with the module,
//! method, URL and body of the failing call.

pub mod pricing;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{ClientError, RpcError};
use crate::rpc::{HttpReply, HttpRequest, HttpTransport, Transport};

pub use types::{
    AccountResources, BlockNumOrId, Compression, EncodeType, EosModule, EosVersion, NetCpuPrice,
    PushTransaction, RamMarketRow, TableRows, TableRowsQuery,
};

pub const DEFAULT_EOS_URL: &str = "http://127.0.0.1:8888";

/// Every EOS request is abandoned after this long.
pub const EOS_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Account whose stake/limit ratio is used when pricing NET and CPU.
pub const DEFAULT_PRICE_REFERENCE_ACCOUNT: &str = "heztanrqgene";

const CHAIN_TAG: &str = "EOS";

mod methods {
    pub const GET_INFO: &str = "get_info";
    pub const GET_BLOCK: &str = "get_block";
    pub const GET_ACCOUNT: &str = "get_account";
    pub const GET_CURRENCY_STATS: &str = "get_currency_stats";
    pub const GET_ABI: &str = "get_abi";
    pub const GET_CODE: &str = "get_code";
    pub const GET_RAW_CODE_AND_ABI: &str = "get_raw_code_and_abi";
    pub const GET_TABLE_ROWS: &str = "get_table_rows";
    pub const GET_BLOCK_HEADER_STATE: &str = "get_block_header_state";
    pub const GET_CURRENCY_BALANCE: &str = "get_currency_balance";
    pub const PUSH_TRANSACTION: &str = "push_transaction";
    pub const ABI_JSON_TO_BIN: &str = "abi_json_to_bin";
    pub const ABI_BIN_TO_JSON: &str = "abi_bin_to_json";
    pub const GET_KEY_ACCOUNTS: &str = "get_key_accounts";
    pub const GET_TRANSACTION: &str = "get_transaction";
    pub const GET_CONTROLLED_ACCOUNTS: &str = "get_controlled_accounts";
}

pub struct EosClient {
    base_url: String,
    transport: Arc<dyn Transport>,
}

impl EosClient {
    /// `url` is scheme + host + port, e.g. [`DEFAULT_EOS_URL`].
    pub fn new(url: &str, version: EosVersion) -> Result<Self, ClientError> {
        let transport = HttpTransport::new()?;
        Ok(Self::with_transport(url, version, Arc::new(transport)))
    }

    pub fn with_transport(url: &str, version: EosVersion, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: format!("{}/{version}", url.trim_end_matches('/')),
            transport,
        }
    }

    /// `{url}/{version}`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn call_url(&self, module: EosModule, method: &str) -> String {
        format!("{}/{module}/{method}", self.base_url)
    }

    /// POST `body` to `module/method` and decode the reply as `T`.
    pub async fn call<T: DeserializeOwned>(
        &self,
        module: EosModule,
        method: &str,
        body: Value,
    ) -> Result<T, ClientError> {
        let url = self.call_url(module, method);
        debug!(eos.module = %module, eos.method = method, "eos call");

        let result = self
            .transport
            .post_json(HttpRequest {
                url: &url,
                body: &body,
                auth: None,
                timeout: Some(EOS_REQUEST_TIMEOUT),
            })
            .await
            .and_then(decode_rest_reply);

        result.map_err(|source| ClientError::Rest {
            chain: CHAIN_TAG,
            module: module.to_string(),
            method: method.to_owned(),
            url,
            body,
            source,
        })
    }

    // ==========================================================================
    // chain
    // ==========================================================================

    pub async fn get_info(&self) -> Result<Value, ClientError> {
        self.call(EosModule::Chain, methods::GET_INFO, json!({})).await
    }

    pub async fn get_block(&self, id: impl Into<BlockNumOrId>) -> Result<Value, ClientError> {
        let id: BlockNumOrId = id.into();
        let body = json!({ "block_num_or_id": id });
        self.call(EosModule::Chain, methods::GET_BLOCK, body).await
    }

    pub async fn get_account_info(&self, account: &str) -> Result<Value, ClientError> {
        self.call(
            EosModule::Chain,
            methods::GET_ACCOUNT,
            json!({ "account_name": account }),
        )
        .await
    }

    pub async fn get_currency_stats(&self, code: &str, symbol: &str) -> Result<Value, ClientError> {
        self.call(
            EosModule::Chain,
            methods::GET_CURRENCY_STATS,
            json!({ "code": code, "symbol": symbol }),
        )
        .await
    }

    pub async fn get_abi(&self, account: &str) -> Result<Value, ClientError> {
        self.call(
            EosModule::Chain,
            methods::GET_ABI,
            json!({ "account_name": account }),
        )
        .await
    }

    pub async fn get_code(&self, account: &str) -> Result<Value, ClientError> {
        self.call(
            EosModule::Chain,
            methods::GET_CODE,
            json!({ "account_name": account }),
        )
        .await
    }

    pub async fn get_raw_code_and_abi(&self, account: &str) -> Result<Value, ClientError> {
        self.call(
            EosModule::Chain,
            methods::GET_RAW_CODE_AND_ABI,
            json!({ "account_name": account }),
        )
        .await
    }

    pub async fn get_table_rows<T: DeserializeOwned>(
        &self,
        query: &TableRowsQuery,
    ) -> Result<TableRows<T>, ClientError> {
        self.call(EosModule::Chain, methods::GET_TABLE_ROWS, json!(query))
            .await
    }

    pub async fn get_block_header_state(
        &self,
        id: impl Into<BlockNumOrId>,
    ) -> Result<Value, ClientError> {
        let id: BlockNumOrId = id.into();
        let body = json!({ "block_num_or_id": id });
        self.call(EosModule::Chain, methods::GET_BLOCK_HEADER_STATE, body)
            .await
    }

    /// Balances like `"1.0001 EOS"`; all symbols of `code` when `symbol` is
    /// `None`.
    pub async fn get_balance(
        &self,
        code: &str,
        account: &str,
        symbol: Option<&str>,
    ) -> Result<Vec<String>, ClientError> {
        let mut body = json!({ "code": code, "account": account });
        if let Some(symbol) = symbol {
            body["symbol"] = json!(symbol);
        }
        self.call(EosModule::Chain, methods::GET_CURRENCY_BALANCE, body)
            .await
    }

    pub async fn push_transaction(&self, tx: &PushTransaction) -> Result<Value, ClientError> {
        self.call(EosModule::Chain, methods::PUSH_TRANSACTION, json!(tx))
            .await
    }

    /// Serialize action arguments to the hex used in a transaction's `data`.
    pub async fn abi_json_to_bin(
        &self,
        code: &str,
        action: &str,
        args: Value,
    ) -> Result<Value, ClientError> {
        self.call(
            EosModule::Chain,
            methods::ABI_JSON_TO_BIN,
            json!({ "code": code, "action": action, "args": args }),
        )
        .await
    }

    pub async fn abi_bin_to_json(
        &self,
        code: &str,
        action: &str,
        binargs: &str,
    ) -> Result<Value, ClientError> {
        self.call(
            EosModule::Chain,
            methods::ABI_BIN_TO_JSON,
            json!({ "code": code, "action": action, "binargs": binargs }),
        )
        .await
    }

    // ==========================================================================
    // history
    // ==========================================================================

    pub async fn get_accounts_by_pub_key(&self, pub_key: &str) -> Result<Value, ClientError> {
        self.call(
            EosModule::History,
            methods::GET_KEY_ACCOUNTS,
            json!({ "public_key": pub_key }),
        )
        .await
    }

    pub async fn get_tx_info(&self, id: &str) -> Result<Value, ClientError> {
        self.call(
            EosModule::History,
            methods::GET_TRANSACTION,
            json!({ "id": id }),
        )
        .await
    }

    pub async fn get_controlled_accounts(&self, account: &str) -> Result<Value, ClientError> {
        self.call(
            EosModule::History,
            methods::GET_CONTROLLED_ACCOUNTS,
            json!({ "controlling_account": account }),
        )
        .await
    }

    // ==========================================================================
    // Derived
    // ==========================================================================

    /// RAM price in EOS per KB from the `eosio::rammarket` bonding curve.
    pub async fn get_ram_price(&self) -> Result<f64, ClientError> {
        let table: TableRows<RamMarketRow> =
            self.get_table_rows(&TableRowsQuery::ram_market()).await?;
        let row = table
            .rows
            .first()
            .ok_or_else(|| ClientError::invalid_response("eosio::rammarket has no rows"))?;
        pricing::ram_price(row)
    }

    /// NET and CPU prices implied by `reference_account`'s stake, defaulting
    /// to [`DEFAULT_PRICE_REFERENCE_ACCOUNT`].
    pub async fn get_net_and_cpu_price(
        &self,
        reference_account: Option<&str>,
    ) -> Result<NetCpuPrice, ClientError> {
        let account = reference_account.unwrap_or(DEFAULT_PRICE_REFERENCE_ACCOUNT);
        let resources: AccountResources = self
            .call(
                EosModule::Chain,
                methods::GET_ACCOUNT,
                json!({ "account_name": account }),
            )
            .await?;
        pricing::net_cpu_price(&resources)
    }

    /// Block producers from `eosio::producers`.
    pub async fn get_producer_list(&self, limit: u32) -> Result<TableRows<Value>, ClientError> {
        let query = TableRowsQuery {
            limit: Some(limit),
            lower_bound: Some(0),
            upper_bound: Some(-1),
            ..TableRowsQuery::new("eosio", "eosio", "producers")
        };
        self.get_table_rows(&query).await
    }
}

fn decode_rest_reply<T: DeserializeOwned>(reply: HttpReply) -> Result<T, RpcError> {
    if !reply.status.is_success() {
        return Err(RpcError::Status {
            status: reply.status,
            body: reply.body,
        });
    }
    serde_json::from_str(&reply.body).map_err(|e| {
        RpcError::InvalidResponse(format!("decode EOS response: {e}; body={}", reply.body))
    })
}
