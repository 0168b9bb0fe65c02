//! Parameter and result shapes for the Ethereum facade.
//!
//! Block, transaction and receipt bodies are returned as raw JSON; only the
//! shapes the client itself builds or branches on are typed here.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize, Serializer};

/// Block selector accepted by state-reading methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockTag {
    Earliest,
    #[default]
    Latest,
    Pending,
    Number(u64),
}

impl Serialize for BlockTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BlockTag::Earliest => serializer.serialize_str("earliest"),
            BlockTag::Latest => serializer.serialize_str("latest"),
            BlockTag::Pending => serializer.serialize_str("pending"),
            BlockTag::Number(n) => serializer.serialize_str(&format!("{n:#x}")),
        }
    }
}

/// `eth_call` / `eth_estimateGas` argument. Quantities are hex strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

/// `eth_sendTransaction` argument; the node signs with an unlocked `from`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
}

/// Options for geth's `debug_traceTransaction`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_storage: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_memory: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_stack: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
}

/// `eth_syncing` result: `false`, or a progress object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SyncStatus {
    Syncing(SyncProgress),
    NotSyncing(bool),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncProgress {
    pub starting_block: String,
    pub current_block: String,
    pub highest_block: String,
}

/// Aggregated ERC-20 metadata. Fields a token does not implement are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub address: String,
    pub decimals: Option<u8>,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub total_supply: Option<U256>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn block_tags_serialize_as_strings() {
        assert_eq!(serde_json::to_value(BlockTag::Latest).unwrap(), json!("latest"));
        assert_eq!(serde_json::to_value(BlockTag::Pending).unwrap(), json!("pending"));
        assert_eq!(
            serde_json::to_value(BlockTag::Number(4_370_000)).unwrap(),
            json!("0x42ae50")
        );
    }

    #[test]
    fn call_request_omits_unset_fields() {
        let req = CallRequest {
            to: Some("0xdac17f958d2ee523a2206206994597c13d831ec7".into()),
            data: Some("0x18160ddd".into()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({ "to": "0xdac17f958d2ee523a2206206994597c13d831ec7", "data": "0x18160ddd" })
        );
    }

    #[test]
    fn sync_status_decodes_both_shapes() {
        let idle: SyncStatus = serde_json::from_value(json!(false)).unwrap();
        assert_eq!(idle, SyncStatus::NotSyncing(false));

        let busy: SyncStatus = serde_json::from_value(json!({
            "startingBlock": "0x0",
            "currentBlock": "0x10",
            "highestBlock": "0x20"
        }))
        .unwrap();
        match busy {
            SyncStatus::Syncing(progress) => assert_eq!(progress.highest_block, "0x20"),
            other => panic!("expected progress, got {other:?}"),
        }
    }

    #[test]
    fn trace_options_use_geth_field_names() {
        let opts = TraceOptions {
            disable_storage: Some(true),
            tracer: Some("callTracer".into()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&opts).unwrap(),
            json!({ "disableStorage": true, "tracer": "callTracer" })
        );
    }
}
