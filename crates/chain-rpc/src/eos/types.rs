//! Request bodies and the few response shapes the EOS client reads itself.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// API version segment of the URL. nodeos only serves `v1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EosVersion {
    #[default]
    V1,
}

impl fmt::Display for EosVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EosVersion::V1 => f.write_str("v1"),
        }
    }
}

/// nodeos API plugin a method lives under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EosModule {
    Chain,
    History,
}

impl EosModule {
    pub fn as_str(self) -> &'static str {
        match self {
            EosModule::Chain => "chain",
            EosModule::History => "history",
        }
    }
}

impl fmt::Display for EosModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A block height or a block id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BlockNumOrId {
    Num(u64),
    Id(String),
}

impl From<u64> for BlockNumOrId {
    fn from(num: u64) -> Self {
        BlockNumOrId::Num(num)
    }
}

impl From<&str> for BlockNumOrId {
    fn from(id: &str) -> Self {
        BlockNumOrId::Id(id.to_owned())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodeType {
    Dec,
    Hex,
}

/// Body of `chain/get_table_rows`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRowsQuery {
    pub scope: String,
    pub code: String,
    pub table: String,
    pub json: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower_bound: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper_bound: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_position: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encode_type: Option<EncodeType>,
}

impl TableRowsQuery {
    /// JSON-decoded rows of `code::table` in `scope`, no bounds.
    pub fn new(code: &str, scope: &str, table: &str) -> Self {
        Self {
            scope: scope.to_owned(),
            code: code.to_owned(),
            table: table.to_owned(),
            json: true,
            lower_bound: None,
            upper_bound: None,
            limit: None,
            key_type: None,
            index_position: None,
            encode_type: None,
        }
    }

    /// `eosio::rammarket`, the RAM bonding-curve state.
    pub fn ram_market() -> Self {
        Self::new("eosio", "eosio", "rammarket")
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TableRows<T> {
    pub rows: Vec<T>,
    #[serde(default)]
    pub more: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Connector {
    pub balance: String,
    pub weight: String,
}

/// One row of `eosio::rammarket`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RamMarketRow {
    pub supply: String,
    pub base: Connector,
    pub quote: Connector,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ResourceLimit {
    #[serde(deserialize_with = "de_int")]
    pub used: i64,
    #[serde(deserialize_with = "de_int")]
    pub available: i64,
    #[serde(deserialize_with = "de_int")]
    pub max: i64,
}

/// The staking fields of a `chain/get_account` reply.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AccountResources {
    pub account_name: String,
    #[serde(deserialize_with = "de_int")]
    pub net_weight: i64,
    #[serde(deserialize_with = "de_int")]
    pub cpu_weight: i64,
    pub net_limit: ResourceLimit,
    pub cpu_limit: ResourceLimit,
}

/// Staked EOS per KB of NET and per ms of CPU, rounded to 4 places.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetCpuPrice {
    pub net_price: f64,
    pub cpu_price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    None,
    Zlib,
}

/// Body of `chain/push_transaction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushTransaction {
    pub signatures: Vec<String>,
    pub compression: Compression,
    pub packed_context_free_data: String,
    pub packed_trx: String,
}

/// nodeos renders 64-bit integers as JSON strings once they outgrow 2^32,
/// so accept both spellings.
fn de_int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrString {
        Int(i64),
        Str(String),
    }

    match IntOrString::deserialize(deserializer)? {
        IntOrString::Int(n) => Ok(n),
        IntOrString::Str(s) => s.trim().parse().map_err(de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn account_resources_accept_stringified_integers() {
        let account: AccountResources = serde_json::from_value(json!({
            "account_name": "heztanrqgene",
            "net_weight": "12345678901",
            "cpu_weight": 2_000_000,
            "net_limit": { "used": 10, "available": "90", "max": 100 },
            "cpu_limit": { "used": 1, "available": 9, "max": "10" },
            "ram_quota": 8192
        }))
        .expect("account must decode");
        assert_eq!(account.net_weight, 12_345_678_901);
        assert_eq!(account.net_limit.available, 90);
        assert_eq!(account.cpu_limit.max, 10);
    }

    #[test]
    fn table_query_skips_unset_bounds() {
        let body = serde_json::to_value(TableRowsQuery::ram_market()).unwrap();
        assert_eq!(
            body,
            json!({ "scope": "eosio", "code": "eosio", "table": "rammarket", "json": true })
        );
    }

    #[test]
    fn block_ref_serializes_untagged() {
        assert_eq!(serde_json::to_value(BlockNumOrId::from(42u64)).unwrap(), json!(42));
        assert_eq!(serde_json::to_value(BlockNumOrId::from("00ab")).unwrap(), json!("00ab"));
    }

    #[test]
    fn push_transaction_uses_nodeos_field_names() {
        let body = serde_json::to_value(PushTransaction {
            signatures: vec!["SIG_K1_x".into()],
            compression: Compression::None,
            packed_context_free_data: String::new(),
            packed_trx: "deadbeef".into(),
        })
        .unwrap();
        assert_eq!(
            body,
            json!({
                "signatures": ["SIG_K1_x"],
                "compression": "none",
                "packed_context_free_data": "",
                "packed_trx": "deadbeef"
            })
        );
    }
}
