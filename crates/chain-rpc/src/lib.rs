//! Thin typed clients for blockchain node HTTP APIs.
//!
//! - [`bitcoin::BitcoinClient`] and [`ethereum::EthereumClient`] speak
//!   JSON-RPC 2.0 through the shared [`rpc::JsonRpcClient`] dispatcher.
//! - [`eos::EosClient`] targets the EOS REST-over-HTTP API.
//!
//! Every call is one HTTP POST awaiting one response. Server-reported
//! JSON-RPC errors are handed back inside [`rpc::RpcResponse`] untouched.

pub mod bitcoin;
pub mod chain;
pub mod config;
pub mod eos;
pub mod error;
pub mod ethereum;
pub mod rpc;

#[cfg(test)]
mod test_util;

pub use chain::ChainClient;
pub use config::ClientConfig;
pub use error::{ClientError, RpcError};
pub use rpc::{JsonRpcClient, RequestId, RpcRequest, RpcResponse};
