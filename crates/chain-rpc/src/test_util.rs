//! Shared helpers for unit tests across the facades.

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::rpc::mock::MockTransport;
use crate::rpc::JsonRpcClient;

/// `alice:secret@127.0.0.1:8332`.
pub fn test_config() -> ClientConfig {
    ClientConfig::new("alice", "secret", "127.0.0.1", 8332).expect("static test config is valid")
}

/// A dispatcher over `mock`, keeping the caller's handle for inspection.
pub fn mock_rpc(mock: &Arc<MockTransport>) -> JsonRpcClient {
    JsonRpcClient::with_transport(test_config(), mock.clone())
}
