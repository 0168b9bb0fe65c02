//! ERC-20 view-function interface and the glue between its ABI and the hex
//! strings `eth_call` speaks.

use alloy_primitives::{Address, FixedBytes};
use alloy_sol_types::{sol, SolCall};

use crate::error::ClientError;

sol! {
    interface IERC20 {
        function balanceOf(address owner) external view returns (uint256);
        function decimals() external view returns (uint8);
        function totalSupply() external view returns (uint256);
        function name() external view returns (string);
        function symbol() external view returns (string);
    }
}

sol! {
    /// Early tokens (MKR, SAI) declare their metadata getters as `bytes32`.
    interface ILegacyERC20Metadata {
        function name() external view returns (bytes32);
        function symbol() external view returns (bytes32);
    }
}

pub fn parse_address(address: &str) -> Result<Address, ClientError> {
    address
        .parse::<Address>()
        .map_err(|e| ClientError::InvalidInput(format!("address `{address}`: {e}")))
}

/// `0x`-prefixed call data for `call`.
pub fn call_data<C: SolCall>(call: &C) -> String {
    format!("0x{}", hex::encode(call.abi_encode()))
}

/// `balanceOf(holder)` call data.
pub fn balance_of_call_data(holder: &str) -> Result<String, ClientError> {
    let owner = parse_address(holder)?;
    Ok(call_data(&IERC20::balanceOfCall { owner }))
}

/// Decode an `eth_call` hex result into raw bytes. `"0x"` decodes to empty.
pub fn decode_hex_payload(payload: &str) -> Result<Vec<u8>, ClientError> {
    let bare = payload
        .strip_prefix("0x")
        .or_else(|| payload.strip_prefix("0X"))
        .unwrap_or(payload);
    hex::decode(bare)
        .map_err(|e| ClientError::invalid_response(format!("eth_call result `{payload}`: {e}")))
}

pub fn decode_return<C: SolCall>(data: &[u8]) -> Result<C::Return, ClientError> {
    C::abi_decode_returns(data)
        .map_err(|e| ClientError::invalid_response(format!("{} return data: {e}", C::SIGNATURE)))
}

/// `name()` / `symbol()` result as a `string`, or as the legacy `bytes32`
/// with trailing NULs trimmed. A dynamic `string` always spans at least two
/// words, so exactly one word means `bytes32`.
pub fn decode_text(data: &[u8]) -> Result<String, ClientError> {
    if data.len() == 32 {
        let word: FixedBytes<32> = decode_return::<ILegacyERC20Metadata::nameCall>(data)?;
        let end = word.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
        return String::from_utf8(word[..end].to_vec())
            .map_err(|e| ClientError::invalid_response(format!("bytes32 text: {e}")));
    }
    decode_return::<IERC20::nameCall>(data)
}
