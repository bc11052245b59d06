//! Encoding of asset data, the byte strings the exchange uses to identify an
//! asset and the proxy that transfers it

use alloy::primitives::{Address, Bytes};
use alloy_sol_types::SolCall;

use crate::solidity::ERC20TokenCall;

/// The id of the ERC20 asset proxy, `bytes4(keccak256("ERC20Token(address)"))`
pub const ERC20_PROXY_ID: [u8; 4] = ERC20TokenCall::SELECTOR;

/// Encode the asset data of an ERC20 token
///
/// The encoding is the ERC20 proxy id followed by the ABI-encoded token address
pub fn encode_erc20_asset_data(token: Address) -> Bytes {
    ERC20TokenCall {
        tokenContract: token,
    }
    .abi_encode()
    .into()
}
