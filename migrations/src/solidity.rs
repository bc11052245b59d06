//! Definitions of Solidity functions called during the migration

use alloy_sol_types::sol;

sol! {
    // Authorizable
    function addAuthorizedAddress(address target) external;

    // Ownable
    function transferOwnership(address newOwner) external;

    // MixinAssetProxyDispatcher
    function registerAssetProxy(address assetProxy) external;

    // The ERC20 proxy id is the selector of this signature
    function ERC20Token(address tokenContract) external;
}
