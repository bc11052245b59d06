//! Constants used in the migration scripts

/// The default RPC url, a local development node
pub const DEFAULT_RPC_URL: &str = "http://localhost:8545";

/// The default directory holding the compiler artifacts
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

/// The ZRX token address on mainnet, used as the exchange's fee asset
pub const ZRX_TOKEN_ADDRESS: &str = "0xe41d2489571d322189246dafa5ebde1f4699f498";

/// The WETH9 address on mainnet, used as the forwarder's ether token
pub const ETHER_TOKEN_ADDRESS: &str = "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2";

/// The owners of the `AssetProxyOwner` multisig
pub const MULTISIG_OWNERS: [&str; 3] = [
    "0x257619b7155d247e43c8b6d90c8c17278ae481f0",
    "0x5ee2a00f8f01d099451844af7f894f26a57fcbf2",
    "0x894d623e0e0e8ed12c4a73dada999e275684a37d",
];

/// The number of owner confirmations the multisig requires to execute a transaction
pub const MULTISIG_CONFIRMATIONS_REQUIRED: u64 = 2;

/// The time lock on multisig transactions, in seconds (14 days)
pub const MULTISIG_SECONDS_TIME_LOCKED: u64 = 1_209_600;

/// The key under which a compiler artifact records its per-network deployments
pub const NETWORKS_KEY: &str = "networks";

/// The key of the compiler output in a compiler artifact
pub const COMPILER_OUTPUT_KEY: &str = "compilerOutput";

/// The extension of a compiler artifact file
pub const ARTIFACT_EXTENSION: &str = "json";

/// The env filter applied to log output when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "info";
