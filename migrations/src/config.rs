//! Configuration of the v2 migration
//!
//! Every field has a default taken from [`crate::constants`]; an optional JSON
//! file may override any subset of them.

use std::{fs, path::Path, str::FromStr};

use alloy_primitives::Address;
use serde::Deserialize;

use crate::{
    constants::{
        ETHER_TOKEN_ADDRESS, MULTISIG_CONFIRMATIONS_REQUIRED, MULTISIG_OWNERS,
        MULTISIG_SECONDS_TIME_LOCKED, ZRX_TOKEN_ADDRESS,
    },
    errors::ScriptError,
};

/// The parameters of the v2 migration
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct MigrationConfig {
    /// The ZRX token, whose asset data the exchange uses for fees
    pub zrx_token: Address,
    /// The wrapped ether token used by the forwarder
    pub ether_token: Address,
    /// The owners of the `AssetProxyOwner` multisig
    pub multisig_owners: Vec<Address>,
    /// The number of owner confirmations a multisig transaction requires
    pub confirmations_required: u64,
    /// The time lock on multisig transactions, in seconds
    pub seconds_time_locked: u64,
    /// Whether to record the addresses of the `MultiAssetProxy` and the
    /// `AssetProxyOwner` once the migration completes
    pub persist_deferred: bool,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            zrx_token: parse_constant_address(ZRX_TOKEN_ADDRESS),
            ether_token: parse_constant_address(ETHER_TOKEN_ADDRESS),
            multisig_owners: MULTISIG_OWNERS.iter().map(|a| parse_constant_address(a)).collect(),
            confirmations_required: MULTISIG_CONFIRMATIONS_REQUIRED,
            seconds_time_locked: MULTISIG_SECONDS_TIME_LOCKED,
            persist_deferred: false,
        }
    }
}

impl MigrationConfig {
    /// Load the config, overriding the defaults with the given JSON file if any
    pub fn load(path: Option<&Path>) -> Result<Self, ScriptError> {
        let config = match path {
            Some(path) => {
                let contents = fs::read_to_string(path)
                    .map_err(|e| ScriptError::Config(format!("{}: {}", path.display(), e)))?;
                Self::from_json(&contents)?
            }
            None => Self::default(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse a config from JSON, defaulting any missing field
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        serde_json::from_str(json).map_err(|e| ScriptError::Config(e.to_string()))
    }

    /// Check that the multisig parameters describe a usable wallet
    pub fn validate(&self) -> Result<(), ScriptError> {
        if self.multisig_owners.is_empty() {
            return Err(ScriptError::Config("no multisig owners".to_string()));
        }

        let num_owners = self.multisig_owners.len() as u64;
        if self.confirmations_required == 0 || self.confirmations_required > num_owners {
            return Err(ScriptError::Config(format!(
                "confirmations required must be between 1 and {num_owners}, got {}",
                self.confirmations_required
            )));
        }

        Ok(())
    }
}

/// Parse one of the address constants
fn parse_constant_address(address: &str) -> Address {
    // Can `unwrap` here since the constants are valid addresses
    Address::from_str(address).unwrap()
}
