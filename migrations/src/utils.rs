//! Utilities for the migration scripts.

use std::{fs, path::Path, str::FromStr};

use alloy::{
    providers::{DynProvider, ProviderBuilder},
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use serde_json::Value;

use crate::{chain::RpcClient, errors::ScriptError};

/// Sets up the client through which the migration talks to the node.
///
/// When a private key is given, transactions are signed locally with it;
/// otherwise the node is expected to sign for its own unlocked accounts.
pub fn setup_client(priv_key: Option<&str>, rpc_url: &str) -> Result<RpcClient, ScriptError> {
    let url = Url::parse(rpc_url).map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

    let client = match priv_key {
        Some(priv_key) => {
            let signer = PrivateKeySigner::from_str(priv_key)
                .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
            let signer_address = signer.address();
            let provider = ProviderBuilder::new().wallet(signer).connect_http(url);
            RpcClient::new(DynProvider::new(provider), Some(signer_address))
        }
        None => {
            let provider = ProviderBuilder::new().connect_http(url);
            RpcClient::new(DynProvider::new(provider), None /* signer_address */)
        }
    };

    Ok(client)
}

/// Read and parse a JSON file
pub fn get_json_from_file(file_path: &Path) -> Result<Value, ScriptError> {
    let file_contents = fs::read_to_string(file_path)
        .map_err(|e| ScriptError::ReadArtifact(format!("{}: {}", file_path.display(), e)))?;

    serde_json::from_str(&file_contents)
        .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {}", file_path.display(), e)))
}

/// Pretty-print a JSON value to a file, replacing its contents
pub fn write_json_to_file(file_path: &Path, value: &Value) -> Result<(), ScriptError> {
    let contents = serde_json::to_string_pretty(value)
        .map_err(|e| ScriptError::WriteArtifact(e.to_string()))?;

    fs::write(file_path, contents)
        .map_err(|e| ScriptError::WriteArtifact(format!("{}: {}", file_path.display(), e)))
}
