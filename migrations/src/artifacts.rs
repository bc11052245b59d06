//! Reading compiler artifacts and recording deployed addresses in them
//!
//! Artifacts are JSON files named after their contract. The ABI and bytecode
//! live under `compilerOutput`; deployments are recorded per network id under
//! `networks`, so a single artifact can track the same contract on several
//! chains.

use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use alloy::primitives::{Address, Bytes};
use serde_json::json;

use crate::{
    constants::{ARTIFACT_EXTENSION, COMPILER_OUTPUT_KEY, NETWORKS_KEY},
    errors::ScriptError,
    types::{ContractArtifact, DeployedResource, V2Contract},
    utils::{get_json_from_file, write_json_to_file},
};

/// A source of compiler artifacts
pub trait ArtifactSource {
    /// Load the artifact of the given contract
    fn load(&self, contract: V2Contract) -> Result<ContractArtifact, ScriptError>;
}

/// Durable storage for deployed addresses
pub trait ArtifactPersistence {
    /// Record the address of a deployed contract on the given network
    fn persist(&self, network_id: u64, resource: &DeployedResource) -> Result<(), ScriptError>;
}

/// A directory of compiler artifacts
pub struct ArtifactDir {
    /// The path of the directory
    dir: PathBuf,
}

impl ArtifactDir {
    /// Use the artifacts in the given directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The path of the given contract's artifact
    pub fn artifact_path(&self, contract: V2Contract) -> PathBuf {
        self.dir
            .join(contract.artifact_name())
            .with_extension(ARTIFACT_EXTENSION)
    }

    /// The addresses recorded for the given network, for every contract whose
    /// artifact has an entry for it
    pub fn recorded_addresses(
        &self,
        network_id: u64,
    ) -> Result<Vec<(V2Contract, Address)>, ScriptError> {
        let mut recorded = Vec::new();
        for contract in V2Contract::ALL {
            let path = self.artifact_path(contract);
            if !path.exists() {
                continue;
            }

            let artifact = get_json_from_file(&path)?;
            let Some(entry) = artifact[NETWORKS_KEY].get(network_id.to_string()) else {
                continue;
            };

            let address = entry["address"]
                .as_str()
                .ok_or_else(|| malformed(&path, "network entry has no address"))
                .and_then(|s| {
                    Address::from_str(s).map_err(|e| malformed(&path, &e.to_string()))
                })?;
            recorded.push((contract, address));
        }

        Ok(recorded)
    }
}

impl ArtifactSource for ArtifactDir {
    fn load(&self, contract: V2Contract) -> Result<ContractArtifact, ScriptError> {
        let path = self.artifact_path(contract);
        let artifact = get_json_from_file(&path)?;
        let compiler_output = &artifact[COMPILER_OUTPUT_KEY];

        let abi = compiler_output["abi"].clone();
        if !abi.is_array() {
            return Err(malformed(&path, "missing ABI"));
        }

        let bytecode = compiler_output["evm"]["bytecode"]["object"]
            .as_str()
            .ok_or_else(|| malformed(&path, "missing bytecode"))?;
        let bytecode = Bytes::from_str(bytecode).map_err(|e| malformed(&path, &e.to_string()))?;
        // Interfaces and abstract contracts compile to empty bytecode
        if bytecode.is_empty() {
            return Err(malformed(&path, "empty bytecode"));
        }

        Ok(ContractArtifact { abi, bytecode })
    }
}

impl ArtifactPersistence for ArtifactDir {
    fn persist(&self, network_id: u64, resource: &DeployedResource) -> Result<(), ScriptError> {
        let path = self.artifact_path(resource.contract);
        let mut artifact = get_json_from_file(&path)?;

        let constructor_args = serde_json::to_string(&resource.constructor_args_json())
            .map_err(|e| ScriptError::WriteArtifact(e.to_string()))?;
        let entry = json!({
            "address": format!("{:#x}", resource.address),
            "links": {},
            "constructorArgs": constructor_args,
        });

        let networks = artifact
            .as_object_mut()
            .ok_or_else(|| malformed(&path, "artifact is not a JSON object"))?
            .entry(NETWORKS_KEY)
            .or_insert_with(|| json!({}));
        let networks = networks
            .as_object_mut()
            .ok_or_else(|| malformed(&path, "`networks` is not a JSON object"))?;
        networks.insert(network_id.to_string(), entry);

        write_json_to_file(&path, &artifact)
    }
}

/// An error for an artifact that does not have the expected shape
fn malformed(path: &Path, reason: &str) -> ScriptError {
    ScriptError::ArtifactParsing(format!("{}: {}", path.display(), reason))
}
