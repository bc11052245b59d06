//! Definitions of errors that can occur during the execution of the migration scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur during the execution of the migration scripts
#[derive(Debug)]
pub enum ScriptError {
    /// Error initializing the RPC client
    ClientInitialization(String),
    /// Error querying the network identity or the available accounts
    NetworkQuery(String),
    /// Error parsing a compiler artifact
    ArtifactParsing(String),
    /// Error reading a compiler artifact from disk
    ReadArtifact(String),
    /// Error writing a compiler artifact to disk
    WriteArtifact(String),
    /// Error loading or validating the migration configuration
    Config(String),
    /// Error constructing calldata or constructor arguments
    CalldataConstruction(String),
    /// A step referenced a contract that has not been deployed yet
    MissingDependency(String),
    /// Error deploying a contract
    ContractDeployment(String),
    /// Error sending or confirming a contract call
    ContractInteraction(String),
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            ScriptError::NetworkQuery(s) => write!(f, "error querying network: {}", s),
            ScriptError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            ScriptError::ReadArtifact(s) => write!(f, "error reading artifact: {}", s),
            ScriptError::WriteArtifact(s) => write!(f, "error writing artifact: {}", s),
            ScriptError::Config(s) => write!(f, "invalid migration config: {}", s),
            ScriptError::CalldataConstruction(s) => write!(f, "error constructing calldata: {}", s),
            ScriptError::MissingDependency(s) => write!(f, "contract not yet deployed: {}", s),
            ScriptError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
            ScriptError::ContractInteraction(s) => {
                write!(f, "error interacting with contract: {}", s)
            }
        }
    }
}

impl Error for ScriptError {}
