//! Type definitions used throughout the migration

use std::fmt::{self, Display};

use alloy::{
    dyn_abi::DynSolValue,
    primitives::{hex, Address, Bytes},
};
use alloy_sol_types::SolCall;
use serde_json::Value;

use crate::{
    errors::ScriptError,
    solidity::{addAuthorizedAddressCall, registerAssetProxyCall, transferOwnershipCall},
};

/// The contracts deployed by the v2 migration
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum V2Contract {
    /// The ERC20 asset proxy
    Erc20Proxy,
    /// The ERC721 asset proxy
    Erc721Proxy,
    /// The asset proxy that dispatches to the single-asset proxies
    MultiAssetProxy,
    /// The exchange
    Exchange,
    /// The time-locked multisig owning the proxies and the exchange
    AssetProxyOwner,
    /// The forwarder, filling orders with ether
    Forwarder,
    /// The order validator
    OrderValidator,
}

impl V2Contract {
    /// Every contract of the migration, in deployment order
    pub const ALL: [V2Contract; 7] = [
        V2Contract::Erc20Proxy,
        V2Contract::Erc721Proxy,
        V2Contract::MultiAssetProxy,
        V2Contract::Exchange,
        V2Contract::AssetProxyOwner,
        V2Contract::Forwarder,
        V2Contract::OrderValidator,
    ];

    /// The name of the contract's compiler artifact
    pub fn artifact_name(&self) -> &'static str {
        match self {
            V2Contract::Erc20Proxy => "ERC20Proxy",
            V2Contract::Erc721Proxy => "ERC721Proxy",
            V2Contract::MultiAssetProxy => "MultiAssetProxy",
            V2Contract::Exchange => "Exchange",
            V2Contract::AssetProxyOwner => "AssetProxyOwner",
            V2Contract::Forwarder => "Forwarder",
            V2Contract::OrderValidator => "OrderValidator",
        }
    }

    /// The number of arguments the contract's constructor takes
    pub fn constructor_arity(&self) -> usize {
        match self {
            V2Contract::Erc20Proxy | V2Contract::Erc721Proxy | V2Contract::MultiAssetProxy => 0,
            V2Contract::Exchange => 1,
            V2Contract::AssetProxyOwner => 4,
            V2Contract::Forwarder => 3,
            V2Contract::OrderValidator => 2,
        }
    }
}

impl Display for V2Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.artifact_name())
    }
}

/// The ABI and bytecode of a compiled contract
#[derive(Clone, Debug)]
pub struct ContractArtifact {
    /// The contract's JSON ABI
    pub abi: Value,
    /// The contract's creation bytecode
    pub bytecode: Bytes,
}

impl ContractArtifact {
    /// The number of inputs of the constructor declared in the ABI, zero when
    /// the ABI declares none
    pub fn constructor_inputs(&self) -> usize {
        self.abi
            .as_array()
            .into_iter()
            .flatten()
            .find(|item| item["type"] == "constructor")
            .and_then(|constructor| constructor["inputs"].as_array())
            .map_or(0, Vec::len)
    }
}

/// When a deployed contract's address is written to its artifact
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Persistence {
    /// Written right after the deployment succeeds
    Immediate,
    /// Not written during the migration sequence
    Deferred,
}

/// A deployable contract: its artifact and its constructor arguments
#[derive(Clone, Debug)]
pub struct ResourceDescriptor {
    /// The contract to deploy
    pub contract: V2Contract,
    /// The contract's compiler artifact
    pub artifact: ContractArtifact,
    /// The constructor arguments, in declaration order
    pub constructor_args: Vec<DynSolValue>,
}

impl ResourceDescriptor {
    /// Describe a deployment, checking the arguments against the constructor
    /// declared in the artifact's ABI
    pub fn new(
        contract: V2Contract,
        artifact: ContractArtifact,
        constructor_args: Vec<DynSolValue>,
    ) -> Result<Self, ScriptError> {
        let expected = artifact.constructor_inputs();
        if constructor_args.len() != expected {
            return Err(ScriptError::CalldataConstruction(format!(
                "{contract} constructor takes {expected} arguments, got {}",
                constructor_args.len()
            )));
        }

        Ok(Self { contract, artifact, constructor_args })
    }

    /// The creation code of the contract, i.e. its bytecode followed by the
    /// ABI-encoded constructor arguments
    pub fn init_code(&self) -> Bytes {
        let mut code = self.artifact.bytecode.to_vec();
        if !self.constructor_args.is_empty() {
            code.extend(DynSolValue::Tuple(self.constructor_args.clone()).abi_encode_params());
        }

        code.into()
    }
}

/// A contract deployed during the migration
#[derive(Clone, Debug, PartialEq)]
pub struct DeployedResource {
    /// The deployed contract
    pub contract: V2Contract,
    /// The address the contract was deployed at
    pub address: Address,
    /// The arguments the contract was constructed with
    pub constructor_args: Vec<DynSolValue>,
    /// When the address is persisted
    pub persistence: Persistence,
}

impl DeployedResource {
    /// The constructor arguments rendered as JSON, as recorded in artifacts
    pub fn constructor_args_json(&self) -> Value {
        Value::Array(self.constructor_args.iter().map(sol_value_to_json).collect())
    }
}

/// Render an ABI value as JSON: addresses and bytes as 0x-prefixed hex,
/// integers as decimal strings
fn sol_value_to_json(value: &DynSolValue) -> Value {
    match value {
        DynSolValue::Address(address) => Value::String(format!("{address:#x}")),
        DynSolValue::Bytes(bytes) => Value::String(hex::encode_prefixed(bytes)),
        DynSolValue::Uint(n, _) => Value::String(n.to_string()),
        DynSolValue::Bool(b) => Value::Bool(*b),
        DynSolValue::String(s) => Value::String(s.clone()),
        DynSolValue::Array(values) | DynSolValue::FixedArray(values) | DynSolValue::Tuple(values) => {
            Value::Array(values.iter().map(sol_value_to_json).collect())
        }
        other => Value::String(format!("{other:?}")),
    }
}

/// A state-changing method called on a deployed contract during the migration
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConfigurationMethod {
    /// `addAuthorizedAddress(address)`
    AddAuthorizedAddress,
    /// `transferOwnership(address)`
    TransferOwnership,
    /// `registerAssetProxy(address)`
    RegisterAssetProxy,
}

impl Display for ConfigurationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationMethod::AddAuthorizedAddress => write!(f, "addAuthorizedAddress"),
            ConfigurationMethod::TransferOwnership => write!(f, "transferOwnership"),
            ConfigurationMethod::RegisterAssetProxy => write!(f, "registerAssetProxy"),
        }
    }
}

/// A single configuration transaction against an already-deployed contract
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigurationAction {
    /// The contract being called
    pub target: V2Contract,
    /// The address of the contract being called
    pub target_address: Address,
    /// The method being called
    pub method: ConfigurationMethod,
    /// The address argument of the method
    pub argument: Address,
    /// The sender of the transaction
    pub sender: Address,
}

impl ConfigurationAction {
    /// The calldata of the call
    pub fn calldata(&self) -> Bytes {
        let argument = self.argument;
        let calldata = match self.method {
            ConfigurationMethod::AddAuthorizedAddress => {
                addAuthorizedAddressCall { target: argument }.abi_encode()
            }
            ConfigurationMethod::TransferOwnership => {
                transferOwnershipCall { newOwner: argument }.abi_encode()
            }
            ConfigurationMethod::RegisterAssetProxy => {
                registerAssetProxyCall { assetProxy: argument }.abi_encode()
            }
        };

        calldata.into()
    }
}

impl Display for ConfigurationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}({:#x})", self.target, self.method, self.argument)
    }
}

/// Default values merged into every transaction the migration sends
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TxDefaults {
    /// The sender, overriding the first available account
    pub from: Option<Address>,
    /// The gas limit
    pub gas: Option<u64>,
    /// The gas price, in wei
    pub gas_price: Option<u128>,
}
