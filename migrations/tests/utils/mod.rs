//! A mock chain for driving the migration without a node

use std::{fs, path::Path, sync::Mutex};

use alloy::{
    dyn_abi::DynSolValue,
    primitives::{Address, Bytes, TxHash, B256},
};
use migrations::{
    artifacts::{ArtifactPersistence, ArtifactSource},
    chain::{Deployer, NetworkInfo, TransactionSubmitter},
    errors::ScriptError,
    types::{
        ConfigurationAction, ContractArtifact, DeployedResource, ResourceDescriptor, TxDefaults,
        V2Contract,
    },
};
use serde_json::{json, Value};

/// The network id reported by the mock
pub const MOCK_NETWORK_ID: u64 = 50;

/// Everything the migration asked the mock to do, in order
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A contract was deployed at the given address
    Deploy {
        contract: V2Contract,
        args: Vec<DynSolValue>,
        defaults: TxDefaults,
        address: Address,
    },
    /// A configuration transaction was submitted
    Submit(ConfigurationAction),
    /// The configuration transaction with the given index was confirmed
    Confirm(usize),
    /// A deployed address was persisted
    Persist {
        network_id: u64,
        contract: V2Contract,
        address: Address,
    },
}

/// A chain that assigns the addresses `0xA1..`, `0xA2..`, ... to deployments
/// in order, and records every call made to it
pub struct MockChain {
    /// The accounts the mock reports as available
    accounts: Vec<Address>,
    /// A contract whose deployment fails
    failing_deploy: Option<V2Contract>,
    /// The index of a configuration transaction that reverts
    reverting_action: Option<usize>,
    /// The recorded events
    events: Mutex<Vec<Event>>,
    /// The number of deployments so far
    num_deployed: Mutex<u8>,
    /// The number of configuration transactions submitted so far
    num_submitted: Mutex<usize>,
}

impl Default for MockChain {
    fn default() -> Self {
        Self {
            accounts: vec![deployer(), Address::repeat_byte(0xd2)],
            failing_deploy: None,
            reverting_action: None,
            events: Mutex::new(Vec::new()),
            num_deployed: Mutex::new(0),
            num_submitted: Mutex::new(0),
        }
    }
}

impl MockChain {
    /// Report the given accounts as available
    pub fn with_accounts(mut self, accounts: Vec<Address>) -> Self {
        self.accounts = accounts;
        self
    }

    /// Fail the deployment of the given contract
    pub fn with_failing_deploy(mut self, contract: V2Contract) -> Self {
        self.failing_deploy = Some(contract);
        self
    }

    /// Revert the configuration transaction with the given index
    pub fn with_reverting_action(mut self, index: usize) -> Self {
        self.reverting_action = Some(index);
        self
    }

    /// The events recorded so far
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    /// The address deployed for the given contract, if any
    pub fn deployed_address(&self, contract: V2Contract) -> Option<Address> {
        self.events().into_iter().find_map(|event| match event {
            Event::Deploy { contract: c, address, .. } if c == contract => Some(address),
            _ => None,
        })
    }

    /// The constructor arguments of the given contract, if deployed
    pub fn constructor_args(&self, contract: V2Contract) -> Option<Vec<DynSolValue>> {
        self.events().into_iter().find_map(|event| match event {
            Event::Deploy { contract: c, args, .. } if c == contract => Some(args),
            _ => None,
        })
    }

    /// The position of the given contract's deployment in the event log
    pub fn deploy_index(&self, contract: V2Contract) -> Option<usize> {
        self.events()
            .iter()
            .position(|event| matches!(event, Event::Deploy { contract: c, .. } if *c == contract))
    }

    /// The contracts persisted, in order
    pub fn persisted(&self) -> Vec<(V2Contract, Address)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Persist { contract, address, .. } => Some((contract, address)),
                _ => None,
            })
            .collect()
    }

    /// The configuration actions submitted, in order
    pub fn submitted(&self) -> Vec<ConfigurationAction> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Submit(action) => Some(action),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

/// The constructor ABI entry of the given contract, none for the proxies
pub fn constructor_abi(contract: V2Contract) -> Value {
    let inputs: &[(&str, &str)] = match contract {
        V2Contract::Erc20Proxy | V2Contract::Erc721Proxy | V2Contract::MultiAssetProxy => {
            return json!([]);
        }
        V2Contract::Exchange => &[("_zrxAssetData", "bytes")],
        V2Contract::AssetProxyOwner => &[
            ("_owners", "address[]"),
            ("_assetProxyContracts", "address[]"),
            ("_required", "uint256"),
            ("_secondsTimeLocked", "uint256"),
        ],
        V2Contract::Forwarder => &[
            ("_exchange", "address"),
            ("_zrxAssetData", "bytes"),
            ("_wethAssetData", "bytes"),
        ],
        V2Contract::OrderValidator => &[("_exchange", "address"), ("_zrxAssetData", "bytes")],
    };

    let inputs: Vec<Value> =
        inputs.iter().map(|(name, ty)| json!({ "name": name, "type": ty })).collect();
    json!([{ "type": "constructor", "inputs": inputs, "stateMutability": "nonpayable" }])
}

/// Write an artifact file for every contract into the directory, except the
/// given one
pub fn write_artifacts(dir: &Path, skip: Option<V2Contract>) {
    for contract in V2Contract::ALL.into_iter().filter(|c| Some(*c) != skip) {
        let artifact = json!({
            "contractName": contract.artifact_name(),
            "compilerOutput": {
                "abi": constructor_abi(contract),
                "evm": { "bytecode": { "object": "0x60806040" } }
            },
            "networks": {}
        });
        fs::write(
            dir.join(format!("{}.json", contract.artifact_name())),
            serde_json::to_string_pretty(&artifact).unwrap(),
        )
        .unwrap();
    }
}

/// The account the mock reports first
pub fn deployer() -> Address {
    Address::repeat_byte(0xd1)
}

/// The address the mock assigns to the `n`th deployment, counting from 1
pub fn nth_address(n: u8) -> Address {
    Address::repeat_byte(0xa0 + n)
}

impl NetworkInfo for MockChain {
    async fn network_id(&self) -> Result<u64, ScriptError> {
        Ok(MOCK_NETWORK_ID)
    }

    async fn available_accounts(&self) -> Result<Vec<Address>, ScriptError> {
        Ok(self.accounts.clone())
    }
}

impl Deployer for MockChain {
    async fn deploy(
        &self,
        descriptor: &ResourceDescriptor,
        defaults: &TxDefaults,
    ) -> Result<Address, ScriptError> {
        if self.failing_deploy == Some(descriptor.contract) {
            return Err(ScriptError::ContractDeployment(format!(
                "{}: execution reverted",
                descriptor.contract
            )));
        }

        let mut num_deployed = self.num_deployed.lock().unwrap();
        *num_deployed += 1;
        let address = nth_address(*num_deployed);

        self.record(Event::Deploy {
            contract: descriptor.contract,
            args: descriptor.constructor_args.clone(),
            defaults: *defaults,
            address,
        });
        Ok(address)
    }
}

impl TransactionSubmitter for MockChain {
    type Pending = usize;

    async fn submit(
        &self,
        action: &ConfigurationAction,
        _defaults: &TxDefaults,
    ) -> Result<usize, ScriptError> {
        let mut num_submitted = self.num_submitted.lock().unwrap();
        let index = *num_submitted;
        *num_submitted += 1;

        self.record(Event::Submit(action.clone()));
        Ok(index)
    }

    async fn await_confirmation(&self, pending: usize) -> Result<TxHash, ScriptError> {
        if self.reverting_action == Some(pending) {
            return Err(ScriptError::ContractInteraction(format!("tx {pending} reverted")));
        }

        self.record(Event::Confirm(pending));
        Ok(B256::with_last_byte(pending as u8))
    }
}

impl ArtifactSource for MockChain {
    fn load(&self, contract: V2Contract) -> Result<ContractArtifact, ScriptError> {
        Ok(ContractArtifact {
            abi: constructor_abi(contract),
            bytecode: Bytes::from_static(&[0x60, 0x80, 0x60, 0x40]),
        })
    }
}

impl ArtifactPersistence for MockChain {
    fn persist(&self, network_id: u64, resource: &DeployedResource) -> Result<(), ScriptError> {
        self.record(Event::Persist {
            network_id,
            contract: resource.contract,
            address: resource.address,
        });
        Ok(())
    }
}
