//! The v2 migration: deploys the exchange contracts, wires up their
//! authorizations, and hands their ownership to the multisig.
//!
//! Every step is awaited before the next one starts. Contract addresses are
//! derived from the deployer's nonce, so running the steps concurrently would
//! make the resulting addresses differ between runs.
//!
//! Every artifact is loaded before the first transaction is sent. A failing
//! step aborts the migration. Nothing is rolled back: contracts deployed and
//! artifacts written up to that point remain.

use std::collections::HashMap;

use alloy::{
    dyn_abi::DynSolValue,
    primitives::{Address, U256},
};
use itertools::Itertools;
use tracing::{debug, info, warn};

use crate::{
    artifacts::{ArtifactPersistence, ArtifactSource},
    asset_data::encode_erc20_asset_data,
    chain::{Deployer, NetworkInfo, TransactionSubmitter},
    config::MigrationConfig,
    errors::ScriptError,
    types::{
        ConfigurationAction, ConfigurationMethod, ContractArtifact, DeployedResource,
        Persistence, ResourceDescriptor, TxDefaults, V2Contract,
    },
};

/// The state of a single migration run
pub struct RunContext {
    /// The id of the network being migrated
    network_id: u64,
    /// The sender of every transaction in the run
    sender: Address,
    /// The transaction defaults, with the sender resolved
    tx_defaults: TxDefaults,
    /// The contracts deployed so far, in deployment order
    deployed: Vec<DeployedResource>,
}

impl RunContext {
    /// Resolve the network id and the sender of the run's transactions.
    ///
    /// The sender is `tx_defaults.from` when set, and otherwise the first
    /// account the node makes available.
    pub async fn new(
        network: &impl NetworkInfo,
        tx_defaults: TxDefaults,
    ) -> Result<Self, ScriptError> {
        let network_id = network.network_id().await?;

        let sender = match tx_defaults.from {
            Some(from) => from,
            None => {
                let accounts = network.available_accounts().await?;
                let first = *accounts.first().ok_or_else(|| {
                    ScriptError::NetworkQuery("no accounts available to sign with".to_string())
                })?;
                warn!(
                    "Sending from the first available account {first:#x} - \
                     set an explicit sender for production deployments"
                );
                first
            }
        };

        Ok(Self {
            network_id,
            sender,
            tx_defaults: TxDefaults {
                from: Some(sender),
                ..tx_defaults
            },
            deployed: Vec::new(),
        })
    }

    /// The id of the network being migrated
    pub fn network_id(&self) -> u64 {
        self.network_id
    }

    /// The sender of every transaction in the run
    pub fn sender(&self) -> Address {
        self.sender
    }

    /// The address of an already-deployed contract
    pub fn address_of(&self, contract: V2Contract) -> Result<Address, ScriptError> {
        self.deployed
            .iter()
            .find(|resource| resource.contract == contract)
            .map(|resource| resource.address)
            .ok_or_else(|| ScriptError::MissingDependency(contract.to_string()))
    }

    /// Deploy a contract, persisting its address if the policy says so
    pub async fn deploy<C, A>(
        &mut self,
        client: &C,
        artifacts: &A,
        descriptor: ResourceDescriptor,
        persistence: Persistence,
    ) -> Result<Address, ScriptError>
    where
        C: Deployer,
        A: ArtifactPersistence,
    {
        let contract = descriptor.contract;
        let address = client.deploy(&descriptor, &self.tx_defaults).await?;
        info!("{contract} deployed at {address:#x}");

        let resource = DeployedResource {
            contract,
            address,
            constructor_args: descriptor.constructor_args,
            persistence,
        };
        if persistence == Persistence::Immediate {
            artifacts.persist(self.network_id, &resource)?;
        }

        self.deployed.push(resource);
        Ok(address)
    }

    /// Build a configuration action sent by the run's sender, resolving the
    /// target and the argument among the deployed contracts
    pub fn action(
        &self,
        target: V2Contract,
        method: ConfigurationMethod,
        argument: V2Contract,
    ) -> Result<ConfigurationAction, ScriptError> {
        Ok(ConfigurationAction {
            target,
            target_address: self.address_of(target)?,
            method,
            argument: self.address_of(argument)?,
            sender: self.sender(),
        })
    }

    /// Submit a configuration action and wait for it to be confirmed
    pub async fn configure<C: TransactionSubmitter>(
        &self,
        client: &C,
        action: &ConfigurationAction,
    ) -> Result<(), ScriptError> {
        info!("Calling {action}");
        let pending = client.submit(action, &self.tx_defaults).await?;
        let tx_hash = client.await_confirmation(pending).await?;
        info!("{action} confirmed in tx {tx_hash:#x}");

        Ok(())
    }

    /// Persist every contract whose persistence was deferred
    pub fn persist_deferred<A: ArtifactPersistence>(
        &self,
        artifacts: &A,
    ) -> Result<(), ScriptError> {
        for resource in self.deployed.iter().filter(|r| r.persistence == Persistence::Deferred) {
            artifacts.persist(self.network_id, resource)?;
            info!("Recorded deferred {} at {:#x}", resource.contract, resource.address);
        }

        Ok(())
    }

    /// The contracts deployed during the run, in deployment order
    pub fn into_deployed(self) -> Vec<DeployedResource> {
        self.deployed
    }
}

/// The artifacts of every contract of the migration, read and checked before
/// anything is sent
struct LoadedArtifacts(HashMap<V2Contract, ContractArtifact>);

impl LoadedArtifacts {
    /// Load every artifact, checking each declares the constructor the
    /// migration calls
    fn load<A: ArtifactSource>(source: &A) -> Result<Self, ScriptError> {
        let mut loaded = HashMap::new();
        for contract in V2Contract::ALL {
            let artifact = source.load(contract)?;
            let inputs = artifact.constructor_inputs();
            if inputs != contract.constructor_arity() {
                return Err(ScriptError::ArtifactParsing(format!(
                    "{contract} constructor takes {inputs} arguments, expected {}",
                    contract.constructor_arity()
                )));
            }

            loaded.insert(contract, artifact);
        }

        debug!("Loaded {} artifacts", loaded.len());
        Ok(Self(loaded))
    }

    /// Describe the deployment of a contract, taking its artifact
    fn descriptor(
        &mut self,
        contract: V2Contract,
        constructor_args: Vec<DynSolValue>,
    ) -> Result<ResourceDescriptor, ScriptError> {
        let artifact = self
            .0
            .remove(&contract)
            .ok_or_else(|| ScriptError::MissingDependency(format!("{contract} artifact")))?;

        ResourceDescriptor::new(contract, artifact, constructor_args)
    }
}

/// The authorization and ownership wiring of the deployed contracts, in the
/// order it is applied
pub fn governance_actions(ctx: &RunContext) -> Result<Vec<ConfigurationAction>, ScriptError> {
    use ConfigurationMethod::*;
    use V2Contract::*;

    [
        // Allow the exchange and the multi-asset proxy to call the ERC20 proxy
        (Erc20Proxy, AddAuthorizedAddress, Exchange),
        (Erc20Proxy, AddAuthorizedAddress, MultiAssetProxy),
        (Erc20Proxy, TransferOwnership, AssetProxyOwner),
        // Same for the ERC721 proxy
        (Erc721Proxy, AddAuthorizedAddress, Exchange),
        (Erc721Proxy, AddAuthorizedAddress, MultiAssetProxy),
        (Erc721Proxy, TransferOwnership, AssetProxyOwner),
        // Register the single-asset proxies with the multi-asset proxy
        (MultiAssetProxy, RegisterAssetProxy, Erc20Proxy),
        (MultiAssetProxy, RegisterAssetProxy, Erc721Proxy),
        (MultiAssetProxy, TransferOwnership, AssetProxyOwner),
        // Register every proxy with the exchange
        (Exchange, RegisterAssetProxy, Erc20Proxy),
        (Exchange, RegisterAssetProxy, Erc721Proxy),
        (Exchange, RegisterAssetProxy, MultiAssetProxy),
        (Exchange, TransferOwnership, AssetProxyOwner),
    ]
    .into_iter()
    .map(|(target, method, argument)| ctx.action(target, method, argument))
    .collect()
}

/// Run the v2 migration, returning every contract it deployed in deployment
/// order.
///
/// The `ERC20Proxy`, `ERC721Proxy`, `Exchange`, `Forwarder` and
/// `OrderValidator` addresses are persisted as soon as each is deployed. The
/// `MultiAssetProxy` and `AssetProxyOwner` are only persisted, after the whole
/// migration succeeded, when `config.persist_deferred` is set.
pub async fn run_v2_migration<C, A>(
    client: &C,
    artifacts: &A,
    config: &MigrationConfig,
    tx_defaults: TxDefaults,
) -> Result<Vec<DeployedResource>, ScriptError>
where
    C: NetworkInfo + Deployer + TransactionSubmitter,
    A: ArtifactSource + ArtifactPersistence,
{
    config.validate()?;
    let mut loaded = LoadedArtifacts::load(artifacts)?;

    let mut ctx = RunContext::new(client, tx_defaults).await?;
    info!(
        "Running v2 migration on network {} from {:#x}",
        ctx.network_id(),
        ctx.sender()
    );

    // Proxies
    let erc20_proxy = ctx
        .deploy(
            client,
            artifacts,
            loaded.descriptor(V2Contract::Erc20Proxy, vec![])?,
            Persistence::Immediate,
        )
        .await?;
    let erc721_proxy = ctx
        .deploy(
            client,
            artifacts,
            loaded.descriptor(V2Contract::Erc721Proxy, vec![])?,
            Persistence::Immediate,
        )
        .await?;
    let multi_asset_proxy = ctx
        .deploy(
            client,
            artifacts,
            loaded.descriptor(V2Contract::MultiAssetProxy, vec![])?,
            Persistence::Deferred,
        )
        .await?;

    // Exchange
    let zrx_asset_data = encode_erc20_asset_data(config.zrx_token);
    let exchange = ctx
        .deploy(
            client,
            artifacts,
            loaded.descriptor(
                V2Contract::Exchange,
                vec![DynSolValue::Bytes(zrx_asset_data.to_vec())],
            )?,
            Persistence::Immediate,
        )
        .await?;

    // AssetProxyOwner
    info!(
        "Deploying multisig owned by [{}], {} confirmations, {}s time lock",
        config.multisig_owners.iter().map(|owner| format!("{owner:#x}")).join(", "),
        config.confirmations_required,
        config.seconds_time_locked,
    );
    let governance = loaded.descriptor(
        V2Contract::AssetProxyOwner,
        vec![
            address_array(&config.multisig_owners),
            address_array(&[erc20_proxy, erc721_proxy, multi_asset_proxy]),
            uint(config.confirmations_required),
            uint(config.seconds_time_locked),
        ],
    )?;
    ctx.deploy(client, artifacts, governance, Persistence::Deferred).await?;

    // Authorizations and ownership
    for action in governance_actions(&ctx)? {
        ctx.configure(client, &action).await?;
    }

    // Forwarder
    let weth_asset_data = encode_erc20_asset_data(config.ether_token);
    let forwarder = loaded.descriptor(
        V2Contract::Forwarder,
        vec![
            DynSolValue::Address(exchange),
            DynSolValue::Bytes(zrx_asset_data.to_vec()),
            DynSolValue::Bytes(weth_asset_data.to_vec()),
        ],
    )?;
    ctx.deploy(client, artifacts, forwarder, Persistence::Immediate).await?;

    // OrderValidator
    let order_validator = loaded.descriptor(
        V2Contract::OrderValidator,
        vec![
            DynSolValue::Address(exchange),
            DynSolValue::Bytes(zrx_asset_data.to_vec()),
        ],
    )?;
    ctx.deploy(client, artifacts, order_validator, Persistence::Immediate).await?;

    if config.persist_deferred {
        ctx.persist_deferred(artifacts)?;
    }

    Ok(ctx.into_deployed())
}

/// An `address[]` constructor argument
fn address_array(addresses: &[Address]) -> DynSolValue {
    DynSolValue::Array(addresses.iter().copied().map(DynSolValue::Address).collect())
}

/// A `uint256` constructor argument
fn uint(value: u64) -> DynSolValue {
    DynSolValue::Uint(U256::from(value), 256)
}
