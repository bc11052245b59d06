//! The on-chain collaborators of the migration, and their implementation
//! over a JSON-RPC node

use alloy::{
    network::{Ethereum, TransactionBuilder},
    primitives::{Address, TxHash},
    providers::{DynProvider, PendingTransactionBuilder, Provider},
    rpc::types::{TransactionReceipt, TransactionRequest},
};
use tracing::debug;

use crate::{
    errors::ScriptError,
    types::{ConfigurationAction, ResourceDescriptor, TxDefaults, V2Contract},
};

/// Identity of the network being migrated
#[allow(async_fn_in_trait)]
pub trait NetworkInfo {
    /// The id of the network, under which deployments are recorded
    async fn network_id(&self) -> Result<u64, ScriptError>;
    /// The accounts able to sign transactions, in the node's order
    async fn available_accounts(&self) -> Result<Vec<Address>, ScriptError>;
}

/// Deploys contracts
#[allow(async_fn_in_trait)]
pub trait Deployer {
    /// Deploy the given contract and wait for the deployment to be mined,
    /// returning the address of the new contract
    async fn deploy(
        &self,
        descriptor: &ResourceDescriptor,
        defaults: &TxDefaults,
    ) -> Result<Address, ScriptError>;
}

/// Submits configuration transactions
#[allow(async_fn_in_trait)]
pub trait TransactionSubmitter {
    /// A handle on a submitted transaction
    type Pending;

    /// Sign and send the transaction for the given action
    async fn submit(
        &self,
        action: &ConfigurationAction,
        defaults: &TxDefaults,
    ) -> Result<Self::Pending, ScriptError>;

    /// Wait for a submitted transaction to be mined, failing if it reverted
    async fn await_confirmation(&self, pending: Self::Pending) -> Result<TxHash, ScriptError>;
}

/// Merge the transaction defaults into a request
fn apply_defaults(mut tx: TransactionRequest, defaults: &TxDefaults) -> TransactionRequest {
    if let Some(from) = defaults.from {
        tx.set_from(from);
    }
    if let Some(gas) = defaults.gas {
        tx.set_gas_limit(gas);
    }
    if let Some(gas_price) = defaults.gas_price {
        tx.set_gas_price(gas_price);
    }

    tx
}

/// A client for a JSON-RPC node, optionally signing with a local key
pub struct RpcClient {
    /// The provider used to talk to the node
    provider: DynProvider<Ethereum>,
    /// The address of the local signer, if one is attached
    signer_address: Option<Address>,
}

impl RpcClient {
    /// Wrap a provider; `signer_address` is the address of the wallet
    /// attached to it, if any
    pub fn new(provider: DynProvider<Ethereum>, signer_address: Option<Address>) -> Self {
        Self { provider, signer_address }
    }

    /// Send a transaction and wait for its receipt
    async fn send_and_wait(&self, tx: TransactionRequest) -> Result<TransactionReceipt, String> {
        self.provider
            .send_transaction(tx)
            .await
            .map_err(|e| e.to_string())?
            .get_receipt()
            .await
            .map_err(|e| e.to_string())
    }
}

impl NetworkInfo for RpcClient {
    async fn network_id(&self) -> Result<u64, ScriptError> {
        self.provider
            .get_net_version()
            .await
            .map_err(|e| ScriptError::NetworkQuery(e.to_string()))
    }

    async fn available_accounts(&self) -> Result<Vec<Address>, ScriptError> {
        if let Some(address) = self.signer_address {
            return Ok(vec![address]);
        }

        self.provider
            .get_accounts()
            .await
            .map_err(|e| ScriptError::NetworkQuery(e.to_string()))
    }
}

impl Deployer for RpcClient {
    async fn deploy(
        &self,
        descriptor: &ResourceDescriptor,
        defaults: &TxDefaults,
    ) -> Result<Address, ScriptError> {
        let contract = descriptor.contract;
        let tx = apply_defaults(
            TransactionRequest::default().with_deploy_code(descriptor.init_code()),
            defaults,
        );

        let receipt = self
            .send_and_wait(tx)
            .await
            .map_err(|e| ScriptError::ContractDeployment(format!("{contract}: {e}")))?;
        debug!(
            "{contract} deployment mined in tx {:#x}",
            receipt.transaction_hash
        );

        deployed_address(contract, &receipt)
    }
}

/// The address of the contract created by a deployment, failing if the
/// deployment reverted
fn deployed_address(
    contract: V2Contract,
    receipt: &TransactionReceipt,
) -> Result<Address, ScriptError> {
    let tx_hash = receipt.transaction_hash;
    if !receipt.status() {
        return Err(ScriptError::ContractDeployment(format!(
            "{contract}: deployment reverted in tx {tx_hash:#x}"
        )));
    }

    receipt.contract_address.ok_or_else(|| {
        ScriptError::ContractDeployment(format!(
            "{contract}: no contract address in receipt of tx {tx_hash:#x}"
        ))
    })
}

/// Fail if a configuration transaction reverted
fn check_confirmed(receipt: &TransactionReceipt) -> Result<TxHash, ScriptError> {
    let tx_hash = receipt.transaction_hash;
    if !receipt.status() {
        return Err(ScriptError::ContractInteraction(format!("tx {tx_hash:#x} reverted")));
    }

    Ok(tx_hash)
}

impl TransactionSubmitter for RpcClient {
    type Pending = PendingTransactionBuilder<Ethereum>;

    async fn submit(
        &self,
        action: &ConfigurationAction,
        defaults: &TxDefaults,
    ) -> Result<Self::Pending, ScriptError> {
        let tx = TransactionRequest::default()
            .with_to(action.target_address)
            .with_input(action.calldata());
        // The action's sender takes precedence over the defaults
        let tx = apply_defaults(tx, defaults).with_from(action.sender);

        self.provider
            .send_transaction(tx)
            .await
            .map_err(|e| ScriptError::ContractInteraction(format!("{action}: {e}")))
    }

    async fn await_confirmation(&self, pending: Self::Pending) -> Result<TxHash, ScriptError> {
        let tx_hash = *pending.tx_hash();
        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| ScriptError::ContractInteraction(format!("tx {tx_hash:#x}: {e}")))?;

        check_confirmed(&receipt)
    }
}
