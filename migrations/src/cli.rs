//! Definitions of CLI arguments and commands for the migration scripts

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{
    chain::RpcClient,
    commands::{migrate_v2, print_addresses},
    constants::{DEFAULT_ARTIFACTS_DIR, DEFAULT_RPC_URL},
    errors::ScriptError,
};

/// Deploy and configure the v2 exchange contracts
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Private key to sign transactions with.
    ///
    /// If omitted, transactions are signed by the node for its own accounts
    #[arg(short, long, env = "PKEY")]
    pub priv_key: Option<String>,

    /// Network RPC URL
    #[arg(short, long, env = "RPC_URL", default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,

    /// Directory containing the compiler artifacts, which also receive the
    /// deployed addresses
    #[arg(short, long, default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts_dir: PathBuf,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// The commands supported by the migration scripts
#[derive(Subcommand)]
pub enum Command {
    /// Deploy the v2 contracts and hand their ownership to the multisig
    MigrateV2(MigrateV2Args),
    /// Print the addresses recorded in the artifacts for a network
    Addresses(AddressesArgs),
}

impl Command {
    /// Run the command against the given client and artifacts directory
    pub async fn run(self, client: &RpcClient, artifacts_dir: PathBuf) -> Result<(), ScriptError> {
        match self {
            Command::MigrateV2(args) => migrate_v2(args, client, artifacts_dir).await,
            Command::Addresses(args) => print_addresses(args, client, artifacts_dir).await,
        }
    }
}

/// Run the v2 migration
#[derive(Args)]
pub struct MigrateV2Args {
    /// JSON file overriding the migration parameters (token addresses,
    /// multisig owners, confirmations, time lock)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to send transactions from, in hex.
    /// Defaults to the first available account
    #[arg(short, long)]
    pub from: Option<String>,

    /// Gas limit for every transaction
    #[arg(long)]
    pub gas: Option<u64>,

    /// Gas price for every transaction, in wei
    #[arg(long)]
    pub gas_price: Option<u128>,
}

/// Print recorded deployment addresses
#[derive(Args)]
pub struct AddressesArgs {
    /// The network id to print addresses for.
    /// Defaults to the id of the connected network
    #[arg(short, long)]
    pub network_id: Option<u64>,
}
