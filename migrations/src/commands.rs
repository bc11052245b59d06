//! Implementations of the migration commands

use std::{path::PathBuf, str::FromStr};

use alloy::primitives::Address;
use tracing::info;

use crate::{
    artifacts::ArtifactDir,
    chain::{NetworkInfo, RpcClient},
    cli::{AddressesArgs, MigrateV2Args},
    config::MigrationConfig,
    errors::ScriptError,
    migration::run_v2_migration,
    types::TxDefaults,
};

/// Run the v2 migration and print the deployed addresses
pub async fn migrate_v2(
    args: MigrateV2Args,
    client: &RpcClient,
    artifacts_dir: PathBuf,
) -> Result<(), ScriptError> {
    let config = MigrationConfig::load(args.config.as_deref())?;

    let from = args
        .from
        .as_deref()
        .map(Address::from_str)
        .transpose()
        .map_err(|e| ScriptError::Config(format!("invalid sender address: {e}")))?;
    let tx_defaults = TxDefaults {
        from,
        gas: args.gas,
        gas_price: args.gas_price,
    };

    let artifacts = ArtifactDir::new(artifacts_dir);
    let deployed = run_v2_migration(client, &artifacts, &config, tx_defaults).await?;

    info!("Migration complete");
    for resource in deployed {
        println!("{}: {:#x}", resource.contract, resource.address);
    }

    Ok(())
}

/// Print the addresses recorded in the artifacts for a network
pub async fn print_addresses(
    args: AddressesArgs,
    client: &RpcClient,
    artifacts_dir: PathBuf,
) -> Result<(), ScriptError> {
    let network_id = match args.network_id {
        Some(network_id) => network_id,
        None => client.network_id().await?,
    };

    let recorded = ArtifactDir::new(artifacts_dir).recorded_addresses(network_id)?;
    if recorded.is_empty() {
        info!("No addresses recorded for network {network_id}");
    }

    for (contract, address) in recorded {
        println!("{contract}: {address:#x}");
    }

    Ok(())
}
