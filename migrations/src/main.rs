use clap::Parser;
use migrations::{
    cli::Cli, constants::DEFAULT_LOG_FILTER, errors::ScriptError, utils::setup_client,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ScriptError> {
    let Cli {
        priv_key,
        rpc_url,
        artifacts_dir,
        command,
    } = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().pretty().with_env_filter(filter).init();

    let client = setup_client(priv_key.as_deref(), &rpc_url)?;

    command.run(&client, artifacts_dir).await
}
