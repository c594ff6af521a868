use clap::Parser;
use dotenv::dotenv;
use savvy_scripts::{cli::Cli, config::Config, errors::ScriptError, session::Session};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ScriptError> {
    // Load .env file
    dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .pretty()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load(&cli.config)?;

    // Resolve the account and build our RPC client with signer
    let mut session = Session::connect(config, cli.session_options()).await?;

    cli.command.run(&mut session).await
}
