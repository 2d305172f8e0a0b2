use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use tradeport::adapter::inbound::cli::command::Cli;
use tradeport::adapter::inbound::cli::output::{self, OutputConfig};
use tradeport::adapter::inbound::cli::run;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    output::configure(OutputConfig { json: cli.json });

    match execute(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::error(&format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: &Cli) -> anyhow::Result<()> {
    let config = run::load_config(cli).context("failed to load configuration")?;
    config.init_logging();
    info!(exchange = config.exchange.settings.name(), "tradeport starting");

    run::execute(cli, &config)
        .await
        .context("command failed")?;
    Ok(())
}
