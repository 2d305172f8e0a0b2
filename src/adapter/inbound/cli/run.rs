//! CLI entry point shared by the binary.

use std::path::Path;

use tracing::debug;

use crate::adapter::inbound::cli::command::{Cli, DEFAULT_CONFIG};
use crate::adapter::inbound::cli::{market, output};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::exchange::ExchangeFactory;

/// Load the configuration named on the command line.
///
/// Without `--config`, `tradeport.toml` in the working directory is used if
/// present; otherwise the built-in defaults apply.
pub fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => Config::load(path),
        None if Path::new(DEFAULT_CONFIG).exists() => Config::load(DEFAULT_CONFIG),
        None => Config::parse_toml(""),
    }
}

/// Execute the parsed command and print its report.
pub async fn execute(cli: &Cli, config: &Config) -> Result<()> {
    let adapter = ExchangeFactory::market_data(config).await?;
    debug!(command = ?cli.command, "Executing");
    let report = market::execute(&cli.command, adapter.as_ref()).await?;
    output::emit(&report);
    Ok(())
}
