//! Command-line interface definitions.
//!
//! Defines the `tradeport` CLI using `clap`. Every subcommand reads public
//! market data from the configured exchange.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::Symbol;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG: &str = "tradeport.toml";

/// Query exchange market data from the terminal
#[derive(Parser, Debug)]
#[command(name = "tradeport")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List tradable symbols, USDT pairs first
    Symbols,

    /// Show price and amount precision of a symbol
    Decs(SymbolArg),

    /// Show the order book of a symbol
    Book(SymbolArg),

    /// Show the last traded price of a symbol
    Price(SymbolArg),

    /// Show recent candles of a symbol
    Kline(KlineArgs),

    /// Show recent public trades of a symbol
    Trades(SymbolArg),
}

/// A canonical `QUOTE_BASE` symbol.
#[derive(Args, Debug, Clone)]
pub struct SymbolArg {
    /// Symbol such as BTC_ETH (quote first)
    pub symbol: Symbol,
}

/// Arguments for the `kline` subcommand.
#[derive(Args, Debug, Clone)]
pub struct KlineArgs {
    /// Symbol such as BTC_ETH (quote first)
    pub symbol: Symbol,

    /// Candle period in minutes
    #[arg(short, long, default_value_t = 1)]
    pub period: u32,
}
