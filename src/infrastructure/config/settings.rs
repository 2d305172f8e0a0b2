//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file; API credentials never live in
//! the file and are read from `TRADEPORT_API_KEY`, `TRADEPORT_API_SECRET`
//! and `TRADEPORT_ACCOUNT_ID` instead.
//!
//! # Example
//!
//! ```no_run
//! use tradeport::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::Deserialize;
use url::Url;

use super::logging::LoggingConfig;
use crate::adapter::outbound::binance::settings::BinanceConfig;
use crate::adapter::outbound::paper::settings::PaperConfig;
use crate::error::{ConfigError, Result};
use crate::port::outbound::exchange::Credentials;

pub const API_KEY_VAR: &str = "TRADEPORT_API_KEY";
pub const API_SECRET_VAR: &str = "TRADEPORT_API_SECRET";
pub const ACCOUNT_ID_VAR: &str = "TRADEPORT_ACCOUNT_ID";

/// Exchange-specific configuration variant.
///
/// The active variant is determined by the `type` field of `[exchange]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ExchangeSettings {
    /// In-memory simulated exchange.
    Paper(PaperConfig),
    /// Binance public market data.
    Binance(BinanceConfig),
}

impl Default for ExchangeSettings {
    fn default() -> Self {
        Self::Paper(PaperConfig::default())
    }
}

impl ExchangeSettings {
    /// Short name of the selected exchange.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Paper(_) => "paper",
            Self::Binance(_) => "binance",
        }
    }
}

/// The `[exchange]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeConfig {
    /// Order book levels per side, fixed at adapter init.
    #[serde(default = "default_depth")]
    pub depth: usize,

    /// Wrap the adapter in the contract-checking decorator.
    #[serde(default = "default_validate_responses")]
    pub validate_responses: bool,

    #[serde(flatten)]
    pub settings: ExchangeSettings,
}

const fn default_depth() -> usize {
    20
}

const fn default_validate_responses() -> bool {
    true
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            depth: default_depth(),
            validate_responses: default_validate_responses(),
            settings: ExchangeSettings::default(),
        }
    }
}

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`].
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Exchange selection and adapter settings.
    #[serde(default)]
    pub exchange: ExchangeConfig,

    /// API access, filled from the environment.
    #[serde(skip)]
    pub credentials: Credentials,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// Credentials are taken from the environment, never from the content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.credentials = credentials_from_env();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Initialize logging based on configuration.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    /// Validate configuration values.
    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::InvalidValue {
                field: "format",
                reason: format!("expected \"pretty\" or \"json\", got {:?}", self.logging.format),
            }
            .into());
        }
        if self.exchange.depth == 0 {
            return Err(ConfigError::InvalidValue {
                field: "depth",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        match &self.exchange.settings {
            ExchangeSettings::Paper(paper) => {
                if !(0.0..1.0).contains(&paper.commission_rate) {
                    return Err(ConfigError::InvalidValue {
                        field: "commission_rate",
                        reason: "must be in [0, 1)".to_string(),
                    }
                    .into());
                }
                if paper.balances.values().any(|amount| *amount < 0.0) {
                    return Err(ConfigError::InvalidValue {
                        field: "balances",
                        reason: "must not be negative".to_string(),
                    }
                    .into());
                }
            }
            ExchangeSettings::Binance(binance) => {
                if binance.api_url.is_empty() {
                    return Err(ConfigError::MissingField { field: "api_url" }.into());
                }
                Url::parse(&binance.api_url).map_err(|err| ConfigError::InvalidValue {
                    field: "api_url",
                    reason: err.to_string(),
                })?;
                if binance.timeout_ms == 0 || binance.connect_timeout_ms == 0 {
                    return Err(ConfigError::InvalidValue {
                        field: "timeout_ms",
                        reason: "timeouts must be greater than 0".to_string(),
                    }
                    .into());
                }
            }
        }

        Ok(())
    }
}

fn credentials_from_env() -> Credentials {
    let read = |name: &str| std::env::var(name).unwrap_or_default();
    Credentials::new(read(API_KEY_VAR), read(API_SECRET_VAR), read(ACCOUNT_ID_VAR))
}
