//! Exchange adapter factory.
//!
//! Provides [`ExchangeFactory`] for building an initialized adapter from
//! runtime configuration. Callers get trait objects back and never see the
//! concrete adapter type.

use std::sync::Arc;

use tracing::info;

use crate::adapter::outbound::binance::BinanceExchange;
use crate::adapter::outbound::paper::PaperExchange;
use crate::adapter::outbound::validated::ValidatedExchange;
use crate::error::{Error, Result};
use crate::infrastructure::config::settings::{Config, ExchangeSettings};
use crate::port::outbound::exchange::{
    ExchangeAdapter, SharedExchange, SharedMarketData,
};

/// Factory for creating exchange adapters.
///
/// Dispatches to the appropriate adapter based on configuration.
/// All factory methods are static; no instance state is required.
pub struct ExchangeFactory;

impl ExchangeFactory {
    /// Build the public market data surface of the configured exchange.
    ///
    /// # Errors
    ///
    /// Returns an error if the adapter rejects its init parameters.
    pub async fn market_data(config: &Config) -> Result<SharedMarketData> {
        let depth = config.exchange.depth;
        let validate = config.exchange.validate_responses;
        let credentials = config.credentials.clone();

        let adapter: SharedMarketData = match &config.exchange.settings {
            ExchangeSettings::Paper(paper) => {
                let exchange = PaperExchange::new(paper.clone());
                if validate {
                    Arc::new(Self::init(ValidatedExchange::new(exchange), config).await?)
                } else {
                    Arc::new(Self::init(exchange, config).await?)
                }
            }
            ExchangeSettings::Binance(binance) => {
                let exchange = BinanceExchange::from_config(binance);
                if validate {
                    Arc::new(Self::init(ValidatedExchange::new(exchange), config).await?)
                } else {
                    Arc::new(Self::init(exchange, config).await?)
                }
            }
        };

        info!(
            exchange = adapter.exchange_name(),
            depth,
            validate,
            authenticated = !credentials.is_empty(),
            "Market data adapter ready"
        );
        Ok(adapter)
    }

    /// Build the full trading surface of the configured exchange.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] for exchanges that only provide
    /// public data, or an init error from the adapter.
    pub async fn exchange(config: &Config) -> Result<SharedExchange> {
        let adapter: SharedExchange = match &config.exchange.settings {
            ExchangeSettings::Paper(paper) => {
                let exchange = PaperExchange::new(paper.clone());
                if config.exchange.validate_responses {
                    Arc::new(Self::init(ValidatedExchange::new(exchange), config).await?)
                } else {
                    Arc::new(Self::init(exchange, config).await?)
                }
            }
            ExchangeSettings::Binance(_) => {
                return Err(Error::Unsupported {
                    exchange: "binance",
                    operation: "trading",
                });
            }
        };

        info!(exchange = adapter.exchange_name(), "Trading adapter ready");
        Ok(adapter)
    }

    async fn init<E: ExchangeAdapter>(mut adapter: E, config: &Config) -> Result<E> {
        adapter
            .init(config.credentials.clone(), config.exchange.depth)
            .await?;
        Ok(adapter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn paper_provides_both_surfaces() {
        let config = Config::default();

        let market = ExchangeFactory::market_data(&config).await.unwrap();
        let exchange = ExchangeFactory::exchange(&config).await.unwrap();

        assert_eq!(market.exchange_name(), "paper");
        assert_eq!(exchange.exchange_name(), "paper");
        assert!(market.get_all_symbols().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn binance_refuses_trading() {
        let config = Config::parse_toml("[exchange]\ntype = \"binance\"\n").unwrap();

        let market = ExchangeFactory::market_data(&config).await.unwrap();
        assert_eq!(market.exchange_name(), "binance");

        assert!(matches!(
            ExchangeFactory::exchange(&config).await,
            Err(Error::Unsupported {
                exchange: "binance",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn zero_depth_fails_init() {
        let mut config = Config::default();
        config.exchange.depth = 0;
        assert!(ExchangeFactory::market_data(&config).await.is_err());
    }
}
