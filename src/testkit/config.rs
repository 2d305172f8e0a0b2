//! Canonical test configurations.

/// Paper exchange with one fully seeded `BTC_ETH` market and a bare
/// `USDT_BTC` market.
pub const PAPER_TOML: &str = r#"
[logging]
level = "warn"
format = "pretty"

[exchange]
type = "paper"
depth = 2
commission_rate = 0.001

[exchange.balances]
BTC = 10.0
ETH = 5.0

[[exchange.markets]]
symbol = "BTC_ETH"
tick_size = "0.01"
step_size = "0.001"
last_price = 25.0
asks = [[25.5, 1.0], [26.0, 2.0], [27.0, 4.0]]
bids = [[24.5, 3.0], [24.0, 1.0]]
minute_bars = [[0, 24.0, 25.0, 23.5, 24.5, 1.0], [60, 24.5, 25.5, 24.0, 25.0, 2.0], [300, 25.0, 25.0, 24.5, 24.8, 3.0]]
trades = [[10, 24.0, 0.5], [20, 24.5, 0.1], [30, 24.5, 0.2], [40, 24.2, 1.0]]

[[exchange.markets]]
symbol = "USDT_BTC"
tick_size = "0.01"
step_size = "0.00001"
last_price = 60000.0
asks = [[60001.0, 0.5]]
bids = [[59999.0, 0.5]]
"#;

/// Binance adapter pointed at an unreachable local port.
pub const UNREACHABLE_BINANCE_TOML: &str = r#"
[logging]
level = "error"

[exchange]
type = "binance"
api_url = "http://127.0.0.1:9"
timeout_ms = 500
connect_timeout_ms = 200
"#;
