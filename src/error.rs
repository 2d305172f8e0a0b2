use thiserror::Error;

use crate::domain::error::DomainError;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Trading-side errors with structured variants.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecutionError {
    #[error("order {id} not found on {symbol}")]
    OrderNotFound { symbol: String, id: String },

    #[error("order {id} is no longer open ({status})")]
    OrderNotOpen { id: String, status: String },

    #[error("insufficient {asset} balance: need {required}, have {available}")]
    InsufficientBalance {
        asset: String,
        required: f64,
        available: f64,
    },

    #[error("order rejected: {0}")]
    OrderRejected(String),

    #[error("withdrawal rejected: {0}")]
    WithdrawalRejected(String),

    /// Some orders of a bulk cancel failed; the rest were cancelled.
    #[error("cancelled {cancelled} of {total} orders on {symbol}; failures: {}", failures.join("; "))]
    PartialCancel {
        symbol: String,
        cancelled: usize,
        total: usize,
        failures: Vec<String>,
    },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    /// The exchange answered, but refused the request.
    #[error("exchange rejected request (status {status}): {message} [{context}]")]
    Exchange {
        status: u16,
        message: String,
        /// Rendered diagnostics of the failing call.
        context: String,
    },

    #[error("{exchange} does not support {operation}")]
    Unsupported {
        exchange: &'static str,
        operation: &'static str,
    },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// True for transport failures a caller may choose to retry.
    ///
    /// Order placement and withdrawals must still not be retried blindly.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(err) if err.is_timeout() || err.is_connect())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
