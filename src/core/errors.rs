use thiserror::Error;

/// Diagnostic the exchange returns when the account has no quota left for trading
const OUT_OF_QUOTA: &str = "out of quota";
/// Diagnostic the exchange returns when cancelling an order that is already closed
const ORDER_TERMINATED: &str = "The order status has been terminated";

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("Transport error: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Remote error: {code} - {message}")]
    RemoteError { code: i64, message: String },

    #[error("Invalid order parameters: {0}")]
    InvalidOrderParameters(String),

    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("Invalid numeric format: {0}")]
    InvalidNumericFormat(String),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponseFormat(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] crate::core::config::ConfigError),

    #[error("Other error: {0}")]
    Other(String),
}

impl ExchangeError {
    /// True when the exchange refused a trade because the account ran out of quota
    pub fn is_out_of_quota(&self) -> bool {
        matches!(self, Self::RemoteError { message, .. } if message.contains(OUT_OF_QUOTA))
    }

    /// True when a cancellation targeted an order that is already filled or cancelled
    pub fn is_order_terminated(&self) -> bool {
        matches!(self, Self::RemoteError { message, .. } if message.contains(ORDER_TERMINATED))
    }

    /// Local validation failures, raised before any request is sent
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::InvalidOrderParameters(_)
                | Self::MissingCredentials(_)
                | Self::InvalidNumericFormat(_)
        )
    }
}
