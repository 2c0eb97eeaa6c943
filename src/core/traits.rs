use crate::core::errors::ExchangeError;
use async_trait::async_trait;

#[async_trait]
pub trait MarketDataSource {
    type Token: Send;
    type Pair: Send;

    /// Exchange clock in milliseconds
    async fn get_server_time(&self) -> Result<u64, ExchangeError>;

    /// Look a token up by symbol or id; no match is an empty list
    async fn get_token(&self, symbol_or_id: &str) -> Result<Vec<Self::Token>, ExchangeError>;

    /// Get all listed tokens
    async fn get_all_tokens(&self) -> Result<Vec<Self::Token>, ExchangeError>;

    /// Look a market up by symbol; no match is an empty list
    async fn get_trading_pair(&self, symbol: &str) -> Result<Vec<Self::Pair>, ExchangeError>;
}

#[async_trait]
pub trait OrderPlacer {
    type Order: Send + Sync;
    type Submitted: Send;
    type Cancelled: Send;

    /// Sign and submit an order (or only validate it, for test orders)
    async fn execute_order(&self, order: &Self::Order) -> Result<Self::Submitted, ExchangeError>;

    async fn cancel_order(
        &self,
        symbol: &str,
        order_id: &str,
    ) -> Result<Self::Cancelled, ExchangeError>;

    /// Cancel every open order of a market
    async fn cancel_all_orders(&self, symbol: &str)
        -> Result<Vec<Self::Cancelled>, ExchangeError>;
}

// Composite trait for when you need all functionality
pub trait ExchangeConnector: MarketDataSource + OrderPlacer {}

impl<T: MarketDataSource + OrderPlacer> ExchangeConnector for T {}
