use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::traits::{MarketDataSource, OrderPlacer};
use crate::exchanges::vitex::types::{
    CancelledOrder, Order, SubmittedOrder, Token, TokenQuery, TradingPair,
};
use async_trait::async_trait;

pub mod market_data;
pub mod trading;

pub use market_data::MarketData;
pub use trading::{Trading, DEFAULT_PRECISION};

/// ViteX connector that composes the public and trading halves
///
/// Both halves share one transport; the trading half only works when the
/// transport was built with a signer.
#[derive(Debug, Clone)]
pub struct VitexConnector<R: RestClient> {
    pub market: MarketData<R>,
    pub trading: Trading<R>,
    rest: R,
}

impl<R: RestClient + Clone> VitexConnector<R> {
    pub fn new(rest: R, config: &ExchangeConfig) -> Self {
        Self {
            market: MarketData::new(&rest),
            trading: Trading::new(&rest, config.time_source),
            rest,
        }
    }
}

impl<R: RestClient> VitexConnector<R> {
    /// The shared transport
    pub fn rest(&self) -> &R {
        &self.rest
    }

    /// Whether signed requests can be made
    pub fn trading_enabled(&self) -> bool {
        self.rest.has_signer()
    }
}

#[async_trait]
impl<R: RestClient + Send + Sync> MarketDataSource for VitexConnector<R> {
    type Token = Token;
    type Pair = TradingPair;

    async fn get_server_time(&self) -> Result<u64, ExchangeError> {
        self.market.get_server_time().await
    }

    async fn get_token(&self, symbol_or_id: &str) -> Result<Vec<Token>, ExchangeError> {
        self.market.get_token(symbol_or_id).await
    }

    async fn get_all_tokens(&self) -> Result<Vec<Token>, ExchangeError> {
        self.market.get_all_tokens(&TokenQuery::default()).await
    }

    async fn get_trading_pair(&self, symbol: &str) -> Result<Vec<TradingPair>, ExchangeError> {
        self.market.get_trading_pair(symbol).await
    }
}

#[async_trait]
impl<R: RestClient + Send + Sync> OrderPlacer for VitexConnector<R> {
    type Order = Order;
    type Submitted = SubmittedOrder;
    type Cancelled = CancelledOrder;

    async fn execute_order(&self, order: &Order) -> Result<SubmittedOrder, ExchangeError> {
        self.trading.execute_order(order).await
    }

    async fn cancel_order(
        &self,
        symbol: &str,
        order_id: &str,
    ) -> Result<CancelledOrder, ExchangeError> {
        self.trading.cancel_order(symbol, order_id).await
    }

    async fn cancel_all_orders(&self, symbol: &str) -> Result<Vec<CancelledOrder>, ExchangeError> {
        self.trading.cancel_all_orders(symbol).await
    }
}
