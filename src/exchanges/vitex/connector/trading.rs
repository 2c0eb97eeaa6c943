use crate::core::config::TimeSource;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{get_timestamp, RestClient};
use crate::core::types::PairReference;
use crate::exchanges::vitex::conversions::{order_from_params, quantize_order};
use crate::exchanges::vitex::rest::VitexRest;
use crate::exchanges::vitex::types::{CancelledOrder, Order, OrderParams, SubmittedOrder};
use tracing::{info, instrument, warn};

/// Decimal places used when a market's precision can't be looked up
pub const DEFAULT_PRECISION: u32 = 8;

/// ViteX trading implementation
#[derive(Debug, Clone)]
pub struct Trading<R: RestClient> {
    rest: VitexRest<R>,
    time_source: TimeSource,
}

impl<R: RestClient + Clone> Trading<R> {
    pub fn new(rest: &R, time_source: TimeSource) -> Self {
        Self {
            rest: VitexRest::new(rest.clone()),
            time_source,
        }
    }
}

impl<R: RestClient> Trading<R> {
    /// Validate caller input and build an [`Order`]
    ///
    /// Purely local: amount and price must parse and be positive, the side must
    /// be buy or sell, and the symbol must be `BASE_QUOTE`.
    pub fn prepare_order(&self, params: &OrderParams) -> Result<Order, ExchangeError> {
        order_from_params(params)
    }

    /// Like [`Self::prepare_order`], then rounds amount and price to the market's precision
    ///
    /// Validation runs first, so bad input never reaches the network. When the
    /// market can't be looked up both values fall back to [`DEFAULT_PRECISION`].
    /// A value that rounds to zero is rejected with `InvalidOrderParameters`.
    #[instrument(skip(self, params), fields(exchange = "vitex", symbol = %params.symbol))]
    pub async fn prepare_order_with_precision(
        &self,
        params: &OrderParams,
    ) -> Result<Order, ExchangeError> {
        let order = order_from_params(params)?;

        let (amount_precision, price_precision) = match self.rest.get_market(order.symbol()).await
        {
            Ok(pairs) => pairs.first().map_or((DEFAULT_PRECISION, DEFAULT_PRECISION), |pair| {
                (
                    pair.quantity_precision.unwrap_or(DEFAULT_PRECISION),
                    pair.price_precision.unwrap_or(DEFAULT_PRECISION),
                )
            }),
            Err(e) => {
                warn!("Precision lookup failed, using {} places: {}", DEFAULT_PRECISION, e);
                (DEFAULT_PRECISION, DEFAULT_PRECISION)
            }
        };

        quantize_order(&order, amount_precision, price_precision)
    }

    /// Sign `order` with a fresh timestamp and submit it
    pub async fn execute_order(&self, order: &Order) -> Result<SubmittedOrder, ExchangeError> {
        self.ensure_credentials()?;
        let timestamp = self.fresh_timestamp().await?;
        self.execute_order_at(order, timestamp).await
    }

    /// Sign `order` for the given timestamp (milliseconds) and submit it
    ///
    /// Test orders go to the validation endpoint with exactly the same signed
    /// parameters; nothing is matched and no order id is returned.
    #[instrument(skip(self, order), fields(exchange = "vitex", symbol = %order.symbol(), test = order.is_test()))]
    pub async fn execute_order_at(
        &self,
        order: &Order,
        timestamp: u64,
    ) -> Result<SubmittedOrder, ExchangeError> {
        self.ensure_credentials()?;

        let (signed, ack) = self.rest.place_order(order, timestamp).await?;
        info!(
            order = %order,
            order_id = ack.as_ref().map_or("-", |ack| ack.order_id.as_str()),
            "Order accepted"
        );

        Ok(SubmittedOrder {
            order: order.clone(),
            signed,
            ack,
        })
    }

    #[instrument(skip(self, pair), fields(exchange = "vitex", symbol = %pair.pair_symbol()))]
    pub async fn cancel_order<P: PairReference + ?Sized + Sync>(
        &self,
        pair: &P,
        order_id: &str,
    ) -> Result<CancelledOrder, ExchangeError> {
        let symbol = checked_symbol(pair)?;
        if order_id.trim().is_empty() {
            return Err(ExchangeError::InvalidOrderParameters(
                "Order id is empty".to_string(),
            ));
        }
        self.ensure_credentials()?;

        let timestamp = self.fresh_timestamp().await?;
        self.rest.cancel_order(symbol, order_id, timestamp).await
    }

    /// Cancel every open order in a market
    ///
    /// `pair` is a raw symbol or anything carrying one (a [`TradingPair`],
    /// an [`Order`], ...).
    ///
    /// [`TradingPair`]: crate::exchanges::vitex::types::TradingPair
    #[instrument(skip(self, pair), fields(exchange = "vitex", symbol = %pair.pair_symbol()))]
    pub async fn cancel_all_orders<P: PairReference + ?Sized + Sync>(
        &self,
        pair: &P,
    ) -> Result<Vec<CancelledOrder>, ExchangeError> {
        let symbol = checked_symbol(pair)?;
        self.ensure_credentials()?;

        let timestamp = self.fresh_timestamp().await?;
        let cancelled = self.rest.cancel_all_orders(symbol, timestamp).await?;
        info!(count = cancelled.len(), "Orders cancelled");
        Ok(cancelled)
    }

    fn ensure_credentials(&self) -> Result<(), ExchangeError> {
        if self.rest.has_signer() {
            Ok(())
        } else {
            Err(ExchangeError::MissingCredentials(
                "Trading requires an API key and secret".to_string(),
            ))
        }
    }

    async fn fresh_timestamp(&self) -> Result<u64, ExchangeError> {
        match self.time_source {
            TimeSource::Local => get_timestamp(),
            TimeSource::Server => self.rest.get_server_time().await,
        }
    }
}

fn checked_symbol<P: PairReference + ?Sized>(pair: &P) -> Result<&str, ExchangeError> {
    let symbol = pair.pair_symbol().trim();
    if symbol.is_empty() {
        return Err(ExchangeError::InvalidOrderParameters(
            "Trading pair symbol is empty".to_string(),
        ));
    }
    Ok(symbol)
}
