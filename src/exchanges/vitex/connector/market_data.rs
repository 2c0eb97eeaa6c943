use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::types::Numeric;
use crate::exchanges::vitex::conversions::{
    millis_to_datetime, order_query_params, token_lookup_param, token_query_params,
};
use crate::exchanges::vitex::rest::VitexRest;
use crate::exchanges::vitex::types::{
    AccountBalance, BookTicker, ConnectionStatus, DepositWithdrawal, ExchangeRate, HistoryOrder,
    Klines, KlineInterval, OrderBookDepth, OrderLimit, OrderQuery, Ticker, Token, TokenQuery,
    Trade, TradeMiningInfo, TradingPair,
};
use std::collections::HashMap;
use tracing::{instrument, warn};

/// ViteX public market data
#[derive(Debug, Clone)]
pub struct MarketData<R: RestClient> {
    rest: VitexRest<R>,
}

impl<R: RestClient + Clone> MarketData<R> {
    pub fn new(rest: &R) -> Self {
        Self {
            rest: VitexRest::new(rest.clone()),
        }
    }
}

impl<R: RestClient> MarketData<R> {
    /// Check the exchange with two cheap public calls
    ///
    /// Succeeds when at least one call answers; fails with the time check's
    /// error when neither does.
    #[instrument(skip(self), fields(exchange = "vitex"))]
    pub async fn test_connection(&self) -> Result<ConnectionStatus, ExchangeError> {
        let (time, rate) = tokio::join!(self.rest.get_server_time(), self.rest.get_usd_cny_rate());
        // An out-of-range time counts as a failed time check
        let time = time.and_then(millis_to_datetime);

        match (time, rate) {
            (Err(time_err), Err(rate_err)) => {
                warn!("USD/CNY check failed: {}", rate_err);
                Err(time_err)
            }
            (time, rate) => {
                let server_time = match time {
                    Ok(time) => Some(time),
                    Err(e) => {
                        warn!("Server time check failed: {}", e);
                        None
                    }
                };
                let usd_cny_rate = match rate {
                    Ok(rate) => Some(rate),
                    Err(e) => {
                        warn!("USD/CNY check failed: {}", e);
                        None
                    }
                };
                Ok(ConnectionStatus {
                    server_time,
                    usd_cny_rate,
                })
            }
        }
    }

    #[instrument(skip(self), fields(exchange = "vitex"))]
    pub async fn get_server_time(&self) -> Result<u64, ExchangeError> {
        self.rest.get_server_time().await
    }

    pub async fn get_usd_cny_rate(&self) -> Result<Numeric, ExchangeError> {
        self.rest.get_usd_cny_rate().await
    }

    /// Minimum order sizes per quote token and depth step bounds
    pub async fn get_order_limit(&self) -> Result<OrderLimit, ExchangeError> {
        self.rest.get_order_limit().await
    }

    /// Look a token up by symbol (`EPIC-002`) or id (`tti_...`)
    #[instrument(skip(self), fields(exchange = "vitex"))]
    pub async fn get_token(&self, symbol_or_id: &str) -> Result<Vec<Token>, ExchangeError> {
        self.rest
            .get_token_detail(token_lookup_param(symbol_or_id))
            .await
    }

    #[instrument(skip(self), fields(exchange = "vitex"))]
    pub async fn get_all_tokens(&self, query: &TokenQuery) -> Result<Vec<Token>, ExchangeError> {
        self.rest.get_tokens(&token_query_params(query)).await
    }

    /// Tokens with a market against `quote_token_symbol`
    pub async fn get_listed_tokens(
        &self,
        quote_token_symbol: &str,
    ) -> Result<Vec<Token>, ExchangeError> {
        self.rest.get_mapped_tokens(quote_token_symbol).await
    }

    /// Tokens without a market against `quote_token_symbol`
    pub async fn get_unlisted_tokens(
        &self,
        quote_token_symbol: &str,
    ) -> Result<Vec<Token>, ExchangeError> {
        self.rest.get_unmapped_tokens(quote_token_symbol).await
    }

    #[instrument(skip(self), fields(exchange = "vitex"))]
    pub async fn get_trading_pair(&self, symbol: &str) -> Result<Vec<TradingPair>, ExchangeError> {
        self.rest.get_market(symbol).await
    }

    pub async fn get_all_trading_pairs(
        &self,
        offset: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Vec<TradingPair>, ExchangeError> {
        self.rest.get_markets(offset, limit).await
    }

    #[instrument(skip(self), fields(exchange = "vitex"))]
    pub async fn get_order(
        &self,
        address: &str,
        order_id: &str,
    ) -> Result<Vec<HistoryOrder>, ExchangeError> {
        self.rest.get_order(address, order_id).await
    }

    #[instrument(skip(self, query), fields(exchange = "vitex", address = %query.address))]
    pub async fn get_orders(&self, query: &OrderQuery) -> Result<Vec<HistoryOrder>, ExchangeError> {
        self.rest.get_orders(&order_query_params(query)).await
    }

    /// 24h statistics, optionally filtered by comma-separated `symbols` or a quote token
    pub async fn get_24hr_tickers(
        &self,
        symbols: Option<&str>,
        quote_token_symbol: Option<&str>,
    ) -> Result<Vec<Ticker>, ExchangeError> {
        self.rest.get_24hr_tickers(symbols, quote_token_symbol).await
    }

    pub async fn get_order_book_ticker(&self, symbol: &str) -> Result<BookTicker, ExchangeError> {
        self.rest.get_book_ticker(symbol).await
    }

    pub async fn get_trade_history(
        &self,
        symbol: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Trade>, ExchangeError> {
        self.rest.get_trades(symbol, limit).await
    }

    #[instrument(skip(self), fields(exchange = "vitex"))]
    pub async fn get_order_book_depth(
        &self,
        symbol: &str,
        limit: Option<u32>,
        precision: Option<u32>,
    ) -> Result<OrderBookDepth, ExchangeError> {
        self.rest.get_depth(symbol, limit, precision).await
    }

    #[instrument(skip(self), fields(exchange = "vitex", interval = %interval))]
    pub async fn get_klines(
        &self,
        symbol: &str,
        interval: KlineInterval,
        limit: Option<u32>,
        start_time: Option<i64>,
        end_time: Option<i64>,
    ) -> Result<Klines, ExchangeError> {
        self.rest
            .get_klines(symbol, interval, limit, start_time, end_time)
            .await
    }

    pub async fn get_deposit_withdrawal_records(
        &self,
        address: &str,
        token_id: &str,
        offset: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Vec<DepositWithdrawal>, ExchangeError> {
        self.rest
            .get_deposit_withdraw(address, token_id, offset, limit)
            .await
    }

    pub async fn get_exchange_rates(
        &self,
        token_symbols: &[&str],
    ) -> Result<Vec<ExchangeRate>, ExchangeError> {
        self.rest.get_exchange_rates(token_symbols).await
    }

    /// Exchange balances of `address`, keyed by token symbol
    #[instrument(skip(self), fields(exchange = "vitex"))]
    pub async fn get_account_balance(
        &self,
        address: &str,
    ) -> Result<HashMap<String, AccountBalance>, ExchangeError> {
        self.rest.get_balance(address).await
    }

    pub async fn get_trade_mining_info(&self) -> Result<TradeMiningInfo, ExchangeError> {
        self.rest.get_trade_fee_info().await
    }
}
