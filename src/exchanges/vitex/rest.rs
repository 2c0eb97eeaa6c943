use crate::core::errors::ExchangeError;
use crate::core::kernel::{RestClient, SignedParams};
use crate::core::types::Numeric;
use crate::exchanges::vitex::conversions::{borrow_params, push_opt, Params};
use crate::exchanges::vitex::types::{
    AccountBalance, BookTicker, CancelledOrder, DepositWithdrawal, DepositWithdrawalPage,
    ExchangeRate, HistoryOrder, Klines, KlineInterval, Order, OrderAck, OrderBookDepth,
    OrderLimit, OrdersPage, Ticker, Token, TradeMiningInfo, TradingPair, Trade, VitexResponse,
};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;

const ORDER: &str = "/api/v2/order";
const TEST_ORDER: &str = "/api/v2/order/test";
const ORDERS: &str = "/api/v2/orders";

/// ViteX REST API v2 endpoints on top of a generic transport
#[derive(Debug, Clone)]
pub struct VitexRest<R: RestClient> {
    rest_client: R,
}

impl<R: RestClient> VitexRest<R> {
    pub fn new(rest_client: R) -> Self {
        Self { rest_client }
    }

    pub fn has_signer(&self) -> bool {
        self.rest_client.has_signer()
    }

    /// Unwrap the `{code, msg, data}` envelope
    ///
    /// A non-zero code becomes `RemoteError` with the message exactly as sent.
    /// The code is checked before `data` is interpreted, since failed calls
    /// usually carry `data: null` or something unrelated.
    fn handle_response(&self, response_value: Value) -> Result<Option<Value>, ExchangeError> {
        let response: VitexResponse<Value> =
            serde_json::from_value(response_value).map_err(|e| {
                ExchangeError::InvalidResponseFormat(format!(
                    "Failed to parse ViteX response envelope: {}",
                    e
                ))
            })?;

        if response.code != 0 {
            return Err(ExchangeError::RemoteError {
                code: response.code,
                message: response.msg.unwrap_or_default(),
            });
        }

        Ok(response.data.filter(|data| !data.is_null()))
    }

    fn handle_data<T: DeserializeOwned>(&self, response_value: Value) -> Result<T, ExchangeError> {
        let data = self.handle_response(response_value)?.ok_or_else(|| {
            ExchangeError::InvalidResponseFormat("Response carries no data".to_string())
        })?;
        parse_data(data)
    }

    /// Lists come back as arrays, single lookups as one object; `null` means nothing matched
    fn handle_list<T: DeserializeOwned>(
        &self,
        response_value: Value,
    ) -> Result<Vec<T>, ExchangeError> {
        match self.handle_response(response_value)? {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => items.into_iter().map(parse_data).collect(),
            Some(item) => Ok(vec![parse_data(item)?]),
        }
    }

    async fn get(
        &self,
        endpoint: &str,
        params: &[(&'static str, String)],
    ) -> Result<Value, ExchangeError> {
        self.rest_client
            .get(endpoint, &borrow_params(params))
            .await
            .map_err(remote_error_from_status)
    }

    async fn signed(
        &self,
        method: Method,
        endpoint: &str,
        params: &[(&'static str, String)],
        timestamp: u64,
    ) -> Result<(SignedParams, Value), ExchangeError> {
        self.rest_client
            .signed_request(method, endpoint, &borrow_params(params), timestamp)
            .await
            .map_err(remote_error_from_status)
    }

    // Public endpoints

    /// Server time in milliseconds
    pub async fn get_server_time(&self) -> Result<u64, ExchangeError> {
        let response_value = self.get("/api/v2/time", &[]).await?;
        self.handle_data(response_value)
    }

    pub async fn get_usd_cny_rate(&self) -> Result<Numeric, ExchangeError> {
        let response_value = self.get("/api/v2/usd-cny", &[]).await?;
        self.handle_data(response_value)
    }

    pub async fn get_order_limit(&self) -> Result<OrderLimit, ExchangeError> {
        let response_value = self.get("/api/v2/limit", &[]).await?;
        self.handle_data(response_value)
    }

    pub async fn get_tokens(&self, params: &Params) -> Result<Vec<Token>, ExchangeError> {
        let response_value = self.get("/api/v2/tokens", params).await?;
        self.handle_list(response_value)
    }

    pub async fn get_token_detail(
        &self,
        lookup: (&'static str, String),
    ) -> Result<Vec<Token>, ExchangeError> {
        let response_value = self.get("/api/v2/token/detail", &[lookup]).await?;
        self.handle_list(response_value)
    }

    /// Tokens that have a market against `quote_token_symbol`
    pub async fn get_mapped_tokens(
        &self,
        quote_token_symbol: &str,
    ) -> Result<Vec<Token>, ExchangeError> {
        let params = [("quoteTokenSymbol", quote_token_symbol.to_string())];
        let response_value = self.get("/api/v2/token/mapped", &params).await?;
        self.handle_list(response_value)
    }

    pub async fn get_unmapped_tokens(
        &self,
        quote_token_symbol: &str,
    ) -> Result<Vec<Token>, ExchangeError> {
        let params = [("quoteTokenSymbol", quote_token_symbol.to_string())];
        let response_value = self.get("/api/v2/token/unmapped", &params).await?;
        self.handle_list(response_value)
    }

    pub async fn get_market(&self, symbol: &str) -> Result<Vec<TradingPair>, ExchangeError> {
        let params = [("symbol", symbol.to_string())];
        let response_value = self.get("/api/v2/market", &params).await?;
        self.handle_list(response_value)
    }

    pub async fn get_markets(
        &self,
        offset: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Vec<TradingPair>, ExchangeError> {
        let mut params = Params::new();
        push_opt(&mut params, "offset", offset);
        push_opt(&mut params, "limit", limit);
        let response_value = self.get("/api/v2/markets", &params).await?;
        self.handle_list(response_value)
    }

    pub async fn get_order(
        &self,
        address: &str,
        order_id: &str,
    ) -> Result<Vec<HistoryOrder>, ExchangeError> {
        let params = [
            ("address", address.to_string()),
            ("orderId", order_id.to_string()),
        ];
        let response_value = self.get(ORDER, &params).await?;
        self.handle_list(response_value)
    }

    pub async fn get_orders(&self, params: &Params) -> Result<Vec<HistoryOrder>, ExchangeError> {
        let response_value = self.get(ORDERS, params).await?;
        let page: Option<OrdersPage> = self
            .handle_response(response_value)?
            .map(parse_data)
            .transpose()?;
        Ok(page.map(|page| page.order).unwrap_or_default())
    }

    pub async fn get_24hr_tickers(
        &self,
        symbols: Option<&str>,
        quote_token_symbol: Option<&str>,
    ) -> Result<Vec<Ticker>, ExchangeError> {
        let mut params = Params::new();
        push_opt(&mut params, "symbols", symbols);
        push_opt(&mut params, "quoteTokenSymbol", quote_token_symbol);
        let response_value = self.get("/api/v2/ticker/24hr", &params).await?;
        self.handle_list(response_value)
    }

    pub async fn get_book_ticker(&self, symbol: &str) -> Result<BookTicker, ExchangeError> {
        let params = [("symbol", symbol.to_string())];
        let response_value = self.get("/api/v2/ticker/bookTicker", &params).await?;
        self.handle_data(response_value)
    }

    pub async fn get_trades(
        &self,
        symbol: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Trade>, ExchangeError> {
        let mut params: Params = vec![("symbol", symbol.to_string())];
        push_opt(&mut params, "limit", limit);
        let response_value = self.get("/api/v2/trades", &params).await?;
        self.handle_list(response_value)
    }

    pub async fn get_depth(
        &self,
        symbol: &str,
        limit: Option<u32>,
        precision: Option<u32>,
    ) -> Result<OrderBookDepth, ExchangeError> {
        let mut params: Params = vec![("symbol", symbol.to_string())];
        push_opt(&mut params, "limit", limit);
        push_opt(&mut params, "precision", precision);
        let response_value = self.get("/api/v2/depth", &params).await?;
        Ok(self
            .handle_response(response_value)?
            .map(parse_data)
            .transpose()?
            .unwrap_or_default())
    }

    pub async fn get_klines(
        &self,
        symbol: &str,
        interval: KlineInterval,
        limit: Option<u32>,
        start_time: Option<i64>,
        end_time: Option<i64>,
    ) -> Result<Klines, ExchangeError> {
        let mut params: Params = vec![
            ("symbol", symbol.to_string()),
            ("interval", interval.as_str().to_string()),
        ];
        push_opt(&mut params, "limit", limit);
        push_opt(&mut params, "startTime", start_time);
        push_opt(&mut params, "endTime", end_time);
        let response_value = self.get("/api/v2/klines", &params).await?;
        Ok(self
            .handle_response(response_value)?
            .map(parse_data)
            .transpose()?
            .unwrap_or_default())
    }

    pub async fn get_deposit_withdraw(
        &self,
        address: &str,
        token_id: &str,
        offset: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Vec<DepositWithdrawal>, ExchangeError> {
        let mut params: Params = vec![
            ("address", address.to_string()),
            ("tokenId", token_id.to_string()),
        ];
        push_opt(&mut params, "offset", offset);
        push_opt(&mut params, "limit", limit);
        let response_value = self.get("/api/v2/deposit-withdraw", &params).await?;
        let page: Option<DepositWithdrawalPage> = self
            .handle_response(response_value)?
            .map(parse_data)
            .transpose()?;
        Ok(page.map(|page| page.record).unwrap_or_default())
    }

    pub async fn get_exchange_rates(
        &self,
        token_symbols: &[&str],
    ) -> Result<Vec<ExchangeRate>, ExchangeError> {
        let params = [("tokenSymbols", token_symbols.join(","))];
        let response_value = self.get("/api/v2/exchange-rate", &params).await?;
        self.handle_list(response_value)
    }

    pub async fn get_balance(
        &self,
        address: &str,
    ) -> Result<HashMap<String, AccountBalance>, ExchangeError> {
        let params = [("address", address.to_string())];
        let response_value = self.get("/api/v2/balance", &params).await?;
        Ok(self
            .handle_response(response_value)?
            .map(parse_data)
            .transpose()?
            .unwrap_or_default())
    }

    pub async fn get_trade_fee_info(&self) -> Result<TradeMiningInfo, ExchangeError> {
        let response_value = self.get("/api/v2/trade_fee_info", &[]).await?;
        self.handle_data(response_value)
    }

    // Signed endpoints

    /// Place `order`, or only validate it when it is a test order
    ///
    /// Both variants are signed identically; only the endpoint differs.
    pub async fn place_order(
        &self,
        order: &Order,
        timestamp: u64,
    ) -> Result<(SignedParams, Option<OrderAck>), ExchangeError> {
        let endpoint = if order.is_test() { TEST_ORDER } else { ORDER };
        let (signed, response_value) = self
            .signed(Method::POST, endpoint, &order.request_params(), timestamp)
            .await?;
        let ack = self
            .handle_response(response_value)?
            .map(parse_data)
            .transpose()?;
        Ok((signed, ack))
    }

    pub async fn cancel_order(
        &self,
        symbol: &str,
        order_id: &str,
        timestamp: u64,
    ) -> Result<CancelledOrder, ExchangeError> {
        let params = [
            ("symbol", symbol.to_string()),
            ("orderId", order_id.to_string()),
        ];
        let (_, response_value) = self
            .signed(Method::DELETE, ORDER, &params, timestamp)
            .await?;
        self.handle_data(response_value)
    }

    pub async fn cancel_all_orders(
        &self,
        symbol: &str,
        timestamp: u64,
    ) -> Result<Vec<CancelledOrder>, ExchangeError> {
        let params = [("symbol", symbol.to_string())];
        let (_, response_value) = self
            .signed(Method::DELETE, ORDERS, &params, timestamp)
            .await?;
        self.handle_list(response_value)
    }
}

fn parse_data<T: DeserializeOwned>(data: Value) -> Result<T, ExchangeError> {
    serde_json::from_value(data).map_err(|e| {
        ExchangeError::DeserializationError(format!("Failed to parse ViteX data: {}", e))
    })
}

/// The exchange answers some rejections with a 4xx/5xx status and a regular
/// envelope; surface those as `RemoteError` like any other non-zero code.
fn remote_error_from_status(err: ExchangeError) -> ExchangeError {
    if let ExchangeError::HttpStatus { body, .. } = &err {
        if let Ok(envelope) = serde_json::from_str::<VitexResponse<Value>>(body) {
            if envelope.code != 0 {
                return ExchangeError::RemoteError {
                    code: envelope.code,
                    message: envelope.msg.unwrap_or_default(),
                };
            }
        }
    }
    err
}
