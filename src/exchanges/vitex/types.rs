use crate::core::errors::ExchangeError;
use crate::core::kernel::SignedParams;
use crate::core::types::{Numeric, OrderSide, OrderStatus, PairReference};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// ViteX API standard response wrapper
#[derive(Debug, Deserialize, Serialize)]
pub struct VitexResponse<T> {
    pub code: i64,
    #[serde(default)]
    pub msg: Option<String>,
    pub data: Option<T>,
}

// Entities

/// A token registered on the exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    /// Chain id, e.g. `tti_f370fadb275bc2a1a839c753`
    #[serde(rename = "tokenId")]
    pub id: String,
    /// Exchange symbol, e.g. `EPIC-002`
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub original_symbol: Option<String>,
    #[serde(default)]
    pub token_decimals: Option<u32>,
    #[serde(default)]
    pub token_accuracy: Option<Numeric>,
    /// Raw integer in the token's smallest unit; can exceed what [`Numeric`] holds
    #[serde(default, deserialize_with = "integer_text")]
    pub total_supply: Option<String>,
    #[serde(default, alias = "publisher")]
    pub owner: Option<String>,
    #[serde(default)]
    pub url_icon: Option<String>,
    /// Every other field the exchange sent
    #[serde(flatten)]
    pub meta: HashMap<String, Value>,
}

fn integer_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected an integer string or number, got {}",
            other
        ))),
    }
}

impl Token {
    pub fn new(id: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into(),
            name: None,
            original_symbol: None,
            token_decimals: None,
            token_accuracy: None,
            total_supply: None,
            owner: None,
            url_icon: None,
            meta: HashMap::new(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({})", self.symbol)
    }
}

/// A market, e.g. `EPIC-002_BTC-000`
///
/// `/api/v2/market` and `/api/v2/markets` name some fields differently; both
/// spellings are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingPair {
    pub symbol: String,
    #[serde(default, alias = "tradingCurrency")]
    pub trade_token_symbol: Option<String>,
    #[serde(default, alias = "quoteCurrency")]
    pub quote_token_symbol: Option<String>,
    #[serde(default, alias = "tradingCurrencyId")]
    pub trade_token: Option<String>,
    #[serde(default, alias = "quoteCurrencyId")]
    pub quote_token: Option<String>,
    #[serde(default)]
    pub price_precision: Option<u32>,
    #[serde(default, alias = "amountPrecision")]
    pub quantity_precision: Option<u32>,
    #[serde(default)]
    pub min_order_size: Option<Numeric>,
    /// Sent as a JSON number and read through its shortest decimal form
    #[serde(default)]
    pub operator_maker_fee: Option<Numeric>,
    /// Sent as a JSON number and read through its shortest decimal form
    #[serde(default)]
    pub operator_taker_fee: Option<Numeric>,
    #[serde(default)]
    pub last_price: Option<Numeric>,
    #[serde(default)]
    pub bid_price: Option<Numeric>,
    #[serde(default)]
    pub ask_price: Option<Numeric>,
    #[serde(flatten)]
    pub meta: HashMap<String, Value>,
}

impl TradingPair {
    /// Pair known only by its symbol
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            trade_token_symbol: None,
            quote_token_symbol: None,
            trade_token: None,
            quote_token: None,
            price_precision: None,
            quantity_precision: None,
            min_order_size: None,
            operator_maker_fee: None,
            operator_taker_fee: None,
            last_price: None,
            bid_price: None,
            ask_price: None,
            meta: HashMap::new(),
        }
    }

    /// Symbol of the token being traded
    pub fn base_symbol(&self) -> &str {
        self.trade_token_symbol
            .as_deref()
            .unwrap_or_else(|| split_pair(&self.symbol).0)
    }

    /// Symbol of the token prices are quoted in
    pub fn quote_symbol(&self) -> &str {
        self.quote_token_symbol
            .as_deref()
            .unwrap_or_else(|| split_pair(&self.symbol).1)
    }
}

impl PairReference for TradingPair {
    fn pair_symbol(&self) -> &str {
        &self.symbol
    }
}

impl fmt::Display for TradingPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TradingPair({}/{})", self.base_symbol(), self.quote_symbol())
    }
}

/// Split `BASE_QUOTE`; missing parts come back empty
pub fn split_pair(symbol: &str) -> (&str, &str) {
    symbol.split_once('_').unwrap_or((symbol, ""))
}

/// Caller-supplied order fields, validated by `prepare_order`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderParams {
    pub symbol: String,
    pub amount: String,
    pub price: String,
    pub side: String,
    pub test: bool,
}

impl OrderParams {
    pub fn new<P: PairReference + ?Sized>(pair: &P) -> Self {
        Self {
            symbol: pair.pair_symbol().to_string(),
            ..Self::default()
        }
    }

    /// Amount in the traded token
    pub fn amount(mut self, amount: impl fmt::Display) -> Self {
        self.amount = amount.to_string();
        self
    }

    /// Price in the quote token
    pub fn price(mut self, price: impl fmt::Display) -> Self {
        self.price = price.to_string();
        self
    }

    /// `buy`/`sell`, `0`/`1`, or an [`OrderSide`]
    pub fn side(mut self, side: impl fmt::Display) -> Self {
        self.side = side.to_string();
        self
    }

    /// Ask the exchange to validate the order without matching it
    pub fn test(mut self, test: bool) -> Self {
        self.test = test;
        self
    }
}

/// A validated order, ready to be signed and sent
///
/// Fields are private: every `Order` has gone through [`Order::new`], so the
/// symbol is `BASE_QUOTE` and both price and amount are strictly positive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    symbol: String,
    side: OrderSide,
    price: Numeric,
    amount: Numeric,
    test: bool,
}

impl Order {
    pub fn new(
        symbol: impl Into<String>,
        side: OrderSide,
        price: Numeric,
        amount: Numeric,
        test: bool,
    ) -> Result<Self, ExchangeError> {
        let symbol: String = symbol.into();
        let symbol = symbol.trim().to_string();
        match symbol.split_once('_') {
            Some((base, quote)) if !base.is_empty() && !quote.is_empty() => {}
            _ => {
                return Err(ExchangeError::InvalidOrderParameters(format!(
                    "Symbol must look like BASE_QUOTE, got '{}'",
                    symbol
                )))
            }
        }
        ensure_positive(amount, "amount")?;
        ensure_positive(price, "price")?;

        Ok(Self {
            symbol,
            side,
            price,
            amount,
            test,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn side(&self) -> OrderSide {
        self.side
    }

    pub fn price(&self) -> Numeric {
        self.price
    }

    pub fn amount(&self) -> Numeric {
        self.amount
    }

    /// Simulate instead of submitting
    pub fn is_test(&self) -> bool {
        self.test
    }

    /// Method parameters sent with the place-order request
    pub fn request_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("symbol", self.symbol.clone()),
            ("side", self.side.code().to_string()),
            ("price", self.price.to_string()),
            ("amount", self.amount.to_string()),
        ]
    }

    pub fn base_symbol(&self) -> &str {
        split_pair(&self.symbol).0
    }

    pub fn quote_symbol(&self) -> &str {
        split_pair(&self.symbol).1
    }
}

fn ensure_positive(value: Numeric, field: &str) -> Result<(), ExchangeError> {
    if value.is_positive() {
        Ok(())
    } else {
        Err(ExchangeError::InvalidOrderParameters(format!(
            "Order {} must be positive, got {}",
            field, value
        )))
    }
}

impl PairReference for Order {
    fn pair_symbol(&self) -> &str {
        &self.symbol
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = match self.side {
            OrderSide::Buy => "Buy",
            OrderSide::Sell => "Sell",
        };
        write!(
            f,
            "Order({}{} | {} {} for {} {})",
            if self.test { "Test " } else { "" },
            side,
            self.amount.normalize(),
            self.base_symbol(),
            self.price.normalize(),
            self.quote_symbol()
        )
    }
}

/// Exchange acknowledgement of a placed order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAck {
    pub symbol: String,
    pub order_id: String,
    pub status: OrderStatus,
}

/// Outcome of `execute_order`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedOrder {
    pub order: Order,
    /// Parameters exactly as sent, including `key`, `timestamp` and `signature`
    pub signed: SignedParams,
    /// Present for live orders; test orders are only validated
    pub ack: Option<OrderAck>,
}

impl SubmittedOrder {
    pub fn timestamp(&self) -> u64 {
        self.signed.timestamp
    }

    pub fn signature(&self) -> &str {
        &self.signed.signature
    }

    pub fn order_id(&self) -> Option<&str> {
        self.ack.as_ref().map(|ack| ack.order_id.as_str())
    }
}

/// An order known to the exchange, as returned by the order queries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryOrder {
    pub order_id: String,
    pub symbol: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub trade_token_symbol: Option<String>,
    #[serde(default)]
    pub quote_token_symbol: Option<String>,
    pub side: OrderSide,
    pub price: Numeric,
    pub quantity: Numeric,
    #[serde(default)]
    pub amount: Option<Numeric>,
    #[serde(default)]
    pub executed_quantity: Option<Numeric>,
    #[serde(default)]
    pub executed_amount: Option<Numeric>,
    #[serde(default)]
    pub executed_percent: Option<Numeric>,
    #[serde(default)]
    pub executed_avg_price: Option<Numeric>,
    #[serde(default)]
    pub fee: Option<Numeric>,
    pub status: OrderStatus,
    #[serde(default, rename = "type")]
    pub order_type: Option<i32>,
    #[serde(default)]
    pub create_time: Option<i64>,
}

impl PairReference for HistoryOrder {
    fn pair_symbol(&self) -> &str {
        &self.symbol
    }
}

impl fmt::Display for HistoryOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HistoryOrder({} | {})", self.symbol, self.status)
    }
}

/// Page of `/api/v2/orders`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrdersPage {
    #[serde(default)]
    pub order: Vec<HistoryOrder>,
    #[serde(default)]
    pub total: Option<i64>,
}

/// One entry of a cancellation response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelledOrder {
    pub symbol: String,
    pub order_id: String,
    #[serde(default)]
    pub cancel_request: Option<String>,
    pub status: OrderStatus,
}

impl PairReference for CancelledOrder {
    fn pair_symbol(&self) -> &str {
        &self.symbol
    }
}

// Market data

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticker {
    pub symbol: String,
    pub trade_token_symbol: String,
    pub quote_token_symbol: String,
    #[serde(default)]
    pub trade_token: Option<String>,
    #[serde(default)]
    pub quote_token: Option<String>,
    pub open_price: Numeric,
    pub prev_close_price: Numeric,
    pub close_price: Numeric,
    pub price_change: Numeric,
    pub price_change_percent: Numeric,
    pub high_price: Numeric,
    pub low_price: Numeric,
    pub quantity: Numeric,
    pub amount: Numeric,
    #[serde(default)]
    pub price_precision: Option<u32>,
    #[serde(default)]
    pub quantity_precision: Option<u32>,
    #[serde(default)]
    pub open_time: Option<i64>,
    #[serde(default)]
    pub close_time: Option<i64>,
}

/// Best bid/ask of a market
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookTicker {
    pub symbol: String,
    pub bid_price: Numeric,
    pub bid_quantity: Numeric,
    pub ask_price: Numeric,
    pub ask_quantity: Numeric,
    #[serde(default)]
    pub height: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub timestamp: i64,
    pub price: Numeric,
    pub amount: Numeric,
    pub side: OrderSide,
}

/// `[price, quantity]`
pub type DepthLevel = (Numeric, Numeric);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookDepth {
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub asks: Vec<DepthLevel>,
    #[serde(default)]
    pub bids: Vec<DepthLevel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KlineInterval {
    Minute,
    Minute30,
    Hour,
    Hour6,
    Hour12,
    Day,
    Week,
}

impl KlineInterval {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Minute => "minute",
            Self::Minute30 => "minute30",
            Self::Hour => "hour",
            Self::Hour6 => "hour6",
            Self::Hour12 => "hour12",
            Self::Day => "day",
            Self::Week => "week",
        }
    }
}

impl fmt::Display for KlineInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column-oriented candle data: time, close, open, high, low, volume
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Klines {
    #[serde(default)]
    pub t: Vec<i64>,
    #[serde(default)]
    pub c: Vec<Numeric>,
    #[serde(default)]
    pub p: Vec<Numeric>,
    #[serde(default)]
    pub h: Vec<Numeric>,
    #[serde(default)]
    pub l: Vec<Numeric>,
    #[serde(default)]
    pub v: Vec<Numeric>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candle {
    /// Open time, seconds
    pub time: i64,
    pub open: Numeric,
    pub high: Numeric,
    pub low: Numeric,
    pub close: Numeric,
    pub volume: Numeric,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositWithdrawal {
    pub time: i64,
    pub token_symbol: String,
    pub amount: Numeric,
    /// 1 deposit, 2 withdrawal
    #[serde(rename = "type")]
    pub record_type: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DepositWithdrawalPage {
    #[serde(default)]
    pub record: Vec<DepositWithdrawal>,
    #[serde(default)]
    pub total: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRate {
    pub token_id: String,
    pub token_symbol: String,
    /// JSON number on the wire, read through its shortest decimal form
    #[serde(default)]
    pub usd_rate: Option<Numeric>,
    /// JSON number on the wire, read through its shortest decimal form
    #[serde(default)]
    pub cny_rate: Option<Numeric>,
    /// Rates in other fiat currencies, keyed as sent (`eurRate`, `gbpRate`, ...)
    #[serde(flatten)]
    pub other_rates: HashMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    pub available: Numeric,
    pub locked: Numeric,
}

impl AccountBalance {
    /// `None` if the sum can't be held exactly
    pub fn total(&self) -> Option<Numeric> {
        self.available.checked_add(self.locked)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthStepLimit {
    pub min: u32,
    pub max: u32,
}

/// Minimum order sizes per quote token and depth step bounds per market
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLimit {
    #[serde(default)]
    pub min_amount: HashMap<String, Numeric>,
    #[serde(default)]
    pub depth_steps_limit: HashMap<String, DepthStepLimit>,
}

/// Current trade mining cycle, keyed by quote token type (`1`..`4`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeMiningInfo {
    #[serde(default)]
    pub trade_pool_vx: HashMap<String, Numeric>,
    #[serde(default)]
    pub trade_pool_fee: HashMap<String, Numeric>,
}

/// Result of `test_connection`; either check may fail independently
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionStatus {
    pub server_time: Option<DateTime<Utc>>,
    pub usd_cny_rate: Option<Numeric>,
}

impl ConnectionStatus {
    pub fn is_connected(&self) -> bool {
        self.server_time.is_some() || self.usd_cny_rate.is_some()
    }
}

// Queries

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenCategory {
    Quote,
    All,
}

impl TokenCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Quote => "quote",
            Self::All => "all",
        }
    }
}

/// Filters for `get_all_tokens`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenQuery {
    pub category: Option<TokenCategory>,
    /// Fuzzy symbol match, e.g. `EPIC`
    pub symbol_like: Option<String>,
    pub offset: Option<u32>,
    /// Max 500
    pub limit: Option<u32>,
}

/// Filters for `get_orders`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderQuery {
    /// Account address (not a delegation address); required
    pub address: String,
    pub symbol: Option<String>,
    pub quote_token_symbol: Option<String>,
    pub trade_token_symbol: Option<String>,
    /// Seconds
    pub start_time: Option<i64>,
    /// Seconds
    pub end_time: Option<i64>,
    pub side: Option<OrderSide>,
    pub status: Option<OrderStatus>,
    pub offset: Option<u32>,
    /// Max 100
    pub limit: Option<u32>,
    /// Ask the exchange to count all matching orders
    pub total: bool,
}

impl OrderQuery {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn order(test: bool) -> Order {
        Order::new(
            "EPIC-002_BTC-000",
            OrderSide::Sell,
            Numeric::parse("0.00006000").unwrap(),
            Numeric::parse("5").unwrap(),
            test,
        )
        .unwrap()
    }

    #[test]
    fn test_order_new_rejects_invalid_fields() {
        let price = Numeric::parse("0.00006").unwrap();
        let amount = Numeric::from(5);
        for (symbol, price, amount) in [
            ("", price, amount),
            ("EPIC-002", price, amount),
            ("_BTC-000", price, amount),
            ("EPIC-002_BTC-000", Numeric::from(-1), amount),
            ("EPIC-002_BTC-000", price, Numeric::ZERO),
        ] {
            assert!(
                matches!(
                    Order::new(symbol, OrderSide::Buy, price, amount, false),
                    Err(ExchangeError::InvalidOrderParameters(_))
                ),
                "{} {} {}",
                symbol,
                price,
                amount
            );
        }
        assert_eq!(order(true).symbol(), "EPIC-002_BTC-000");
        assert!(order(true).is_test());
    }

    #[test]
    fn test_order_display() {
        assert_eq!(
            order(false).to_string(),
            "Order(Sell | 5 EPIC-002 for 0.00006 BTC-000)"
        );
        assert_eq!(
            order(true).to_string(),
            "Order(Test Sell | 5 EPIC-002 for 0.00006 BTC-000)"
        );
    }

    #[test]
    fn test_order_request_params_keep_exact_digits() {
        let params = order(false).request_params();
        assert_eq!(
            params,
            vec![
                ("symbol", "EPIC-002_BTC-000".to_string()),
                ("side", "1".to_string()),
                ("price", "0.00006000".to_string()),
                ("amount", "5".to_string()),
            ]
        );
    }

    #[test]
    fn test_trading_pair_symbols_from_raw_symbol() {
        let pair = TradingPair::new("VX_ETH-000");
        assert_eq!(pair.base_symbol(), "VX");
        assert_eq!(pair.quote_symbol(), "ETH-000");
        assert_eq!(pair.pair_symbol(), "VX_ETH-000");

        let odd = TradingPair::new("VX");
        assert_eq!(odd.base_symbol(), "VX");
        assert_eq!(odd.quote_symbol(), "");
    }

    #[test]
    fn test_pair_references_agree() {
        fn symbol_of<P: PairReference + ?Sized>(pair: &P) -> String {
            pair.pair_symbol().to_string()
        }
        let raw = "EPIC-002_BTC-000";
        assert_eq!(symbol_of(raw), symbol_of(&TradingPair::new(raw)));
        assert_eq!(symbol_of(raw), symbol_of(&order(false)));
        assert_eq!(symbol_of(raw), symbol_of(&raw.to_string()));
    }

    #[test]
    fn test_history_order_deserialization() {
        let order: HistoryOrder = serde_json::from_value(json!({
            "address": "vite_ff38174de69ddc63b2e05402e5c67c356d7d17e819a0ffadee",
            "orderId": "0dfbafac33fbccf5c65d44d5d80c1a4d",
            "symbol": "VX_ETH-000",
            "tradeTokenSymbol": "VX",
            "quoteTokenSymbol": "ETH-000",
            "side": 0,
            "price": "0.000228",
            "quantity": "100.0000",
            "amount": "0.02280000",
            "executedQuantity": "100.0000",
            "executedAmount": "0.02280000",
            "executedPercent": "1.00000000",
            "executedAvgPrice": "0.000228",
            "fee": "0.00004560",
            "status": 4,
            "type": 0,
            "createTime": 1586941713
        }))
        .unwrap();

        assert_eq!(order.side, OrderSide::Buy);
        assert_eq!(order.status, OrderStatus::Filled);
        assert!(!order.status.is_active());
        assert_eq!(order.fee.map(|f| f.value()), Some(dec!(0.0000456)));
        assert_eq!(order.order_type, Some(0));
    }

    #[test]
    fn test_unknown_status_code() {
        let ack: OrderAck = serde_json::from_value(json!({
            "symbol": "VX_ETH-000",
            "orderId": "abc",
            "status": 42
        }))
        .unwrap();
        assert_eq!(ack.status, OrderStatus::Unknown);
    }

    #[test]
    fn test_exchange_rate_keeps_other_currencies() {
        let rate: ExchangeRate = serde_json::from_value(json!({
            "tokenId": "tti_5649544520544f4b454e6e40",
            "tokenSymbol": "VITE",
            "usdRate": 0.0183,
            "cnyRate": 0.1296,
            "eurRate": 0.0169
        }))
        .unwrap();
        assert_eq!(rate.usd_rate.map(|r| r.value()), Some(dec!(0.0183)));
        assert!(rate.other_rates.contains_key("eurRate"));
        assert!(!rate.other_rates.contains_key("usdRate"));
    }

    #[test]
    fn test_order_limit_deserialization() {
        let limit: OrderLimit = serde_json::from_value(json!({
            "minAmount": {"BTC-000": "0.0001", "ETH-000": "0.01", "VITE": "100"},
            "depthStepsLimit": {"VX_ETH-000": {"min": 2, "max": 6}}
        }))
        .unwrap();
        assert_eq!(limit.min_amount["VITE"].value(), dec!(100));
        assert_eq!(limit.depth_steps_limit["VX_ETH-000"], DepthStepLimit { min: 2, max: 6 });
    }

    #[test]
    fn test_token_supply_beyond_decimal_range() {
        let tokens: Vec<Token> = serde_json::from_value(json!([
            {
                "tokenId": "tti_687d8a93915393b219212c73",
                "symbol": "ETH-000",
                "tokenDecimals": 18,
                "totalSupply": "1000000000000000000000000000000000"
            },
            {
                "tokenId": "tti_5649544520544f4b454e6e40",
                "symbol": "VITE",
                "totalSupply": 1000000000000000000u64
            }
        ]))
        .unwrap();
        assert_eq!(
            tokens[0].total_supply.as_deref(),
            Some("1000000000000000000000000000000000")
        );
        assert_eq!(tokens[1].total_supply.as_deref(), Some("1000000000000000000"));
    }

    #[test]
    fn test_account_balance_total() {
        let balance = AccountBalance {
            available: Numeric::parse("10.5").unwrap(),
            locked: Numeric::parse("4").unwrap(),
        };
        assert_eq!(balance.total().map(|t| t.value()), Some(dec!(14.5)));

        let huge = AccountBalance {
            available: Numeric::parse("79228162514264337593543950335").unwrap(),
            locked: Numeric::from(1),
        };
        assert_eq!(huge.total(), None);
    }

    #[test]
    fn test_connection_status() {
        let down = ConnectionStatus {
            server_time: None,
            usd_cny_rate: None,
        };
        assert!(!down.is_connected());
        let up = ConnectionStatus {
            usd_cny_rate: Some(Numeric::from(7)),
            ..down
        };
        assert!(up.is_connected());
    }
}
