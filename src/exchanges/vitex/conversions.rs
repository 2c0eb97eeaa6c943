use crate::core::errors::ExchangeError;
use crate::core::types::{Numeric, OrderSide};
use crate::exchanges::vitex::types::{Candle, Klines, Order, OrderParams, OrderQuery, TokenQuery};
use chrono::{DateTime, TimeZone, Utc};

/// Owned request parameters, borrowed as `&[(&str, &str)]` when sent
pub type Params = Vec<(&'static str, String)>;

pub fn borrow_params<'a>(params: &'a [(&'static str, String)]) -> Vec<(&'a str, &'a str)> {
    params.iter().map(|(k, v)| (*k, v.as_str())).collect()
}

/// Exchange symbols carry an index suffix (`EPIC-002`); anything else is
/// looked up as a token id (`tti_...`).
pub fn token_lookup_param(token: &str) -> (&'static str, String) {
    if token.contains('-') {
        ("tokenSymbol", token.to_string())
    } else {
        ("tokenId", token.to_string())
    }
}

pub fn token_query_params(query: &TokenQuery) -> Params {
    let mut params = Params::new();
    if let Some(category) = query.category {
        params.push(("category", category.as_str().to_string()));
    }
    if let Some(symbol_like) = &query.symbol_like {
        params.push(("tokenSymbolLike", symbol_like.clone()));
    }
    push_opt(&mut params, "offset", query.offset);
    push_opt(&mut params, "limit", query.limit);
    params
}

pub fn order_query_params(query: &OrderQuery) -> Params {
    let mut params: Params = vec![("address", query.address.clone())];
    if let Some(symbol) = &query.symbol {
        params.push(("symbol", symbol.clone()));
    }
    if let Some(quote) = &query.quote_token_symbol {
        params.push(("quoteTokenSymbol", quote.clone()));
    }
    if let Some(trade) = &query.trade_token_symbol {
        params.push(("tradeTokenSymbol", trade.clone()));
    }
    push_opt(&mut params, "startTime", query.start_time);
    push_opt(&mut params, "endTime", query.end_time);
    push_opt(&mut params, "side", query.side.map(OrderSide::code));
    push_opt(&mut params, "status", query.status.map(|s| s.code()));
    push_opt(&mut params, "offset", query.offset);
    push_opt(&mut params, "limit", query.limit);
    if query.total {
        params.push(("total", "1".to_string()));
    }
    params
}

pub fn push_opt<T: ToString>(params: &mut Params, key: &'static str, value: Option<T>) {
    if let Some(value) = value {
        params.push((key, value.to_string()));
    }
}

/// Validate caller input and build an [`Order`]; no I/O
pub fn order_from_params(params: &OrderParams) -> Result<Order, ExchangeError> {
    let side: OrderSide = params.side.parse()?;
    let amount = Numeric::parse(&params.amount)?;
    let price = Numeric::parse(&params.price)?;
    Order::new(params.symbol.as_str(), side, price, amount, params.test)
}

/// Round amount and price to the market's precision
///
/// Fails if either rounds down to zero.
pub fn quantize_order(
    order: &Order,
    amount_precision: u32,
    price_precision: u32,
) -> Result<Order, ExchangeError> {
    Order::new(
        order.symbol(),
        order.side(),
        order.price().quantize(price_precision),
        order.amount().quantize(amount_precision),
        order.is_test(),
    )
}

pub fn millis_to_datetime(millis: u64) -> Result<DateTime<Utc>, ExchangeError> {
    let millis = i64::try_from(millis).map_err(|_| {
        ExchangeError::InvalidResponseFormat(format!("Timestamp out of range: {}", millis))
    })?;
    Utc.timestamp_millis_opt(millis).single().ok_or_else(|| {
        ExchangeError::InvalidResponseFormat(format!("Timestamp out of range: {}", millis))
    })
}

/// Zip the column arrays of a klines response into candles
pub fn convert_klines(klines: &Klines) -> Result<Vec<Candle>, ExchangeError> {
    let len = klines.t.len();
    let columns = [&klines.c, &klines.p, &klines.h, &klines.l, &klines.v];
    if columns.iter().any(|column| column.len() != len) {
        return Err(ExchangeError::InvalidResponseFormat(
            "Kline columns have different lengths".to_string(),
        ));
    }

    Ok((0..len)
        .map(|i| Candle {
            time: klines.t[i],
            open: klines.p[i],
            high: klines.h[i],
            low: klines.l[i],
            close: klines.c[i],
            volume: klines.v[i],
        })
        .collect())
}
