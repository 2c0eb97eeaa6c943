pub mod conversions;
pub mod types;

pub mod builder;
pub mod connector;
pub mod rest;

// Re-export main components
pub use builder::{build_connector, VitexBuilder};
pub use connector::{MarketData, Trading, VitexConnector, DEFAULT_PRECISION};
pub use rest::VitexRest;
pub use types::{
    AccountBalance, BookTicker, Candle, CancelledOrder, ConnectionStatus, DepositWithdrawal,
    ExchangeRate, HistoryOrder, KlineInterval, Klines, Order, OrderAck, OrderBookDepth,
    OrderLimit, OrderParams, OrderQuery, SubmittedOrder, Ticker, Token, TokenCategory,
    TokenQuery, Trade, TradeMiningInfo, TradingPair, VitexResponse,
};
