pub mod core;
pub mod exchanges;

pub use crate::core::{
    config::{ExchangeConfig, TimeSource},
    errors::ExchangeError,
    traits::{ExchangeConnector, MarketDataSource, OrderPlacer},
    types::*,
};
pub use crate::exchanges::vitex::{
    build_connector, Order, OrderParams, Token, TradingPair, VitexBuilder, VitexConnector,
};
