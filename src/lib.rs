//! Share-class arbitrage decision engine
//!
//! Trades two share classes of the same underlying against each other:
//! estimates the fair conversion ratio between their midpoints, measures the
//! edge in each direction against a spread-scaled threshold and sizes a
//! two-leg IOC order pair inside per-instrument position limits.

pub mod common;
pub mod config;
pub mod exchange;
pub mod strategy;
pub mod trader;

// Re-export commonly used types
pub use common::errors::{EngineError, Result};
pub use common::traits::Exchange;
pub use common::types::{OrderAck, OrderBook, OrderRequest, OrderType, PositionMap, PriceLevel, Side};
pub use config::types::AppConfig;
pub use exchange::{PaperExchange, ReplayExchange, ReplayFrame};
pub use trader::{Trader, TraderStats};

// Strategy types
pub use strategy::{
    max_pair_volume, would_breach, ConversionEstimator, Decision, DecisionEngine, Direction,
    EdgeEvaluator, EdgeReport, NoTradeReason, PairTrade, Strategy, TradeLeg,
};
