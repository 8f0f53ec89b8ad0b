//! Trait definitions for exchange collaborators

use async_trait::async_trait;
use rust_decimal::Decimal;

#[cfg(test)]
use mockall::automock;

use super::errors::Result;
use super::types::{OrderAck, OrderBook, OrderRequest, PositionMap};

/// Trait for the exchange the engine trades against
///
/// Everything the decision loop reads or writes goes through this trait:
/// positions, order books and IOC order submission. Calls are awaited one at
/// a time by the trader, so implementations need no internal ordering.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Exchange: Send {
    /// Called once at the start of every cycle
    ///
    /// Returns `false` when no further market data will arrive and the
    /// trader should stop. Live connections keep the default.
    async fn begin_cycle(&mut self) -> Result<bool> {
        Ok(true)
    }

    /// Current signed positions for all tracked instruments
    async fn get_positions(&mut self) -> Result<PositionMap>;

    /// Running PnL, if the venue reports one
    async fn get_pnl(&mut self) -> Result<Option<Decimal>>;

    /// Latest order book for an instrument
    ///
    /// Empty `bids`/`asks` are a valid "no quote" answer.
    async fn get_last_price_book(&mut self, instrument_id: &str) -> Result<OrderBook>;

    /// Submit an order
    async fn insert_order(&mut self, order: &OrderRequest) -> Result<OrderAck>;

    /// Name used in logs
    fn venue_name(&self) -> &'static str;
}
