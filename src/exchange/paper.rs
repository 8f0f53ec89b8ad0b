//! In-memory exchange with immediate-or-cancel matching
//!
//! Books are set from outside (tests, replay); orders match against the
//! displayed opposite side and consume its liquidity. Positions and cash are
//! tracked so PnL can be marked to the current midpoints.

use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

use crate::common::errors::{EngineError, Result};
use crate::common::traits::Exchange;
use crate::common::types::{OrderAck, OrderBook, OrderRequest, OrderType, PositionMap, Side};
use crate::strategy::would_breach;

/// Paper-trading exchange
#[derive(Debug, Clone, Default)]
pub struct PaperExchange {
    books: HashMap<String, OrderBook>,
    positions: PositionMap,
    cash: Decimal,
    /// Orders that would breach this limit are rejected whole
    position_limit: Option<u32>,
    next_order_id: u64,
}

impl PaperExchange {
    /// Exchange tracking the given instruments, all flat with empty books
    pub fn new<I, S>(instruments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut exchange = Self::default();
        for id in instruments {
            let id = id.into();
            exchange.books.insert(id.clone(), OrderBook::empty(id.clone()));
            exchange.positions.insert(id, 0);
        }
        exchange
    }

    /// Reject orders that would take a position past `limit`
    pub fn with_position_limit(mut self, limit: u32) -> Self {
        self.position_limit = Some(limit);
        self
    }

    /// Replace the book for an instrument, registering it if new
    pub fn set_book(&mut self, book: OrderBook) {
        self.positions.entry(book.instrument_id.clone()).or_insert(0);
        self.books.insert(book.instrument_id.clone(), book);
    }

    pub fn set_position(&mut self, instrument_id: impl Into<String>, position: i64) {
        self.positions.insert(instrument_id.into(), position);
    }

    pub fn book(&self, instrument_id: &str) -> Option<&OrderBook> {
        self.books.get(instrument_id)
    }

    pub fn positions(&self) -> &PositionMap {
        &self.positions
    }

    pub fn cash(&self) -> Decimal {
        self.cash
    }

    /// Cash plus every position marked at its book midpoint
    ///
    /// Instruments without a two-sided book contribute nothing.
    pub fn pnl(&self) -> Decimal {
        self.positions.iter().fold(self.cash, |acc, (id, position)| {
            match self.books.get(id).and_then(OrderBook::midpoint) {
                Some(mid) => acc + mid * Decimal::from(*position),
                None => acc,
            }
        })
    }

    /// Match an IOC order and return the filled volume
    fn execute(&mut self, order: &OrderRequest) -> Result<u32> {
        if order.order_type != OrderType::Ioc {
            return Err(EngineError::Exchange(format!(
                "paper exchange only accepts IOC orders, got {:?}",
                order.order_type
            )));
        }

        if let Some(limit) = self.position_limit {
            if would_breach(&order.instrument_id, order.volume, order.side, &self.positions, limit)? {
                warn!(
                    instrument = %order.instrument_id,
                    side = %order.side,
                    volume = order.volume,
                    "Order rejected: position limit"
                );
                return Err(EngineError::Exchange(format!(
                    "order on {} would breach position limit {}",
                    order.instrument_id, limit
                )));
            }
        }

        let book = self
            .books
            .get_mut(&order.instrument_id)
            .ok_or_else(|| EngineError::UnknownInstrument(order.instrument_id.clone()))?;

        let resting = match order.side {
            Side::Bid => &mut book.asks,
            Side::Ask => &mut book.bids,
        };

        let mut remaining = order.volume;
        let mut notional = Decimal::ZERO;
        for level in resting.iter_mut() {
            if remaining == 0 {
                break;
            }
            let marketable = match order.side {
                Side::Bid => level.price <= order.price,
                Side::Ask => level.price >= order.price,
            };
            if !marketable {
                break;
            }

            let available = level.size.trunc().to_u32().unwrap_or(u32::MAX);
            let take = remaining.min(available);
            level.size -= Decimal::from(take);
            notional += level.price * Decimal::from(take);
            remaining -= take;
        }
        resting.retain(|level| level.size > Decimal::ZERO);

        let filled = order.volume - remaining;
        let signed = i64::from(filled);
        let position = self.positions.entry(order.instrument_id.clone()).or_insert(0);
        match order.side {
            Side::Bid => {
                *position += signed;
                self.cash -= notional;
            }
            Side::Ask => {
                *position -= signed;
                self.cash += notional;
            }
        }

        Ok(filled)
    }
}

#[async_trait]
impl Exchange for PaperExchange {
    async fn get_positions(&mut self) -> Result<PositionMap> {
        Ok(self.positions.clone())
    }

    async fn get_pnl(&mut self) -> Result<Option<Decimal>> {
        Ok(Some(self.pnl()))
    }

    async fn get_last_price_book(&mut self, instrument_id: &str) -> Result<OrderBook> {
        self.books
            .get(instrument_id)
            .cloned()
            .ok_or_else(|| EngineError::UnknownInstrument(instrument_id.to_string()))
    }

    #[instrument(skip(self), fields(instrument = %order.instrument_id))]
    async fn insert_order(&mut self, order: &OrderRequest) -> Result<OrderAck> {
        let filled = self.execute(order)?;
        self.next_order_id += 1;

        debug!(
            order_id = self.next_order_id,
            side = %order.side,
            price = %order.price,
            volume = order.volume,
            filled,
            "Paper order executed"
        );

        Ok(OrderAck {
            order_id: self.next_order_id,
            filled,
        })
    }

    fn venue_name(&self) -> &'static str {
        "paper"
    }
}
