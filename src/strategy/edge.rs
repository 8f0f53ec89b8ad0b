//! Directional edge and dynamic threshold
//!
//! All quantities are expressed in B's price units by converting A prices
//! through the current ratio estimate `conv`.
//!
//! ```text
//! pair_spread_cost  = conv · spread_a + spread_b
//! threshold         = max(edge_floor, fraction · pair_spread_cost)
//! edge_sell_b_buy_a = bid_b − conv · ask_a
//! edge_buy_b_sell_a = conv · bid_a − ask_b
//! ```

use rust_decimal::Decimal;

use crate::common::errors::{EngineError, Result};
use crate::common::types::{OrderBook, PriceLevel};
use crate::config::types::{SignalConfig, TieBreak};
use crate::strategy::types::Direction;

/// Edges and threshold computed for one snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeReport {
    pub edge_sell_b_buy_a: Decimal,
    pub edge_buy_b_sell_a: Decimal,
    pub pair_spread_cost: Decimal,
    pub threshold: Decimal,
    tie_break: TieBreak,
}

impl EdgeReport {
    /// The actionable direction, if any
    ///
    /// Sell B / buy A is checked first. With [`TieBreak::LargerEdge`] a
    /// strictly larger buy B / sell A edge takes precedence when both clear
    /// the threshold.
    pub fn direction(&self) -> Option<Direction> {
        let sell_b = self.edge_sell_b_buy_a > self.threshold;
        let buy_b = self.edge_buy_b_sell_a > self.threshold;

        match (sell_b, buy_b) {
            (true, true) => match self.tie_break {
                TieBreak::LargerEdge if self.edge_buy_b_sell_a > self.edge_sell_b_buy_a => {
                    Some(Direction::BuyBSellA)
                }
                _ => Some(Direction::SellBBuyA),
            },
            (true, false) => Some(Direction::SellBBuyA),
            (false, true) => Some(Direction::BuyBSellA),
            (false, false) => None,
        }
    }

    /// Edge of a given direction
    pub fn edge(&self, direction: Direction) -> Decimal {
        match direction {
            Direction::SellBBuyA => self.edge_sell_b_buy_a,
            Direction::BuyBSellA => self.edge_buy_b_sell_a,
        }
    }
}

/// Computes [`EdgeReport`]s from a pair of books
#[derive(Debug, Clone)]
pub struct EdgeEvaluator {
    edge_floor: Decimal,
    spread_cost_fraction: Decimal,
    tie_break: TieBreak,
}

impl EdgeEvaluator {
    pub fn new(config: &SignalConfig) -> Self {
        Self {
            edge_floor: config.edge_floor,
            spread_cost_fraction: config.spread_cost_fraction,
            tie_break: config.tie_break,
        }
    }

    /// Both books must be two-sided
    pub fn evaluate(
        &self,
        book_a: &OrderBook,
        book_b: &OrderBook,
        conv: Decimal,
    ) -> Result<EdgeReport> {
        let (bid_a, ask_a) = top_of_book(book_a)?;
        let (bid_b, ask_b) = top_of_book(book_b)?;

        let spread_a = checked(ask_a.price.checked_sub(bid_a.price), "spread_a")?;
        let spread_b = checked(ask_b.price.checked_sub(bid_b.price), "spread_b")?;
        let pair_spread_cost = checked(
            conv.checked_mul(spread_a).and_then(|c| c.checked_add(spread_b)),
            "pair spread cost",
        )?;
        let threshold = self.edge_floor.max(checked(
            self.spread_cost_fraction.checked_mul(pair_spread_cost),
            "threshold",
        )?);

        let edge_sell_b_buy_a = checked(
            conv.checked_mul(ask_a.price).and_then(|cost| bid_b.price.checked_sub(cost)),
            "sell B / buy A edge",
        )?;
        let edge_buy_b_sell_a = checked(
            conv.checked_mul(bid_a.price).and_then(|proceeds| proceeds.checked_sub(ask_b.price)),
            "buy B / sell A edge",
        )?;

        Ok(EdgeReport {
            edge_sell_b_buy_a,
            edge_buy_b_sell_a,
            pair_spread_cost,
            threshold,
            tie_break: self.tie_break,
        })
    }
}

fn checked(value: Option<Decimal>, context: &str) -> Result<Decimal> {
    value.ok_or_else(|| EngineError::overflow(context))
}

pub(crate) fn top_of_book(book: &OrderBook) -> Result<(&PriceLevel, &PriceLevel)> {
    match (book.best_bid(), book.best_ask()) {
        (Some(bid), Some(ask)) => Ok((bid, ask)),
        _ => Err(EngineError::IncompleteBook(book.instrument_id.clone())),
    }
}
