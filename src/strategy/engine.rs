//! Per-cycle trade decision
//!
//! Composes the conversion estimator, edge evaluator and volume allocator
//! into exactly one [`Decision`] per snapshot.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::common::errors::{EngineError, Result};
use crate::common::types::{OrderBook, PositionMap, Side};
use crate::config::types::AppConfig;
use crate::strategy::allocator::max_pair_volume;
use crate::strategy::edge::{top_of_book, EdgeEvaluator};
use crate::strategy::estimator::ConversionEstimator;
use crate::strategy::traits::Strategy;
use crate::strategy::types::{Decision, Direction, NoTradeReason, PairTrade, TradeLeg};

/// Decision engine for one A/B share-class pair
///
/// The smoothed conversion ratio is the only state carried between cycles.
/// Skipped cycles (incomplete book, degenerate midpoint) leave it untouched.
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    instrument_a: String,
    instrument_b: String,
    position_limit: u32,
    base_volume: u32,
    estimator: ConversionEstimator,
    evaluator: EdgeEvaluator,
}

impl DecisionEngine {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            instrument_a: config.pair.instrument_a.clone(),
            instrument_b: config.pair.instrument_b.clone(),
            position_limit: config.risk.position_limit,
            base_volume: config.risk.base_volume,
            estimator: ConversionEstimator::new(config.signal.smoothing),
            evaluator: EdgeEvaluator::new(&config.signal),
        }
    }

    /// Current conversion estimate (B per A)
    pub fn conversion(&self) -> Option<Decimal> {
        self.estimator.current()
    }

    pub fn instrument_a(&self) -> &str {
        &self.instrument_a
    }

    pub fn instrument_b(&self) -> &str {
        &self.instrument_b
    }

    /// Decide what to trade for one snapshot of both books
    ///
    /// Errors are limited to malformed inputs: a book for the wrong
    /// instrument, a position missing for a traded instrument, a
    /// non-positive midpoint or prices outside the `Decimal` range. Every
    /// market condition yields a [`Decision`].
    pub fn decide(
        &mut self,
        book_a: &OrderBook,
        book_b: &OrderBook,
        positions: &PositionMap,
    ) -> Result<Decision> {
        for (book, expected) in [(book_a, &self.instrument_a), (book_b, &self.instrument_b)] {
            if book.instrument_id != *expected {
                return Err(EngineError::UnknownInstrument(format!(
                    "{} (expected book for {})",
                    book.instrument_id, expected
                )));
            }
        }

        for book in [book_a, book_b] {
            if !book.is_two_sided() {
                debug!(instrument = %book.instrument_id, "Order book is one-sided, skipping cycle");
                return Ok(Decision::NoGo(NoTradeReason::IncompleteBook {
                    instrument_id: book.instrument_id.clone(),
                }));
            }
        }

        let (bid_a, ask_a) = top_of_book(book_a)?;
        let (bid_b, ask_b) = top_of_book(book_b)?;

        let mid_a =
            midpoint(bid_a.price, ask_a.price).ok_or_else(|| EngineError::overflow("mid_a"))?;
        let mid_b =
            midpoint(bid_b.price, ask_b.price).ok_or_else(|| EngineError::overflow("mid_b"))?;

        if mid_a == bid_a.price {
            debug!(%mid_a, "mid_a equals bid_a, skipping cycle");
            return Ok(Decision::NoGo(NoTradeReason::DegenerateMidpoint));
        }

        let conv = self.estimator.update(mid_a, mid_b)?;
        let report = self.evaluator.evaluate(book_a, book_b, conv)?;

        debug!(
            %conv,
            edge_sell_b_buy_a = %report.edge_sell_b_buy_a,
            edge_buy_b_sell_a = %report.edge_buy_b_sell_a,
            threshold = %report.threshold,
            "Edges evaluated"
        );

        let Some(direction) = report.direction() else {
            return Ok(Decision::NoGo(NoTradeReason::NoEdge));
        };

        let (buy_book, sell_book) = match direction {
            Direction::SellBBuyA => (book_a, book_b),
            Direction::BuyBSellA => (book_b, book_a),
        };
        let (_, buy_ask) = top_of_book(buy_book)?;
        let (sell_bid, _) = top_of_book(sell_book)?;

        let pair_volume = max_pair_volume(
            &buy_book.instrument_id,
            &sell_book.instrument_id,
            positions,
            self.base_volume,
            self.position_limit,
        )?;
        let depth = whole_units(buy_ask.size).min(whole_units(sell_bid.size));
        let volume = pair_volume.min(depth);

        if volume == 0 {
            info!(
                %direction,
                pair_volume,
                depth,
                "Arbitrage signal present, but volume or position limit allow no trade"
            );
            return Ok(Decision::NoGo(NoTradeReason::CapacityExhausted { direction }));
        }

        let trade = PairTrade {
            direction,
            buy_leg: TradeLeg::new(&buy_book.instrument_id, Side::Bid, buy_ask.price, volume),
            sell_leg: TradeLeg::new(&sell_book.instrument_id, Side::Ask, sell_bid.price, volume),
            edge: report.edge(direction),
            threshold: report.threshold,
        };

        info!(
            %direction,
            buy = %trade.buy_leg.instrument_id,
            buy_price = %trade.buy_leg.price,
            sell = %trade.sell_leg.instrument_id,
            sell_price = %trade.sell_leg.price,
            volume,
            edge = %trade.edge,
            "Arbitrage opportunity"
        );

        Ok(Decision::Go(trade))
    }
}

impl Strategy for DecisionEngine {
    fn name(&self) -> &str {
        "share_class_arb"
    }

    fn instruments(&self) -> [&str; 2] {
        [&self.instrument_a, &self.instrument_b]
    }

    fn on_snapshot(
        &mut self,
        book_a: &OrderBook,
        book_b: &OrderBook,
        positions: &PositionMap,
    ) -> Result<Decision> {
        self.decide(book_a, book_b, positions)
    }

    fn conversion(&self) -> Option<Decimal> {
        self.estimator.current()
    }
}

fn midpoint(bid: Decimal, ask: Decimal) -> Option<Decimal> {
    bid.checked_add(ask).map(|sum| sum / Decimal::TWO)
}

/// Displayed size truncated to whole tradeable units
fn whole_units(size: Decimal) -> u32 {
    if size <= Decimal::ZERO {
        return 0;
    }
    size.trunc().to_u32().unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::PriceLevel;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn book(id: &str, bid: (Decimal, Decimal), ask: (Decimal, Decimal)) -> OrderBook {
        OrderBook {
            instrument_id: id.to_string(),
            bids: vec![PriceLevel::new(bid.0, bid.1)],
            asks: vec![PriceLevel::new(ask.0, ask.1)],
            timestamp: Utc::now(),
        }
    }

    fn flat() -> PositionMap {
        PositionMap::from([("PHILIPS_A".to_string(), 0), ("PHILIPS_B".to_string(), 0)])
    }

    #[test]
    fn test_whole_units() {
        assert_eq!(whole_units(dec!(7.9)), 7);
        assert_eq!(whole_units(dec!(0.5)), 0);
        assert_eq!(whole_units(dec!(-3)), 0);
        assert_eq!(whole_units(Decimal::from(10_000_000_000u64)), u32::MAX);
    }

    #[test]
    fn test_depth_caps_volume() {
        let mut engine = DecisionEngine::new(&AppConfig::default());
        // mid ratio 15.15 / 10.10 seeds conv at exactly 1.5
        engine
            .decide(
                &book("PHILIPS_A", (dec!(10.00), dec!(50)), (dec!(10.20), dec!(50))),
                &book("PHILIPS_B", (dec!(15.00), dec!(50)), (dec!(15.30), dec!(50))),
                &flat(),
            )
            .unwrap();
        assert_eq!(engine.conversion(), Some(dec!(1.5)));

        // B jumps: sell B / buy A, but only 3 units displayed at A's ask
        let decision = engine
            .decide(
                &book("PHILIPS_A", (dec!(10.00), dec!(50)), (dec!(10.20), dec!(3))),
                &book("PHILIPS_B", (dec!(16.00), dec!(40)), (dec!(16.30), dec!(50))),
                &flat(),
            )
            .unwrap();

        let trade = decision.trade().expect("expected a trade");
        assert_eq!(trade.direction, Direction::SellBBuyA);
        assert_eq!(trade.volume(), 3);
        assert_eq!(trade.sell_leg.volume, 3);
    }

    #[test]
    fn test_zero_depth_is_capacity_exhausted() {
        let mut engine = DecisionEngine::new(&AppConfig::default());
        engine
            .decide(
                &book("PHILIPS_A", (dec!(10.00), dec!(50)), (dec!(10.20), dec!(50))),
                &book("PHILIPS_B", (dec!(15.00), dec!(50)), (dec!(15.30), dec!(50))),
                &flat(),
            )
            .unwrap();

        let decision = engine
            .decide(
                &book("PHILIPS_A", (dec!(10.00), dec!(50)), (dec!(10.20), dec!(0.4))),
                &book("PHILIPS_B", (dec!(16.00), dec!(40)), (dec!(16.30), dec!(50))),
                &flat(),
            )
            .unwrap();

        assert_eq!(
            decision,
            Decision::NoGo(NoTradeReason::CapacityExhausted {
                direction: Direction::SellBBuyA
            })
        );
    }

    #[test]
    fn test_strategy_reports_instruments() {
        let engine = DecisionEngine::new(&AppConfig::default());
        assert_eq!(engine.instruments(), ["PHILIPS_A", "PHILIPS_B"]);
        assert_eq!(engine.name(), "share_class_arb");
    }

    #[test]
    fn test_swapped_books_are_rejected() {
        let mut engine = DecisionEngine::new(&AppConfig::default());
        let a = book("PHILIPS_A", (dec!(10.00), dec!(50)), (dec!(10.10), dec!(50)));
        let b = book("PHILIPS_B", (dec!(15.00), dec!(50)), (dec!(15.15), dec!(50)));

        let result = engine.decide(&b, &a, &flat());

        assert!(matches!(
            result,
            Err(EngineError::UnknownInstrument(ref msg)) if msg.starts_with("PHILIPS_B")
        ));
        assert_eq!(engine.conversion(), None);
    }

    #[test]
    fn test_extreme_quotes_fail_the_cycle_without_panicking() {
        let mut engine = DecisionEngine::new(&AppConfig::default());
        engine
            .decide(
                &book("PHILIPS_A", (dec!(10.00), dec!(50)), (dec!(10.10), dec!(50))),
                &book("PHILIPS_B", (dec!(15.00), dec!(50)), (dec!(15.15), dec!(50))),
                &flat(),
            )
            .unwrap();

        // mid_a = 1e-28 and mid_b near 1e12: the ratio does not fit in a Decimal
        let result = engine.decide(
            &book("PHILIPS_A", (dec!(0), dec!(50)), (Decimal::new(2, 28), dec!(50))),
            &book(
                "PHILIPS_B",
                (dec!(1000000000000), dec!(50)),
                (dec!(1000000000001), dec!(50)),
            ),
            &flat(),
        );

        assert!(matches!(result, Err(EngineError::InvalidPrice(_))));
        assert_eq!(engine.conversion(), Some(dec!(1.5)));
    }
}
