//! End-to-end decision scenarios for the share-class engine
//!
//! Each test seeds the conversion estimate at exactly 1.50 with a no-edge
//! snapshot and then feeds the scenario's books.

mod common;

use common::*;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use share_class_arb::{
    Decision, DecisionEngine, Direction, EdgeEvaluator, NoTradeReason, Side, TradeLeg,
};

fn seeded_engine() -> DecisionEngine {
    let mut engine = DecisionEngine::new(&reference_config());
    let (a, b) = seeding_books();
    let decision = engine.decide(&a, &b, &positions(0, 0)).unwrap();
    assert_eq!(decision, Decision::NoGo(NoTradeReason::NoEdge));
    assert_eq!(engine.conversion(), Some(dec!(1.5)));
    engine
}

#[test]
fn scenario_reference_edges_at_fixed_ratio() {
    let (a, b) = reference_books();
    let report = EdgeEvaluator::new(&reference_config().signal)
        .evaluate(&a, &b, dec!(1.50))
        .unwrap();

    assert_eq!(report.edge_sell_b_buy_a, dec!(0.15));
    assert_eq!(report.edge_buy_b_sell_a, dec!(-0.50));
    assert_eq!(report.pair_spread_cost, dec!(0.35));
    assert_eq!(report.threshold, dec!(0.0875));
    assert_eq!(report.direction(), Some(Direction::SellBBuyA));
}

#[test_log::test]
fn scenario_flat_positions_trade_full_base_volume() {
    let mut engine = seeded_engine();
    let (a, b) = reference_books();

    let decision = engine.decide(&a, &b, &positions(0, 0)).unwrap();

    let trade = decision.trade().expect("expected a trade");
    assert_eq!(trade.direction, Direction::SellBBuyA);
    assert_eq!(trade.buy_leg, TradeLeg::new(A, Side::Bid, dec!(10.10), 10));
    assert_eq!(trade.sell_leg, TradeLeg::new(B, Side::Ask, dec!(15.30), 10));
    assert!(trade.edge > trade.threshold);
}

#[test_log::test]
fn scenario_near_limit_scales_volume_down() {
    let mut engine = seeded_engine();
    let (a, b) = reference_books();

    let decision = engine.decide(&a, &b, &positions(95, -95)).unwrap();

    let trade = decision.trade().expect("expected a trade");
    assert_eq!(trade.volume(), 5);
    assert_eq!(trade.buy_leg.volume, 5);
    assert_eq!(trade.sell_leg.volume, 5);
}

#[test_log::test]
fn scenario_at_limit_reports_no_capacity() {
    let mut engine = seeded_engine();
    let (a, b) = reference_books();

    let decision = engine.decide(&a, &b, &positions(100, -100)).unwrap();

    assert_eq!(
        decision,
        Decision::NoGo(NoTradeReason::CapacityExhausted {
            direction: Direction::SellBBuyA
        })
    );
}

#[test_log::test]
fn scenario_empty_bids_skip_cycle_without_update() {
    let mut engine = seeded_engine();
    let (mut a, b) = reference_books();
    a.bids.clear();

    let decision = engine.decide(&a, &b, &positions(0, 0)).unwrap();

    assert_eq!(
        decision,
        Decision::NoGo(NoTradeReason::IncompleteBook {
            instrument_id: A.to_string()
        })
    );
    assert_eq!(engine.conversion(), Some(dec!(1.5)));
}

#[test]
fn scenario_empty_book_before_first_update_leaves_estimate_unset() {
    let mut engine = DecisionEngine::new(&reference_config());
    let (a, mut b) = reference_books();
    b.asks.clear();

    let decision = engine.decide(&a, &b, &positions(0, 0)).unwrap();

    assert!(!decision.is_go());
    assert_eq!(engine.conversion(), None);
}

#[test_log::test]
fn scenario_zero_spread_on_a_skips_ratio_update() {
    let mut engine = seeded_engine();
    let a = book(A, dec!(10.00), dec!(10.00), dec!(50));
    let b = book(B, dec!(16.00), dec!(16.20), dec!(50));

    let decision = engine.decide(&a, &b, &positions(0, 0)).unwrap();

    assert_eq!(decision, Decision::NoGo(NoTradeReason::DegenerateMidpoint));
    assert_eq!(engine.conversion(), Some(dec!(1.5)));
}

#[test]
fn scenario_buy_b_sell_a() {
    let mut engine = seeded_engine();
    let a = book(A, dec!(10.00), dec!(10.10), dec!(50));
    let b = book(B, dec!(14.60), dec!(14.70), dec!(8));

    let decision = engine.decide(&a, &b, &positions(0, 0)).unwrap();

    let trade = decision.trade().expect("expected a trade");
    assert_eq!(trade.direction, Direction::BuyBSellA);
    assert_eq!(trade.buy_leg.instrument_id, B);
    assert_eq!(trade.buy_leg.price, dec!(14.70));
    assert_eq!(trade.sell_leg.instrument_id, A);
    assert_eq!(trade.sell_leg.price, dec!(10.00));
    // capped by the 8 lots displayed at B's ask
    assert_eq!(trade.volume(), 8);
}

#[test]
fn scenario_identical_snapshots_give_identical_decisions() {
    let mut engine = seeded_engine();
    let (a, b) = reference_books();
    let pos = positions(0, 0);

    let first = engine.decide(&a, &b, &pos).unwrap();
    let conv_after_first = engine.conversion().unwrap();
    let second = engine.decide(&a, &b, &pos).unwrap();
    let conv_after_second = engine.conversion().unwrap();

    let ratio = b.midpoint().unwrap() / a.midpoint().unwrap();
    assert_eq!(first.trade().map(|t| t.direction), second.trade().map(|t| t.direction));
    assert_eq!(first.trade().map(|t| t.volume()), second.trade().map(|t| t.volume()));
    // conv moves toward the snapshot ratio, never past it
    assert!(conv_after_first < conv_after_second);
    assert!(conv_after_second < ratio);
}

#[test]
fn missing_position_is_an_error_not_a_decision() {
    let mut engine = seeded_engine();
    let (a, b) = reference_books();
    let pos = share_class_arb::PositionMap::from([(A.to_string(), 0)]);

    assert!(engine.decide(&a, &b, &pos).is_err());
}
