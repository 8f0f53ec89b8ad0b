//! Common test utilities and fixtures

#![allow(dead_code)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use share_class_arb::{AppConfig, OrderBook, PositionMap, PriceLevel};

pub const A: &str = "PHILIPS_A";
pub const B: &str = "PHILIPS_B";

/// Book with a single level per side
pub fn book(id: &str, bid: Decimal, ask: Decimal, size: Decimal) -> OrderBook {
    OrderBook {
        instrument_id: id.to_string(),
        bids: vec![PriceLevel::new(bid, size)],
        asks: vec![PriceLevel::new(ask, size)],
        timestamp: chrono::Utc::now(),
    }
}

/// Reference books: A 10.00 / 10.10, B 15.30 / 15.50
pub fn reference_books() -> (OrderBook, OrderBook) {
    (
        book(A, dec!(10.00), dec!(10.10), dec!(50)),
        book(B, dec!(15.30), dec!(15.50), dec!(50)),
    )
}

/// Books whose midpoint ratio is exactly 1.50 and show no edge
///
/// mid_a = 10.05, mid_b = 15.075
pub fn seeding_books() -> (OrderBook, OrderBook) {
    (
        book(A, dec!(10.00), dec!(10.10), dec!(50)),
        book(B, dec!(15.00), dec!(15.15), dec!(50)),
    )
}

pub fn positions(a: i64, b: i64) -> PositionMap {
    PositionMap::from([(A.to_string(), a), (B.to_string(), b)])
}

/// Limit 100, base volume 10, edge floor 0.01, smoothing 0.9
pub fn reference_config() -> AppConfig {
    AppConfig::default()
}

/// JSON-lines recording: one seeding frame, then B trades rich for two frames
pub const REPLAY: &str = r#"{"timestamp":"2024-01-02T09:00:00Z","books":[{"instrument_id":"PHILIPS_A","bids":[{"price":"10.00","size":"50"}],"asks":[{"price":"10.10","size":"50"}]},{"instrument_id":"PHILIPS_B","bids":[{"price":"15.00","size":"50"}],"asks":[{"price":"15.15","size":"50"}]}]}
{"timestamp":"2024-01-02T09:00:01Z","books":[{"instrument_id":"PHILIPS_A","bids":[{"price":"10.00","size":"50"}],"asks":[{"price":"10.10","size":"50"}]},{"instrument_id":"PHILIPS_B","bids":[{"price":"16.00","size":"50"}],"asks":[{"price":"16.20","size":"50"}]}]}
{"timestamp":"2024-01-02T09:00:02Z","books":[{"instrument_id":"PHILIPS_A","bids":[],"asks":[{"price":"10.10","size":"50"}]},{"instrument_id":"PHILIPS_B","bids":[{"price":"16.00","size":"50"}],"asks":[{"price":"16.20","size":"50"}]}]}
{"timestamp":"2024-01-02T09:00:03Z","books":[{"instrument_id":"PHILIPS_A","bids":[{"price":"10.00","size":"50"}],"asks":[{"price":"10.10","size":"50"}]},{"instrument_id":"PHILIPS_B","bids":[{"price":"16.00","size":"50"}],"asks":[{"price":"16.20","size":"50"}]}]}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_books() {
        let (a, b) = reference_books();
        assert_eq!(a.best_ask().unwrap().price, dec!(10.10));
        assert_eq!(b.best_bid().unwrap().price, dec!(15.30));
    }

    #[test]
    fn test_seeding_ratio() {
        let (a, b) = seeding_books();
        assert_eq!(b.midpoint().unwrap() / a.midpoint().unwrap(), dec!(1.5));
    }
}
