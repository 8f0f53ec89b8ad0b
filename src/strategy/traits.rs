use rust_decimal::Decimal;

use crate::common::errors::Result;
use crate::common::types::{OrderBook, PositionMap};
use crate::strategy::types::Decision;

/// Core strategy trait
///
/// A strategy watches exactly two instruments and turns one snapshot of
/// both books plus current positions into a [`Decision`].
///
/// # Implementation Notes
///
/// - `on_snapshot` runs inline in the trading loop and must not block
/// - Internal state (the smoothed ratio) is owned by the strategy
/// - Positions come from the exchange each cycle and are read-only here
pub trait Strategy: Send {
    /// Unique identifier for this strategy
    fn name(&self) -> &str;

    /// Instrument ids `[a, b]` whose books are passed to `on_snapshot`
    fn instruments(&self) -> [&str; 2];

    /// Called once per cycle with fresh books for both instruments
    ///
    /// # Returns
    /// * `Decision::NoGo(reason)` - No action this cycle
    /// * `Decision::Go(trade)` - Submit both legs
    fn on_snapshot(
        &mut self,
        book_a: &OrderBook,
        book_b: &OrderBook,
        positions: &PositionMap,
    ) -> Result<Decision>;

    /// Current fair-value ratio estimate, if the strategy keeps one
    fn conversion(&self) -> Option<Decimal> {
        None
    }

    /// Called when the trader stops
    ///
    /// Default implementation does nothing.
    fn on_shutdown(&mut self) {}
}
