//! Strategy module for trade decision making
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    ONE CYCLE (sync)                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Books A/B + positions                                      │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  ConversionEstimator.update(mid_a, mid_b) → conv            │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  EdgeEvaluator.evaluate(books, conv) → direction?           │
//! │       │                                                     │
//! │       ▼ (if direction)                                      │
//! │  max_pair_volume(buy, sell) ∧ visible depth → volume        │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  Decision::Go(PairTrade) | Decision::NoGo(reason)           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`would_breach`]: Position limit predicate for one leg
//! - [`max_pair_volume`]: Largest volume both legs can take
//! - [`ConversionEstimator`]: Smoothed B/A ratio
//! - [`EdgeEvaluator`]: Directional edges and dynamic threshold
//! - [`DecisionEngine`]: Composes the above, one [`Decision`] per cycle
//! - [`Strategy`]: Trait the trader drives

mod allocator;
mod edge;
mod engine;
mod estimator;
mod limits;
mod traits;
mod types;

pub use allocator::{max_pair_volume, scan_pair_volume};
pub use edge::{EdgeEvaluator, EdgeReport};
pub use engine::DecisionEngine;
pub use estimator::ConversionEstimator;
pub use limits::{position_of, would_breach};
pub use traits::Strategy;
pub use types::{Decision, Direction, NoTradeReason, PairTrade, TradeLeg};
