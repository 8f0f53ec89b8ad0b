//! Smoothed conversion ratio between the two share classes

use rust_decimal::Decimal;
use tracing::debug;

use crate::common::errors::{EngineError, Result};

/// Exponentially smoothed estimate of `mid(B) / mid(A)`
///
/// Uninitialized until the first update, which seeds the estimate with the
/// raw ratio. Later updates blend in each new ratio:
///
/// ```text
/// conv = λ · conv + (1 − λ) · ratio
/// ```
///
/// A larger λ adapts more slowly.
#[derive(Debug, Clone)]
pub struct ConversionEstimator {
    conv: Option<Decimal>,
    smoothing: Decimal,
    updates: u64,
}

impl ConversionEstimator {
    /// `smoothing` is λ and must lie in (0, 1); config validation enforces it.
    pub fn new(smoothing: Decimal) -> Self {
        Self {
            conv: None,
            smoothing,
            updates: 0,
        }
    }

    /// Current estimate, `None` before the first update
    pub fn current(&self) -> Option<Decimal> {
        self.conv
    }

    /// Number of updates applied so far
    pub fn updates(&self) -> u64 {
        self.updates
    }

    /// Fold a new pair of midpoints into the estimate and return it
    pub fn update(&mut self, mid_a: Decimal, mid_b: Decimal) -> Result<Decimal> {
        if mid_a <= Decimal::ZERO {
            return Err(EngineError::InvalidPrice(format!(
                "mid_a must be positive, got {}",
                mid_a
            )));
        }

        let ratio = mid_b
            .checked_div(mid_a)
            .ok_or_else(|| EngineError::overflow("mid_b / mid_a"))?;
        let conv = match self.conv {
            None => ratio,
            Some(prev) => self
                .smoothing
                .checked_mul(prev)
                .zip((Decimal::ONE - self.smoothing).checked_mul(ratio))
                .and_then(|(kept, fresh)| kept.checked_add(fresh))
                .ok_or_else(|| EngineError::overflow("smoothed ratio"))?,
        };

        self.conv = Some(conv);
        self.updates += 1;
        debug!(%ratio, %conv, updates = self.updates, "Conversion estimate updated");
        Ok(conv)
    }
}
