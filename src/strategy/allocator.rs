//! Limit-aware volume allocation for a pair of legs

use crate::common::errors::Result;
use crate::common::types::{PositionMap, Side};
use crate::strategy::limits::{position_of, would_breach};

/// Largest volume in `[1, base_volume]` that keeps both legs inside `limit`
///
/// The buy leg is checked as a bid and the sell leg as an ask. Returns 0
/// when even a single unit would breach one of the legs.
///
/// Each leg's constraint is affine in the volume, so the answer is the
/// smaller of the two headrooms capped at `base_volume`. This equals the
/// result of [`scan_pair_volume`].
pub fn max_pair_volume(
    buy_instrument: &str,
    sell_instrument: &str,
    positions: &PositionMap,
    base_volume: u32,
    limit: u32,
) -> Result<u32> {
    let limit = i64::from(limit);
    let buy_headroom = limit - position_of(positions, buy_instrument)?;
    let sell_headroom = limit + position_of(positions, sell_instrument)?;

    let volume = i64::from(base_volume).min(buy_headroom).min(sell_headroom);
    // clamp keeps the value inside [0, base_volume], which always fits in u32
    Ok(volume.clamp(0, i64::from(base_volume)) as u32)
}

/// Descending scan from `base_volume` to 1, asking the guard at each step
///
/// Reference form of [`max_pair_volume`].
pub fn scan_pair_volume(
    buy_instrument: &str,
    sell_instrument: &str,
    positions: &PositionMap,
    base_volume: u32,
    limit: u32,
) -> Result<u32> {
    for volume in (1..=base_volume).rev() {
        if !would_breach(buy_instrument, volume, Side::Bid, positions, limit)?
            && !would_breach(sell_instrument, volume, Side::Ask, positions, limit)?
        {
            return Ok(volume);
        }
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(a: i64, b: i64) -> PositionMap {
        PositionMap::from([("A".to_string(), a), ("B".to_string(), b)])
    }

    #[test]
    fn test_flat_positions_get_full_base_volume() {
        let pos = positions(0, 0);
        assert_eq!(max_pair_volume("A", "B", &pos, 10, 100).unwrap(), 10);
        assert_eq!(max_pair_volume("B", "A", &pos, 10, 100).unwrap(), 10);
    }

    #[test]
    fn test_near_limit_scales_down() {
        let pos = positions(95, -95);
        assert_eq!(max_pair_volume("A", "B", &pos, 10, 100).unwrap(), 5);
        assert_eq!(scan_pair_volume("A", "B", &pos, 10, 100).unwrap(), 5);
        // unwinding direction is unconstrained
        assert_eq!(max_pair_volume("B", "A", &pos, 10, 100).unwrap(), 10);
    }

    #[test]
    fn test_tightest_leg_wins() {
        let pos = positions(92, -97);
        assert_eq!(max_pair_volume("A", "B", &pos, 10, 100).unwrap(), 3);
    }

    #[test]
    fn test_at_limit_returns_zero() {
        let pos = positions(100, 0);
        assert_eq!(max_pair_volume("A", "B", &pos, 10, 100).unwrap(), 0);
        assert_eq!(scan_pair_volume("A", "B", &pos, 10, 100).unwrap(), 0);
    }

    #[test]
    fn test_beyond_limit_returns_zero() {
        let pos = positions(0, -120);
        assert_eq!(max_pair_volume("A", "B", &pos, 10, 100).unwrap(), 0);
        assert_eq!(scan_pair_volume("A", "B", &pos, 10, 100).unwrap(), 0);
    }

    #[test]
    fn test_missing_position_is_error() {
        let pos = PositionMap::from([("A".to_string(), 0)]);
        assert!(max_pair_volume("A", "B", &pos, 10, 100).is_err());
    }
}
