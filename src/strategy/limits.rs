//! Position limit guard

use crate::common::errors::{EngineError, Result};
use crate::common::types::{PositionMap, Side};

/// Current position for an instrument
///
/// Positions must be reported for every traded instrument, so a missing
/// entry is an error rather than an implicit flat position.
pub fn position_of(positions: &PositionMap, instrument_id: &str) -> Result<i64> {
    positions
        .get(instrument_id)
        .copied()
        .ok_or_else(|| EngineError::UnknownInstrument(instrument_id.to_string()))
}

/// Whether trading `volume` on `side` would take the position past `limit`
///
/// * `Side::Bid` breaches when `position + volume > limit`
/// * `Side::Ask` breaches when `position - volume < -limit`
pub fn would_breach(
    instrument_id: &str,
    volume: u32,
    side: Side,
    positions: &PositionMap,
    limit: u32,
) -> Result<bool> {
    let position = position_of(positions, instrument_id)?;
    let volume = i64::from(volume);
    let limit = i64::from(limit);

    Ok(match side {
        Side::Bid => position + volume > limit,
        Side::Ask => position - volume < -limit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(a: i64) -> PositionMap {
        PositionMap::from([("PHILIPS_A".to_string(), a)])
    }

    #[test]
    fn test_bid_side_limit() {
        let pos = positions(95);
        assert!(!would_breach("PHILIPS_A", 5, Side::Bid, &pos, 100).unwrap());
        assert!(would_breach("PHILIPS_A", 6, Side::Bid, &pos, 100).unwrap());
    }

    #[test]
    fn test_ask_side_limit() {
        let pos = positions(-95);
        assert!(!would_breach("PHILIPS_A", 5, Side::Ask, &pos, 100).unwrap());
        assert!(would_breach("PHILIPS_A", 6, Side::Ask, &pos, 100).unwrap());
        // selling from a long position has the full range available
        assert!(!would_breach("PHILIPS_A", 150, Side::Ask, &positions(60), 100).unwrap());
    }

    #[test]
    fn test_zero_volume_never_breaches_inside_limit() {
        for p in [-100, -1, 0, 1, 100] {
            let pos = positions(p);
            assert!(!would_breach("PHILIPS_A", 0, Side::Bid, &pos, 100).unwrap());
            assert!(!would_breach("PHILIPS_A", 0, Side::Ask, &pos, 100).unwrap());
        }
    }

    #[test]
    fn test_unknown_instrument() {
        let err = would_breach("PHILIPS_B", 1, Side::Bid, &positions(0), 100).unwrap_err();
        assert!(matches!(err, EngineError::UnknownInstrument(ref id) if id == "PHILIPS_B"));
    }
}
