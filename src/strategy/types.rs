use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::types::{OrderRequest, Side};

/// Trade direction for the A/B pair
///
/// The two directions are mutually exclusive within a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// B rich against A: sell B at its bid, buy A at its ask
    SellBBuyA,
    /// B cheap against A: buy B at its ask, sell A at its bid
    BuyBSellA,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::SellBBuyA => write!(f, "SELL B / BUY A"),
            Direction::BuyBSellA => write!(f, "BUY B / SELL A"),
        }
    }
}

/// A single leg of a pair trade
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeLeg {
    pub instrument_id: String,
    pub side: Side,
    pub price: Decimal,
    pub volume: u32,
}

impl TradeLeg {
    pub fn new(instrument_id: impl Into<String>, side: Side, price: Decimal, volume: u32) -> Self {
        Self {
            instrument_id: instrument_id.into(),
            side,
            price,
            volume,
        }
    }

    /// Immediate-or-cancel order for this leg
    pub fn to_order(&self) -> OrderRequest {
        OrderRequest::ioc(self.instrument_id.clone(), self.price, self.volume, self.side)
    }
}

/// Sized two-leg trade ready for submission
///
/// Both legs carry the same volume. The buy leg is priced at the buy
/// instrument's best ask and the sell leg at the sell instrument's best bid,
/// so each crosses the spread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairTrade {
    pub direction: Direction,
    pub buy_leg: TradeLeg,
    pub sell_leg: TradeLeg,
    /// Edge of the chosen direction in B price units
    pub edge: Decimal,
    /// Threshold the edge had to clear
    pub threshold: Decimal,
}

impl PairTrade {
    pub fn volume(&self) -> u32 {
        self.buy_leg.volume
    }

    /// Legs in submission order: buy first, then sell
    pub fn legs(&self) -> [&TradeLeg; 2] {
        [&self.buy_leg, &self.sell_leg]
    }
}

/// Why a cycle produced no trade
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoTradeReason {
    /// An instrument had an empty bid or ask side
    IncompleteBook { instrument_id: String },
    /// Instrument A's midpoint equals its best bid; the ratio was not updated
    DegenerateMidpoint,
    /// Neither edge cleared the threshold
    NoEdge,
    /// A signal was present but limits or depth left no volume
    CapacityExhausted { direction: Direction },
}

impl std::fmt::Display for NoTradeReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoTradeReason::IncompleteBook { instrument_id } => {
                write!(f, "incomplete book for {}", instrument_id)
            }
            NoTradeReason::DegenerateMidpoint => write!(f, "mid_a equals bid_a"),
            NoTradeReason::NoEdge => write!(f, "no edge above threshold"),
            NoTradeReason::CapacityExhausted { direction } => {
                write!(f, "{} signal present, no capacity", direction)
            }
        }
    }
}

/// Outcome of one decision cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// No action should be taken
    NoGo(NoTradeReason),
    /// Submit both legs of the pair trade
    Go(PairTrade),
}

impl Decision {
    /// Returns true if this is a Go decision
    pub fn is_go(&self) -> bool {
        matches!(self, Self::Go(_))
    }

    pub fn trade(&self) -> Option<&PairTrade> {
        match self {
            Self::Go(trade) => Some(trade),
            Self::NoGo(_) => None,
        }
    }
}
