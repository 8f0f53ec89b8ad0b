//! Market and order types shared by the engine and exchange adapters

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

use super::errors::EngineError;

/// Signed position per instrument id
pub type PositionMap = HashMap<String, i64>;

/// Order side as the exchange names it
///
/// `Bid` increases the position, `Ask` decreases it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Bid,
    Ask,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Bid => write!(f, "bid"),
            Side::Ask => write!(f, "ask"),
        }
    }
}

impl FromStr for Side {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bid" | "buy" => Ok(Side::Bid),
            "ask" | "sell" => Ok(Side::Ask),
            _ => Err(EngineError::InvalidSide(s.to_string())),
        }
    }
}

/// A single price level in an order book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceLevel {
    /// Limit price at this level
    pub price: Decimal,
    /// Total displayed quantity at this price level
    pub size: Decimal,
}

impl PriceLevel {
    /// Create a new price level
    pub fn new(price: Decimal, size: Decimal) -> Self {
        Self { price, size }
    }
}

/// Top-of-book snapshot for one instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBook {
    /// Instrument identifier
    pub instrument_id: String,
    /// Bid (buy) orders sorted by price descending
    #[serde(default)]
    pub bids: Vec<PriceLevel>,
    /// Ask (sell) orders sorted by price ascending
    #[serde(default)]
    pub asks: Vec<PriceLevel>,
    /// Timestamp of this snapshot
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl OrderBook {
    /// Book with no quotes on either side
    pub fn empty(instrument_id: impl Into<String>) -> Self {
        Self {
            instrument_id: instrument_id.into(),
            bids: Vec::new(),
            asks: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    /// Get the best bid (highest buy order)
    pub fn best_bid(&self) -> Option<&PriceLevel> {
        self.bids.first()
    }

    /// Get the best ask (lowest sell order)
    pub fn best_ask(&self) -> Option<&PriceLevel> {
        self.asks.first()
    }

    /// True when both sides carry at least one level
    pub fn is_two_sided(&self) -> bool {
        !self.bids.is_empty() && !self.asks.is_empty()
    }

    /// Calculate the midpoint price
    pub fn midpoint(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some((bid.price + ask.price) / Decimal::TWO),
            _ => None,
        }
    }

    /// Calculate the spread
    pub fn spread(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask.price - bid.price),
            _ => None,
        }
    }
}

/// Order time-in-force
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// Immediate-or-cancel: fill what is available now, drop the rest
    Ioc,
    /// Resting limit order
    Limit,
}

/// Order submission handed to the exchange collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub instrument_id: String,
    pub price: Decimal,
    pub volume: u32,
    pub side: Side,
    pub order_type: OrderType,
}

impl OrderRequest {
    /// Immediate-or-cancel order at a limit price
    pub fn ioc(instrument_id: impl Into<String>, price: Decimal, volume: u32, side: Side) -> Self {
        Self {
            instrument_id: instrument_id.into(),
            price,
            volume,
            side,
            order_type: OrderType::Ioc,
        }
    }
}

/// Exchange acknowledgement for a submitted order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAck {
    pub order_id: u64,
    /// Volume executed immediately; the IOC remainder is cancelled
    pub filled: u32,
}
