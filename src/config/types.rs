//! Configuration types

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::common::errors::{EngineError, Result};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// The two linked instruments
    #[serde(default)]
    pub pair: PairConfig,
    /// Position limit and sizing
    #[serde(default)]
    pub risk: RiskConfig,
    /// Ratio smoothing and edge thresholds
    #[serde(default)]
    pub signal: SignalConfig,
    /// General application settings
    #[serde(default)]
    pub settings: AppSettings,
}

impl AppConfig {
    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.pair.instrument_a.is_empty() || self.pair.instrument_b.is_empty() {
            return Err(EngineError::Configuration(
                "instrument ids must not be empty".to_string(),
            ));
        }
        if self.pair.instrument_a == self.pair.instrument_b {
            return Err(EngineError::Configuration(format!(
                "instrument_a and instrument_b must differ (both {})",
                self.pair.instrument_a
            )));
        }
        if self.risk.base_volume == 0 {
            return Err(EngineError::Configuration(
                "base_volume must be at least 1".to_string(),
            ));
        }
        if self.signal.smoothing <= Decimal::ZERO || self.signal.smoothing >= Decimal::ONE {
            return Err(EngineError::Configuration(format!(
                "smoothing must lie strictly between 0 and 1, got {}",
                self.signal.smoothing
            )));
        }
        if self.signal.edge_floor.is_sign_negative() {
            return Err(EngineError::Configuration(format!(
                "edge_floor must not be negative, got {}",
                self.signal.edge_floor
            )));
        }
        if self.signal.spread_cost_fraction.is_sign_negative() {
            return Err(EngineError::Configuration(format!(
                "spread_cost_fraction must not be negative, got {}",
                self.signal.spread_cost_fraction
            )));
        }
        Ok(())
    }
}

/// Instrument pair traded against each other
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairConfig {
    /// Reference share class; the ratio is expressed as B per A
    #[serde(default = "default_instrument_a")]
    pub instrument_a: String,
    /// Second share class
    #[serde(default = "default_instrument_b")]
    pub instrument_b: String,
}

impl Default for PairConfig {
    fn default() -> Self {
        Self {
            instrument_a: default_instrument_a(),
            instrument_b: default_instrument_b(),
        }
    }
}

fn default_instrument_a() -> String {
    "PHILIPS_A".to_string()
}

fn default_instrument_b() -> String {
    "PHILIPS_B".to_string()
}

/// Position limit and order sizing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Symmetric absolute position limit per instrument
    #[serde(default = "default_position_limit")]
    pub position_limit: u32,
    /// Largest volume traded per leg in one cycle
    #[serde(default = "default_base_volume")]
    pub base_volume: u32,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            position_limit: default_position_limit(),
            base_volume: default_base_volume(),
        }
    }
}

fn default_position_limit() -> u32 {
    100
}

fn default_base_volume() -> u32 {
    10
}

/// How to pick a direction when both edges clear the threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Sell B / buy A is checked first and wins
    #[default]
    SellBFirst,
    /// The larger edge wins; equal edges fall back to sell B / buy A
    LargerEdge,
}

/// Ratio estimation and edge thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalConfig {
    /// Minimum edge in B price units
    #[serde(default = "default_edge_floor")]
    pub edge_floor: Decimal,
    /// Weight kept on the previous ratio estimate, in (0, 1)
    #[serde(default = "default_smoothing")]
    pub smoothing: Decimal,
    /// Share of the round-trip spread cost required as edge
    #[serde(default = "default_spread_cost_fraction")]
    pub spread_cost_fraction: Decimal,
    #[serde(default)]
    pub tie_break: TieBreak,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            edge_floor: default_edge_floor(),
            smoothing: default_smoothing(),
            spread_cost_fraction: default_spread_cost_fraction(),
            tie_break: TieBreak::default(),
        }
    }
}

fn default_edge_floor() -> Decimal {
    dec!(0.01)
}

fn default_smoothing() -> Decimal {
    dec!(0.9)
}

fn default_spread_cost_fraction() -> Decimal {
    dec!(0.25)
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Delay between decision cycles in milliseconds
    #[serde(default = "default_cycle_interval")]
    pub cycle_interval_ms: u64,
    /// Stop after this many cycles (0 = run until interrupted)
    #[serde(default)]
    pub max_cycles: u64,
}

impl AppSettings {
    pub fn cycle_interval(&self) -> Duration {
        Duration::from_millis(self.cycle_interval_ms)
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            cycle_interval_ms: default_cycle_interval(),
            max_cycles: 0,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_cycle_interval() -> u64 {
    85
}
