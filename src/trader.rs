//! Outer trading loop
//!
//! Each cycle polls the exchange for positions and both books, asks the
//! strategy for a decision and, on `Go`, submits the buy leg and then the
//! sell leg as two independent IOC orders. The legs are not atomic: a fill
//! on the first leg followed by a miss or a failure on the second leaves an
//! unhedged position until later cycles trade it back. Such mismatches are
//! logged and counted, never reconciled here.

use rust_decimal::Decimal;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

use crate::common::errors::Result;
use crate::common::traits::Exchange;
use crate::common::types::{OrderAck, PositionMap};
use crate::config::types::AppSettings;
use crate::strategy::{Decision, PairTrade, Strategy};

/// Counters over the life of a trader
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraderStats {
    pub cycles: u64,
    pub trades: u64,
    pub no_trades: u64,
    pub errors: u64,
    /// Pair trades whose legs filled different volumes
    pub unbalanced_fills: u64,
}

/// Acks for both legs of a submitted pair trade
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairFill {
    pub buy: OrderAck,
    pub sell: OrderAck,
}

impl PairFill {
    pub fn is_balanced(&self) -> bool {
        self.buy.filled == self.sell.filled
    }
}

/// Drives a [`Strategy`] against an [`Exchange`] at a fixed cadence
pub struct Trader<E, S> {
    exchange: E,
    strategy: S,
    cycle_interval: Duration,
    max_cycles: Option<u64>,
    stats: TraderStats,
}

impl<E, S> Trader<E, S>
where
    E: Exchange,
    S: Strategy,
{
    pub fn new(exchange: E, strategy: S, settings: &AppSettings) -> Self {
        Self {
            exchange,
            strategy,
            cycle_interval: settings.cycle_interval(),
            max_cycles: (settings.max_cycles > 0).then_some(settings.max_cycles),
            stats: TraderStats::default(),
        }
    }

    pub fn stats(&self) -> &TraderStats {
        &self.stats
    }

    pub fn exchange(&self) -> &E {
        &self.exchange
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Run cycles until the exchange runs dry, the cycle cap is reached or
    /// Ctrl+C is received
    ///
    /// Cycle errors are logged and the loop continues.
    pub async fn run(&mut self) -> Result<TraderStats> {
        info!(
            strategy = self.strategy.name(),
            venue = self.exchange.venue_name(),
            interval_ms = self.cycle_interval.as_millis() as u64,
            "Trader starting"
        );

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            if self.max_cycles.is_some_and(|max| self.stats.cycles >= max) {
                info!(cycles = self.stats.cycles, "Cycle limit reached");
                break;
            }

            match self.run_cycle().await {
                Ok(Some(_)) => {}
                Ok(None) => break,
                Err(e) => {
                    self.stats.errors += 1;
                    error!("Cycle failed: {}", e);
                }
            }

            tokio::select! {
                _ = &mut shutdown => {
                    info!("Received shutdown signal, stopping trader");
                    break;
                }
                _ = sleep(self.cycle_interval) => {}
            }
        }

        self.strategy.on_shutdown();
        info!(stats = ?self.stats, "Trader stopped");
        Ok(self.stats.clone())
    }

    /// Run one decision cycle
    ///
    /// Returns `None` when the exchange reports no further data.
    #[instrument(skip(self))]
    pub async fn run_cycle(&mut self) -> Result<Option<Decision>> {
        if !self.exchange.begin_cycle().await? {
            return Ok(None);
        }
        self.stats.cycles += 1;

        let positions = self.exchange.get_positions().await?;
        let pnl = self.exchange.get_pnl().await?;

        let [a, b] = self.strategy.instruments();
        let (instrument_a, instrument_b) = (a.to_string(), b.to_string());
        log_positions_and_pnl(&positions, pnl, &[instrument_a.as_str(), instrument_b.as_str()]);

        let book_a = self.exchange.get_last_price_book(&instrument_a).await?;
        let book_b = self.exchange.get_last_price_book(&instrument_b).await?;

        let decision = self.strategy.on_snapshot(&book_a, &book_b, &positions)?;
        if let Some(conv) = self.strategy.conversion() {
            debug!(%conv, "Current conversion estimate (B ≈ conv · A)");
        }

        match &decision {
            Decision::Go(trade) => {
                self.stats.trades += 1;
                let fill = self.submit(trade).await?;
                if !fill.is_balanced() {
                    self.stats.unbalanced_fills += 1;
                    warn!(
                        direction = %trade.direction,
                        buy_filled = fill.buy.filled,
                        sell_filled = fill.sell.filled,
                        "Legs filled unevenly, residual exposure until a later cycle"
                    );
                }
            }
            Decision::NoGo(reason) => {
                self.stats.no_trades += 1;
                debug!(%reason, "No trade this cycle");
            }
        }

        Ok(Some(decision))
    }

    /// Submit the buy leg, then the sell leg
    ///
    /// A failed buy leg stops the sell leg from going out. A failed sell leg
    /// after a successful buy leg is returned as an error; whatever the buy
    /// leg filled stays on the book of positions and counts as an unbalanced
    /// fill.
    async fn submit(&mut self, trade: &PairTrade) -> Result<PairFill> {
        let buy = self.exchange.insert_order(&trade.buy_leg.to_order()).await?;
        let sell = match self.exchange.insert_order(&trade.sell_leg.to_order()).await {
            Ok(ack) => ack,
            Err(e) => {
                if buy.filled > 0 {
                    self.stats.unbalanced_fills += 1;
                }
                warn!(
                    instrument = %trade.sell_leg.instrument_id,
                    buy_filled = buy.filled,
                    "Sell leg failed after buy leg was sent"
                );
                return Err(e);
            }
        };

        info!(
            direction = %trade.direction,
            volume = trade.volume(),
            buy_filled = buy.filled,
            sell_filled = sell.filled,
            "Pair trade submitted"
        );
        Ok(PairFill { buy, sell })
    }
}

/// Positions worth displaying, in a stable order
///
/// Instruments in `always_display` are listed first in the given order;
/// any other instrument appears only while its position is non-zero.
pub fn displayed_positions<'a>(
    positions: &'a PositionMap,
    always_display: &[&'a str],
) -> Vec<(&'a str, i64)> {
    let mut shown: Vec<(&str, i64)> = always_display
        .iter()
        .map(|id| (*id, positions.get(*id).copied().unwrap_or(0)))
        .collect();

    let mut others: Vec<(&str, i64)> = positions
        .iter()
        .filter(|(id, position)| **position != 0 && !always_display.contains(&id.as_str()))
        .map(|(id, position)| (id.as_str(), *position))
        .collect();
    others.sort_unstable_by(|x, y| x.0.cmp(y.0));

    shown.extend(others);
    shown
}

fn log_positions_and_pnl(positions: &PositionMap, pnl: Option<Decimal>, always_display: &[&str]) {
    for (instrument, position) in displayed_positions(positions, always_display) {
        info!(instrument, position, "Position");
    }
    if let Some(pnl) = pnl {
        info!(%pnl, "PnL");
    }
}
