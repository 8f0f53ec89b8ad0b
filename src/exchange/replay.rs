//! Order-book replay on top of the paper exchange
//!
//! Input is JSON lines, one frame per line:
//!
//! ```text
//! {"timestamp":"2024-01-02T09:00:00Z","books":[{"instrument_id":"PHILIPS_A","bids":[...],"asks":[...]}, ...]}
//! ```
//!
//! Each cycle loads the next frame's books into the paper exchange. Blank
//! lines and lines starting with `#` are ignored.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::Path;
use tracing::{debug, info};

use super::paper::PaperExchange;
use crate::common::errors::{EngineError, Result};
use crate::common::traits::Exchange;
use crate::common::types::{OrderAck, OrderBook, OrderRequest, PositionMap};

/// One recorded snapshot of the tracked books
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayFrame {
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    pub books: Vec<OrderBook>,
}

/// Exchange that replays recorded frames into a [`PaperExchange`]
#[derive(Debug)]
pub struct ReplayExchange {
    frames: VecDeque<ReplayFrame>,
    paper: PaperExchange,
    frames_played: usize,
}

impl ReplayExchange {
    pub fn new(frames: Vec<ReplayFrame>, paper: PaperExchange) -> Self {
        Self {
            frames: frames.into(),
            paper,
            frames_played: 0,
        }
    }

    /// Parse frames from JSON-lines text
    pub fn parse_frames(input: &str) -> Result<Vec<ReplayFrame>> {
        input
            .lines()
            .enumerate()
            .filter(|(_, line)| {
                let line = line.trim();
                !line.is_empty() && !line.starts_with('#')
            })
            .map(|(idx, line)| {
                serde_json::from_str(line)
                    .map_err(|e| EngineError::Replay(format!("line {}: {}", idx + 1, e)))
            })
            .collect()
    }

    /// Load frames from a JSON-lines file
    pub fn from_path(path: impl AsRef<Path>, paper: PaperExchange) -> Result<Self> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path)?;
        let frames = Self::parse_frames(&input)?;
        info!(path = %path.display(), frames = frames.len(), "Loaded replay file");
        Ok(Self::new(frames, paper))
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }

    pub fn frames_played(&self) -> usize {
        self.frames_played
    }

    pub fn paper(&self) -> &PaperExchange {
        &self.paper
    }
}

#[async_trait]
impl Exchange for ReplayExchange {
    async fn begin_cycle(&mut self) -> Result<bool> {
        let Some(frame) = self.frames.pop_front() else {
            info!(frames = self.frames_played, "Replay exhausted");
            return Ok(false);
        };

        self.frames_played += 1;
        debug!(frame = self.frames_played, timestamp = ?frame.timestamp, "Replaying frame");
        for book in frame.books {
            self.paper.set_book(book);
        }
        Ok(true)
    }

    async fn get_positions(&mut self) -> Result<PositionMap> {
        self.paper.get_positions().await
    }

    async fn get_pnl(&mut self) -> Result<Option<Decimal>> {
        self.paper.get_pnl().await
    }

    async fn get_last_price_book(&mut self, instrument_id: &str) -> Result<OrderBook> {
        self.paper.get_last_price_book(instrument_id).await
    }

    async fn insert_order(&mut self, order: &OrderRequest) -> Result<OrderAck> {
        self.paper.insert_order(order).await
    }

    fn venue_name(&self) -> &'static str {
        "replay"
    }
}
