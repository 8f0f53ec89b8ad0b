//! Error types for the application

use thiserror::Error;

/// Result type alias using our EngineError
pub type Result<T> = std::result::Result<T, EngineError>;

/// Main error type for engine and collaborator operations
///
/// Conditions that merely skip a cycle (empty book, degenerate midpoint,
/// no capacity) are not errors; they surface as
/// [`NoTradeReason`](crate::strategy::NoTradeReason) values.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A side string was neither bid nor ask
    #[error("Invalid side provided: {0}, expecting 'bid' or 'ask'")]
    InvalidSide(String),

    /// Position or order book missing for an instrument
    #[error("Unknown instrument: {0}")]
    UnknownInstrument(String),

    /// Book lacks a bid or an ask where a two-sided quote is required
    #[error("Incomplete order book: {0}")]
    IncompleteBook(String),

    /// Price unusable for ratio estimation
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Exchange collaborator failures (order rejected, snapshot unavailable)
    #[error("Exchange error: {0}")]
    Exchange(String),

    /// Malformed replay input
    #[error("Replay error: {0}")]
    Replay(String),

    /// File access errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl From<config::ConfigError> for EngineError {
    fn from(err: config::ConfigError) -> Self {
        EngineError::Configuration(err.to_string())
    }
}

impl EngineError {
    /// Price arithmetic left the representable `Decimal` range
    pub(crate) fn overflow(context: &str) -> Self {
        EngineError::InvalidPrice(format!("arithmetic overflow computing {}", context))
    }
}
