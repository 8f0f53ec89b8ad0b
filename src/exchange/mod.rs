//! Exchange adapters: paper matching and order-book replay

pub mod paper;
pub mod replay;

pub use paper::PaperExchange;
pub use replay::{ReplayExchange, ReplayFrame};
