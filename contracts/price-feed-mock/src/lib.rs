//! A price feed whose answer is set by its owner. Stands in for a real aggregator in
//! tests and on devnets.

pub mod contract;
pub mod error;
pub mod msg;
pub mod state;
