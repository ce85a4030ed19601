//! Processing and gateway fee schedules.

pub mod calculator;
pub mod schedule;

pub use calculator::{FeeBreakdown, FeeCalculator};

#[cfg(test)]
mod props;
