//! Core domain types and logic: signals, trade matching, equity and metrics.

pub mod price;
pub mod indicator;
pub mod signal;
pub mod strategy;
pub mod trade;
pub mod matcher;
pub mod calendar;
pub mod equity;
pub mod metrics;
pub mod backtest;
pub mod sweep;
pub mod price_stats;
pub mod config_validation;
pub mod error;
