//! horizon: fixed-horizon backtester for single-symbol signal strategies.
//!
//! Hexagonal layout: pure backtest logic in [`domain`], port traits in
//! [`ports`], file/database/report implementations in [`adapters`], and the
//! command-line front end in [`cli`].

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
