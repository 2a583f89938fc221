//! One module per route.

pub mod assistant;
pub mod auth;
pub mod backtest;
pub mod chart;
pub mod export;
pub mod funds;
pub mod home;
pub mod indicators;
pub mod news;
pub mod portfolio;
pub mod prediction;
pub mod sip;
pub mod track;
pub mod transactions;
