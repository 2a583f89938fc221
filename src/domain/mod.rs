//! Pure domain layer: market data, the simulated ledger, the assistant and
//! the cross-cutting logging/error types. Nothing here touches the browser.

pub mod assistant;
pub mod backtest;
pub mod errors;
pub mod indicators;
pub mod ledger;
pub mod logging;
pub mod market;
pub mod notifications;
pub mod session;
pub mod sip;

pub use errors::{AppError, ApiResult};
