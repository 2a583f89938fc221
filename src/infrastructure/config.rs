//! Build-time configuration.
//!
//! The API base URL can be overridden at compile time with
//! `STOCKIQ_API_URL`; otherwise debug builds talk to a local server and
//! release builds to the hosted one.

use crate::application::FALLBACK_USD_INR;
use crate::domain::session::DEFAULT_FUNDS;

const LOCAL_API_URL: &str = "http://127.0.0.1:8000";
const HOSTED_API_URL: &str = "https://stockiqapp.onrender.com";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
    /// Ticker tape refresh.
    pub indices_refresh_ms: u32,
    /// Live quotes on the dashboard and portfolio pages.
    pub portfolio_refresh_ms: u32,
    pub default_funds: f64,
    /// USD/INR used before the server reports a rate.
    pub default_usd_inr: f64,
    /// Ticker shown when nothing else was chosen.
    pub default_ticker: &'static str,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_url().to_string(),
            indices_refresh_ms: 60_000,
            portfolio_refresh_ms: 30_000,
            default_funds: DEFAULT_FUNDS,
            default_usd_inr: FALLBACK_USD_INR,
            default_ticker: "RELIANCE.NS",
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        match option_env!("STOCKIQ_API_URL") {
            Some(url) if !url.trim().is_empty() => Self { api_base_url: url.trim().to_string(), ..Self::default() },
            _ => Self::default(),
        }
    }
}

fn default_api_url() -> &'static str {
    if cfg!(debug_assertions) { LOCAL_API_URL } else { HOSTED_API_URL }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_dashboard_behaviour() {
        let config = AppConfig::default();
        assert_eq!(config.indices_refresh_ms, 60_000);
        assert_eq!(config.portfolio_refresh_ms, 30_000);
        assert_eq!(config.default_usd_inr, 83.0);
        assert_eq!(config.default_funds, 100_000.0);
        assert!(config.api_base_url.starts_with("http"));
    }
}
