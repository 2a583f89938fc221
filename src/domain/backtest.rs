//! Parameters and results of the server-side scoring backtest.

use crate::domain::market::Ticker;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BacktestParams {
    pub holding_days: u32,
    pub min_score: f64,
    pub stop_loss_pct: f64,
    pub take_profit_pct: f64,
}

impl Default for BacktestParams {
    fn default() -> Self {
        Self { holding_days: 10, min_score: 70.0, stop_loss_pct: 5.0, take_profit_pct: 10.0 }
    }
}

/// Body of `POST /backtest`: the ticker next to the flattened parameters.
#[derive(Debug, Clone, Serialize)]
pub struct BacktestRequest {
    pub ticker: Ticker,
    #[serde(flatten)]
    pub params: BacktestParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestTrade {
    #[serde(rename = "Buy Date")]
    pub buy_date: String,
    #[serde(rename = "Sell Date")]
    pub sell_date: String,
    #[serde(rename = "Buy Price", default)]
    pub buy_price: f64,
    #[serde(rename = "Sell Price", default)]
    pub sell_price: f64,
    #[serde(rename = "Return (%)")]
    pub return_pct: f64,
    #[serde(rename = "Exit Reason", default)]
    pub exit_reason: String,
}

impl BacktestTrade {
    pub fn is_win(&self) -> bool {
        self.return_pct >= 0.0
    }
}

/// Summary figures; the server may omit any of them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestSummary {
    pub total_trades: u32,
    pub win_rate: f64,
    pub average_return: f64,
    pub total_return_cumulative: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BacktestReport {
    #[serde(default)]
    pub results: Vec<BacktestTrade>,
    #[serde(default)]
    pub summary: BacktestSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_flattens_params() {
        let request = BacktestRequest { ticker: Ticker::new("tcs.ns").unwrap(), params: BacktestParams::default() };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["ticker"], "TCS.NS");
        assert_eq!(json["holding_days"], 10);
        assert_eq!(json["take_profit_pct"], 10.0);
    }
}
