//! Port to the remote StockIQ service.
//!
//! Every page talks to the backend through [`StockApi`]; the gloo-based
//! implementation lives in `infrastructure::http`.

use crate::domain::backtest::{BacktestReport, BacktestRequest};
use crate::domain::errors::ApiResult;
use crate::domain::indicators::IndicatorRequest;
use crate::domain::ledger::Transaction;
use crate::domain::market::{NewsItem, Prediction, QuoteBook, StockAnalysis, Ticker, TimeFilter};
use crate::domain::session::User;
use serde::{Deserialize, Serialize};

/// Body of `POST /analyze`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRequest {
    pub ticker: Ticker,
    pub period: TimeFilter,
    pub indicators: Vec<IndicatorRequest>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: &str, password: &str) -> Self {
        Self { username: username.to_string(), password: password.to_string() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ExchangeRate {
    pub usd_to_inr: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PasswordCheck {
    #[serde(default)]
    pub verified: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionLog<'a> {
    pub username: &'a str,
    pub transaction: &'a Transaction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioRequest<'a> {
    pub tickers: &'a [Ticker],
}

#[allow(async_fn_in_trait)]
pub trait StockApi {
    async fn analyze(&self, request: &AnalysisRequest) -> ApiResult<StockAnalysis>;

    async fn predict(&self, ticker: &Ticker) -> ApiResult<Prediction>;

    /// Live quotes keyed by ticker symbol.
    async fn portfolio_data(&self, tickers: &[Ticker]) -> ApiResult<QuoteBook>;

    /// `NIFTY 50` and `SENSEX` quotes.
    async fn market_indices(&self) -> ApiResult<QuoteBook>;

    async fn all_tickers(&self) -> ApiResult<Vec<String>>;

    async fn exchange_rate(&self) -> ApiResult<ExchangeRate>;

    async fn general_news(&self) -> ApiResult<Vec<NewsItem>>;

    async fn signup(&self, credentials: &Credentials) -> ApiResult<()>;

    async fn login(&self, credentials: &Credentials) -> ApiResult<User>;

    async fn verify_password(&self, credentials: &Credentials) -> ApiResult<bool>;

    async fn log_transaction(&self, username: &str, transaction: &Transaction) -> ApiResult<()>;

    /// Server-side history, newest first.
    async fn transactions(&self, username: &str) -> ApiResult<Vec<Transaction>>;

    async fn backtest(&self, request: &BacktestRequest) -> ApiResult<BacktestReport>;

    /// Download link for the CSV export; the browser navigates to it.
    fn export_url(&self, ticker: &Ticker, start_date: &str, end_date: &str) -> String;
}
