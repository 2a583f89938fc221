//! Use cases shared by the pages. Each one takes the [`StockApi`] port so it
//! runs the same against the browser client and the in-memory test double.

use super::api::{AnalysisRequest, Credentials, StockApi};
use crate::domain::backtest::{BacktestParams, BacktestReport, BacktestRequest};
use crate::domain::errors::{AppError, ApiResult};
use crate::domain::indicators::{IndicatorKind, IndicatorRequest};
use crate::domain::ledger::{Ledger, PortfolioMetrics, TradeReceipt, Transaction};
use crate::domain::logging::{LogComponent, get_time_provider};
use crate::domain::market::{StockAnalysis, Ticker, TimeFilter};
use crate::domain::session::{AuthMode, User, validate_credentials};
use crate::time_utils;
use crate::{log_debug, log_error, log_info, log_warn};

/// Used until `/get-exchange-rate` answers, and whenever it answers without a rate.
pub const FALLBACK_USD_INR: f64 = 83.0;

/// Shown when the start-up reference data cannot be loaded.
pub const SERVER_UNREACHABLE: &str = "Could not connect to the server.";

/// Indicators requested when a page does not ask for any.
pub fn default_indicators() -> Vec<IndicatorRequest> {
    vec![IndicatorRequest::new(IndicatorKind::Ema, &[("period", 50.0)])]
}

/// Load price history and indicators, then merge in the prediction.
/// A failing prediction is logged and leaves `prediction` empty.
pub async fn fetch_stock_data<A: StockApi>(
    api: &A,
    ticker: &Ticker,
    period: TimeFilter,
    indicators: Option<&[IndicatorRequest]>,
) -> ApiResult<StockAnalysis> {
    let request = AnalysisRequest {
        ticker: ticker.clone(),
        period,
        indicators: indicators.map(<[IndicatorRequest]>::to_vec).unwrap_or_else(default_indicators),
    };
    log_debug!(
        LogComponent::Application("FetchStockData"),
        "analyze {} {} with {} indicator(s)",
        ticker,
        period,
        request.indicators.len()
    );

    let mut analysis = api.analyze(&request).await?;
    analysis.prediction = match api.predict(ticker).await {
        Ok(prediction) => Some(prediction),
        Err(err) => {
            log_warn!(LogComponent::Application("FetchStockData"), "prediction for {} unavailable: {}", ticker, err);
            None
        }
    };
    Ok(analysis)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceData {
    pub tickers: Vec<Ticker>,
    pub usd_inr: f64,
}

/// Ticker universe and exchange rate, loaded once at start-up.
pub async fn load_reference_data<A: StockApi>(api: &A) -> ApiResult<ReferenceData> {
    let (tickers, rate) = futures::join!(api.all_tickers(), api.exchange_rate());
    let tickers: Vec<Ticker> = tickers?.iter().filter_map(|s| Ticker::new(s).ok()).collect();
    let usd_inr = rate?.usd_to_inr.filter(|r| r.is_finite() && *r > 0.0).unwrap_or(FALLBACK_USD_INR);
    log_info!(
        LogComponent::Application("ReferenceData"),
        "{} tickers loaded, USD/INR {:.2}",
        tickers.len(),
        usd_inr
    );
    Ok(ReferenceData { tickers, usd_inr })
}

/// Dashboard totals. An empty ledger skips the request; a failed request
/// yields zeros.
pub async fn portfolio_metrics<A: StockApi>(api: &A, ledger: &Ledger, usd_inr: f64) -> PortfolioMetrics {
    if ledger.holdings().is_empty() {
        return PortfolioMetrics::default();
    }
    match api.portfolio_data(&ledger.tickers()).await {
        Ok(quotes) => ledger.valuation(&quotes, usd_inr),
        Err(err) => {
            log_error!(LogComponent::Application("PortfolioMetrics"), "failed to fetch metrics: {}", err);
            PortfolioMetrics::default()
        }
    }
}

/// Current price of one ticker, `None` when the server has no positive quote.
pub async fn live_price<A: StockApi>(api: &A, ticker: &Ticker) -> ApiResult<Option<f64>> {
    let quotes = api.portfolio_data(std::slice::from_ref(ticker)).await?;
    Ok(quotes
        .get(ticker.value())
        .map(|q| q.current_price)
        .filter(|price| *price > 0.0))
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    SignedUp,
    LoggedIn(User),
}

pub async fn authenticate<A: StockApi>(
    api: &A,
    mode: AuthMode,
    username: &str,
    password: &str,
    confirm: &str,
) -> ApiResult<AuthOutcome> {
    validate_credentials(mode, username, password, confirm)?;
    let credentials = Credentials::new(username, password);
    match mode {
        AuthMode::Signup => {
            api.signup(&credentials).await?;
            log_info!(LogComponent::Application("Auth"), "account created for {}", username);
            Ok(AuthOutcome::SignedUp)
        }
        AuthMode::Login => {
            let user = api.login(&credentials).await?;
            log_info!(LogComponent::Application("Auth"), "{} logged in", user.username);
            Ok(AuthOutcome::LoggedIn(user))
        }
    }
}

pub async fn verify_password<A: StockApi>(api: &A, user: &User, password: &str) -> ApiResult<bool> {
    api.verify_password(&Credentials::new(&user.username, password)).await
}

/// Epoch milliseconds from the installed clock.
pub fn now_millis() -> u64 {
    get_time_provider().current_timestamp()
}

/// Send an executed trade to the server log. Only registered users have
/// one; failures are logged and otherwise ignored.
pub async fn record_trade<A: StockApi>(api: &A, user: &User, receipt: &TradeReceipt) {
    if !user.persists_ledger() {
        return;
    }
    let transaction = receipt.to_transaction(time_utils::format_iso(now_millis() as i64));
    if let Err(err) = api.log_transaction(&user.username, &transaction).await {
        log_error!(LogComponent::Application("RecordTrade"), "could not log {} {}: {}", receipt.side, receipt.ticker, err);
    }
}

/// Server history for registered users, holdings-derived history for practice users.
pub async fn transaction_history<A: StockApi>(api: &A, user: &User, ledger: &Ledger) -> ApiResult<Vec<Transaction>> {
    if user.is_practice_mode {
        return Ok(ledger.derived_history());
    }
    api.transactions(&user.username).await
}

pub async fn run_backtest<A: StockApi>(api: &A, ticker: &Ticker, params: BacktestParams) -> ApiResult<BacktestReport> {
    if params.holding_days == 0 {
        return Err(AppError::ValidationError("Holding period must be at least one day.".to_string()));
    }
    api.backtest(&BacktestRequest { ticker: ticker.clone(), params }).await
}

/// Position reported by an external broker.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalHolding {
    pub ticker: Ticker,
    pub quantity: u32,
    pub avg_price: f64,
}

/// Broker sync shown on the tracker page. No broker is contacted; after a
/// short delay a fixed sample portfolio is returned.
pub async fn sync_external_portfolio(delay_ms: u32) -> Vec<ExternalHolding> {
    gloo_timers::future::TimeoutFuture::new(delay_ms).await;
    [("RELIANCE.NS", 10, 2800.0), ("TCS.NS", 15, 3850.0)]
        .into_iter()
        .filter_map(|(symbol, quantity, avg_price)| {
            Ticker::new(symbol).ok().map(|ticker| ExternalHolding { ticker, quantity, avg_price })
        })
        .collect()
}
