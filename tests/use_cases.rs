use std::cell::{Cell, RefCell};

use futures::executor::block_on;
use stockiq_dashboard::application::{
    self, AnalysisRequest, AuthOutcome, Credentials, ExchangeRate, FALLBACK_USD_INR, StockApi,
};
use stockiq_dashboard::domain::backtest::{BacktestParams, BacktestReport, BacktestRequest};
use stockiq_dashboard::domain::errors::{AppError, ApiResult};
use stockiq_dashboard::domain::indicators::{IndicatorKind, IndicatorRequest};
use stockiq_dashboard::domain::ledger::{Ledger, Transaction};
use stockiq_dashboard::domain::market::{NewsItem, Prediction, Quote, QuoteBook, StockAnalysis, Ticker, TimeFilter};
use stockiq_dashboard::domain::session::{AuthMode, User};

/// In-memory backend with canned answers.
#[derive(Default)]
struct FakeApi {
    prediction_fails: bool,
    offline: bool,
    quotes: QuoteBook,
    rate: Option<f64>,
    analyze_requests: RefCell<Vec<AnalysisRequest>>,
    portfolio_calls: Cell<usize>,
    backtest_calls: Cell<usize>,
    logged: RefCell<Vec<Transaction>>,
}

fn down() -> AppError {
    AppError::ApiError { status: 500, detail: None }
}

impl StockApi for FakeApi {
    async fn analyze(&self, request: &AnalysisRequest) -> ApiResult<StockAnalysis> {
        self.analyze_requests.borrow_mut().push(request.clone());
        serde_json::from_value(serde_json::json!({ "ticker": request.ticker.value(), "currentPrice": 10.0 }))
            .map_err(|err| AppError::DecodeError(err.to_string()))
    }

    async fn predict(&self, _ticker: &Ticker) -> ApiResult<Prediction> {
        if self.prediction_fails {
            return Err(down());
        }
        Ok(Prediction { next_day_price: 11.0, accuracy: 90.0, trade_status: "BUY".into(), sentiment: 0.4 })
    }

    async fn portfolio_data(&self, tickers: &[Ticker]) -> ApiResult<QuoteBook> {
        self.portfolio_calls.set(self.portfolio_calls.get() + 1);
        Ok(tickers
            .iter()
            .filter_map(|t| self.quotes.get(t.value()).map(|q| (t.value().to_string(), *q)))
            .collect())
    }

    async fn market_indices(&self) -> ApiResult<QuoteBook> {
        Ok(QuoteBook::new())
    }

    async fn all_tickers(&self) -> ApiResult<Vec<String>> {
        if self.offline {
            return Err(AppError::NetworkError("connection refused".into()));
        }
        Ok(vec!["tcs.ns".into(), "  ".into(), "AAPL".into()])
    }

    async fn exchange_rate(&self) -> ApiResult<ExchangeRate> {
        Ok(ExchangeRate { usd_to_inr: self.rate })
    }

    async fn general_news(&self) -> ApiResult<Vec<NewsItem>> {
        Ok(Vec::new())
    }

    async fn signup(&self, _credentials: &Credentials) -> ApiResult<()> {
        Ok(())
    }

    async fn login(&self, credentials: &Credentials) -> ApiResult<User> {
        Ok(User::registered(credentials.username.clone()))
    }

    async fn verify_password(&self, credentials: &Credentials) -> ApiResult<bool> {
        Ok(credentials.password == "secret")
    }

    async fn log_transaction(&self, _username: &str, transaction: &Transaction) -> ApiResult<()> {
        self.logged.borrow_mut().push(transaction.clone());
        Ok(())
    }

    async fn transactions(&self, _username: &str) -> ApiResult<Vec<Transaction>> {
        Ok(self.logged.borrow().clone())
    }

    async fn backtest(&self, _request: &BacktestRequest) -> ApiResult<BacktestReport> {
        self.backtest_calls.set(self.backtest_calls.get() + 1);
        Ok(BacktestReport::default())
    }

    fn export_url(&self, ticker: &Ticker, start_date: &str, end_date: &str) -> String {
        format!("/export/{}/{}/{}", ticker, start_date, end_date)
    }
}

fn tcs() -> Ticker {
    Ticker::new("TCS.NS").unwrap()
}

fn quote(current_price: f64, change: f64) -> Quote {
    Quote { current_price, change, percent_change: 0.0 }
}

#[test]
fn analysis_merges_prediction_and_defaults_to_ema() {
    let api = FakeApi::default();

    let analysis = block_on(application::fetch_stock_data(&api, &tcs(), TimeFilter::OneWeek, None)).unwrap();

    assert_eq!(analysis.prediction.map(|p| p.next_day_price), Some(11.0));
    let requests = api.analyze_requests.borrow();
    assert_eq!(requests[0].period, TimeFilter::OneWeek);
    assert_eq!(requests[0].indicators, vec![IndicatorRequest::new(IndicatorKind::Ema, &[("period", 50.0)])]);
}

#[test]
fn failed_prediction_still_returns_prices() {
    let api = FakeApi { prediction_fails: true, ..FakeApi::default() };
    let wanted = [IndicatorRequest::with_defaults(IndicatorKind::Rsi)];

    let analysis = block_on(application::fetch_stock_data(&api, &tcs(), TimeFilter::OneDay, Some(&wanted))).unwrap();

    assert!(analysis.prediction.is_none());
    assert_eq!(analysis.last_price(), 10.0);
    assert_eq!(api.analyze_requests.borrow()[0].indicators, wanted.to_vec());
}

#[test]
fn empty_portfolio_skips_the_quote_request() {
    let api = FakeApi::default();

    let metrics = block_on(application::portfolio_metrics(&api, &Ledger::default(), 83.0));

    assert_eq!(metrics.total_invested, 0.0);
    assert_eq!(api.portfolio_calls.get(), 0);
}

#[test]
fn portfolio_metrics_value_usd_holdings_in_rupees() {
    let mut quotes = QuoteBook::new();
    quotes.insert("AAPL".into(), quote(110.0, 2.0));
    let api = FakeApi { quotes, ..FakeApi::default() };
    let mut ledger = Ledger::new(Vec::new(), 1_000_000.0);
    ledger.buy(&Ticker::new("AAPL").unwrap(), 2, 100.0, 80.0, 1).unwrap();

    let metrics = block_on(application::portfolio_metrics(&api, &ledger, 80.0));

    assert_eq!(metrics.total_invested, 16_000.0);
    assert_eq!(metrics.total_pl, 1_600.0);
    assert_eq!(metrics.today_pl, 320.0);
}

#[test]
fn zero_quote_is_no_price() {
    let mut quotes = QuoteBook::new();
    quotes.insert("TCS.NS".into(), quote(0.0, 0.0));
    let api = FakeApi { quotes, ..FakeApi::default() };

    assert_eq!(block_on(application::live_price(&api, &tcs())).unwrap(), None);
    assert_eq!(block_on(application::live_price(&api, &Ticker::new("INFY.NS").unwrap())).unwrap(), None);
}

#[test]
fn reference_data_drops_blank_tickers_and_falls_back_on_rate() {
    let api = FakeApi { rate: Some(0.0), ..FakeApi::default() };

    let data = block_on(application::load_reference_data(&api)).unwrap();

    assert_eq!(data.tickers, vec![tcs(), Ticker::new("AAPL").unwrap()]);
    assert_eq!(data.usd_inr, FALLBACK_USD_INR);
}

#[test]
fn unreachable_server_fails_the_start_up_load() {
    let api = FakeApi { offline: true, rate: Some(82.5), ..FakeApi::default() };

    let result = block_on(application::load_reference_data(&api));

    assert_eq!(result, Err(AppError::NetworkError("connection refused".into())));
    assert_eq!(application::SERVER_UNREACHABLE, "Could not connect to the server.");
}

#[test]
fn signup_checks_confirmation_before_calling_the_server() {
    let api = FakeApi::default();

    let mismatch = block_on(application::authenticate(&api, AuthMode::Signup, "asha", "a", "b"));
    assert_eq!(mismatch, Err(AppError::ValidationError("Passwords do not match.".into())));

    let created = block_on(application::authenticate(&api, AuthMode::Signup, "asha", "a", "a"));
    assert_eq!(created, Ok(AuthOutcome::SignedUp));

    let logged_in = block_on(application::authenticate(&api, AuthMode::Login, "asha", "a", ""));
    assert_eq!(logged_in, Ok(AuthOutcome::LoggedIn(User::registered("asha"))));
}

#[test]
fn practice_history_comes_from_holdings() {
    let api = FakeApi::default();
    let mut ledger = Ledger::new(Vec::new(), 100_000.0);
    ledger.buy(&tcs(), 3, 100.0, 83.0, 0).unwrap();

    let history = block_on(application::transaction_history(&api, &User::guest(), &ledger)).unwrap();

    assert_eq!(history.len(), 1);
    assert_eq!(history[0].quantity, 3.0);
    assert_eq!(history[0].timestamp, "1970-01-01T00:00:00.000Z");
}

#[test]
fn registered_trades_are_logged_and_read_back() {
    let api = FakeApi::default();
    let user = User::registered("asha");
    let mut ledger = Ledger::new(Vec::new(), 100_000.0);
    let receipt = ledger.buy(&tcs(), 1, 250.0, 83.0, 1).unwrap();

    block_on(application::record_trade(&api, &user, &receipt));
    block_on(application::record_trade(&api, &User::guest(), &receipt));

    let history = block_on(application::transaction_history(&api, &user, &ledger)).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].ticker, tcs());
    assert_eq!(history[0].total(), 250.0);
}

#[test]
fn backtest_needs_a_holding_period() {
    let api = FakeApi::default();
    let params = BacktestParams { holding_days: 0, ..BacktestParams::default() };

    let result = block_on(application::run_backtest(&api, &tcs(), params));

    assert!(matches!(result, Err(AppError::ValidationError(_))));
    assert_eq!(api.backtest_calls.get(), 0);
    assert!(block_on(application::run_backtest(&api, &tcs(), BacktestParams::default())).is_ok());
}

#[test]
fn password_check_goes_through_the_api() {
    let api = FakeApi::default();
    let user = User::registered("asha");
    assert_eq!(block_on(application::verify_password(&api, &user, "secret")), Ok(true));
    assert_eq!(block_on(application::verify_password(&api, &user, "nope")), Ok(false));
}
