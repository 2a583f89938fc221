use stockiq_dashboard::application::{AnalysisRequest, Credentials, PortfolioRequest, StockApi, TransactionLog};
use stockiq_dashboard::domain::backtest::{BacktestParams, BacktestReport, BacktestRequest};
use stockiq_dashboard::domain::errors::AppError;
use stockiq_dashboard::domain::indicators::{IndicatorKind, IndicatorRequest};
use stockiq_dashboard::domain::ledger::{TradeSide, Transaction};
use stockiq_dashboard::domain::market::{StockAnalysis, Ticker, TimeFilter};
use stockiq_dashboard::infrastructure::HttpStockApi;
use stockiq_dashboard::infrastructure::http::error_detail;

fn tcs() -> Ticker {
    Ticker::new("TCS.NS").unwrap()
}

#[test]
fn analyze_body() {
    let request = AnalysisRequest {
        ticker: tcs(),
        period: TimeFilter::OneMonth,
        indicators: vec![IndicatorRequest::new(IndicatorKind::Rsi, &[("period", 14.0)])],
    };
    insta::assert_snapshot!(
        serde_json::to_string(&request).unwrap(),
        @r#"{"ticker":"TCS.NS","period":"1M","indicators":[{"name":"RSI","params":{"period":14.0}}]}"#
    );
}

#[test]
fn log_transaction_body() {
    let transaction = Transaction {
        side: TradeSide::Buy,
        ticker: tcs(),
        quantity: 2.0,
        price: 250.5,
        timestamp: "2024-03-05T09:15:00.000Z".to_string(),
    };
    let body = TransactionLog { username: "asha", transaction: &transaction };
    insta::assert_snapshot!(
        serde_json::to_string(&body).unwrap(),
        @r#"{"username":"asha","transaction":{"type":"BUY","ticker":"TCS.NS","quantity":2.0,"price":250.5,"timestamp":"2024-03-05T09:15:00.000Z"}}"#
    );
}

#[test]
fn backtest_and_portfolio_bodies() {
    let backtest = BacktestRequest { ticker: tcs(), params: BacktestParams::default() };
    insta::assert_snapshot!(
        serde_json::to_string(&backtest).unwrap(),
        @r#"{"ticker":"TCS.NS","holding_days":10,"min_score":70.0,"stop_loss_pct":5.0,"take_profit_pct":10.0}"#
    );

    let tickers = [tcs(), Ticker::new("aapl").unwrap()];
    insta::assert_snapshot!(
        serde_json::to_string(&PortfolioRequest { tickers: &tickers }).unwrap(),
        @r#"{"tickers":["TCS.NS","AAPL"]}"#
    );
    insta::assert_snapshot!(
        serde_json::to_string(&Credentials::new("asha", "pw")).unwrap(),
        @r#"{"username":"asha","password":"pw"}"#
    );
}

#[test]
fn analysis_response_keeps_extra_columns() {
    let body = r#"{
        "ticker": "TCS.NS",
        "data": [
            {"Date": "2024-03-04T09:15:00+05:30", "Open": 10, "High": 12, "Low": 9, "Close": 11, "Volume": 1000, "RSI_14": null},
            {"Date": 1709631000000, "Open": 11, "High": 13, "Low": 10, "Close": 12.5, "RSI_14": 61.2}
        ],
        "news": [{"title": "Results", "link": "https://example.com/r"}],
        "currentPrice": 12.75,
        "peRatio": -1
    }"#;
    let analysis: StockAnalysis = serde_json::from_str(body).unwrap();

    assert_eq!(analysis.data.len(), 2);
    assert_eq!(analysis.data[0].indicator("RSI_14"), None);
    assert_eq!(analysis.data[1].indicator("RSI_14"), Some(61.2));
    assert_eq!(analysis.data[0].date.epoch_millis(), Some(1_709_523_900_000));
    assert_eq!(analysis.news[0].summary, "");
    assert_eq!(analysis.last_price(), 12.75);
    assert!(analysis.prediction.is_none());
}

#[test]
fn backtest_response_tolerates_missing_summary() {
    let body = r#"{"results": [{"Buy Date": "2024-01-02", "Sell Date": "2024-01-12", "Return (%)": -3.5}]}"#;
    let report: BacktestReport = serde_json::from_str(body).unwrap();

    assert_eq!(report.results.len(), 1);
    assert!(!report.results[0].is_win());
    assert_eq!(report.summary.total_trades, 0);
}

#[test]
fn error_details() {
    insta::assert_debug_snapshot!(error_detail(r#"{"detail":"Invalid username or password"}"#), @r#"
    Some(
        "Invalid username or password",
    )
    "#);
    insta::assert_debug_snapshot!(error_detail(r#"{"detail":""}"#), @"None");
    insta::assert_debug_snapshot!(error_detail("Bad Gateway"), @"None");
}

#[test]
fn error_messages() {
    let not_found = AppError::ApiError { status: 404, detail: Some("No data found for ticker".into()) };
    insta::assert_snapshot!(not_found.to_string(), @"API Error 404: No data found for ticker");
    insta::assert_snapshot!(not_found.user_message(), @"No data found for ticker");
    insta::assert_snapshot!(
        AppError::NetworkError("offline".into()).user_message(),
        @"An API error occurred. Please try again."
    );
}

#[test]
fn export_link_points_at_the_backend() {
    let api = HttpStockApi::new("http://localhost:8000");
    insta::assert_snapshot!(
        api.export_url(&tcs(), "2023-01-01", "2024-03-05"),
        @"http://localhost:8000/export?ticker=TCS.NS&startDate=2023-01-01&endDate=2024-03-05"
    );
}
