use stockiq_dashboard::domain::indicators::IndicatorPanel;
use stockiq_dashboard::domain::market::{
    Currency, StockAnalysis, Ticker, TimeFilter, format_money, overlay_columns, price_change, suggest_tickers,
};
use stockiq_dashboard::domain::session::{Page, RouteDecision, User, resolve_route, starting_funds};
use stockiq_dashboard::domain::sip::SipInput;
use wasm_bindgen_test::*;

fn analysis(body: serde_json::Value) -> StockAnalysis {
    serde_json::from_value(body).unwrap()
}

#[wasm_bindgen_test]
#[cfg_attr(not(target_arch = "wasm32"), test)]
fn sip_default_projection() {
    let projection = SipInput::default().calculate();
    assert_eq!(projection.invested_amount, 600_000.0);
    assert!((projection.future_value - 1_161_695.38).abs() < 0.01);
    assert!((projection.estimated_returns - 561_695.38).abs() < 0.01);
}

#[wasm_bindgen_test]
#[cfg_attr(not(target_arch = "wasm32"), test)]
fn suggestions_are_prefix_matches_capped_at_ten() {
    let all: Vec<Ticker> = (0..15)
        .map(|i| Ticker::new(&format!("TATA{}.NS", i)).unwrap())
        .chain([Ticker::new("TCS.NS").unwrap()])
        .collect();

    assert_eq!(suggest_tickers(&all, "tata").len(), 10);
    assert_eq!(suggest_tickers(&all, "tc"), vec![&all[15]]);
    assert!(suggest_tickers(&all, "  ").is_empty());
    assert!(suggest_tickers(&all, "cs").is_empty());
}

#[wasm_bindgen_test]
#[cfg_attr(not(target_arch = "wasm32"), test)]
fn intraday_change_uses_previous_close() {
    let stock = analysis(serde_json::json!({
        "ticker": "TCS.NS",
        "currentPrice": 105.0,
        "previousClose": 100.0,
        "data": [
            {"Date": "2024-03-01", "Open": 90.0, "High": 1.0, "Low": 1.0, "Close": 1.0},
            {"Date": "2024-03-02", "Open": 1.0, "High": 1.0, "Low": 1.0, "Close": 80.0}
        ]
    }));

    let intraday = price_change(&stock, TimeFilter::OneDay);
    assert_eq!(intraday.change, 5.0);
    assert_eq!(intraday.percent, 5.0);

    let monthly = price_change(&stock, TimeFilter::OneMonth);
    assert_eq!(monthly.change, -10.0);
    assert!(!monthly.is_positive);
}

#[wasm_bindgen_test]
#[cfg_attr(not(target_arch = "wasm32"), test)]
fn single_row_is_flat() {
    let stock = analysis(serde_json::json!({
        "ticker": "AAPL",
        "data": [{"Date": "2024-03-01", "Open": 90.0, "High": 1.0, "Low": 1.0, "Close": 95.0}]
    }));
    let change = price_change(&stock, TimeFilter::OneYear);
    assert_eq!(change.change, 0.0);
    assert!(change.is_positive);
}

#[wasm_bindgen_test]
#[cfg_attr(not(target_arch = "wasm32"), test)]
fn overlays_and_panels_follow_column_names() {
    let columns: Vec<String> = ["EMA_50", "SMA_20", "RSI", "MACD", "MACD_Hist", "BB_Upper", "BB_%B", "Volume"]
        .iter()
        .map(|c| c.to_string())
        .collect();

    assert_eq!(overlay_columns(&columns), ["EMA_50", "SMA_20"]);
    assert_eq!(
        IndicatorPanel::detect(&columns),
        [IndicatorPanel::Rsi, IndicatorPanel::Macd, IndicatorPanel::Bollinger, IndicatorPanel::PercentB]
    );
}

#[wasm_bindgen_test]
#[cfg_attr(not(target_arch = "wasm32"), test)]
fn money_formatting() {
    assert_eq!(format_money(1_234_567.891, Currency::Inr), "₹1,234,567.89");
    assert_eq!(format_money(-12.5, Currency::Usd), "-$12.50");
}

#[wasm_bindgen_test]
#[cfg_attr(not(target_arch = "wasm32"), test)]
fn practice_users_keep_the_free_pages() {
    let guest = User::guest();
    for page in [Page::Home, Page::Chart, Page::News, Page::Portfolio, Page::Funds, Page::Transactions] {
        assert_eq!(resolve_route(page, Some(&guest)), RouteDecision::Show(page));
    }
    for page in [Page::Assistant, Page::Indicators, Page::Prediction, Page::Backtest, Page::Track, Page::Export] {
        assert_eq!(resolve_route(page, Some(&guest)), RouteDecision::PremiumPrompt);
    }
    assert_eq!(resolve_route(Page::Backtest, Some(&User::registered("asha"))), RouteDecision::Show(Page::Backtest));
}

#[wasm_bindgen_test]
#[cfg_attr(not(target_arch = "wasm32"), test)]
fn starting_balances() {
    assert_eq!(starting_funds(None, Some(5.0)), 0.0);
    assert_eq!(starting_funds(Some(&User::guest()), Some(5.0)), 100_000.0);
    assert_eq!(starting_funds(Some(&User::registered("asha")), Some(5.0)), 5.0);
    assert_eq!(starting_funds(Some(&User::registered("asha")), None), 100_000.0);
}
