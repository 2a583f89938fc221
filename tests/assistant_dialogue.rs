use std::cell::RefCell;

use futures::executor::block_on;
use stockiq_dashboard::domain::assistant::{
    AssistantPort, BotAction, BotReply, DialogueContext, TradeOrder, reply_to,
};
use stockiq_dashboard::domain::errors::AppError;
use stockiq_dashboard::domain::indicators::{IndicatorKind, IndicatorRequest};
use stockiq_dashboard::domain::ledger::{Ledger, LedgerError, TradeReceipt, TradeSide};
use stockiq_dashboard::domain::market::{StockAnalysis, Ticker, TimeFilter};

const PASSWORD: &str = "hunter2";

struct FakePort {
    ledger: RefCell<Ledger>,
    price: Option<f64>,
    /// Rows returned by `/analyze`; `None` makes the request fail.
    rows: Option<serde_json::Value>,
}

impl FakePort {
    fn new(price: Option<f64>) -> Self {
        let rows = serde_json::json!([
            {"Date": "2024-03-01", "Open": 1.0, "High": 1.0, "Low": 1.0, "Close": 1.0, "RSI_14": 40.0},
            {"Date": "2024-03-04", "Open": 1.0, "High": 1.0, "Low": 1.0, "Close": 1.0, "RSI_14": 55.123}
        ]);
        Self { ledger: RefCell::new(Ledger::new(Vec::new(), 100_000.0)), price, rows: Some(rows) }
    }

    fn with_rows(rows: Option<serde_json::Value>) -> Self {
        Self { rows, ..Self::new(None) }
    }
}

impl AssistantPort for FakePort {
    async fn fetch_analysis(
        &self,
        ticker: &Ticker,
        _period: TimeFilter,
        _indicators: &[IndicatorRequest],
    ) -> Result<StockAnalysis, AppError> {
        let Some(rows) = &self.rows else {
            return Err(AppError::NetworkError("connection refused".into()));
        };
        let body = serde_json::json!({ "ticker": ticker.value(), "data": rows });
        serde_json::from_value(body).map_err(|err| AppError::DecodeError(err.to_string()))
    }

    async fn live_price(&self, _ticker: &Ticker) -> Result<Option<f64>, AppError> {
        Ok(self.price)
    }

    async fn verify_password(&self, password: &str) -> Result<bool, AppError> {
        Ok(password == PASSWORD)
    }

    fn execute_trade(&self, order: &TradeOrder, price: f64) -> Result<TradeReceipt, LedgerError> {
        let mut ledger = self.ledger.borrow_mut();
        match order.side {
            TradeSide::Buy => ledger.buy(&order.ticker, order.quantity, price, 83.0, 1),
            TradeSide::Sell => ledger.sell(&order.ticker, order.quantity, price, 83.0),
        }
    }
}

fn tickers() -> Vec<Ticker> {
    ["RELIANCE.NS", "TCS.NS", "AAPL"].iter().map(|s| Ticker::new(s).unwrap()).collect()
}

fn tcs() -> Ticker {
    Ticker::new("TCS.NS").unwrap()
}

fn send(query: &str, context: Option<&DialogueContext>, port: &FakePort) -> BotReply {
    block_on(reply_to(query, context, &tickers(), port))
}

#[test]
fn analysis_flow_ends_on_the_indicator_page() {
    let port = FakePort::new(None);

    let reply = send("Analyze TCS please", None, &port);
    assert!(reply.text.as_deref().unwrap().contains("analyzing **TCS.NS**"));
    assert_eq!(
        reply.context,
        Some(DialogueContext::AwaitingIndicators { ticker: tcs(), period: TimeFilter::OneMonth })
    );

    let reply = send("rsi", reply.context.as_ref(), &port);
    let text = reply.text.unwrap();
    assert!(text.contains("- **RSI_14**: 55.12"));
    assert!(text.ends_with("Would you like to see this on a graph?"));
    assert!(matches!(reply.context, Some(DialogueContext::AwaitingGraphConfirmation { .. })));

    let reply = send("yes", reply.context.as_ref(), &port);
    assert!(reply.is_silent);
    assert_eq!(reply.context, None);
    match reply.action {
        Some(BotAction::NavigateToIndicators { ticker, period, indicators }) => {
            assert_eq!(ticker, tcs());
            assert_eq!(period, TimeFilter::OneMonth);
            assert_eq!(indicators.iter().map(|r| r.name).collect::<Vec<_>>(), [IndicatorKind::Rsi]);
        }
        None => panic!("expected navigation"),
    }
}

#[test]
fn unknown_indicators_keep_asking() {
    let port = FakePort::new(None);
    let context = DialogueContext::AwaitingIndicators { ticker: tcs(), period: TimeFilter::OneMonth };

    let reply = send("volume", Some(&context), &port);

    assert!(reply.text.unwrap().starts_with("I couldn't find any valid indicators"));
    assert_eq!(reply.context, Some(context));
}

#[test]
fn bollinger_reports_the_first_band_the_server_sent() {
    let port = FakePort::with_rows(Some(serde_json::json!([
        {"Date": "2024-03-04", "Open": 1.0, "High": 1.0, "Low": 1.0, "Close": 1.0,
         "BB_Upper": 110.0, "BB_Middle": 100.0, "BB_Lower": 90.0}
    ])));
    let context = DialogueContext::AwaitingIndicators { ticker: tcs(), period: TimeFilter::OneMonth };

    let text = send("bollinger", Some(&context), &port).text.unwrap();

    assert!(text.contains("- **BB_Upper**: 110.00"));
    assert!(!text.contains("BB_Lower"));
}

#[test]
fn failed_analysis_apologises_and_clears_the_dialogue() {
    let context = DialogueContext::AwaitingIndicators { ticker: tcs(), period: TimeFilter::OneMonth };

    for port in [FakePort::with_rows(None), FakePort::with_rows(Some(serde_json::json!([])))] {
        let reply = send("rsi", Some(&context), &port);
        assert_eq!(
            reply.text.as_deref(),
            Some("Sorry, I couldn't fetch the data for TCS.NS. Please try again later.")
        );
        assert_eq!(reply.context, None);
        assert!(reply.action.is_none());
    }
}

#[test]
fn declined_graph_closes_the_dialogue() {
    let port = FakePort::new(None);
    let context = DialogueContext::AwaitingGraphConfirmation {
        ticker: tcs(),
        period: TimeFilter::OneMonth,
        indicators: Vec::new(),
    };

    let reply = send("no thanks", Some(&context), &port);

    assert_eq!(reply.text.as_deref(), Some("Alright. Let me know if you need anything else!"));
    assert_eq!(reply.context, None);
    assert!(reply.action.is_none());
}

#[test]
fn market_trade_executes_after_password() {
    let port = FakePort::new(Some(3500.0));

    let reply = send("buy 2 shares of tcs", None, &port);
    assert!(matches!(reply.context, Some(DialogueContext::ConfirmTrade { .. })));

    let reply = send("market price", reply.context.as_ref(), &port);
    assert!(reply.text.as_deref().unwrap().contains("₹3500.00"));
    let Some(DialogueContext::AwaitingPassword { order }) = &reply.context else {
        panic!("expected password prompt");
    };
    assert_eq!(order.price, Some(3500.0));

    let reply = send(PASSWORD, reply.context.as_ref(), &port);
    assert_eq!(
        reply.text.as_deref(),
        Some("✅ Trade confirmed! Your order to buy 2 TCS.NS has been executed.")
    );
    assert_eq!(reply.context, None);
    assert_eq!(port.ledger.borrow().holding(&tcs()).map(|h| h.quantity), Some(2));
}

#[test]
fn limit_price_is_taken_from_the_reply() {
    let port = FakePort::new(None);
    let order = TradeOrder { side: TradeSide::Sell, quantity: 5, ticker: tcs(), price: None };

    let reply = send("at 161.50", Some(&DialogueContext::ConfirmTrade { order }), &port);

    assert_eq!(
        reply.text.as_deref(),
        Some("Okay, I will set a limit order for 5 shares at ₹161.50. Please enter your password to confirm.")
    );
}

#[test]
fn wrong_password_cancels_the_trade() {
    let port = FakePort::new(None);
    let order = TradeOrder { side: TradeSide::Buy, quantity: 1, ticker: tcs(), price: Some(10.0) };

    let reply = send("guess", Some(&DialogueContext::AwaitingPassword { order }), &port);

    assert!(reply.text.unwrap().starts_with("❌ Password incorrect"));
    assert_eq!(reply.context, None);
    assert!(port.ledger.borrow().holdings().is_empty());
}

#[test]
fn failed_sell_reports_the_problem() {
    let port = FakePort::new(None);
    let order = TradeOrder { side: TradeSide::Sell, quantity: 1, ticker: tcs(), price: Some(10.0) };

    let reply = send(PASSWORD, Some(&DialogueContext::AwaitingPassword { order }), &port);

    assert_eq!(
        reply.text.as_deref(),
        Some("⚠️ Your trade could not be completed. Please check your holdings or funds.")
    );
}

#[test]
fn unclear_price_repeats_the_question() {
    let port = FakePort::new(None);
    let context = DialogueContext::ConfirmTrade {
        order: TradeOrder { side: TradeSide::Buy, quantity: 1, ticker: tcs(), price: None },
    };

    let reply = send("whenever", Some(&context), &port);

    assert!(reply.text.unwrap().starts_with("I didn't understand."));
    assert_eq!(reply.context, Some(context));
}

#[test]
fn missing_market_price_drops_the_order() {
    let port = FakePort::new(None);
    let context = DialogueContext::ConfirmTrade {
        order: TradeOrder { side: TradeSide::Buy, quantity: 1, ticker: tcs(), price: None },
    };

    let reply = send("market", Some(&context), &port);

    assert_eq!(
        reply.text.as_deref(),
        Some("Sorry, I couldn't fetch the current market price. Please try again.")
    );
    assert_eq!(reply.context, None);
}

#[test]
fn price_questions_use_the_ticker_currency() {
    let port = FakePort::new(Some(189.5));

    let reply = send("What is the price of AAPL?", None, &port);

    assert_eq!(reply.text.as_deref(), Some("The current price of **AAPL** is **$189.50**."));
}

#[test]
fn small_talk_and_fallback() {
    let port = FakePort::new(None);
    assert_eq!(
        send("hello", None, &port).text.as_deref(),
        Some("Hello! How can I assist you with your analysis today?")
    );
    assert!(send("what should I do", None, &port).text.unwrap().starts_with("I'm not sure how to answer that."));
}
