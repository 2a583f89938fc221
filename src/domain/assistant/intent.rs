//! Free-text command parsing for the chat assistant.

use super::dialogue::TradeOrder;
use crate::domain::ledger::TradeSide;
use crate::domain::market::Ticker;
use once_cell::sync::Lazy;
use regex::Regex;

// `shares?` is tried before `share` so the plural never leaks into the name.
static TRADE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(buy|sell)\s*(\d+)\s*(shares|share)?\s*(of)?\s*(.*)").expect("trade pattern"));

const ANALYZE_PREFIXES: [&str; 2] = ["analyze ", "analyse "];
const PRICE_PREFIXES: [&str; 2] = ["price of ", "what is the price of "];
const GREETINGS: [&str; 4] = ["hi", "hello", "hey", "hi da"];
const ACKNOWLEDGEMENTS: [&str; 8] = ["thanks", "thank you", "ok", "cool", "got it", "super", "awesome", "great"];

#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    InitiateTrade(TradeOrder),
    InitiateAnalysis(Ticker),
    GetPrice(Ticker),
    Greeting,
    Acknowledgement,
    Unknown,
}

/// Lower-case, trim and drop `.`, `,` and `?`.
pub fn normalize(query: &str) -> String {
    query.trim().to_lowercase().chars().filter(|c| !matches!(c, '.' | ',' | '?')).collect()
}

/// First ticker, in list order, whose base name appears anywhere in `text`.
fn mentioned_ticker<'a>(text: &str, tickers: &'a [Ticker]) -> Option<&'a Ticker> {
    tickers.iter().find(|t| {
        let base = t.base_name();
        !base.is_empty() && text.contains(&base)
    })
}

fn parse_trade(text: &str, tickers: &[Ticker]) -> Option<TradeOrder> {
    let caps = TRADE_RE.captures(text)?;
    let side = match &caps[1] {
        "buy" => TradeSide::Buy,
        _ => TradeSide::Sell,
    };
    let quantity: u32 = caps[2].parse().ok()?;
    let name = caps.get(5).map(|m| m.as_str().trim()).unwrap_or_default();
    let ticker = tickers.iter().find(|t| t.base_name() == name)?;
    Some(TradeOrder { side, quantity, ticker: ticker.clone(), price: None })
}

/// Resolve a query that arrives with no pending dialogue.
pub fn parse_intent(query: &str, tickers: &[Ticker]) -> Intent {
    let text = normalize(query);

    if let Some(order) = parse_trade(&text, tickers) {
        return Intent::InitiateTrade(order);
    }
    if ANALYZE_PREFIXES.iter().any(|p| text.starts_with(p)) {
        if let Some(ticker) = mentioned_ticker(&text, tickers) {
            return Intent::InitiateAnalysis(ticker.clone());
        }
    }
    if PRICE_PREFIXES.iter().any(|p| text.starts_with(p)) {
        if let Some(ticker) = mentioned_ticker(&text, tickers) {
            return Intent::GetPrice(ticker.clone());
        }
    }
    if GREETINGS.contains(&text.as_str()) {
        return Intent::Greeting;
    }
    if ACKNOWLEDGEMENTS.contains(&text.as_str()) {
        return Intent::Acknowledgement;
    }
    Intent::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tickers() -> Vec<Ticker> {
        ["RELIANCE.NS", "TCS.NS", "TATASTEEL.NS", "AAPL"]
            .iter()
            .map(|s| Ticker::new(s).unwrap())
            .collect()
    }

    #[test]
    fn trade_accepts_optional_words() {
        for query in ["buy 10 shares of tcs", "Buy 10 share of TCS.", "buy10tcs", "buy 10 tcs?"] {
            match parse_intent(query, &tickers()) {
                Intent::InitiateTrade(order) => {
                    assert_eq!(order.side, TradeSide::Buy);
                    assert_eq!(order.quantity, 10);
                    assert_eq!(order.ticker.value(), "TCS.NS");
                }
                other => panic!("{query}: {other:?}"),
            }
        }
    }

    #[test]
    fn trade_needs_exact_name() {
        assert_eq!(parse_intent("sell 5 of tcs please", &tickers()), Intent::Unknown);
    }

    #[test]
    fn analysis_and_price_search_the_whole_query() {
        let tickers = tickers();
        assert_eq!(parse_intent("analyse reliance", &tickers), Intent::InitiateAnalysis(tickers[0].clone()));
        assert_eq!(parse_intent("What is the price of AAPL?", &tickers), Intent::GetPrice(tickers[3].clone()));
        assert_eq!(parse_intent("analyze", &tickers), Intent::Unknown);
    }

    #[test]
    fn small_talk() {
        assert_eq!(parse_intent("  Hi da ", &tickers()), Intent::Greeting);
        assert_eq!(parse_intent("Thank you.", &tickers()), Intent::Acknowledgement);
        assert_eq!(parse_intent("hello there", &tickers()), Intent::Unknown);
    }
}
