//! Multi-turn state the assistant carries between messages.

use crate::domain::indicators::{IndicatorKind, IndicatorRequest};
use crate::domain::ledger::TradeSide;
use crate::domain::market::{Ticker, TimeFilter};
use once_cell::sync::Lazy;
use regex::Regex;

static AT_PRICE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"at\s*([0-9.]+)").expect("limit price pattern"));
static ANY_PRICE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([0-9.]+)").expect("price pattern"));

pub const DEFAULT_PLACEHOLDER: &str = "Ask about a stock or your portfolio...";

/// A trade the user asked for. `price` is filled in once the user picks
/// market or limit.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeOrder {
    pub side: TradeSide,
    pub quantity: u32,
    pub ticker: Ticker,
    pub price: Option<f64>,
}

impl TradeOrder {
    pub fn at_price(&self, price: f64) -> Self {
        Self { price: Some(price), ..self.clone() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DialogueContext {
    AwaitingIndicators {
        ticker: Ticker,
        period: TimeFilter,
    },
    AwaitingGraphConfirmation {
        ticker: Ticker,
        period: TimeFilter,
        indicators: Vec<IndicatorRequest>,
    },
    ConfirmTrade {
        order: TradeOrder,
    },
    AwaitingPassword {
        order: TradeOrder,
    },
}

impl DialogueContext {
    /// Placeholder for the chat input while this context is pending.
    pub fn prompt(&self) -> Option<String> {
        match self {
            Self::AwaitingIndicators { .. } => Some("Which indicators? (e.g., RSI, MACD)".to_string()),
            Self::ConfirmTrade { order } => Some(format!("Price for {}? (e.g., market)", order.ticker)),
            Self::AwaitingPassword { .. } => Some("Enter your password...".to_string()),
            Self::AwaitingGraphConfirmation { .. } => None,
        }
    }

    pub fn masks_input(&self) -> bool {
        matches!(self, Self::AwaitingPassword { .. })
    }
}

pub fn input_placeholder(context: Option<&DialogueContext>) -> String {
    context
        .and_then(DialogueContext::prompt)
        .unwrap_or_else(|| DEFAULT_PLACEHOLDER.to_string())
}

/// Indicators the assistant can explain, with the keywords that select them.
pub fn indicator_keywords() -> [(IndicatorRequest, &'static [&'static str]); 3] {
    [
        (IndicatorRequest::new(IndicatorKind::Rsi, &[("period", 14.0)]), &["rsi"]),
        (
            IndicatorRequest::new(IndicatorKind::Macd, &[("fast", 12.0), ("slow", 26.0), ("signal", 9.0)]),
            &["macd"],
        ),
        (
            IndicatorRequest::new(IndicatorKind::BBands, &[("period", 20.0), ("std_dev", 2.0)]),
            &["bollinger", "bbands"],
        ),
    ]
}

/// Indicators named in `text`; `all` selects every one.
pub fn requested_indicators(text: &str) -> Vec<IndicatorRequest> {
    let select_all = text.contains("all");
    indicator_keywords()
        .into_iter()
        .filter(|(_, keywords)| select_all || keywords.iter().any(|k| text.contains(k)))
        .map(|(request, _)| request)
        .collect()
}

pub const GRAPH_CONFIRMATIONS: [&str; 6] = ["yes", "yep", "sure", "ok", "please do", "y"];

pub fn is_graph_confirmation(text: &str) -> bool {
    GRAPH_CONFIRMATIONS.contains(&text)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceChoice {
    Market,
    Limit(f64),
    Unclear,
}

/// Read the user's answer to "at what price?".
pub fn parse_price_choice(text: &str) -> PriceChoice {
    if ["market", "now", "current"].iter().any(|w| text.contains(w)) {
        return PriceChoice::Market;
    }
    AT_PRICE_RE
        .captures(text)
        .or_else(|| ANY_PRICE_RE.captures(text))
        .and_then(|caps| caps[1].parse::<f64>().ok())
        .filter(|price| price.is_finite() && *price > 0.0)
        .map(PriceChoice::Limit)
        .unwrap_or(PriceChoice::Unclear)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_overrides_keywords() {
        let picked: Vec<IndicatorKind> = requested_indicators("show all").iter().map(|r| r.name).collect();
        assert_eq!(picked, [IndicatorKind::Rsi, IndicatorKind::Macd, IndicatorKind::BBands]);

        let picked: Vec<IndicatorKind> = requested_indicators("bollinger and rsi").iter().map(|r| r.name).collect();
        assert_eq!(picked, [IndicatorKind::Rsi, IndicatorKind::BBands]);
        assert!(requested_indicators("volume please").is_empty());
    }

    #[test]
    fn price_choice_prefers_at() {
        assert_eq!(parse_price_choice("at market price"), PriceChoice::Market);
        assert_eq!(parse_price_choice("2 lots at 161.50"), PriceChoice::Limit(161.5));
        assert_eq!(parse_price_choice("161"), PriceChoice::Limit(161.0));
        assert_eq!(parse_price_choice("whenever"), PriceChoice::Unclear);
        assert_eq!(parse_price_choice("..."), PriceChoice::Unclear);
    }
}
