use super::value_objects::Ticker;
use crate::time_utils;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// `Date` column as the API sends it: ISO text or epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateValue {
    Millis(f64),
    Text(String),
}

impl DateValue {
    pub fn epoch_millis(&self) -> Option<i64> {
        match self {
            DateValue::Millis(ms) if ms.is_finite() => Some(*ms as i64),
            DateValue::Millis(_) => None,
            DateValue::Text(text) => time_utils::parse_datetime_millis(text),
        }
    }
}

/// Domain entity - one row of price history plus whatever indicator
/// columns the server computed for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    #[serde(rename = "Date")]
    pub date: DateValue,
    #[serde(rename = "Open")]
    pub open: f64,
    #[serde(rename = "High")]
    pub high: f64,
    #[serde(rename = "Low")]
    pub low: f64,
    #[serde(rename = "Close")]
    pub close: f64,
    #[serde(rename = "Volume", default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    /// Indicator cells in the order the server sent them.
    #[serde(flatten)]
    pub columns: serde_json::Map<String, serde_json::Value>,
}

impl PricePoint {
    /// Numeric value of an indicator column; `None` for missing or null cells.
    pub fn indicator(&self, key: &str) -> Option<f64> {
        self.columns.get(key).and_then(serde_json::Value::as_f64)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub summary: String,
    pub link: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeSignal {
    Buy,
    Sell,
    Hold,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    #[serde(rename = "nextDayPrice")]
    pub next_day_price: f64,
    pub accuracy: f64,
    pub trade_status: String,
    pub sentiment: f64,
}

impl Prediction {
    pub fn signal(&self) -> TradeSignal {
        match self.trade_status.as_str() {
            "BUY" => TradeSignal::Buy,
            "SELL" => TradeSignal::Sell,
            _ => TradeSignal::Hold,
        }
    }
}

/// Aggregate returned by `/analyze`, with the prediction merged in afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockAnalysis {
    pub ticker: Ticker,
    #[serde(default)]
    pub data: Vec<PricePoint>,
    #[serde(default)]
    pub news: Vec<NewsItem>,
    #[serde(rename = "currentPrice", default)]
    pub current_price: Option<f64>,
    #[serde(rename = "previousClose", default)]
    pub previous_close: Option<f64>,
    #[serde(rename = "marketCap", default)]
    pub market_cap: Option<i64>,
    #[serde(rename = "peRatio", default)]
    pub pe_ratio: Option<f64>,
    #[serde(rename = "launchDate", default)]
    pub launch_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<Prediction>,
}

impl StockAnalysis {
    /// Current price, falling back to the latest close.
    pub fn last_price(&self) -> f64 {
        self.current_price
            .or_else(|| self.data.last().map(|p| p.close))
            .unwrap_or(0.0)
    }

    pub fn latest_point(&self) -> Option<&PricePoint> {
        self.data.last()
    }
}

/// Live quote as returned by `/portfolio-data` and `/market-indices`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Quote {
    #[serde(rename = "currentPrice", default)]
    pub current_price: f64,
    #[serde(default)]
    pub change: f64,
    #[serde(rename = "percentChange", default)]
    pub percent_change: f64,
}

impl Quote {
    pub fn is_positive(&self) -> bool {
        self.change >= 0.0
    }
}

pub type QuoteBook = HashMap<String, Quote>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_point_keeps_indicator_columns() {
        let json = r#"{"Date":"2024-03-01","Open":10.0,"High":12.0,"Low":9.5,"Close":11.0,
                       "Volume":1200,"RSI":61.25,"SMA_50":null}"#;
        let point: PricePoint = serde_json::from_str(json).unwrap();
        assert_eq!(point.volume, Some(1200.0));
        assert_eq!(point.indicator("RSI"), Some(61.25));
        assert_eq!(point.indicator("SMA_50"), None);
        assert_eq!(point.column_names().collect::<Vec<_>>(), ["RSI", "SMA_50"]);
        assert_eq!(point.date.epoch_millis(), Some(1_709_251_200_000));
    }

    #[test]
    fn unknown_trade_status_is_hold() {
        let prediction = Prediction {
            next_day_price: 10.0,
            accuracy: 0.8,
            trade_status: "NEUTRAL".into(),
            sentiment: 0.5,
        };
        assert_eq!(prediction.signal(), TradeSignal::Hold);
    }
}
