use super::entities::{PricePoint, StockAnalysis};
use super::value_objects::{Currency, Ticker, TimeFilter};
use crate::time_utils;
use std::collections::BTreeMap;

/// Maximum entries offered by the ticker search box.
pub const MAX_SUGGESTIONS: usize = 10;

/// Column prefixes drawn on top of the price line.
pub const OVERLAY_PREFIXES: [&str; 4] = ["SMA_", "EMA_", "DEMA_", "LinReg_"];

/// Header figures of the price-action card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceChange {
    pub change: f64,
    pub percent: f64,
    pub is_positive: bool,
}

impl PriceChange {
    const FLAT: PriceChange = PriceChange { change: 0.0, percent: 0.0, is_positive: true };

    fn between(from: f64, to: f64) -> Self {
        let change = to - from;
        let percent = if from > 0.0 { change / from * 100.0 } else { 0.0 };
        Self { change, percent, is_positive: change >= 0.0 }
    }
}

/// Price change for the selected period.
///
/// Intraday uses the live price against the previous close; every other
/// period compares the first open with the last close of the series.
pub fn price_change(analysis: &StockAnalysis, filter: TimeFilter) -> PriceChange {
    if filter.is_intraday() {
        if let (Some(current), Some(previous)) = (analysis.current_price, analysis.previous_close) {
            if current != 0.0 && previous != 0.0 {
                return PriceChange::between(previous, current);
            }
        }
    }
    match (analysis.data.first(), analysis.data.last()) {
        (Some(first), Some(last)) if analysis.data.len() >= 2 => PriceChange::between(first.open, last.close),
        _ => PriceChange::FLAT,
    }
}

/// OHLC bar with an epoch-second time key, ready for the candle renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandleBar {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl CandleBar {
    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }
}

/// Convert rows into ascending, de-duplicated candle bars.
///
/// Intraday keeps the full timestamp; longer periods bucket rows by UTC day
/// and the last row of a bucket wins. Rows with unreadable dates are dropped.
pub fn candles_for_chart(points: &[PricePoint], filter: TimeFilter) -> Vec<CandleBar> {
    let mut by_time: BTreeMap<i64, CandleBar> = BTreeMap::new();
    for point in points {
        let Some(millis) = point.date.epoch_millis() else { continue };
        let seconds = millis.div_euclid(1000);
        let time = if filter.is_intraday() { seconds } else { time_utils::utc_day_start(seconds) };
        by_time.insert(
            time,
            CandleBar { time, open: point.open, high: point.high, low: point.low, close: point.close },
        );
    }
    by_time.into_values().collect()
}

/// Up to [`MAX_SUGGESTIONS`] tickers starting with `input`, case-insensitive.
pub fn suggest_tickers<'a>(all: &'a [Ticker], input: &str) -> Vec<&'a Ticker> {
    let needle = input.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    all.iter()
        .filter(|t| t.value().to_lowercase().starts_with(&needle))
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Column names available on the series, taken from its first row.
pub fn indicator_columns(points: &[PricePoint]) -> Vec<String> {
    points
        .first()
        .map(|p| p.column_names().map(str::to_string).collect())
        .unwrap_or_default()
}

pub fn overlay_columns(columns: &[String]) -> Vec<String> {
    columns
        .iter()
        .filter(|c| OVERLAY_PREFIXES.iter().any(|prefix| c.starts_with(prefix)))
        .cloned()
        .collect()
}

/// Extract one numeric column; missing cells stay `None` so gaps are drawn.
pub fn column_series(points: &[PricePoint], key: &str) -> Vec<Option<f64>> {
    points
        .iter()
        .map(|p| match key {
            "Close" => Some(p.close),
            "Open" => Some(p.open),
            "High" => Some(p.high),
            "Low" => Some(p.low),
            "Volume" => p.volume,
            _ => p.indicator(key),
        })
        .collect()
}

/// Group an integer with commas: `1234567` -> `1,234,567`.
pub fn group_thousands(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if rounded < 0 { format!("-{}", out) } else { out }
}

/// Tooltip formatting for a series value, keyed on the series name.
pub fn format_value(key: &str, value: f64, currency: Currency) -> String {
    let key = key.to_lowercase();
    if key.contains("volume") || key.contains("obv") {
        group_thousands(value)
    } else if key.contains("rsi") || key.contains("score") {
        format!("{:.1}", value)
    } else if key.contains("atr") {
        format!("{:.3}", value)
    } else {
        format!("{}{:.2}", currency.symbol(), value)
    }
}

/// `₹1,234.50`-style amount used across the ledger pages.
pub fn format_money(value: f64, currency: Currency) -> String {
    let cents = (value.abs() * 100.0).round() as i64;
    let sign = if value < 0.0 && cents != 0 { "-" } else { "" };
    format!("{}{}{}.{:02}", sign, currency.symbol(), group_thousands((cents / 100) as f64), cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market::entities::DateValue;

    fn point(date: &str, open: f64, close: f64) -> PricePoint {
        PricePoint {
            date: DateValue::Text(date.to_string()),
            open,
            high: open.max(close) + 1.0,
            low: open.min(close) - 1.0,
            close,
            volume: None,
            columns: Default::default(),
        }
    }

    #[test]
    fn group_thousands_handles_signs() {
        assert_eq!(group_thousands(0.0), "0");
        assert_eq!(group_thousands(999.0), "999");
        assert_eq!(group_thousands(1_234_567.0), "1,234,567");
        assert_eq!(group_thousands(-4_500.0), "-4,500");
    }

    #[test]
    fn money_keeps_two_decimals() {
        assert_eq!(format_money(100_000.0, Currency::Inr), "₹100,000.00");
        assert_eq!(format_money(-12.345, Currency::Usd), "-$12.35");
    }

    #[test]
    fn daily_candles_collapse_same_day_rows() {
        let rows = vec![
            point("2024-01-02T10:00:00Z", 10.0, 11.0),
            point("2024-01-01", 9.0, 10.0),
            point("2024-01-02T15:00:00Z", 11.0, 12.0),
        ];
        let bars = candles_for_chart(&rows, TimeFilter::OneMonth);
        assert_eq!(bars.len(), 2);
        assert!(bars[0].time < bars[1].time);
        assert_eq!(bars[1].close, 12.0);

        let intraday = candles_for_chart(&rows, TimeFilter::OneDay);
        assert_eq!(intraday.len(), 3);
    }

    #[test]
    fn columns_keep_server_order() {
        let row: PricePoint = serde_json::from_str(
            r#"{"Date": "2024-03-01", "Open": 1, "High": 1, "Low": 1, "Close": 1,
                "SMA_50": 1, "EMA_20": 1, "RSI": 1, "BB_Upper": 3, "BB_Middle": 2, "BB_Lower": 1}"#,
        )
        .unwrap();

        let columns = indicator_columns(&[row]);
        assert_eq!(columns, ["SMA_50", "EMA_20", "RSI", "BB_Upper", "BB_Middle", "BB_Lower"]);
        assert_eq!(overlay_columns(&columns), ["SMA_50", "EMA_20"]);
    }
}
