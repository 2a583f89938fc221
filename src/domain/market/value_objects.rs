use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display as StrumDisplay, EnumIter, EnumString};

/// Suffix marking a National Stock Exchange (India) listing.
const DOMESTIC_SUFFIX: &str = ".NS";

/// Value Object - Trading symbol, always upper-case and trimmed
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
#[display(fmt = "{}", _0)]
pub struct Ticker(String);

impl Ticker {
    pub fn new(symbol: &str) -> Result<Self, String> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err("Ticker cannot be empty".to_string());
        }
        Ok(Self(symbol.to_uppercase()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }

    /// Indian listings settle in rupees, everything else in dollars.
    pub fn currency(&self) -> Currency {
        if self.0.ends_with(DOMESTIC_SUFFIX) { Currency::Inr } else { Currency::Usd }
    }

    pub fn is_foreign(&self) -> bool {
        self.currency() == Currency::Usd
    }

    /// Lower-case name before the exchange suffix: `RELIANCE.NS` -> `reliance`.
    pub fn base_name(&self) -> String {
        self.0.split('.').next().unwrap_or_default().to_lowercase()
    }

    /// Multiplier converting this ticker's prices to rupees.
    pub fn inr_rate(&self, usd_to_inr: f64) -> f64 {
        if self.is_foreign() { usd_to_inr } else { 1.0 }
    }
}

impl TryFrom<String> for Ticker {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Ticker::new(&value)
    }
}

impl From<Ticker> for String {
    fn from(value: Ticker) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    Inr,
    Usd,
}

impl Currency {
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Inr => "₹",
            Currency::Usd => "$",
        }
    }
}

/// Value Object - Chart period selector
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, StrumDisplay, EnumIter, EnumString, AsRefStr, Serialize, Deserialize,
)]
pub enum TimeFilter {
    #[strum(serialize = "1D")]
    #[serde(rename = "1D")]
    OneDay,

    #[strum(serialize = "1W")]
    #[serde(rename = "1W")]
    OneWeek,

    #[default]
    #[strum(serialize = "1M")]
    #[serde(rename = "1M")]
    OneMonth,

    #[strum(serialize = "6M")]
    #[serde(rename = "6M")]
    SixMonths,

    #[strum(serialize = "1Y")]
    #[serde(rename = "1Y")]
    OneYear,

    #[strum(serialize = "ALL")]
    #[serde(rename = "ALL")]
    All,
}

impl TimeFilter {
    pub fn is_intraday(&self) -> bool {
        matches!(self, TimeFilter::OneDay)
    }

    pub fn as_str(&self) -> &str {
        self.as_ref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, StrumDisplay, EnumIter, Serialize, Deserialize)]
pub enum ChartType {
    #[default]
    #[strum(serialize = "line")]
    Line,
    #[strum(serialize = "candle")]
    Candle,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn ticker_normalises_and_detects_currency() {
        let ticker = Ticker::new("  reliance.ns ").unwrap();
        assert_eq!(ticker.value(), "RELIANCE.NS");
        assert_eq!(ticker.currency(), Currency::Inr);
        assert_eq!(ticker.base_name(), "reliance");

        let aapl = Ticker::new("aapl").unwrap();
        assert!(aapl.is_foreign());
        assert_eq!(aapl.currency().symbol(), "$");
        assert_eq!(aapl.inr_rate(83.5), 83.5);
        assert!(Ticker::new("   ").is_err());
    }

    #[test]
    fn time_filters_round_trip_through_strings() {
        let labels: Vec<String> = TimeFilter::iter().map(|f| f.to_string()).collect();
        assert_eq!(labels, ["1D", "1W", "1M", "6M", "1Y", "ALL"]);
        assert_eq!(TimeFilter::from_str("6M").unwrap(), TimeFilter::SixMonths);
        assert_eq!(TimeFilter::default(), TimeFilter::OneMonth);
    }
}
