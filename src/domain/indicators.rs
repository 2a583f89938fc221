//! Indicator catalogue and the editable indicator set sent to `/analyze`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, AsRefStr, IntoStaticStr, Serialize, Deserialize,
)]
pub enum IndicatorKind {
    #[strum(serialize = "SMA")]
    #[serde(rename = "SMA")]
    Sma,
    #[strum(serialize = "EMA")]
    #[serde(rename = "EMA")]
    Ema,
    #[strum(serialize = "DEMA")]
    #[serde(rename = "DEMA")]
    Dema,
    #[strum(serialize = "EMACross")]
    #[serde(rename = "EMACross")]
    EmaCross,
    #[strum(serialize = "RSI")]
    #[serde(rename = "RSI")]
    Rsi,
    #[strum(serialize = "StochRSI")]
    #[serde(rename = "StochRSI")]
    StochRsi,
    #[strum(serialize = "MACD")]
    #[serde(rename = "MACD")]
    Macd,
    #[strum(serialize = "BBands")]
    #[serde(rename = "BBands")]
    BBands,
    #[strum(serialize = "BBands_%B")]
    #[serde(rename = "BBands_%B")]
    BBandsPercentB,
    #[strum(serialize = "StdDev")]
    #[serde(rename = "StdDev")]
    StdDev,
    #[strum(serialize = "Klinger")]
    #[serde(rename = "Klinger")]
    Klinger,
    #[strum(serialize = "LinReg")]
    #[serde(rename = "LinReg")]
    LinReg,
    #[strum(serialize = "TSI")]
    #[serde(rename = "TSI")]
    Tsi,
    #[strum(serialize = "OBV")]
    #[serde(rename = "OBV")]
    Obv,
}

impl IndicatorKind {
    pub fn default_params(&self) -> BTreeMap<String, f64> {
        let pairs: &[(&str, f64)] = match self {
            Self::Sma | Self::Ema | Self::Dema | Self::StdDev => &[("period", 20.0)],
            Self::EmaCross => &[("fast", 10.0), ("slow", 30.0)],
            Self::Rsi => &[("period", 14.0)],
            Self::StochRsi => &[("rsi_period", 14.0), ("stoch_period", 14.0)],
            Self::Macd => &[("fast", 12.0), ("slow", 26.0), ("signal", 9.0)],
            Self::BBands | Self::BBandsPercentB => &[("period", 20.0), ("std_dev", 2.0)],
            Self::Klinger => &[("fast", 34.0), ("slow", 55.0), ("signal", 13.0)],
            Self::LinReg => &[("period", 14.0)],
            Self::Tsi => &[("long", 25.0), ("short", 13.0)],
            Self::Obv => &[],
        };
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    /// Prefix of the data columns the server emits for this indicator.
    pub fn column_prefix(&self) -> &'static str {
        match self {
            Self::BBands => "BB_",
            Self::BBandsPercentB => "BB_%B",
            other => (*other).into(),
        }
    }

    pub fn catalogue() -> Vec<IndicatorKind> {
        IndicatorKind::iter().collect()
    }
}

/// Wire form: `{"name": "RSI", "params": {"period": 14}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRequest {
    pub name: IndicatorKind,
    pub params: BTreeMap<String, f64>,
}

impl IndicatorRequest {
    pub fn new(name: IndicatorKind, params: &[(&str, f64)]) -> Self {
        Self { name, params: params.iter().map(|(k, v)| (k.to_string(), *v)).collect() }
    }

    pub fn with_defaults(name: IndicatorKind) -> Self {
        Self { name, params: name.default_params() }
    }
}

/// One editable card on the indicator page.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSetting {
    pub id: u64,
    pub kind: IndicatorKind,
    pub params: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSet {
    settings: Vec<IndicatorSetting>,
    next_id: u64,
}

impl Default for IndicatorSet {
    /// SMA(50), EMA(20), RSI(14), MACD(12, 26, 9).
    fn default() -> Self {
        Self::from_requests(&[
            IndicatorRequest::new(IndicatorKind::Sma, &[("period", 50.0)]),
            IndicatorRequest::new(IndicatorKind::Ema, &[("period", 20.0)]),
            IndicatorRequest::new(IndicatorKind::Rsi, &[("period", 14.0)]),
            IndicatorRequest::new(IndicatorKind::Macd, &[("fast", 12.0), ("slow", 26.0), ("signal", 9.0)]),
        ])
    }
}

impl IndicatorSet {
    pub fn from_requests(requests: &[IndicatorRequest]) -> Self {
        let settings = requests
            .iter()
            .enumerate()
            .map(|(i, r)| IndicatorSetting { id: i as u64 + 1, kind: r.name, params: r.params.clone() })
            .collect::<Vec<_>>();
        let next_id = settings.len() as u64 + 1;
        Self { settings, next_id }
    }

    pub fn settings(&self) -> &[IndicatorSetting] {
        &self.settings
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    /// Append a card with default parameters; duplicates are allowed.
    pub fn add(&mut self, kind: IndicatorKind) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.settings.push(IndicatorSetting { id, kind, params: kind.default_params() });
        id
    }

    pub fn remove(&mut self, id: u64) {
        self.settings.retain(|s| s.id != id);
    }

    /// Set one parameter. Non-finite input is stored as zero.
    pub fn update_param(&mut self, id: u64, name: &str, value: f64) {
        if let Some(setting) = self.settings.iter_mut().find(|s| s.id == id) {
            let value = if value.is_finite() { value } else { 0.0 };
            setting.params.insert(name.to_string(), value);
        }
    }

    pub fn to_requests(&self) -> Vec<IndicatorRequest> {
        self.settings
            .iter()
            .map(|s| IndicatorRequest { name: s.kind, params: s.params.clone() })
            .collect()
    }
}

/// Secondary chart panels, shown when their columns exist in the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorPanel {
    Rsi,
    StochRsi,
    Macd,
    Bollinger,
    Klinger,
    Tsi,
    PercentB,
    Obv,
}

impl IndicatorPanel {
    const ALL: [IndicatorPanel; 8] = [
        Self::Rsi,
        Self::StochRsi,
        Self::Macd,
        Self::Bollinger,
        Self::Klinger,
        Self::Tsi,
        Self::PercentB,
        Self::Obv,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Rsi => "RSI",
            Self::StochRsi => "Stochastic RSI",
            Self::Macd => "MACD",
            Self::Bollinger => "Bollinger Bands",
            Self::Klinger => "Klinger Oscillator",
            Self::Tsi => "True Strength Index",
            Self::PercentB => "Bollinger Bands %B",
            Self::Obv => "On-Balance Volume (OBV)",
        }
    }

    /// Column whose presence enables the panel.
    fn trigger(&self) -> &'static str {
        match self {
            Self::Rsi => "RSI",
            Self::StochRsi => "StochRSI",
            Self::Macd => "MACD",
            Self::Bollinger => "BB_Upper",
            Self::Klinger => "Klinger",
            Self::Tsi => "TSI",
            Self::PercentB => "BB_%B",
            Self::Obv => "OBV",
        }
    }

    /// Line series drawn in the panel. MACD additionally draws
    /// `MACD_Hist` as bars.
    pub fn series(&self) -> &'static [&'static str] {
        match self {
            Self::Rsi => &["RSI"],
            Self::StochRsi => &["StochRSI"],
            Self::Macd => &["MACD", "MACD_Signal"],
            Self::Bollinger => &["BB_Upper", "BB_Middle", "BB_Lower"],
            Self::Klinger => &["Klinger", "Klinger_Signal"],
            Self::Tsi => &["TSI"],
            Self::PercentB => &["BB_%B"],
            Self::Obv => &["OBV"],
        }
    }

    pub fn histogram(&self) -> Option<&'static str> {
        matches!(self, Self::Macd).then_some("MACD_Hist")
    }

    pub fn is_priced(&self) -> bool {
        matches!(self, Self::Bollinger)
    }

    pub fn detect(columns: &[String]) -> Vec<IndicatorPanel> {
        Self::ALL
            .into_iter()
            .filter(|panel| columns.iter().any(|c| c == panel.trigger()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_matches_wire_names() {
        let names: Vec<String> = IndicatorKind::catalogue().iter().map(|k| k.to_string()).collect();
        assert_eq!(names.len(), 14);
        assert_eq!(names[0], "SMA");
        assert_eq!(names[8], "BBands_%B");
        assert!(IndicatorKind::Obv.default_params().is_empty());
    }

    #[test]
    fn add_remove_and_update() {
        let mut set = IndicatorSet::default();
        assert_eq!(set.settings().len(), 4);

        let id = set.add(IndicatorKind::Tsi);
        set.update_param(id, "long", 30.0);
        set.update_param(id, "short", f64::NAN);
        let tsi = set.settings().last().unwrap();
        assert_eq!(tsi.params["long"], 30.0);
        assert_eq!(tsi.params["short"], 0.0);

        set.remove(1);
        assert_eq!(set.settings()[0].kind, IndicatorKind::Ema);
        assert!(set.settings().iter().all(|s| s.id != 1));
    }

    #[test]
    fn panels_follow_columns() {
        let columns: Vec<String> = ["SMA_50", "RSI", "MACD", "MACD_Hist", "MACD_Signal", "BB_Upper"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            IndicatorPanel::detect(&columns),
            vec![IndicatorPanel::Rsi, IndicatorPanel::Macd, IndicatorPanel::Bollinger]
        );
    }
}
