//! Local-storage persistence: theme preference and each registered user's
//! ledger.

use crate::domain::errors::{AppError, StorageResult};
use crate::domain::ledger::Holding;
use crate::domain::logging::LogComponent;
use crate::log_warn;
use gloo::storage::{LocalStorage, Storage};

const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Self {
        if value == "dark" { Theme::Dark } else { Theme::Light }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

pub fn portfolio_key(username: &str) -> String {
    format!("portfolio_{}", username)
}

pub fn funds_key(username: &str) -> String {
    format!("funds_{}", username)
}

pub struct BrowserStorage;

impl BrowserStorage {
    /// Stored preference, `None` when the user never toggled the theme.
    pub fn load_theme() -> Option<Theme> {
        LocalStorage::get::<String>(THEME_KEY).ok().map(|v| Theme::parse(&v))
    }

    pub fn save_theme(theme: Theme) -> StorageResult<()> {
        LocalStorage::set(THEME_KEY, theme.as_str()).map_err(|e| AppError::StorageError(e.to_string()))
    }

    /// Saved holdings; a missing or unreadable entry gives an empty list.
    pub fn load_holdings(username: &str) -> Vec<Holding> {
        match LocalStorage::get::<Vec<Holding>>(portfolio_key(username)) {
            Ok(holdings) => holdings,
            Err(gloo::storage::errors::StorageError::KeyNotFound(_)) => Vec::new(),
            Err(err) => {
                log_warn!(LogComponent::Infrastructure("Storage"), "discarding saved portfolio: {}", err);
                Vec::new()
            }
        }
    }

    pub fn load_funds(username: &str) -> Option<f64> {
        LocalStorage::get::<f64>(funds_key(username)).ok().filter(|f| f.is_finite())
    }

    pub fn save_ledger(username: &str, holdings: &[Holding], funds: f64) -> StorageResult<()> {
        LocalStorage::set(portfolio_key(username), holdings)
            .and_then(|_| LocalStorage::set(funds_key(username), funds))
            .map_err(|e| AppError::StorageError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_per_user() {
        assert_eq!(portfolio_key("asha"), "portfolio_asha");
        assert_eq!(funds_key("asha"), "funds_asha");
    }

    #[test]
    fn unknown_theme_is_light() {
        assert_eq!(Theme::parse("dark"), Theme::Dark);
        assert_eq!(Theme::parse("sepia"), Theme::Light);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }
}
