//! Signed-in user, page access rules and starting balances.

use crate::domain::errors::AppError;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

pub const GUEST_USERNAME: &str = "guest";
pub const DEFAULT_FUNDS: f64 = 100_000.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    #[serde(rename = "isPracticeMode", default)]
    pub is_practice_mode: bool,
}

impl User {
    pub fn registered(username: impl Into<String>) -> Self {
        Self { username: username.into(), is_practice_mode: false }
    }

    pub fn guest() -> Self {
        Self { username: GUEST_USERNAME.to_string(), is_practice_mode: true }
    }

    /// Registered, non-practice users get local persistence and a server log.
    pub fn persists_ledger(&self) -> bool {
        !self.is_practice_mode && self.username != GUEST_USERNAME
    }
}

/// Cash balance to start a session with.
pub fn starting_funds(user: Option<&User>, saved: Option<f64>) -> f64 {
    match user {
        None => 0.0,
        Some(user) if user.is_practice_mode => DEFAULT_FUNDS,
        Some(_) => saved.unwrap_or(DEFAULT_FUNDS),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    PracticeAllowed,
    RegisteredOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Page {
    Login,
    Home,
    Chart,
    Assistant,
    Portfolio,
    Indicators,
    Prediction,
    News,
    Backtest,
    Track,
    Sip,
    Funds,
    Transactions,
    Export,
}

impl Page {
    pub fn path(&self) -> &'static str {
        match self {
            Page::Login => "/login",
            Page::Home => "/",
            Page::Chart => "/chart",
            Page::Assistant => "/bot",
            Page::Portfolio => "/portfolio",
            Page::Indicators => "/indicators",
            Page::Prediction => "/prediction",
            Page::News => "/news",
            Page::Backtest => "/backtest",
            Page::Track => "/track",
            Page::Sip => "/sip",
            Page::Funds => "/funds",
            Page::Transactions => "/transactions",
            Page::Export => "/export",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Page::Login => "Log In",
            Page::Home => "Home",
            Page::Chart => "Chart",
            Page::Assistant => "Assistant",
            Page::Portfolio => "Portfolio",
            Page::Indicators => "Indicators",
            Page::Prediction => "Prediction",
            Page::News => "News",
            Page::Backtest => "Backtest",
            Page::Track => "Track",
            Page::Sip => "SIP",
            Page::Funds => "Funds",
            Page::Transactions => "Transactions",
            Page::Export => "Export",
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Page::Login => Access::Public,
            Page::Home | Page::Chart | Page::News | Page::Portfolio | Page::Funds | Page::Transactions => {
                Access::PracticeAllowed
            }
            _ => Access::RegisteredOnly,
        }
    }

    /// Unknown paths fall back to the home page.
    pub fn from_path(path: &str) -> Page {
        let path = path.trim_end_matches('/');
        let path = if path.is_empty() { "/" } else { path };
        Page::iter().find(|p| p.path() == path).unwrap_or(Page::Home)
    }

    /// Entries of the navigation bar, in display order.
    pub fn navigation() -> [Page; 10] {
        [
            Page::Home,
            Page::Chart,
            Page::Assistant,
            Page::Portfolio,
            Page::Indicators,
            Page::Prediction,
            Page::News,
            Page::Backtest,
            Page::Track,
            Page::Sip,
        ]
    }
}

/// What the router shows for a requested page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Show(Page),
    PremiumPrompt,
    RedirectToLogin,
}

pub fn resolve_route(page: Page, user: Option<&User>) -> RouteDecision {
    match (page.access(), user) {
        (Access::Public, _) => RouteDecision::Show(page),
        (_, None) => RouteDecision::RedirectToLogin,
        (Access::RegisteredOnly, Some(user)) if user.is_practice_mode => RouteDecision::PremiumPrompt,
        _ => RouteDecision::Show(page),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Signup,
}

impl AuthMode {
    pub fn toggled(self) -> Self {
        match self {
            AuthMode::Login => AuthMode::Signup,
            AuthMode::Signup => AuthMode::Login,
        }
    }
}

pub fn validate_credentials(mode: AuthMode, username: &str, password: &str, confirm: &str) -> Result<(), AppError> {
    if mode == AuthMode::Signup && password != confirm {
        return Err(AppError::ValidationError("Passwords do not match.".to_string()));
    }
    if username.is_empty() || password.is_empty() {
        return Err(AppError::ValidationError("Username and password cannot be empty.".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guests_see_premium_prompt_on_registered_pages() {
        let guest = User::guest();
        assert_eq!(resolve_route(Page::Sip, Some(&guest)), RouteDecision::PremiumPrompt);
        assert_eq!(resolve_route(Page::Funds, Some(&guest)), RouteDecision::Show(Page::Funds));
        assert_eq!(resolve_route(Page::Home, None), RouteDecision::RedirectToLogin);
        assert_eq!(resolve_route(Page::Login, None), RouteDecision::Show(Page::Login));
    }

    #[test]
    fn paths_round_trip() {
        for page in Page::iter() {
            assert_eq!(Page::from_path(page.path()), page);
        }
        assert_eq!(Page::from_path("/nowhere"), Page::Home);
        assert_eq!(Page::from_path("/bot/"), Page::Assistant);
    }
}
