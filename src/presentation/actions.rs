//! State transitions triggered from the UI.
//!
//! Components call these instead of touching several global signals at
//! once, so the ledger, the session and the stored copies stay in step.

use gloo_timers::future::TimeoutFuture;
use leptos::*;
use wasm_bindgen::JsValue;

use crate::application;
use crate::domain::{
    assistant::ChatLog,
    indicators::IndicatorRequest,
    ledger::{Ledger, LedgerResult, TradeReceipt},
    logging::LogComponent,
    market::{ChartType, StockAnalysis, Ticker, TimeFilter},
    notifications::{TOAST_DURATION, Toast},
    session::{Page, User, starting_funds},
};
use crate::global_state::{
    analysis_error, analyzed_ticker, api, chart_type, chat_log, current_page, current_user, dialogue, ledger,
    loading, reloading, sell_target, stock_data, theme, ticker_input, time_filter, toast, usd_inr,
};
use crate::infrastructure::storage::{BrowserStorage, Theme};
use crate::{log_debug, log_info, log_warn};

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

/// Switch page and push the matching path onto the browser history.
pub fn navigate(page: Page) {
    if current_page().get_untracked() == page {
        return;
    }
    if let Some(history) = web_sys::window().and_then(|w| w.history().ok()) {
        if let Err(err) = history.push_state_with_url(&JsValue::NULL, "", Some(page.path())) {
            log_warn!(LogComponent::Presentation("Navigate"), "pushState failed: {:?}", err);
        }
    }
    log_debug!(LogComponent::Presentation("Navigate"), "-> {}", page.path());
    current_page().set(page);
}

/// Page named by the address bar, used on start-up and on `popstate`.
pub fn page_from_location() -> Page {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .map(|path| Page::from_path(&path))
        .unwrap_or(Page::Home)
}

// ---------------------------------------------------------------------------
// Toasts
// ---------------------------------------------------------------------------

/// Show a toast and hide it after [`TOAST_DURATION`] unless another one
/// replaced it in the meantime.
pub fn show_toast(next: Toast) {
    toast().set(Some(next.clone()));
    spawn_local(async move {
        TimeoutFuture::new(TOAST_DURATION.as_millis() as u32).await;
        toast().update(|current| {
            if current.as_ref() == Some(&next) {
                *current = None;
            }
        });
    });
}

fn toast_result<T>(result: LedgerResult<T>, success: impl FnOnce(&T) -> String) -> Option<T> {
    match result {
        Ok(value) => {
            show_toast(Toast::success(success(&value)));
            Some(value)
        }
        Err(err) => {
            show_toast(Toast::error(err.to_string()));
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

/// Stored theme, else the system preference.
pub fn initial_theme() -> Theme {
    BrowserStorage::load_theme().unwrap_or_else(|| {
        let prefers_dark = web_sys::window()
            .and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok().flatten())
            .map(|query| query.matches())
            .unwrap_or(false);
        if prefers_dark { Theme::Dark } else { Theme::Light }
    })
}

/// Toggle the `dark` class on the document root.
pub fn apply_theme(value: Theme) {
    let root = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element());
    if let Some(root) = root {
        if let Err(err) = root.class_list().toggle_with_force("dark", value == Theme::Dark) {
            log_warn!(LogComponent::Presentation("Theme"), "could not toggle class: {:?}", err);
        }
    }
    theme().set(value);
}

pub fn toggle_theme() {
    let next = theme().get_untracked().toggled();
    apply_theme(next);
    if let Err(err) = BrowserStorage::save_theme(next) {
        log_warn!(LogComponent::Presentation("Theme"), "{}", err);
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Ledger a session starts with: the saved one for registered users, a
/// fresh practice balance for guests, nothing when logged out.
fn ledger_for(user: Option<&User>) -> Ledger {
    match user {
        Some(user) if user.persists_ledger() => {
            let saved_funds = BrowserStorage::load_funds(&user.username);
            Ledger::new(BrowserStorage::load_holdings(&user.username), starting_funds(Some(user), saved_funds))
        }
        other => Ledger::new(Vec::new(), starting_funds(other, None)),
    }
}

pub fn login(user: User) {
    log_info!(
        LogComponent::Presentation("Session"),
        "session started for {}{}",
        user.username,
        if user.is_practice_mode { " (practice)" } else { "" }
    );
    ledger().set(ledger_for(Some(&user)));
    current_user().set(Some(user));
    navigate(Page::Home);
}

/// Clear the session, the chat and any half-finished dialogue.
pub fn logout() {
    current_user().set(None);
    ledger().set(ledger_for(None));
    chat_log().set(ChatLog::with_welcome());
    dialogue().set(None);
    sell_target().set(None);
    navigate(Page::Login);
}

fn persist_ledger() {
    let Some(user) = current_user().get_untracked() else { return };
    if !user.persists_ledger() {
        return;
    }
    ledger().with_untracked(|l| {
        if let Err(err) = BrowserStorage::save_ledger(&user.username, l.holdings(), l.funds()) {
            log_warn!(LogComponent::Presentation("Ledger"), "{}", err);
        }
    });
}

/// Run one ledger operation on a copy and publish it only when it succeeds.
fn mutate_ledger<T>(operation: impl FnOnce(&mut Ledger) -> LedgerResult<T>) -> LedgerResult<T> {
    let mut next = ledger().get_untracked();
    let value = operation(&mut next)?;
    ledger().set(next);
    persist_ledger();
    Ok(value)
}

/// Send an executed trade to the server log in the background.
fn log_receipt(receipt: &TradeReceipt) {
    let Some(user) = current_user().get_untracked() else { return };
    let receipt = receipt.clone();
    spawn_local(async move {
        application::record_trade(api(), &user, &receipt).await;
    });
}

// ---------------------------------------------------------------------------
// Trading
// ---------------------------------------------------------------------------

/// Execute a buy at `price`; used by the trade card and the assistant.
pub fn execute_buy(ticker: &Ticker, quantity: u32, price: f64) -> LedgerResult<TradeReceipt> {
    let rate = usd_inr().get_untracked();
    let id = application::now_millis();
    let receipt = mutate_ledger(|l| l.buy(ticker, quantity, price, rate, id))?;
    log_receipt(&receipt);
    Ok(receipt)
}

pub fn execute_sell(ticker: &Ticker, quantity: u32, price: f64) -> LedgerResult<TradeReceipt> {
    let rate = usd_inr().get_untracked();
    let receipt = mutate_ledger(|l| l.sell(ticker, quantity, price, rate))?;
    log_receipt(&receipt);
    Ok(receipt)
}

pub fn buy(ticker: &Ticker, quantity: u32, price: f64) {
    toast_result(execute_buy(ticker, quantity, price), |r| {
        format!("Successfully bought {} share(s) of {}! 🎉", r.quantity, r.ticker)
    });
}

/// Sell from the modal; closes it on success.
pub fn sell(ticker: &Ticker, quantity: u32, price: f64) {
    let sold = toast_result(execute_sell(ticker, quantity, price), |r| {
        format!("Sold {} share(s) of {} for ₹{:.2}", r.quantity, r.ticker, r.amount_inr)
    });
    if sold.is_some() {
        sell_target().set(None);
    }
}

pub fn deposit(amount: f64) {
    toast_result(mutate_ledger(|l| l.deposit(amount)), |_| format!("Successfully added ₹{}", amount));
}

pub fn withdraw(amount: f64) {
    toast_result(mutate_ledger(|l| l.withdraw(amount)), |_| format!("Successfully withdrew ₹{}", amount));
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

/// Load a ticker into the shared analysis state.
///
/// A full reload blanks the chart behind a spinner and drops the previous
/// data on failure; a period change keeps the old chart on screen.
pub async fn fetch_stock(
    ticker: Ticker,
    period: TimeFilter,
    full_reload: bool,
    indicators: Option<Vec<IndicatorRequest>>,
) -> Option<StockAnalysis> {
    if full_reload {
        loading().set(true);
    } else {
        reloading().set(true);
    }
    analysis_error().set(None);

    let result = application::fetch_stock_data(api(), &ticker, period, indicators.as_deref()).await;
    let outcome = match result {
        Ok(analysis) => {
            stock_data().set(Some(analysis.clone()));
            analyzed_ticker().set(Some(ticker));
            Some(analysis)
        }
        Err(err) => {
            log_warn!(LogComponent::Presentation("Analysis"), "{} failed: {}", ticker, err);
            analysis_error().set(Some(err.user_message()));
            if full_reload {
                stock_data().set(None);
            }
            None
        }
    };
    loading().set(false);
    reloading().set(false);
    outcome
}

/// Search-box entry point: reset the chart to 1D line view and load the
/// ticker. Blank input is ignored.
pub fn analyze(raw: &str) {
    let ticker = match Ticker::new(raw) {
        Ok(ticker) => ticker,
        Err(err) => {
            log_debug!(LogComponent::Presentation("Analysis"), "ignored input: {}", err);
            return;
        }
    };
    ticker_input().set(String::new());
    time_filter().set(TimeFilter::OneDay);
    chart_type().set(ChartType::Line);
    spawn_local(async move {
        fetch_stock(ticker, TimeFilter::OneDay, true, None).await;
    });
}

/// Change the chart period and refetch the analysed ticker for it. The
/// indicator and assistant pages load their own data and skip the refetch.
pub fn change_period(period: TimeFilter) {
    if time_filter().get_untracked() == period {
        return;
    }
    time_filter().set(period);
    let page = current_page().get_untracked();
    if matches!(page, Page::Indicators | Page::Assistant) {
        return;
    }
    if let Some(ticker) = analyzed_ticker().get_untracked() {
        spawn_local(async move {
            fetch_stock(ticker, period, false, None).await;
        });
    }
}
