use crate::domain::{
    assistant::{ChatLog, DialogueContext},
    indicators::IndicatorRequest,
    ledger::{Holding, Ledger},
    market::{ChartType, StockAnalysis, Ticker, TimeFilter},
    notifications::Toast,
    session::{Page, User},
};
use crate::infrastructure::{AppConfig, HttpStockApi, storage::Theme};
use leptos::*;
use once_cell::sync::OnceCell;

/// Indicator page setup handed over by the assistant's graph offer.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPreset {
    pub ticker: Ticker,
    pub period: TimeFilter,
    pub indicators: Vec<IndicatorRequest>,
}

/// Client state shared by every page.
pub struct AppContext {
    pub config: AppConfig,
    pub api: HttpStockApi,
    pub user: RwSignal<Option<User>>,
    pub ledger: RwSignal<Ledger>,
    pub tickers: RwSignal<Vec<Ticker>>,
    pub usd_inr: RwSignal<f64>,
    pub theme: RwSignal<Theme>,
    pub page: RwSignal<Page>,
    pub toast: RwSignal<Option<Toast>>,
    /// Holding picked in the sell dialog.
    pub sell_target: RwSignal<Option<Holding>>,
    pub indicator_preset: RwSignal<Option<IndicatorPreset>>,
    pub chat: RwSignal<ChatLog>,
    pub dialogue: RwSignal<Option<DialogueContext>>,
    /// Last analysis shown on the chart, prediction and news pages.
    pub stock_data: RwSignal<Option<StockAnalysis>>,
    pub analyzed_ticker: RwSignal<Option<Ticker>>,
    pub time_filter: RwSignal<TimeFilter>,
    pub chart_type: RwSignal<ChartType>,
    /// First load of a ticker; the chart page shows a spinner.
    pub loading: RwSignal<bool>,
    /// Refetch for another period; the old chart stays visible.
    pub reloading: RwSignal<bool>,
    pub analysis_error: RwSignal<Option<String>>,
    pub ticker_input: RwSignal<String>,
}

static GLOBALS: OnceCell<AppContext> = OnceCell::new();

pub fn globals() -> &'static AppContext {
    GLOBALS.get_or_init(|| {
        let config = AppConfig::from_env();
        AppContext {
            api: HttpStockApi::new(config.api_base_url.clone()),
            user: create_rw_signal(None),
            ledger: create_rw_signal(Ledger::new(Vec::new(), 0.0)),
            tickers: create_rw_signal(Vec::new()),
            usd_inr: create_rw_signal(config.default_usd_inr),
            theme: create_rw_signal(Theme::default()),
            page: create_rw_signal(Page::Login),
            toast: create_rw_signal(None),
            sell_target: create_rw_signal(None),
            indicator_preset: create_rw_signal(None),
            chat: create_rw_signal(ChatLog::with_welcome()),
            dialogue: create_rw_signal(None),
            stock_data: create_rw_signal(None),
            analyzed_ticker: create_rw_signal(None),
            time_filter: create_rw_signal(TimeFilter::OneDay),
            chart_type: create_rw_signal(ChartType::Line),
            loading: create_rw_signal(false),
            reloading: create_rw_signal(false),
            analysis_error: create_rw_signal(None),
            ticker_input: create_rw_signal(config.default_ticker.to_string()),
            config,
        }
    })
}

crate::global_signals! {
    pub current_user => user: Option<User>,
    pub ledger => ledger: Ledger,
    pub all_tickers => tickers: Vec<Ticker>,
    pub usd_inr => usd_inr: f64,
    pub theme => theme: Theme,
    pub current_page => page: Page,
    pub toast => toast: Option<Toast>,
    pub sell_target => sell_target: Option<Holding>,
    pub indicator_preset => indicator_preset: Option<IndicatorPreset>,
    pub chat_log => chat: ChatLog,
    pub dialogue => dialogue: Option<DialogueContext>,
    pub stock_data => stock_data: Option<StockAnalysis>,
    pub analyzed_ticker => analyzed_ticker: Option<Ticker>,
    pub time_filter => time_filter: TimeFilter,
    pub chart_type => chart_type: ChartType,
    pub loading => loading: bool,
    pub reloading => reloading: bool,
    pub analysis_error => analysis_error: Option<String>,
    pub ticker_input => ticker_input: String,
}

pub fn api() -> &'static HttpStockApi {
    &globals().api
}

pub fn config() -> &'static AppConfig {
    &globals().config
}
