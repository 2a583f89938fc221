use leptos::*;

use crate::application;
use crate::domain::{
    logging::LogComponent,
    notifications::Toast,
    session::{Page, RouteDecision, resolve_route},
};
use crate::global_state::{all_tickers, analysis_error, api, current_page, current_user, sell_target, theme, usd_inr};
use crate::infrastructure::storage::Theme;
use crate::presentation::{
    actions,
    components::{GuestPrompt, SellModal, TickerTape, ToastView},
    pages::{
        assistant::AssistantPage, auth::AuthPage, backtest::BacktestPage, chart::ChartPage, export::ExportPage,
        funds::FundsPage, home::HomePage, indicators::IndicatorPage, news::NewsPage, portfolio::PortfolioPage,
        prediction::PredictionPage, sip::SipCalculatorPage, track::TrackPage, transactions::TransactionsPage,
    },
};
use crate::{log_error, log_info};

const STYLES: &str = r#"
:root {
    --bg: #f8fafc;
    --card: #ffffff;
    --text: #0f172a;
    --muted: #64748b;
    --border: #e2e8f0;
    --accent: #4f46e5;
    --positive: #16a34a;
    --negative: #dc2626;
}
.dark {
    --bg: #0f172a;
    --card: #1e293b;
    --text: #e2e8f0;
    --muted: #94a3b8;
    --border: #334155;
}
body {
    margin: 0;
    font-family: 'SF Pro Display', -apple-system, BlinkMacSystemFont, sans-serif;
    background: var(--bg);
    color: var(--text);
}
.app { max-width: 1200px; margin: 0 auto; padding: 16px; }
.app.with-tape { padding-top: 56px; }
header { display: flex; justify-content: space-between; align-items: center; margin-bottom: 16px; }
header h1 {
    margin: 0;
    font-size: 28px;
    background: linear-gradient(90deg, #2563eb, #9333ea);
    -webkit-background-clip: text;
    color: transparent;
}
nav { display: flex; flex-wrap: wrap; gap: 6px; margin-bottom: 20px; }
nav button.active { background: var(--accent); color: white; }
button {
    border: 1px solid var(--border);
    background: var(--card);
    color: var(--text);
    padding: 8px 14px;
    border-radius: 8px;
    cursor: pointer;
}
button:disabled { opacity: 0.5; cursor: not-allowed; }
button.primary { background: var(--accent); color: white; border: none; }
button.buy { background: var(--positive); color: white; border: none; }
button.danger { background: var(--negative); color: white; border: none; }
button.ghost, button.outline { background: transparent; }
button.wide { width: 100%; margin-top: 12px; }
.danger-text { color: var(--negative); }
input, select {
    width: 100%;
    box-sizing: border-box;
    padding: 8px 10px;
    border-radius: 8px;
    border: 1px solid var(--border);
    background: var(--card);
    color: var(--text);
}
label { display: block; font-size: 13px; color: var(--muted); margin: 10px 0 4px; }
.card {
    background: var(--card);
    border: 1px solid var(--border);
    border-radius: 14px;
    padding: 18px;
    margin-bottom: 16px;
}
.card.narrow { max-width: 520px; margin-left: auto; margin-right: auto; }
.card-title { margin-top: 0; }
.stack { display: flex; flex-direction: column; gap: 12px; }
.row { display: flex; justify-content: space-between; align-items: center; gap: 8px; }
.right { text-align: right; }
.grid { display: grid; gap: 16px; }
.grid.two { grid-template-columns: repeat(auto-fit, minmax(280px, 1fr)); }
.grid.three { grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); }
.grid.four { grid-template-columns: repeat(auto-fit, minmax(150px, 1fr)); }
.grid.backtest { grid-template-columns: 1fr 2fr; }
.span-two { grid-column: span 1; }
.actions { display: flex; gap: 8px; margin-top: 12px; }
.muted { color: var(--muted); }
.small { font-size: 12px; }
.big { font-size: 24px; font-weight: 700; }
.positive { color: var(--positive); }
.negative { color: var(--negative); }
.empty { color: var(--muted); text-align: center; padding: 16px; }
.link, .portfolio-link { cursor: pointer; color: var(--accent); }
.portfolio-link { display: flex; justify-content: space-between; align-items: center; margin-top: 16px; }
.pill { padding: 2px 10px; border-radius: 999px; font-size: 12px; }
.practice { background: #fef3c7; color: #92400e; }
.alert { border-left: 4px solid var(--accent); padding: 10px 14px; margin: 12px 0; background: var(--bg); }
.alert.error { border-color: var(--negative); }
.metric-value { font-size: 20px; font-weight: 600; margin: 4px 0 0; }
.metric.hero { text-align: center; margin: 16px 0; }
.skeleton { min-height: 120px; border-radius: 14px; background: var(--border); animation: pulse 1.5s infinite; }
.skeleton.tall { min-height: 400px; }
@keyframes pulse { 50% { opacity: 0.5; } }
.search-row { display: flex; gap: 8px; }
.search-box { position: relative; flex: 1; }
.suggestions {
    position: absolute;
    z-index: 20;
    width: 100%;
    max-height: 240px;
    overflow-y: auto;
    list-style: none;
    margin: 4px 0 0;
    padding: 0;
    background: var(--card);
    border: 1px solid var(--border);
    border-radius: 8px;
}
.suggestions li { padding: 8px 12px; cursor: pointer; }
.suggestions li:hover { background: var(--bg); }
.ticker-tape {
    position: fixed;
    top: 0;
    left: 0;
    right: 0;
    z-index: 30;
    display: flex;
    gap: 32px;
    padding: 10px 16px;
    background: var(--card);
    border-bottom: 1px solid var(--border);
    white-space: nowrap;
    overflow: hidden;
}
.toast {
    position: fixed;
    top: 64px;
    right: 16px;
    z-index: 50;
    padding: 12px 18px;
    border-radius: 10px;
    color: white;
}
.toast.success { background: var(--positive); }
.toast.error { background: var(--negative); }
.modal-overlay {
    position: fixed;
    inset: 0;
    z-index: 40;
    display: flex;
    align-items: center;
    justify-content: center;
    background: rgba(0, 0, 0, 0.5);
}
.modal-content { width: 90%; max-width: 420px; }
.chart-card { position: relative; }
.chart-canvas { width: 100%; display: block; }
.reload-overlay {
    position: absolute;
    inset: 0;
    display: flex;
    align-items: center;
    justify-content: center;
    background: rgba(0, 0, 0, 0.2);
    border-radius: 14px;
}
.periods { display: flex; flex-wrap: wrap; gap: 4px; margin-top: 12px; }
.period-btn.active, .toggle button.active { background: var(--accent); color: white; }
.price-line { display: flex; align-items: baseline; gap: 12px; }
.trade-row { display: flex; gap: 16px; align-items: flex-end; }
.total { text-align: right; }
.holdings, .transactions { list-style: none; padding: 0; margin: 0; }
.holding-row, .transaction {
    display: flex;
    justify-content: space-between;
    padding: 10px 0;
    border-bottom: 1px solid var(--border);
    cursor: pointer;
}
.news-item { padding: 10px 0; border-bottom: 1px solid var(--border); }
.news-item a { color: var(--text); text-decoration: none; font-weight: 600; }
.indicator-card { border: 1px solid var(--border); border-radius: 10px; padding: 10px; margin-bottom: 8px; }
.add-row { display: flex; gap: 8px; margin-top: 8px; }
.divider { border-top: 1px solid var(--border); margin: 16px 0; }
.scroll { overflow-x: auto; }
table { width: 100%; border-collapse: collapse; }
th, td { text-align: left; padding: 8px; border-bottom: 1px solid var(--border); }
.auth-page { display: flex; justify-content: center; padding-top: 40px; }
.auth-card { width: 100%; max-width: 400px; }
.guest-prompt, .empty-state { text-align: center; }
.sip-summary p { display: flex; justify-content: space-between; }
.chat { display: flex; flex-direction: column; height: 70vh; max-width: 720px; margin: 0 auto; }
.chat-body { flex: 1; overflow-y: auto; display: flex; flex-direction: column; gap: 10px; }
.chat-footer { display: flex; gap: 8px; padding-top: 12px; border-top: 1px solid var(--border); }
.message { display: flex; }
.message.from-user { justify-content: flex-end; }
.bubble { position: relative; max-width: 75%; padding: 10px 14px; border-radius: 16px; }
.bubble p { margin: 0; white-space: pre-wrap; }
.bubble.bot { background: var(--bg); }
.bubble.user { background: #3b82f6; color: white; }
.bubble .edit { position: absolute; left: -56px; top: 50%; transform: translateY(-50%); padding: 2px 6px; opacity: 0; }
.bubble:hover .edit { opacity: 1; }
.edit-row { display: flex; gap: 6px; width: 100%; }
.typing-indicator span {
    display: inline-block;
    width: 6px;
    height: 6px;
    margin: 0 2px;
    border-radius: 50%;
    background: var(--muted);
    animation: pulse 1s infinite;
}
@media (max-width: 640px) {
    .wide-only { display: none; }
    .grid.backtest { grid-template-columns: 1fr; }
}
"#;

fn page_view(page: Page) -> View {
    match page {
        Page::Login => view! { <AuthPage/> }.into_view(),
        Page::Home => view! { <HomePage/> }.into_view(),
        Page::Chart => view! { <ChartPage/> }.into_view(),
        Page::Assistant => view! { <AssistantPage/> }.into_view(),
        Page::Portfolio => view! { <PortfolioPage/> }.into_view(),
        Page::Indicators => view! { <IndicatorPage/> }.into_view(),
        Page::Prediction => view! { <PredictionPage/> }.into_view(),
        Page::News => view! { <NewsPage/> }.into_view(),
        Page::Backtest => view! { <BacktestPage/> }.into_view(),
        Page::Track => view! { <TrackPage/> }.into_view(),
        Page::Sip => view! { <SipCalculatorPage/> }.into_view(),
        Page::Funds => view! { <FundsPage/> }.into_view(),
        Page::Transactions => view! { <TransactionsPage/> }.into_view(),
        Page::Export => view! { <ExportPage/> }.into_view(),
    }
}

#[component]
fn NavBar() -> impl IntoView {
    view! {
        <nav>
            {Page::navigation()
                .into_iter()
                .map(|page| {
                    view! {
                        <button class:active=move || current_page().get() == page on:click=move |_| actions::navigate(page)>
                            {page.label()}
                        </button>
                    }
                })
                .collect_view()}
            <button class="ghost danger-text" on:click=|_| actions::logout()>"Logout"</button>
        </nav>
    }
}

#[component]
fn Header() -> impl IntoView {
    let logged_in = move || current_user().with(Option::is_some);
    view! {
        <header>
            {move || {
                if logged_in() {
                    view! { <button class="ghost" on:click=|_| actions::navigate(Page::Funds)>"☰"</button> }.into_view()
                } else {
                    view! { <span></span> }.into_view()
                }
            }}
            <h1>"StockIQ"</h1>
            <button class="ghost" on:click=|_| actions::toggle_theme()>
                {move || if theme().get() == Theme::Dark { "☀️" } else { "🌙" }}
            </button>
        </header>
    }
}

/// Root component: shell, navigation and the route guard.
#[component]
pub fn App() -> impl IntoView {
    current_page().set(actions::page_from_location());

    let popstate = window_event_listener(ev::popstate, |_| current_page().set(actions::page_from_location()));
    on_cleanup(move || popstate.remove());

    spawn_local(async {
        match application::load_reference_data(api()).await {
            Ok(data) => {
                all_tickers().set(data.tickers);
                usd_inr().set(data.usd_inr);
            }
            Err(err) => {
                log_error!(LogComponent::Presentation("App"), "could not load reference data: {}", err);
                analysis_error().set(Some(application::SERVER_UNREACHABLE.to_string()));
                actions::show_toast(Toast::error(application::SERVER_UNREACHABLE));
            }
        }
    });

    let route = create_memo(move |_| current_user().with(|user| resolve_route(current_page().get(), user.as_ref())));

    create_effect(move |_| {
        if route.get() == RouteDecision::RedirectToLogin {
            log_info!(LogComponent::Presentation("App"), "no session, redirecting to login");
            actions::navigate(Page::Login);
        }
    });

    let logged_in = move || current_user().with(Option::is_some);

    view! {
        <style>{STYLES}</style>
        <Show when=move || sell_target().with(Option::is_some)>
            <SellModal/>
        </Show>
        <Show when=logged_in>
            <TickerTape/>
        </Show>
        <ToastView/>
        <div class="app" class:with-tape=logged_in>
            <Header/>
            <Show when=logged_in>
                <NavBar/>
            </Show>
            <main>
                {move || match route.get() {
                    RouteDecision::Show(page) => page_view(page),
                    RouteDecision::PremiumPrompt => view! { <GuestPrompt/> }.into_view(),
                    RouteDecision::RedirectToLogin => view! { <AuthPage/> }.into_view(),
                }}
            </main>
        </div>
    }
}
