use std::time::Duration;

use leptos::*;

use crate::application;
use crate::domain::{ledger::PortfolioMetrics, session::Page};
use crate::global_state::{api, config, current_user, ledger, loading, ticker_input, usd_inr};
use crate::presentation::{
    actions,
    components::{AlertBox, MetricCard, StockSearchInput, every, rupees, tone},
};

/// Search box plus the practice banner and portfolio totals.
#[component]
pub fn HomePage() -> impl IntoView {
    let (metrics, set_metrics) = create_signal(None::<PortfolioMetrics>);

    let refresh = move || {
        let snapshot = ledger().get_untracked();
        let rate = usd_inr().get_untracked();
        spawn_local(async move {
            let totals = application::portfolio_metrics(api(), &snapshot, rate).await;
            set_metrics.set(Some(totals));
        });
    };
    create_effect(move |_| {
        ledger().with(|_| ());
        usd_inr().with(|_| ());
        refresh();
    });
    every(Duration::from_millis(config().portfolio_refresh_ms as u64), refresh);

    let open_chart = move |symbol: String| {
        if !symbol.trim().is_empty() {
            actions::analyze(&symbol);
            actions::navigate(Page::Chart);
        }
    };
    let is_practice = move || current_user().with(|u| u.as_ref().is_some_and(|u| u.is_practice_mode));
    let amount = move |pick: fn(&PortfolioMetrics) -> f64| {
        metrics.get().map(|m| pick(&m))
    };

    view! {
        <div class="stack">
            <div class="card">
                <h3>"Stock Analysis"</h3>
                <div class="search-row">
                    <StockSearchInput value=ticker_input() on_select=open_chart/>
                    <button
                        class="primary"
                        disabled=move || loading().get() || ticker_input().with(String::is_empty)
                        on:click=move |_| open_chart(ticker_input().get_untracked())
                    >
                        "Analyze"
                    </button>
                </div>
            </div>
            <div class="card">
                <h2>"Your Dashboard"</h2>
                <Show when=is_practice>
                    <AlertBox
                        title="Practice Mode"
                        message="You are in Practice Mode. All trades are simulated with paper money."
                    />
                </Show>
                <div class="metric hero">
                    <p class="muted">"Total Invested"</p>
                    <p class="metric-value big">
                        {move || amount(|m| m.total_invested).map(rupees).unwrap_or_else(|| "...".to_string())}
                    </p>
                </div>
                <div class="grid two">
                    <MetricCard
                        label="Total Profit/Loss"
                        value=Signal::derive(move || {
                            amount(|m| m.total_pl).map(|v| format!("₹{:.2}", v)).unwrap_or_else(|| "...".into())
                        })
                        class=Signal::derive(move || tone(amount(|m| m.total_pl).unwrap_or(0.0) >= 0.0))
                    />
                    <MetricCard
                        label="Today's Profit/Loss"
                        value=Signal::derive(move || {
                            amount(|m| m.today_pl).map(|v| format!("₹{:.2}", v)).unwrap_or_else(|| "...".into())
                        })
                        class=Signal::derive(move || tone(amount(|m| m.today_pl).unwrap_or(0.0) >= 0.0))
                    />
                </div>
                <a class="portfolio-link" on:click=|_| actions::navigate(Page::Portfolio)>
                    <div>
                        <h3>"My Portfolio"</h3>
                        <p class="muted">{move || format!("{} holding(s)", ledger().with(|l| l.holdings().len()))}</p>
                    </div>
                    <span>"→"</span>
                </a>
            </div>
        </div>
    }
}
