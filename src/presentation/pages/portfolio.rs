use std::time::Duration;

use leptos::*;

use crate::application::StockApi;
use crate::domain::{
    ledger::holding_pnl,
    logging::LogComponent,
    market::QuoteBook,
    session::Page,
};
use crate::global_state::{api, config, current_user, ledger, usd_inr};
use crate::log_error;
use crate::presentation::{actions, components::{every, tone}};

#[component]
pub fn PortfolioPage() -> impl IntoView {
    let (quotes, set_quotes) = create_signal(QuoteBook::new());
    let (loading, set_loading) = create_signal(true);

    let refresh = move || {
        let tickers = ledger().with_untracked(|l| l.tickers());
        if tickers.is_empty() {
            set_loading.set(false);
            return;
        }
        spawn_local(async move {
            match api().portfolio_data(&tickers).await {
                Ok(book) => set_quotes.set(book),
                Err(err) => log_error!(LogComponent::Presentation("Portfolio"), "live quotes unavailable: {}", err),
            }
            set_loading.set(false);
        });
    };
    create_effect(move |_| {
        ledger().with(|_| ());
        refresh();
    });
    every(Duration::from_millis(config().portfolio_refresh_ms as u64), refresh);

    let is_practice = move || current_user().with(|u| u.as_ref().is_some_and(|u| u.is_practice_mode));

    let rows = move || {
        let rate = usd_inr().get();
        let book = quotes.get();
        ledger().with(|l| {
            l.holdings()
                .iter()
                .map(|holding| {
                    let pnl = holding_pnl(holding, book.get(holding.ticker.value()), rate);
                    let symbol = holding.ticker.currency().symbol();
                    let ticker = holding.ticker.clone();
                    view! {
                        <div
                            class="holding-row"
                            on:click=move |_| {
                                actions::analyze(ticker.value());
                                actions::navigate(Page::Chart);
                            }
                        >
                            <div class="row">
                                <p class="ticker">{holding.ticker.to_string()}</p>
                                <p class=tone(pnl.is_profit())>
                                    {format!("{}₹{:.2}", if pnl.is_profit() { "+" } else { "" }, pnl.pnl)}
                                </p>
                            </div>
                            <div class="row muted">
                                <p>{format!("Qty: {}", holding.quantity)}</p>
                                <p>{format!("Invested (INR): ₹{:.2}", pnl.invested)}</p>
                            </div>
                            <div class="row muted small">
                                <p>{format!("Avg. Price: {}{:.2}", symbol, holding.purchase_price)}</p>
                                <p>{format!("Current Price: {}{:.2}", symbol, pnl.current_price)}</p>
                            </div>
                        </div>
                    }
                })
                .collect_view()
        })
    };

    view! {
        <div class="card">
            <div class="card-title">
                <h2>"My Investments"</h2>
                <Show when=is_practice>
                    <span class="pill practice">"Practice Mode"</span>
                </Show>
            </div>
            {move || {
                let empty = ledger().with(|l| l.holdings().is_empty());
                if empty {
                    view! {
                        <p class="empty">
                            "Your portfolio is empty. Analyze a stock and use the 'Buy' option to add investments."
                        </p>
                    }
                    .into_view()
                } else if loading.get() {
                    view! { <p class="muted">"Loading live prices..."</p> }.into_view()
                } else {
                    view! { <div class="stack">{rows}</div> }.into_view()
                }
            }}
        </div>
    }
}
