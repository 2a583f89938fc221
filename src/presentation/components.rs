use std::time::Duration;

use leptos::*;

use super::actions;
use crate::application::StockApi;
use crate::domain::{
    assistant::{Segment, segments},
    ledger::cost_in_inr,
    logging::LogComponent,
    market::{Currency, Quote, Ticker, format_money, suggest_tickers},
    session::Page,
};
use crate::global_state::{
    all_tickers, api, config, current_user, ledger, sell_target, stock_data, toast, usd_inr,
};
use crate::{log_error, log_warn};

const SEARCH_PLACEHOLDER: &str = "Search NIFTY & US Stocks (e.g., RELIANCE.NS, AAPL)";
const MARKET_INDICES: [&str; 2] = ["NIFTY 50", "SENSEX"];

/// Call `tick` every `period` until the owner is disposed.
pub fn every(period: Duration, tick: impl Fn() + 'static) {
    match set_interval_with_handle(tick, period) {
        Ok(handle) => on_cleanup(move || handle.clear()),
        Err(err) => log_warn!(LogComponent::Presentation("Refresh"), "interval not started: {:?}", err),
    }
}

/// Like [`every`], with one call right away.
pub fn refresh_every(period: Duration, refresh: impl Fn() + 'static) {
    refresh();
    every(period, refresh);
}

/// CSS class for a signed amount.
pub fn tone(is_positive: bool) -> &'static str {
    if is_positive { "positive" } else { "negative" }
}

#[component]
pub fn ToastView() -> impl IntoView {
    move || {
        toast().get().map(|t| {
            view! { <div class=format!("toast {}", t.kind.css_class())>{t.message}</div> }
        })
    }
}

/// Scrolling strip with the two market indices, refreshed every minute.
#[component]
pub fn TickerTape() -> impl IntoView {
    let (indices, set_indices) = create_signal(Vec::<(String, Option<Quote>)>::new());

    refresh_every(Duration::from_millis(config().indices_refresh_ms as u64), move || {
        spawn_local(async move {
            match api().market_indices().await {
                Ok(book) => set_indices.set(
                    MARKET_INDICES
                        .iter()
                        .map(|name| (name.to_string(), book.get(*name).copied()))
                        .collect(),
                ),
                Err(err) => log_error!(LogComponent::Presentation("TickerTape"), "indices unavailable: {}", err),
            }
        });
    });

    view! {
        <div class="ticker-tape">
            <For
                each=move || indices.get()
                key=|(name, quote)| format!("{}{:?}", name, quote.map(|q| q.current_price))
                children=move |(name, quote)| {
                    let body = match quote.filter(|q| q.current_price > 0.0) {
                        Some(q) => view! {
                            <span>
                                {format!("{}: {:.2} ", name, q.current_price)}
                                <span class=tone(q.is_positive())>
                                    {format!(
                                        "{} {:.2} ({:.2}%)",
                                        if q.is_positive() { "▲" } else { "▼" },
                                        q.change,
                                        q.percent_change
                                    )}
                                </span>
                            </span>
                        },
                        None => view! { <span>{format!("{}: Loading...", name)}</span> },
                    };
                    view! { <div class="ticker-item">{body}</div> }
                }
            />
        </div>
    }
}

/// Ticker search box with prefix suggestions.
#[component]
pub fn StockSearchInput(value: RwSignal<String>, #[prop(into)] on_select: Callback<String>) -> impl IntoView {
    let (open, set_open) = create_signal(false);
    let suggestions = move || {
        value.with(|input| {
            all_tickers().with(|all| suggest_tickers(all, input).into_iter().cloned().collect::<Vec<Ticker>>())
        })
    };

    view! {
        <div class="search-box">
            <input
                type="text"
                placeholder=SEARCH_PLACEHOLDER
                prop:value=move || value.get()
                on:input=move |ev| {
                    value.set(event_target_value(&ev));
                    set_open.set(true);
                }
                on:keydown=move |ev| {
                    if ev.key() == "Enter" {
                        set_open.set(false);
                        on_select.call(value.get_untracked());
                    }
                }
            />
            <Show when=move || open.get() && !value.with(String::is_empty)>
                <ul class="suggestions">
                    {move || {
                        let found = suggestions();
                        if found.is_empty() {
                            view! { <li class="empty">"No stocks found."</li> }.into_view()
                        } else {
                            found
                                .into_iter()
                                .map(|ticker| {
                                    let symbol = ticker.value().to_string();
                                    view! {
                                        <li on:click=move |_| {
                                            set_open.set(false);
                                            value.set(symbol.clone());
                                            on_select.call(symbol.clone());
                                        }>{ticker.value().to_string()}</li>
                                    }
                                })
                                .collect_view()
                        }
                    }}
                </ul>
            </Show>
        </div>
    }
}

/// Confirmation dialog for selling part of a holding at the analysed price.
#[component]
pub fn SellModal() -> impl IntoView {
    let quantity = create_rw_signal(1u32);
    create_effect(move |_| {
        sell_target().with(|_| ());
        quantity.set(1);
    });

    move || {
        let target = sell_target().get()?;
        let price = stock_data().with(|d| d.as_ref().filter(|a| a.ticker == target.ticker).map(|a| a.last_price()))?;
        let holding = ledger().with(|l| l.holding(&target.ticker).cloned())?;
        let symbol = holding.ticker.currency().symbol();
        let owned = holding.quantity;
        let ticker = holding.ticker.clone();

        let profit = {
            let holding = holding.clone();
            move || {
                let q = quantity.get();
                let rate = usd_inr().get();
                cost_in_inr(&holding.ticker, price, q, rate) - cost_in_inr(&holding.ticker, holding.purchase_price, q, rate)
            }
        };
        let profit_text = profit.clone();

        Some(view! {
            <div class="modal-overlay" on:click=move |_| sell_target().set(None)>
                <div class="modal-content card" on:click=|ev| ev.stop_propagation()>
                    <h3>{format!("Sell {}", holding.ticker)}</h3>
                    <div class="row"><span>"You own:"</span><span>{format!("{} shares", owned)}</span></div>
                    <div class="row">
                        <span>"Avg. Buy Price:"</span>
                        <span>{format!("{}{:.2}", symbol, holding.purchase_price)}</span>
                    </div>
                    <div class="row"><span>"Current Price:"</span><span>{format!("{}{:.2}", symbol, price)}</span></div>
                    <label for="sell-quantity">"Quantity to Sell"</label>
                    <input
                        id="sell-quantity"
                        type="number"
                        min="1"
                        max=owned
                        prop:value=move || quantity.get().to_string()
                        on:input=move |ev| {
                            let wanted = event_target_value(&ev).parse::<u32>().unwrap_or(0);
                            quantity.set(wanted.min(owned));
                        }
                    />
                    <p>
                        "Estimated Profit/Loss: "
                        <span class=move || tone(profit() >= 0.0)>{move || format!("₹{:.2}", profit_text())}</span>
                    </p>
                    <div class="actions">
                        <button class="ghost" on:click=move |_| sell_target().set(None)>"Cancel"</button>
                        <button
                            class="danger"
                            on:click=move |_| actions::sell(&ticker, quantity.get_untracked(), price)
                        >
                            "Confirm Sell"
                        </button>
                    </div>
                </div>
            </div>
        })
    }
}

/// Buy/sell card under the price chart.
#[component]
pub fn TradeCard() -> impl IntoView {
    let quantity = create_rw_signal(1u32);
    let analysis = move || stock_data().get();

    move || {
        let analysis = analysis()?;
        let ticker = analysis.ticker.clone();
        let price = analysis.last_price();
        let foreign = ticker.is_foreign();
        let cost_native = move || price * quantity.get() as f64;
        let cost_inr = {
            let ticker = ticker.clone();
            move || cost_in_inr(&ticker, price, quantity.get(), usd_inr().get())
        };
        let owns = {
            let ticker = ticker.clone();
            move || ledger().with(|l| l.owns(&ticker))
        };
        let owns_label = owns.clone();
        let is_practice = move || current_user().with(|u| u.as_ref().is_some_and(|u| u.is_practice_mode));
        let buy_ticker = ticker.clone();
        let sell_ticker = ticker.clone();

        Some(view! {
            <div class="card">
                <h3>{format!("Trade {}", ticker)}</h3>
                <Show when=move || foreign>
                    <p class="muted">{move || format!("Rate: 1 USD ≈ ₹{:.2}", usd_inr().get())}</p>
                </Show>
                <Show when=is_practice>
                    <p class="practice">"Practice Mode"</p>
                </Show>
                <div class="trade-row">
                    <div>
                        <label for="quantity">"Quantity"</label>
                        <input
                            id="quantity"
                            type="number"
                            min="1"
                            placeholder="Qty"
                            prop:value=move || quantity.get().to_string()
                            on:input=move |ev| quantity.set(event_target_value(&ev).parse::<u32>().unwrap_or(0))
                        />
                    </div>
                    <div class="total">
                        <p class="muted">"Total Cost"</p>
                        <p class="big">{move || format!("₹{:.2}", cost_inr())}</p>
                        <Show when=move || foreign>
                            <p class="muted small">{move || format!("(${:.2})", cost_native())}</p>
                        </Show>
                    </div>
                </div>
                <div class="actions">
                    <button class="buy" on:click=move |_| actions::buy(&buy_ticker, quantity.get_untracked(), price)>
                        {move || if owns_label() { "Buy More" } else { "Buy" }}
                    </button>
                    <button
                        class="danger"
                        disabled=move || !owns()
                        on:click=move |_| {
                            let holding = ledger().with_untracked(|l| l.holding(&sell_ticker).cloned());
                            sell_target().set(holding);
                        }
                    >
                        "Sell"
                    </button>
                </div>
            </div>
        })
    }
}

#[component]
pub fn GuestPrompt() -> impl IntoView {
    view! {
        <div class="card guest-prompt">
            <h2>"Premium Feature"</h2>
            <p class="muted">
                "This feature is available for registered users. Please create an account or sign in to get access."
            </p>
            <button on:click=|_| actions::navigate(Page::Login)>"Log In or Sign Up"</button>
        </div>
    }
}

#[component]
pub fn MetricCard(
    #[prop(into)] label: String,
    #[prop(into)] value: MaybeSignal<String>,
    #[prop(into, optional)] class: MaybeSignal<&'static str>,
) -> impl IntoView {
    view! {
        <div class="card metric">
            <p class="muted">{label}</p>
            <p class=move || format!("metric-value {}", class.get())>{move || value.get()}</p>
        </div>
    }
}

#[component]
pub fn AlertBox(#[prop(into)] title: String, #[prop(into)] message: String, #[prop(optional)] error: bool) -> impl IntoView {
    view! {
        <div class=if error { "alert error" } else { "alert" }>
            <strong>{title}</strong>
            <p>{message}</p>
        </div>
    }
}

/// Chat text with `**bold**` runs and line breaks.
#[component]
pub fn FormattedText(#[prop(into)] text: String) -> impl IntoView {
    let lines: Vec<String> = text.split('\n').map(str::to_string).collect();
    let count = lines.len();
    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let parts = segments(&line)
                .into_iter()
                .map(|segment| match segment {
                    Segment::Plain(text) => text.to_string().into_view(),
                    Segment::Strong(text) => view! { <strong>{text.to_string()}</strong> }.into_view(),
                })
                .collect_view();
            view! {
                {parts}
                {(i + 1 < count).then(|| view! { <br/> })}
            }
        })
        .collect_view()
}

/// Amount in rupees with grouping, as shown on the ledger pages.
pub fn rupees(value: f64) -> String {
    format_money(value, Currency::Inr)
}
