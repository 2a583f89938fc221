use leptos::*;

use crate::application::{self, ExternalHolding};
use crate::domain::logging::LogComponent;
use crate::log_info;

const SYNC_DELAY_MS: u32 = 1500;

/// Broker connection demo. Credentials are collected but never sent.
#[component]
pub fn TrackPage() -> impl IntoView {
    let api_key = create_rw_signal(String::new());
    let api_secret = create_rw_signal(String::new());
    let (synced, set_synced) = create_signal(None::<Vec<ExternalHolding>>);
    let (busy, set_busy) = create_signal(false);

    let connect = move |_| {
        set_busy.set(true);
        spawn_local(async move {
            let holdings = application::sync_external_portfolio(SYNC_DELAY_MS).await;
            log_info!(LogComponent::Presentation("Track"), "synced {} external holding(s)", holdings.len());
            set_synced.set(Some(holdings));
            set_busy.set(false);
        });
    };
    let disconnect = move |_| {
        set_synced.set(None);
        api_key.set(String::new());
        api_secret.set(String::new());
    };

    view! {
        <div class="card narrow">
            <h2>"Track External Portfolio"</h2>
            <p class="muted">
                "Connect your brokerage account to see all your holdings in one place. "
                <em>"(This is a UI demonstration)."</em>
            </p>
            {move || match synced.get() {
                Some(holdings) => view! {
                    <div class="stack">
                        <h3 class="positive">"✅ Synced Portfolio"</h3>
                        <ul class="holdings">
                            {holdings
                                .into_iter()
                                .map(|h| {
                                    view! {
                                        <li class="row">
                                            <strong>{h.ticker.to_string()}</strong>
                                            <span>{format!("{} shares @ ₹{:.2}", h.quantity, h.avg_price)}</span>
                                        </li>
                                    }
                                })
                                .collect_view()}
                        </ul>
                        <button class="danger" on:click=disconnect>"Disconnect"</button>
                    </div>
                }
                .into_view(),
                None => view! {
                    <div class="stack">
                        <h3>"Connect to Zerodha Kite (Example)"</h3>
                        <input
                            type="text"
                            placeholder="API Key"
                            prop:value=move || api_key.get()
                            on:input=move |ev| api_key.set(event_target_value(&ev))
                        />
                        <input
                            type="password"
                            placeholder="API Secret"
                            prop:value=move || api_secret.get()
                            on:input=move |ev| api_secret.set(event_target_value(&ev))
                        />
                        <button class="primary" disabled=move || busy.get() on:click=connect>
                            {move || if busy.get() { "Syncing..." } else { "Connect & Sync" }}
                        </button>
                    </div>
                }
                .into_view(),
            }}
        </div>
    }
}
