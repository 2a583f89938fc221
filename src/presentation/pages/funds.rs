use leptos::*;

use crate::domain::session::Page;
use crate::global_state::{current_user, ledger};
use crate::presentation::{actions, components::rupees};

const DEFAULT_AMOUNT: f64 = 1000.0;

#[component]
pub fn FundsPage() -> impl IntoView {
    let amount = create_rw_signal(DEFAULT_AMOUNT);
    let is_practice = move || current_user().with(|u| u.as_ref().is_some_and(|u| u.is_practice_mode));

    view! {
        <div class="card narrow">
            <div class="row">
                <h2>"Manage Funds"</h2>
                <Show when=is_practice>
                    <span class="pill practice">"Practice Mode"</span>
                </Show>
            </div>
            <div class="metric hero">
                <p class="muted">"Available to Invest"</p>
                <p class="metric-value big">{move || rupees(ledger().with(|l| l.funds()))}</p>
            </div>
            <label for="funds-amount">"Amount (₹)"</label>
            <input
                id="funds-amount"
                type="number"
                min="0"
                prop:value=move || amount.get().to_string()
                on:input=move |ev| amount.set(event_target_value(&ev).parse::<f64>().unwrap_or(0.0))
            />
            <div class="actions">
                <button class="buy" on:click=move |_| actions::deposit(amount.get_untracked())>"Add Funds"</button>
                <button class="danger" on:click=move |_| actions::withdraw(amount.get_untracked())>"Withdraw"</button>
            </div>
            <a class="link" on:click=|_| actions::navigate(Page::Transactions)>"View Transaction History"</a>
        </div>
    }
}
