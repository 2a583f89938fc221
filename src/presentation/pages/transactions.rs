use leptos::*;

use crate::application;
use crate::domain::{
    ledger::{TradeSide, Transaction},
    logging::LogComponent,
};
use crate::global_state::{api, current_user, ledger};
use crate::log_error;
use crate::presentation::components::{AlertBox, tone};
use crate::time_utils;

/// Server timestamps are ISO-8601; anything else is shown as received.
fn display_timestamp(raw: &str) -> String {
    match time_utils::parse_datetime_millis(raw) {
        Some(millis) => {
            let iso = time_utils::format_iso(millis);
            iso.get(..16).map(|s| s.replace('T', " ")).unwrap_or(iso)
        }
        None => raw.to_string(),
    }
}

#[component]
fn TransactionRow(transaction: Transaction) -> impl IntoView {
    let symbol = transaction.ticker.currency().symbol();
    let is_buy = transaction.side == TradeSide::Buy;
    view! {
        <li class="transaction">
            <div>
                <p>
                    <strong>{transaction.ticker.to_string()}</strong>
                    " "
                    <span class=tone(is_buy)>{transaction.side.to_string()}</span>
                </p>
                <p class="muted small">{display_timestamp(&transaction.timestamp)}</p>
            </div>
            <div class="right">
                <p>{format!("{} @ {}{:.2}", transaction.quantity, symbol, transaction.price)}</p>
                <p class="muted small">{format!("Total: {}{:.2}", symbol, transaction.total())}</p>
            </div>
        </li>
    }
}

/// Trade history: the server log for registered users, derived from
/// holdings in practice mode.
#[component]
pub fn TransactionsPage() -> impl IntoView {
    let (history, set_history) = create_signal(Vec::<Transaction>::new());
    let (loading, set_loading) = create_signal(true);

    create_effect(move |_| {
        let snapshot = ledger().get();
        let Some(user) = current_user().get() else { return };
        set_loading.set(true);
        spawn_local(async move {
            match application::transaction_history(api(), &user, &snapshot).await {
                Ok(rows) => set_history.set(rows),
                Err(err) => {
                    log_error!(LogComponent::Presentation("Transactions"), "history unavailable: {}", err);
                    set_history.set(Vec::new());
                }
            }
            set_loading.set(false);
        });
    });

    view! {
        <div class="card">
            <h2>"Transaction History"</h2>
            {move || {
                if loading.get() {
                    return view! { <div class="skeleton"></div> }.into_view();
                }
                let rows = history.get();
                if rows.is_empty() {
                    return view! { <AlertBox title="History" message="No transactions yet."/> }.into_view();
                }
                view! {
                    <ul class="transactions">
                        {rows.into_iter().map(|t| view! { <TransactionRow transaction=t/> }).collect_view()}
                    </ul>
                }
                .into_view()
            }}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::display_timestamp;

    #[test]
    fn iso_timestamps_are_shortened() {
        assert_eq!(display_timestamp("2024-03-05T09:15:30Z"), "2024-03-05 09:15");
    }

    #[test]
    fn unknown_timestamps_pass_through() {
        assert_eq!(display_timestamp("yesterday"), "yesterday");
    }
}
