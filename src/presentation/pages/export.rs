use std::time::Duration;

use leptos::*;

use crate::application;
use crate::application::StockApi;
use crate::domain::logging::LogComponent;
use crate::global_state::{api, stock_data};
use crate::time_utils;
use crate::{log_info, log_warn};

const DEFAULT_START: &str = "2023-01-01";
const EXPORT_BUSY: Duration = Duration::from_secs(2);

/// CSV download of the analysed ticker between two dates.
#[component]
pub fn ExportPage() -> impl IntoView {
    let start = create_rw_signal(DEFAULT_START.to_string());
    let end = create_rw_signal(time_utils::format_date(application::now_millis() as i64));
    let (busy, set_busy) = create_signal(false);
    let ticker = move || stock_data().with(|d| d.as_ref().map(|a| a.ticker.clone()));

    let export = move |_| {
        let Some(ticker) = ticker() else { return };
        let url = api().export_url(&ticker, &start.get_untracked(), &end.get_untracked());
        log_info!(LogComponent::Presentation("Export"), "downloading {}", url);
        set_busy.set(true);
        if let Some(window) = web_sys::window() {
            if let Err(err) = window.location().set_href(&url) {
                log_warn!(LogComponent::Presentation("Export"), "navigation failed: {:?}", err);
            }
        }
        set_timeout(move || set_busy.set(false), EXPORT_BUSY);
    };

    view! {
        <div class="card narrow">
            <h2>"Export Stock Data"</h2>
            <p class="muted">"Export historical data with all calculated indicators to a CSV file."</p>
            <div class="grid two">
                <div>
                    <label for="start-date">"Start Date"</label>
                    <input
                        id="start-date"
                        type="date"
                        prop:value=move || start.get()
                        on:input=move |ev| start.set(event_target_value(&ev))
                    />
                </div>
                <div>
                    <label for="end-date">"End Date"</label>
                    <input
                        id="end-date"
                        type="date"
                        prop:value=move || end.get()
                        on:input=move |ev| end.set(event_target_value(&ev))
                    />
                </div>
            </div>
            <button class="primary" disabled=move || busy.get() || ticker().is_none() on:click=export>
                {move || {
                    let name = ticker().map(|t| t.to_string()).unwrap_or_default();
                    if busy.get() { "Exporting...".to_string() } else { format!("Export {} Data", name) }
                }}
            </button>
        </div>
    }
}
