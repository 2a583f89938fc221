use leptos::*;

use crate::application;
use crate::domain::backtest::{BacktestParams, BacktestReport};
use crate::domain::notifications::Toast;
use crate::global_state::{api, stock_data};
use crate::presentation::{
    actions,
    components::{MetricCard, tone},
};

#[component]
fn ParamField(
    #[prop(into)] label: String,
    params: RwSignal<BacktestParams>,
    read: fn(&BacktestParams) -> f64,
    write: fn(&mut BacktestParams, f64),
) -> impl IntoView {
    view! {
        <div>
            <label>{label}</label>
            <input
                type="number"
                prop:value=move || params.with(read).to_string()
                on:input=move |ev| {
                    let value = event_target_value(&ev).parse::<f64>().unwrap_or(0.0);
                    params.update(|p| write(p, value));
                }
            />
        </div>
    }
}

#[component]
pub fn BacktestPage() -> impl IntoView {
    let params = create_rw_signal(BacktestParams::default());
    let (report, set_report) = create_signal(None::<BacktestReport>);
    let (busy, set_busy) = create_signal(false);
    let ticker = move || stock_data().with(|d| d.as_ref().map(|a| a.ticker.clone()));

    let run = move |_| {
        let Some(ticker) = ticker() else { return };
        let current = params.get_untracked();
        set_busy.set(true);
        set_report.set(None);
        spawn_local(async move {
            match application::run_backtest(api(), &ticker, current).await {
                Ok(result) => set_report.set(Some(result)),
                Err(err) => actions::show_toast(Toast::error(err.user_message())),
            }
            set_busy.set(false);
        });
    };

    let results = move || {
        if busy.get() {
            return view! { <div class="skeleton"></div> }.into_view();
        }
        let Some(report) = report.get() else {
            return view! { <p class="empty">"Run a backtest to see the results here."</p> }.into_view();
        };
        let summary = report.summary;
        let rows = if report.results.is_empty() {
            view! {
                <tr>
                    <td colspan="4"><p class="empty">"No trades were executed with these parameters."</p></td>
                </tr>
            }
            .into_view()
        } else {
            report
                .results
                .into_iter()
                .map(|trade| {
                    view! {
                        <tr>
                            <td>{trade.buy_date.clone()}</td>
                            <td>{trade.sell_date.clone()}</td>
                            <td class=tone(trade.is_win())>{format!("{:.2}%", trade.return_pct)}</td>
                            <td class="wide-only">{trade.exit_reason.clone()}</td>
                        </tr>
                    }
                })
                .collect_view()
        };
        view! {
            <div class="grid four">
                <MetricCard label="Total Trades" value=summary.total_trades.to_string()/>
                <MetricCard label="Win Rate" value=format!("{}%", summary.win_rate)/>
                <MetricCard label="Avg. Return" value=format!("{}%", summary.average_return)/>
                <MetricCard label="Total Return" value=format!("{}%", summary.total_return_cumulative)/>
            </div>
            <div class="scroll">
                <table>
                    <thead>
                        <tr>
                            <th>"Buy Date"</th>
                            <th>"Sell Date"</th>
                            <th>"Return %"</th>
                            <th class="wide-only">"Reason"</th>
                        </tr>
                    </thead>
                    <tbody>{rows}</tbody>
                </table>
            </div>
        }
        .into_view()
    };

    view! {
        <div class="grid backtest">
            <div class="card">
                <h2>"Backtest Strategy"</h2>
                <p class="muted">
                    "Test a generic scoring strategy on historical data for "
                    <strong>{move || ticker().map(|t| t.to_string()).unwrap_or_else(|| "...".into())}</strong>
                    "."
                </p>
                <ParamField label="Min. Score to Buy" params=params read=|p| p.min_score write=|p, v| p.min_score = v/>
                <ParamField
                    label="Holding Period (Days)"
                    params=params
                    read=|p| p.holding_days as f64
                    write=|p, v| p.holding_days = v.max(0.0) as u32
                />
                <ParamField
                    label="Take Profit (%)"
                    params=params
                    read=|p| p.take_profit_pct
                    write=|p, v| p.take_profit_pct = v
                />
                <ParamField label="Stop Loss (%)" params=params read=|p| p.stop_loss_pct write=|p, v| p.stop_loss_pct = v/>
                <button class="primary wide" disabled=move || busy.get() || ticker().is_none() on:click=run>
                    {move || if busy.get() { "Running..." } else { "Run Test" }}
                </button>
            </div>
            <div class="card span-two">
                <h2>"Backtest Results"</h2>
                {results}
            </div>
        </div>
    }
}
