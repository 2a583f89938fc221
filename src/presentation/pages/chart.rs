use leptos::*;
use strum::IntoEnumIterator;

use crate::domain::market::{ChartType, TimeFilter, price_change};
use crate::global_state::{analysis_error, chart_type, loading, reloading, stock_data, time_filter};
use crate::infrastructure::{rendering::CanvasRenderer, services::local_offset_minutes};
use crate::presentation::{
    actions,
    charts::{ChartCanvas, price_chart},
    components::{AlertBox, TradeCard, tone},
};

/// Period buttons shared by the chart and indicator pages.
#[component]
pub fn PeriodSelector(#[prop(into)] on_pick: Callback<TimeFilter>) -> impl IntoView {
    TimeFilter::iter()
        .map(|period| {
            view! {
                <button
                    class="period-btn"
                    class:active=move || time_filter().get() == period
                    on:click=move |_| on_pick.call(period)
                >
                    {period.as_str().to_string()}
                </button>
            }
        })
        .collect_view()
}

#[component]
pub fn NoStockCard(#[prop(into)] title: String, #[prop(into)] hint: String) -> impl IntoView {
    view! {
        <div class="card empty-state">
            <h2>{title}</h2>
            <p class="muted">{hint}</p>
        </div>
    }
}

#[component]
pub fn ChartPage() -> impl IntoView {
    move || {
        if loading().get() && !reloading().get() {
            return view! { <div class="card skeleton tall"></div> }.into_view();
        }
        if let Some(message) = analysis_error().get() {
            return view! { <AlertBox title="Error" message=message error=true/> }.into_view();
        }
        if stock_data().with(Option::is_none) {
            return view! {
                <NoStockCard title="No Stock Analyzed" hint="Go to the Home page to search for a stock."/>
            }
            .into_view();
        }
        view! { <PriceAction/> <TradeCard/> }.into_view()
    }
}

#[component]
fn PriceAction() -> impl IntoView {
    let header = move || {
        let filter = time_filter().get();
        stock_data().with(|data| {
            data.as_ref().map(|analysis| {
                let change = price_change(analysis, filter);
                let sign = if change.is_positive { "+" } else { "" };
                let symbol = analysis.ticker.currency().symbol();
                view! {
                    <h2>{format!("{} Price Action", analysis.ticker)}</h2>
                    <div class="price-line">
                        <span class="price">{format!("{}{:.2}", symbol, analysis.last_price())}</span>
                        <span class=tone(change.is_positive)>
                            {format!("{}{:.2} ({}{:.2}%)", sign, change.change, sign, change.percent)}
                            <span class="muted small">{format!(" ({})", filter)}</span>
                        </span>
                    </div>
                }
            })
        })
    };

    let draw = move |renderer: &mut CanvasRenderer| {
        let filter = time_filter().get();
        let kind = chart_type().get();
        stock_data().with(|data| match data {
            Some(analysis) => renderer.render_price_chart(&price_chart(analysis, filter, kind, true, local_offset_minutes())),
            None => Ok(()),
        })
    };

    view! {
        <div class="card chart-card">
            <Show when=move || reloading().get()>
                <div class="reload-overlay">"Loading..."</div>
            </Show>
            <div class="card-title">
                <div>{header}</div>
                <div class="toggle">
                    <button
                        class:active=move || chart_type().get() == ChartType::Line
                        on:click=move |_| chart_type().set(ChartType::Line)
                    >
                        "Line"
                    </button>
                    <button
                        class:active=move || chart_type().get() == ChartType::Candle
                        on:click=move |_| chart_type().set(ChartType::Candle)
                    >
                        "Candles"
                    </button>
                </div>
            </div>
            <ChartCanvas draw=draw/>
            <div class="periods">
                <PeriodSelector on_pick=actions::change_period/>
            </div>
        </div>
    }
}
