use std::str::FromStr;

use leptos::*;

use crate::domain::{
    indicators::{IndicatorKind, IndicatorPanel, IndicatorSet},
    market::{ChartType, TimeFilter, indicator_columns},
};
use crate::global_state::{analysis_error, analyzed_ticker, indicator_preset, loading, stock_data, time_filter};
use crate::infrastructure::{rendering::CanvasRenderer, services::local_offset_minutes};
use crate::presentation::{
    actions,
    charts::{ChartCanvas, PANEL_HEIGHT, panel_chart, price_chart},
    components::AlertBox,
    pages::chart::{NoStockCard, PeriodSelector},
};

#[component]
pub fn IndicatorPage() -> impl IntoView {
    let settings = create_rw_signal(IndicatorSet::default());
    let (analyzing, set_analyzing) = create_signal(false);

    let run = move |period: TimeFilter| {
        let Some(ticker) = analyzed_ticker().get_untracked() else { return };
        let requests = settings.with_untracked(IndicatorSet::to_requests);
        set_analyzing.set(true);
        spawn_local(async move {
            actions::fetch_stock(ticker, period, false, Some(requests)).await;
            set_analyzing.set(false);
        });
    };

    // A graph offer accepted in the assistant lands here once.
    create_effect(move |_| {
        let Some(preset) = indicator_preset().get() else { return };
        settings.set(IndicatorSet::from_requests(&preset.indicators));
        time_filter().set(preset.period);
        analyzed_ticker().set(Some(preset.ticker));
        indicator_preset().set(None);
        run(preset.period);
    });

    move || {
        let busy = analyzing.get() || loading().get();
        if busy && stock_data().with(Option::is_none) {
            return view! { <div class="card skeleton tall"></div> }.into_view();
        }
        if let Some(message) = analysis_error().get() {
            return view! { <AlertBox title="Error" message=message error=true/> }.into_view();
        }
        if analyzed_ticker().with(Option::is_none) {
            return view! {
                <NoStockCard title="No Stock Selected" hint="Analyze a stock from the Home or Chart page first."/>
            }
            .into_view();
        }
        view! {
            <SettingsCard settings=settings busy=analyzing on_run=move |_| run(time_filter().get_untracked())/>
            {busy.then(|| view! { <div class="card skeleton"></div> })}
            {(!busy).then(|| view! { <IndicatorCharts/> })}
        }
        .into_view()
    }
}

#[component]
fn SettingsCard(
    settings: RwSignal<IndicatorSet>,
    #[prop(into)] busy: Signal<bool>,
    #[prop(into)] on_run: Callback<()>,
) -> impl IntoView {
    let ticker_label = move || {
        analyzed_ticker().get().map(|t| t.to_string()).unwrap_or_else(|| "...".to_string())
    };

    let cards = move || {
        settings.with(|set| {
            set.settings()
                .iter()
                .map(|setting| {
                    let id = setting.id;
                    let params = setting
                        .params
                        .iter()
                        .map(|(name, value)| {
                            let key = name.clone();
                            view! {
                                <div>
                                    <label class="small">{name.replace('_', " ")}</label>
                                    <input
                                        type="number"
                                        prop:value=value.to_string()
                                        on:input=move |ev| {
                                            let value = event_target_value(&ev).parse::<f64>().unwrap_or(0.0);
                                            settings.update(|s| s.update_param(id, &key, value));
                                        }
                                    />
                                </div>
                            }
                        })
                        .collect_view();
                    view! {
                        <div class="indicator-card">
                            <div class="row">
                                <strong>{setting.kind.to_string()}</strong>
                                <button class="ghost danger-text" on:click=move |_| settings.update(|s| s.remove(id))>
                                    "Remove"
                                </button>
                            </div>
                            <div class="grid two">{params}</div>
                        </div>
                    }
                })
                .collect_view()
        })
    };

    view! {
        <div class="card">
            <div class="card-title">
                <h3>{move || format!("Indicator Settings for {}", ticker_label())}</h3>
                <div class="periods small">
                    <PeriodSelector on_pick=actions::change_period/>
                </div>
            </div>
            <div class="grid three">{cards}</div>
            <div class="add-row">
                <p>"Add Indicator:"</p>
                <select
                    prop:value=""
                    on:change=move |ev| {
                        if let Ok(kind) = IndicatorKind::from_str(&event_target_value(&ev)) {
                            settings.update(|s| {
                                s.add(kind);
                            });
                        }
                    }
                >
                    <option value="" disabled=true selected=true>"Select an indicator..."</option>
                    {IndicatorKind::catalogue()
                        .into_iter()
                        .map(|kind| view! { <option value=kind.to_string()>{kind.to_string()}</option> })
                        .collect_view()}
                </select>
            </div>
            <button
                class="primary wide"
                disabled=move || busy.get() || analyzed_ticker().with(Option::is_none)
                on:click=move |_| on_run.call(())
            >
                {move || if busy.get() { "Analyzing..." } else { "Apply & Analyze" }}
            </button>
        </div>
    }
}

/// Price with moving-average overlays, then one panel per indicator the
/// data carries.
#[component]
fn IndicatorCharts() -> impl IntoView {
    let panels = move || stock_data().with(|d| d.as_ref().map(|a| IndicatorPanel::detect(&indicator_columns(&a.data))));

    let draw_price = move |renderer: &mut CanvasRenderer| {
        let filter = time_filter().get();
        stock_data().with(|data| match data {
            Some(analysis) => {
                let mut chart = price_chart(analysis, filter, ChartType::Line, true, local_offset_minutes());
                chart.title = format!("{} Price & Moving Averages", analysis.ticker);
                renderer.render_price_chart(&chart)
            }
            None => Ok(()),
        })
    };

    view! {
        <div class="grid two charts">
            <div class="card span-two">
                <ChartCanvas draw=draw_price/>
            </div>
            {move || {
                panels()
                    .unwrap_or_default()
                    .into_iter()
                    .map(|panel| {
                        let draw = move |renderer: &mut CanvasRenderer| {
                            let filter = time_filter().get();
                            stock_data().with(|data| match data {
                                Some(analysis) => {
                                    renderer.render_panel(&panel_chart(analysis, panel, filter, local_offset_minutes()))
                                }
                                None => Ok(()),
                            })
                        };
                        view! {
                            <div class="card">
                                <ChartCanvas draw=draw height=PANEL_HEIGHT/>
                            </div>
                        }
                    })
                    .collect_view()
            }}
        </div>
    }
}
