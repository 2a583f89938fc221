use leptos::*;

use crate::domain::market::group_thousands;
use crate::domain::sip::SipInput;
use crate::infrastructure::rendering::CanvasRenderer;
use crate::presentation::charts::ChartCanvas;

const INVESTED_COLOR: &str = "#8884d8";
const RETURNS_COLOR: &str = "#82ca9d";

#[component]
fn NumberField(#[prop(into)] label: String, id: &'static str, value: RwSignal<f64>) -> impl IntoView {
    view! {
        <div>
            <label for=id>{label}</label>
            <input
                id=id
                type="number"
                prop:value=move || value.get().to_string()
                on:input=move |ev| value.set(event_target_value(&ev).parse::<f64>().unwrap_or(0.0))
            />
        </div>
    }
}

#[component]
pub fn SipCalculatorPage() -> impl IntoView {
    let defaults = SipInput::default();
    let monthly = create_rw_signal(defaults.monthly_investment);
    let rate = create_rw_signal(defaults.expected_return_pct);
    let years = create_rw_signal(defaults.years);

    let projection = create_memo(move |_| {
        SipInput { monthly_investment: monthly.get(), expected_return_pct: rate.get(), years: years.get() }.calculate()
    });

    let draw = move |renderer: &mut CanvasRenderer| {
        let p = projection.get();
        renderer.render_pie(&[("Invested", p.invested_amount, INVESTED_COLOR), ("Returns", p.estimated_returns, RETURNS_COLOR)])
    };

    view! {
        <div class="grid two">
            <div class="card">
                <h2>"SIP Calculator"</h2>
                <NumberField label="Monthly Investment (₹)" id="monthly-investment" value=monthly/>
                <NumberField label="Expected Return Rate (% p.a.)" id="expected-return" value=rate/>
                <NumberField label="Time Period (Years)" id="time-period" value=years/>
            </div>
            <div class="card">
                <h2>"Projected Value"</h2>
                <ChartCanvas draw=draw height=280/>
                <div class="sip-summary">
                    <p>
                        "Invested Amount: "
                        <strong>{move || format!("₹{}", group_thousands(projection.get().invested_amount))}</strong>
                    </p>
                    <p>
                        "Est. Returns: "
                        <strong class="positive">
                            {move || format!("₹{}", group_thousands(projection.get().estimated_returns))}
                        </strong>
                    </p>
                    <p class="big">
                        "Future Value: "
                        <strong class="positive">
                            {move || format!("₹{}", group_thousands(projection.get().future_value))}
                        </strong>
                    </p>
                </div>
            </div>
        </div>
    }
}
