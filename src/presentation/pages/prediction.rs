use leptos::*;

use crate::domain::market::{StockAnalysis, TradeSignal};
use crate::global_state::{loading, stock_data};
use crate::presentation::components::{AlertBox, MetricCard};

fn signal_class(signal: TradeSignal) -> &'static str {
    match signal {
        TradeSignal::Buy => "positive",
        TradeSignal::Sell => "negative",
        TradeSignal::Hold => "neutral",
    }
}

fn prediction_cards(analysis: &StockAnalysis) -> View {
    let Some(prediction) = analysis.prediction.clone() else {
        return view! {
            <AlertBox title="Prediction" message="Could not load prediction data for this stock." error=true/>
        }
        .into_view();
    };
    let symbol = analysis.ticker.currency().symbol();
    let pe = analysis.pe_ratio.filter(|pe| *pe > 0.0).map(|pe| format!("{:.2}", pe)).unwrap_or_else(|| "N/A".into());
    view! {
        <MetricCard
            label="AI Recommendation"
            value=prediction.trade_status.clone()
            class=signal_class(prediction.signal())
        />
        <MetricCard label="Predicted Next Price" value=format!("{}{:.2}", symbol, prediction.next_day_price)/>
        <MetricCard label="Current Price" value=format!("{}{:.2}", symbol, analysis.last_price())/>
        <MetricCard label="Model Confidence" value=format!("{:.1}%", prediction.accuracy * 100.0)/>
        <MetricCard label="News Sentiment" value=format!("{:.1}% Positive", prediction.sentiment * 100.0)/>
        <MetricCard label="P/E Ratio" value=pe/>
    }
    .into_view()
}

#[component]
pub fn PredictionPage() -> impl IntoView {
    move || {
        if loading().get() {
            return view! { <div class="card skeleton"></div> }.into_view();
        }
        stock_data().with(|data| match data {
            None => view! {
                <AlertBox title="AI Prediction" message="Analyze a stock on the Home page to see its AI Prediction."/>
            }
            .into_view(),
            Some(analysis) => view! {
                <div class="card">
                    <h2>{format!("AI Prediction for {}", analysis.ticker)}</h2>
                    <div class="grid three">{prediction_cards(analysis)}</div>
                </div>
            }
            .into_view(),
        })
    }
}
