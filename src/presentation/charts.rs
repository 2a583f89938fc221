//! Chart data assembly and the canvas component that draws it.

use leptos::html::Canvas;
use leptos::*;
use wasm_bindgen::JsValue;
use web_sys::HtmlCanvasElement;

use crate::domain::{
    indicators::IndicatorPanel,
    logging::LogComponent,
    market::{
        ChartType, PricePoint, StockAnalysis, TimeFilter, candles_for_chart, column_series, indicator_columns,
        overlay_columns, price_change,
    },
};
use crate::global_state::theme;
use crate::infrastructure::rendering::{CanvasRenderer, LineSeries, PanelChart, PriceChart, SERIES_PALETTE};
use crate::log_error;
use crate::time_utils;

const FALLBACK_WIDTH: u32 = 800;
pub const PRICE_CHART_HEIGHT: u32 = 400;
pub const PANEL_HEIGHT: u32 = 220;

fn axis_labels(millis: impl Iterator<Item = Option<i64>>, filter: TimeFilter, offset_minutes: i64) -> Vec<String> {
    millis
        .map(|ms| ms.map(|ms| time_utils::format_axis_label(ms, filter, offset_minutes)).unwrap_or_default())
        .collect()
}

fn point_labels(points: &[PricePoint], filter: TimeFilter, offset_minutes: i64) -> Vec<String> {
    axis_labels(points.iter().map(|p| p.date.epoch_millis()), filter, offset_minutes)
}

/// Price pane for an analysis. Overlays are drawn on the line view only,
/// since candles are bucketed and no longer line up with the raw rows.
pub fn price_chart(
    analysis: &StockAnalysis,
    filter: TimeFilter,
    chart_type: ChartType,
    with_overlays: bool,
    offset_minutes: i64,
) -> PriceChart {
    let points = &analysis.data;
    let bars = candles_for_chart(points, filter);
    let labels = match chart_type {
        ChartType::Line => point_labels(points, filter, offset_minutes),
        ChartType::Candle => axis_labels(bars.iter().map(|b| Some(b.time * 1000)), filter, offset_minutes),
    };
    let overlays = if with_overlays && chart_type == ChartType::Line {
        overlay_columns(&indicator_columns(points))
            .into_iter()
            .zip(SERIES_PALETTE.into_iter().cycle())
            .map(|(column, color)| {
                let values = column_series(points, &column);
                LineSeries::new(column, color, values)
            })
            .collect()
    } else {
        Vec::new()
    };

    PriceChart {
        title: format!("{} ({})", analysis.ticker, filter),
        chart_type,
        bars,
        closes: column_series(points, "Close"),
        labels,
        overlays,
        currency: analysis.ticker.currency(),
        is_positive: price_change(analysis, filter).is_positive,
    }
}

/// Secondary pane for one detected indicator panel.
pub fn panel_chart(analysis: &StockAnalysis, panel: IndicatorPanel, filter: TimeFilter, offset_minutes: i64) -> PanelChart {
    let points = &analysis.data;
    let mut lines: Vec<LineSeries> = panel
        .series()
        .iter()
        .zip(SERIES_PALETTE.into_iter().cycle())
        .map(|(column, color)| LineSeries::new(*column, color, column_series(points, column)))
        .collect();
    if panel.is_priced() {
        lines.insert(0, LineSeries::new("Close", "#888888", column_series(points, "Close")));
    }
    PanelChart {
        title: panel.title().to_string(),
        lines,
        histogram: panel.histogram().map(|column| column_series(points, column)),
        labels: point_labels(points, filter, offset_minutes),
    }
}

/// Canvas redrawn whenever a signal read by `draw` or the theme changes.
#[component]
pub fn ChartCanvas<F>(draw: F, #[prop(default = PRICE_CHART_HEIGHT)] height: u32) -> impl IntoView
where
    F: Fn(&mut CanvasRenderer) -> Result<(), JsValue> + 'static,
{
    let canvas_ref = create_node_ref::<Canvas>();

    create_effect(move |_| {
        let active_theme = theme().get();
        let Some(canvas) = canvas_ref.get() else { return };
        let element: &HtmlCanvasElement = &canvas;
        let mut renderer = CanvasRenderer::new(element.clone(), FALLBACK_WIDTH, height, active_theme);
        if let Err(err) = draw(&mut renderer) {
            log_error!(LogComponent::Presentation("ChartCanvas"), "render failed: {:?}", err);
        }
    });

    view! { <canvas node_ref=canvas_ref class="chart-canvas" height=height></canvas> }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market::{DateValue, Ticker};

    fn analysis() -> StockAnalysis {
        let data = (1..=3)
            .map(|day| {
                let mut columns = serde_json::Map::new();
                columns.insert("EMA_50".to_string(), serde_json::json!(100.0 + day as f64));
                columns.insert("RSI".to_string(), serde_json::json!(50.0));
                PricePoint {
                    date: DateValue::Text(format!("2024-03-0{}", day)),
                    open: 100.0,
                    high: 110.0,
                    low: 90.0,
                    close: 100.0 + day as f64,
                    volume: None,
                    columns,
                }
            })
            .collect();
        StockAnalysis {
            ticker: Ticker::new("tcs.ns").unwrap(),
            data,
            news: Vec::new(),
            current_price: None,
            previous_close: None,
            market_cap: None,
            pe_ratio: None,
            launch_date: None,
            prediction: None,
        }
    }

    #[test]
    fn line_chart_carries_overlays() {
        let chart = price_chart(&analysis(), TimeFilter::OneMonth, ChartType::Line, true, 0);
        assert_eq!(chart.closes.len(), 3);
        assert_eq!(chart.labels.len(), 3);
        assert_eq!(chart.overlays.len(), 1);
        assert_eq!(chart.overlays[0].label, "EMA_50");
        assert!(chart.is_positive);
    }

    #[test]
    fn candle_chart_drops_overlays() {
        let chart = price_chart(&analysis(), TimeFilter::OneMonth, ChartType::Candle, true, 0);
        assert_eq!(chart.bars.len(), 3);
        assert!(chart.overlays.is_empty());
    }

    #[test]
    fn macd_panel_has_histogram() {
        let panel = panel_chart(&analysis(), IndicatorPanel::Macd, TimeFilter::OneMonth, 0);
        assert_eq!(panel.lines.len(), 2);
        assert_eq!(panel.histogram.as_ref().map(Vec::len), Some(3));
        assert_eq!(panel.lines[0].values, vec![None, None, None]);
    }
}
