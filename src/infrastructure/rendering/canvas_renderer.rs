use crate::domain::{
    logging::{LogComponent, get_logger},
    market::{CandleBar, ChartType, Currency},
};
use crate::infrastructure::storage::Theme;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

pub const BULLISH_COLOR: &str = "#26a69a";
pub const BEARISH_COLOR: &str = "#ef5350";

/// Colours cycled through for overlay and panel lines.
pub const SERIES_PALETTE: [&str; 6] = ["#2962ff", "#ff9800", "#9c27b0", "#00bcd4", "#e91e63", "#8bc34a"];

const PADDING: f64 = 40.0;
const TEXT_SPACE: f64 = 70.0;
const X_LABELS: usize = 5;

/// Background and text colours for the active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: &'static str,
    pub text: &'static str,
    pub grid: &'static str,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Palette { background: "#ffffff", text: "#333333", grid: "#e0e0e0" },
            Theme::Dark => Palette { background: "#1e1e1e", text: "#d1d4dc", grid: "#2a2e39" },
        }
    }
}

/// One polyline; `None` values leave a gap.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    pub label: String,
    pub color: &'static str,
    pub values: Vec<Option<f64>>,
}

impl LineSeries {
    pub fn new(label: impl Into<String>, color: &'static str, values: Vec<Option<f64>>) -> Self {
        Self { label: label.into(), color, values }
    }
}

/// Main price pane: closing line or candles, plus overlays.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceChart {
    pub title: String,
    pub chart_type: ChartType,
    pub bars: Vec<CandleBar>,
    pub closes: Vec<Option<f64>>,
    pub labels: Vec<String>,
    pub overlays: Vec<LineSeries>,
    pub currency: Currency,
    pub is_positive: bool,
}

/// Secondary pane below the price chart.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelChart {
    pub title: String,
    pub lines: Vec<LineSeries>,
    pub histogram: Option<Vec<Option<f64>>>,
    pub labels: Vec<String>,
}

/// Value-to-pixel mapping for the plot area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleParams {
    pub padding: f64,
    pub chart_width: f64,
    pub chart_height: f64,
    pub min_value: f64,
    pub max_value: f64,
}

impl ScaleParams {
    /// Fit `[min, max]` into a `width` x `height` canvas. A flat range is
    /// widened by one percent on each side so it still has height.
    pub fn fit(width: f64, height: f64, min: f64, max: f64) -> Option<Self> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return None;
        }
        let (min_value, max_value) = if max - min < f64::EPSILON {
            let pad = (min.abs() * 0.01).max(1.0);
            (min - pad, max + pad)
        } else {
            (min, max)
        };
        Some(Self {
            padding: PADDING,
            chart_width: (width - PADDING * 2.0 - TEXT_SPACE).max(1.0),
            chart_height: (height - PADDING * 2.0).max(1.0),
            min_value,
            max_value,
        })
    }

    pub fn y(&self, value: f64) -> f64 {
        self.padding + (self.max_value - value) / (self.max_value - self.min_value) * self.chart_height
    }

    /// Centre of slot `index` out of `count` equal slots.
    pub fn x(&self, index: usize, count: usize) -> f64 {
        let slot = self.chart_width / count.max(1) as f64;
        self.padding + index as f64 * slot + slot / 2.0
    }

    pub fn slot_width(&self, count: usize) -> f64 {
        self.chart_width / count.max(1) as f64
    }

    pub fn right_edge(&self) -> f64 {
        self.padding + self.chart_width
    }
}

/// Smallest and largest finite value across all inputs.
pub fn value_range<'a>(values: impl IntoIterator<Item = &'a Option<f64>>) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter_map(|v| v.filter(|x| x.is_finite()))
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Evenly spaced label indices, always including the last one.
pub fn label_indices(count: usize, wanted: usize) -> Vec<usize> {
    if count == 0 || wanted == 0 {
        return Vec::new();
    }
    if count <= wanted {
        return (0..count).collect();
    }
    let step = (count - 1) as f64 / (wanted - 1).max(1) as f64;
    let mut indices: Vec<usize> = (0..wanted).map(|i| (i as f64 * step).round() as usize).collect();
    indices.dedup();
    indices
}

/// Data for one candle, precomputed in pixels
#[derive(Debug, Clone)]
struct CandleRenderData {
    x: f64,
    high_y: f64,
    low_y: f64,
    open_y: f64,
    close_y: f64,
    is_bullish: bool,
    body_width: f64,
}

/// Canvas 2D renderer for the dashboard charts
pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    width: u32,
    height: u32,
    palette: Palette,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement, width: u32, height: u32, theme: Theme) -> Self {
        Self { canvas, width, height, palette: Palette::for_theme(theme) }
    }

    /// 2D context of the canvas, resized to its layout width when it has one.
    fn get_canvas_context(&mut self) -> Result<CanvasRenderingContext2d, JsValue> {
        let layout_width = self.canvas.client_width();
        if layout_width > 0 {
            self.width = layout_width as u32;
        }
        self.canvas.set_width(self.width);
        self.canvas.set_height(self.height);

        self.canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("Failed to get 2D context"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| JsValue::from_str("Failed to cast to 2D context"))
    }

    fn clear(&self, context: &CanvasRenderingContext2d) {
        context.clear_rect(0.0, 0.0, self.width as f64, self.height as f64);
        context.set_fill_style_str(self.palette.background);
        context.fill_rect(0.0, 0.0, self.width as f64, self.height as f64);
    }

    pub fn render_price_chart(&mut self, chart: &PriceChart) -> Result<(), JsValue> {
        let context = self.get_canvas_context()?;
        self.clear(&context);

        let range = match chart.chart_type {
            ChartType::Candle => chart
                .bars
                .iter()
                .map(|b| (b.low, b.high))
                .fold(None, |acc: Option<(f64, f64)>, (lo, hi)| match acc {
                    None => Some((lo, hi)),
                    Some((a, b)) => Some((a.min(lo), b.max(hi))),
                }),
            ChartType::Line => value_range(&chart.closes),
        };
        let range = range.map(|(lo, hi)| {
            let overlays = value_range(chart.overlays.iter().flat_map(|s| s.values.iter()));
            overlays.map_or((lo, hi), |(olo, ohi)| (lo.min(olo), hi.max(ohi)))
        });

        let Some(params) = range.and_then(|(lo, hi)| ScaleParams::fit(self.width as f64, self.height as f64, lo, hi))
        else {
            self.render_no_data_message(&context)?;
            return self.render_title(&context, &chart.title);
        };

        self.render_grid(&context, &params, chart.currency.symbol())?;
        match chart.chart_type {
            ChartType::Candle => {
                for (i, bar) in chart.bars.iter().enumerate() {
                    let data = Self::calculate_candle_render_data(i, chart.bars.len(), bar, &params);
                    self.render_single_candle(&context, &data);
                }
            }
            ChartType::Line => {
                let color = if chart.is_positive { BULLISH_COLOR } else { BEARISH_COLOR };
                self.render_area(&context, &params, &chart.closes, color);
                self.render_line(&context, &params, &chart.closes, color, 2.0);
            }
        }
        for overlay in &chart.overlays {
            self.render_line(&context, &params, &overlay.values, overlay.color, 1.5);
        }

        let last = match chart.chart_type {
            ChartType::Candle => chart.bars.last().map(|b| b.close),
            ChartType::Line => chart.closes.iter().rev().find_map(|v| *v),
        };
        if let Some(price) = last {
            self.render_current_price_line(&context, &params, price, chart.currency.symbol())?;
        }
        self.render_time_labels(&context, &params, &chart.labels)?;
        self.render_legend(&context, &chart.overlays)?;
        self.render_title(&context, &chart.title)?;

        get_logger().debug(
            LogComponent::Infrastructure("CanvasRenderer"),
            &format!("{} rendered ({} points)", chart.title, chart.closes.len().max(chart.bars.len())),
        );
        Ok(())
    }

    pub fn render_panel(&mut self, panel: &PanelChart) -> Result<(), JsValue> {
        let context = self.get_canvas_context()?;
        self.clear(&context);

        let histogram = panel.histogram.as_deref().unwrap_or_default();
        let mut range = value_range(panel.lines.iter().flat_map(|s| s.values.iter()).chain(histogram.iter()));
        if !histogram.is_empty() {
            range = range.map(|(lo, hi)| (lo.min(0.0), hi.max(0.0)));
        }
        let Some(params) = range.and_then(|(lo, hi)| ScaleParams::fit(self.width as f64, self.height as f64, lo, hi))
        else {
            self.render_no_data_message(&context)?;
            return self.render_title(&context, &panel.title);
        };

        self.render_grid(&context, &params, "")?;
        if !histogram.is_empty() {
            let zero = params.y(0.0);
            let bar_width = params.slot_width(histogram.len()) * 0.6;
            for (i, value) in histogram.iter().enumerate() {
                let Some(value) = value else { continue };
                let y = params.y(*value);
                context.set_fill_style_str(if *value >= 0.0 { BULLISH_COLOR } else { BEARISH_COLOR });
                context.fill_rect(
                    params.x(i, histogram.len()) - bar_width / 2.0,
                    y.min(zero),
                    bar_width,
                    (zero - y).abs().max(1.0),
                );
            }
        }
        for line in &panel.lines {
            self.render_line(&context, &params, &line.values, line.color, 1.5);
        }
        self.render_time_labels(&context, &params, &panel.labels)?;
        self.render_legend(&context, &panel.lines)?;
        self.render_title(&context, &panel.title)
    }

    /// Two-slice pie: invested amount against estimated returns.
    pub fn render_pie(&mut self, slices: &[(&str, f64, &'static str)]) -> Result<(), JsValue> {
        let context = self.get_canvas_context()?;
        self.clear(&context);

        let total: f64 = slices.iter().map(|(_, v, _)| v.max(0.0)).sum();
        if total <= 0.0 {
            return self.render_no_data_message(&context);
        }
        let cx = self.width as f64 / 2.0;
        let cy = self.height as f64 / 2.0 - 10.0;
        let radius = (cx.min(cy) - 20.0).max(10.0);

        let mut start = -std::f64::consts::FRAC_PI_2;
        for (_, value, color) in slices {
            let sweep = value.max(0.0) / total * std::f64::consts::TAU;
            context.begin_path();
            context.move_to(cx, cy);
            context.arc(cx, cy, radius, start, start + sweep)?;
            context.close_path();
            context.set_fill_style_str(color);
            context.fill();
            start += sweep;
        }

        context.set_font("12px Arial");
        let mut x = PADDING;
        for (label, _, color) in slices {
            context.set_fill_style_str(color);
            context.fill_rect(x, self.height as f64 - 20.0, 10.0, 10.0);
            context.set_fill_style_str(self.palette.text);
            context.fill_text(label, x + 15.0, self.height as f64 - 11.0)?;
            x += 20.0 + context.measure_text(label)?.width() + 20.0;
        }
        Ok(())
    }

    fn calculate_candle_render_data(index: usize, count: usize, bar: &CandleBar, params: &ScaleParams) -> CandleRenderData {
        CandleRenderData {
            x: params.x(index, count),
            high_y: params.y(bar.high),
            low_y: params.y(bar.low),
            open_y: params.y(bar.open),
            close_y: params.y(bar.close),
            is_bullish: bar.is_bullish(),
            body_width: params.slot_width(count) * 0.6,
        }
    }

    fn render_single_candle(&self, context: &CanvasRenderingContext2d, data: &CandleRenderData) {
        let color = if data.is_bullish { BULLISH_COLOR } else { BEARISH_COLOR };
        context.set_stroke_style_str(color);
        context.set_fill_style_str(color);
        context.set_line_width(1.0);

        context.begin_path();
        context.move_to(data.x, data.high_y);
        context.line_to(data.x, data.low_y);
        context.stroke();

        let body_top = data.open_y.min(data.close_y);
        let body_height = (data.open_y - data.close_y).abs();
        if body_height < 1.0 {
            // doji
            context.begin_path();
            context.move_to(data.x - data.body_width / 2.0, data.open_y);
            context.line_to(data.x + data.body_width / 2.0, data.open_y);
            context.stroke();
        } else {
            context.fill_rect(data.x - data.body_width / 2.0, body_top, data.body_width, body_height);
        }
    }

    fn render_line(
        &self,
        context: &CanvasRenderingContext2d,
        params: &ScaleParams,
        values: &[Option<f64>],
        color: &str,
        width: f64,
    ) {
        context.set_stroke_style_str(color);
        context.set_line_width(width);
        context.begin_path();
        let mut pen_down = false;
        for (i, value) in values.iter().enumerate() {
            match value.filter(|v| v.is_finite()) {
                Some(v) if pen_down => context.line_to(params.x(i, values.len()), params.y(v)),
                Some(v) => {
                    context.move_to(params.x(i, values.len()), params.y(v));
                    pen_down = true;
                }
                None => pen_down = false,
            }
        }
        context.stroke();
    }

    fn render_area(&self, context: &CanvasRenderingContext2d, params: &ScaleParams, values: &[Option<f64>], color: &str) {
        let bottom = params.padding + params.chart_height;
        let points: Vec<(f64, f64)> = values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.filter(|x| x.is_finite()).map(|v| (params.x(i, values.len()), params.y(v))))
            .collect();
        let (Some(first), Some(last)) = (points.first(), points.last()) else { return };

        context.begin_path();
        context.move_to(first.0, bottom);
        for (x, y) in &points {
            context.line_to(*x, *y);
        }
        context.line_to(last.0, bottom);
        context.close_path();
        context.set_global_alpha(0.15);
        context.set_fill_style_str(color);
        context.fill();
        context.set_global_alpha(1.0);
    }

    fn render_grid(&self, context: &CanvasRenderingContext2d, params: &ScaleParams, unit: &str) -> Result<(), JsValue> {
        context.set_stroke_style_str(self.palette.grid);
        context.set_fill_style_str(self.palette.text);
        context.set_line_width(1.0);
        context.set_font("11px Arial");
        let steps = 4;
        for step in 0..=steps {
            let value = params.min_value + (params.max_value - params.min_value) * step as f64 / steps as f64;
            let y = params.y(value);
            context.begin_path();
            context.move_to(params.padding, y);
            context.line_to(params.right_edge(), y);
            context.stroke();
            context.fill_text(&format!("{}{:.2}", unit, value), params.right_edge() + 6.0, y + 4.0)?;
        }
        Ok(())
    }

    fn render_current_price_line(
        &self,
        context: &CanvasRenderingContext2d,
        params: &ScaleParams,
        price: f64,
        unit: &str,
    ) -> Result<(), JsValue> {
        let y = params.y(price);
        context.set_stroke_style_str(BULLISH_COLOR);
        context.set_line_width(1.0);
        context.begin_path();
        context.move_to(params.padding, y);
        context.line_to(params.right_edge(), y);
        context.stroke();

        context.set_fill_style_str(BULLISH_COLOR);
        context.set_font("12px Arial");
        context.fill_text(&format!("{}{:.2}", unit, price), params.right_edge() + 6.0, y - 6.0)
    }

    fn render_time_labels(
        &self,
        context: &CanvasRenderingContext2d,
        params: &ScaleParams,
        labels: &[String],
    ) -> Result<(), JsValue> {
        context.set_fill_style_str(self.palette.text);
        context.set_font("11px Arial");
        let baseline = params.padding + params.chart_height + 16.0;
        for index in label_indices(labels.len(), X_LABELS) {
            let text = &labels[index];
            let width = context.measure_text(text)?.width();
            context.fill_text(text, params.x(index, labels.len()) - width / 2.0, baseline)?;
        }
        Ok(())
    }

    fn render_legend(&self, context: &CanvasRenderingContext2d, series: &[LineSeries]) -> Result<(), JsValue> {
        context.set_font("11px Arial");
        let mut x = PADDING + 200.0;
        for line in series {
            context.set_fill_style_str(line.color);
            context.fill_text(&line.label, x, 26.0)?;
            x += context.measure_text(&line.label)?.width() + 14.0;
        }
        Ok(())
    }

    fn render_no_data_message(&self, context: &CanvasRenderingContext2d) -> Result<(), JsValue> {
        context.set_fill_style_str(self.palette.text);
        context.set_font("16px Arial");
        context.fill_text("No chart data available", PADDING, self.height as f64 / 2.0)?;

        get_logger().warn(LogComponent::Infrastructure("CanvasRenderer"), "No data to render");
        Ok(())
    }

    fn render_title(&self, context: &CanvasRenderingContext2d, title: &str) -> Result<(), JsValue> {
        context.set_fill_style_str(self.palette.text);
        context.set_font("bold 14px Arial");
        context.fill_text(title, PADDING, 26.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_maps_range_onto_plot_area() {
        let params = ScaleParams::fit(600.0, 300.0, 100.0, 200.0).unwrap();
        assert_eq!(params.y(200.0), PADDING);
        assert_eq!(params.y(100.0), PADDING + params.chart_height);
        assert_eq!(params.chart_width, 600.0 - PADDING * 2.0 - TEXT_SPACE);
        assert!(params.x(0, 4) < params.x(3, 4));
        assert!(params.x(3, 4) < params.right_edge());
    }

    #[test]
    fn flat_range_still_has_height() {
        let params = ScaleParams::fit(400.0, 200.0, 50.0, 50.0).unwrap();
        assert!(params.max_value > params.min_value);
        assert!(ScaleParams::fit(400.0, 200.0, f64::NAN, 1.0).is_none());
    }

    #[test]
    fn range_skips_gaps() {
        let values = [None, Some(3.0), Some(-1.0), None, Some(f64::INFINITY)];
        assert_eq!(value_range(&values), Some((-1.0, 3.0)));
        assert_eq!(value_range(&[None, None]), None);
    }

    #[test]
    fn labels_spread_to_the_last_point() {
        assert_eq!(label_indices(3, 5), vec![0, 1, 2]);
        assert_eq!(label_indices(101, 5), vec![0, 25, 50, 75, 100]);
        assert!(label_indices(0, 5).is_empty());
    }
}
