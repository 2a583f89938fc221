pub mod canvas_renderer;

pub use canvas_renderer::{CanvasRenderer, LineSeries, PanelChart, Palette, PriceChart, SERIES_PALETTE};
