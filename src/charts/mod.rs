//! Charts module - chart registry, interactive plotting and image export

mod colors;
mod plotter;
mod registry;
mod renderer;

pub use colors::ColorScale;
pub use plotter::ChartPlotter;
pub use registry::{
    earnings_chart, hour_of_day, optional_charts, AxisKind, ChartKind, ChartOutcome, ChartSpec,
    ChartTemplate, EARNINGS_CHART, OPTIONAL_CHARTS,
};
pub use renderer::{RenderError, StaticChartRenderer};
