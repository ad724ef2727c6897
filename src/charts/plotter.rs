//! Chart Plotter Module
//! Draws interactive dashboard charts using egui_plot.

use crate::charts::{ChartKind, ChartSpec, ColorScale};
use egui::Color32;
use egui_plot::{Bar, BarChart, Line, Plot, PlotPoints, Points};

/// Series color for charts without a color scale.
pub const SERIES_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue

const CHART_HEIGHT: f32 = 320.0;

/// Draws [`ChartSpec`]s with egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn scale_color(scale: ColorScale, value: f64, min: f64, max: f64) -> Color32 {
        let [r, g, b] = scale.rgb(value, min, max);
        Color32::from_rgb(r, g, b)
    }

    /// Color of each point, following the chart's color scale when it has one.
    fn point_colors(spec: &ChartSpec) -> Vec<Color32> {
        match (spec.template.color_scale, spec.y_bounds()) {
            (Some(scale), Some((min, max))) => spec
                .points
                .iter()
                .map(|p| Self::scale_color(scale, p[1], min, max))
                .collect(),
            _ => vec![SERIES_COLOR; spec.points.len()],
        }
    }

    /// Draw a chart in the available width.
    pub fn draw_chart(ui: &mut egui::Ui, spec: &ChartSpec) {
        let x_axis = spec.template.x_axis;

        Plot::new(format!("chart_{}", spec.id()))
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label(spec.template.x_label)
            .y_axis_label(spec.template.y_label)
            .x_axis_formatter(move |mark, _range| x_axis.format_tick(mark.value))
            .label_formatter(move |name, value| {
                let prefix = if name.is_empty() {
                    String::new()
                } else {
                    format!("{}\n", name)
                };
                format!("{}{}: {:.2}", prefix, x_axis.format_tick(value.x), value.y)
            })
            .show(ui, |plot_ui| match spec.template.kind {
                ChartKind::Line => {
                    let points: Vec<[f64; 2]> = spec.points.clone();
                    plot_ui.line(
                        Line::new(PlotPoints::from(points.clone()))
                            .color(SERIES_COLOR)
                            .width(2.0)
                            .name(spec.template.y_label),
                    );
                    plot_ui.points(
                        Points::new(PlotPoints::from(points))
                            .radius(4.0)
                            .color(SERIES_COLOR),
                    );
                }
                ChartKind::Bar => {
                    let colors = Self::point_colors(spec);
                    let bars: Vec<Bar> = spec
                        .points
                        .iter()
                        .zip(colors)
                        .map(|(p, color)| Bar::new(p[0], p[1]).width(0.8).fill(color))
                        .collect();
                    plot_ui.bar_chart(BarChart::new(bars).name(spec.template.y_label));
                }
                ChartKind::Scatter => {
                    // One series per point so each keeps its scale color
                    for (p, color) in spec.points.iter().zip(Self::point_colors(spec)) {
                        plot_ui.points(
                            Points::new(PlotPoints::from(vec![*p]))
                                .radius(5.0)
                                .color(color),
                        );
                    }
                }
            });
    }
}
