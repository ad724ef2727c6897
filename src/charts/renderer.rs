//! Static Chart Renderer
//! Writes dashboard charts to PNG files with plotters.
//!
//! Layout:
//! 1. Title centered on top (without its leading emoji)
//! 2. Cartesian plot with axis descriptions
//! 3. Lines get point markers, bars and scatter points follow the color scale

use crate::charts::{ChartKind, ChartSpec};
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub const DEFAULT_WIDTH: u32 = 1200;
pub const DEFAULT_HEIGHT: u32 = 600;

const SERIES: RGBColor = RGBColor(52, 152, 219);
const BAR_HALF_WIDTH: f64 = 0.4;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Chart '{0}' has no points to render")]
    Empty(String),
    #[error("Failed to draw chart: {0}")]
    Drawing(String),
}

fn draw_err<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Drawing(e.to_string())
}

/// Generates chart images matching the dashboard charts.
pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render `spec` into a PNG file at `path`.
    pub fn render_png(
        spec: &ChartSpec,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        let (Some(x_bounds), Some(y_bounds)) = (spec.x_bounds(), spec.y_bounds()) else {
            return Err(RenderError::Empty(spec.id().to_string()));
        };

        let is_bar = spec.template.kind == ChartKind::Bar;
        let (x_min, x_max) = x_range(x_bounds, is_bar);
        let (y_min, y_max) = y_range(y_bounds, is_bar);

        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(plain_title(spec.title()), ("sans-serif", 26))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(65)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(draw_err)?;

        let x_axis = spec.template.x_axis;
        chart
            .configure_mesh()
            .x_desc(spec.template.x_label)
            .y_desc(spec.template.y_label)
            .x_label_formatter(&|x| x_axis.format_tick(*x))
            .draw()
            .map_err(draw_err)?;

        let colors = Self::point_colors(spec);
        match spec.template.kind {
            ChartKind::Line => {
                chart
                    .draw_series(LineSeries::new(
                        spec.points.iter().map(|p| (p[0], p[1])),
                        SERIES.stroke_width(2),
                    ))
                    .map_err(draw_err)?;
                chart
                    .draw_series(
                        spec.points
                            .iter()
                            .map(|p| Circle::new((p[0], p[1]), 4, SERIES.filled())),
                    )
                    .map_err(draw_err)?;
            }
            ChartKind::Bar => {
                chart
                    .draw_series(spec.points.iter().zip(&colors).map(|(p, color)| {
                        Rectangle::new(
                            [(p[0] - BAR_HALF_WIDTH, 0.0), (p[0] + BAR_HALF_WIDTH, p[1])],
                            color.filled(),
                        )
                    }))
                    .map_err(draw_err)?;
            }
            ChartKind::Scatter => {
                chart
                    .draw_series(
                        spec.points
                            .iter()
                            .zip(&colors)
                            .map(|(p, color)| Circle::new((p[0], p[1]), 5, color.filled())),
                    )
                    .map_err(draw_err)?;
            }
        }

        root.present().map_err(draw_err)?;
        debug!(chart = spec.id(), path = %path.display(), "Chart rendered");
        Ok(())
    }

    /// Render every chart with points into `dir` as `<id>_<month>.png`.
    pub fn export_all(
        charts: &[&ChartSpec],
        dir: &Path,
        month: &str,
    ) -> Result<Vec<PathBuf>, RenderError> {
        let mut written = Vec::new();
        for spec in charts.iter().filter(|spec| !spec.is_empty()) {
            let path = dir.join(Self::file_name(spec, month));
            Self::render_png(spec, &path, DEFAULT_WIDTH, DEFAULT_HEIGHT)?;
            written.push(path);
        }
        info!(count = written.len(), dir = %dir.display(), "Chart images exported");
        Ok(written)
    }

    pub fn file_name(spec: &ChartSpec, month: &str) -> String {
        format!("{}_{}.png", spec.id(), month)
    }

    fn point_colors(spec: &ChartSpec) -> Vec<RGBColor> {
        match (spec.template.color_scale, spec.y_bounds()) {
            (Some(scale), Some((min, max))) => spec
                .points
                .iter()
                .map(|p| {
                    let [r, g, b] = scale.rgb(p[1], min, max);
                    RGBColor(r, g, b)
                })
                .collect(),
            _ => vec![SERIES; spec.points.len()],
        }
    }
}

/// Title text without the leading emoji, which bitmap fonts lack.
fn plain_title(title: &str) -> &str {
    match title.split_once(' ') {
        Some((head, rest)) if !head.chars().any(char::is_alphanumeric) => rest,
        _ => title,
    }
}

fn x_range((min, max): (f64, f64), is_bar: bool) -> (f64, f64) {
    let pad = if is_bar {
        1.0
    } else if max > min {
        (max - min) * 0.05
    } else {
        1.0
    };
    (min - pad, max + pad)
}

/// Bars always start from zero; the range gets 5% headroom.
fn y_range((min, max): (f64, f64), is_bar: bool) -> (f64, f64) {
    let (min, max) = if is_bar {
        (min.min(0.0), max.max(0.0))
    } else {
        (min, max)
    };
    if max > min {
        let pad = (max - min) * 0.05;
        (min - pad, max + pad)
    } else {
        (min - 1.0, max + 1.0)
    }
}
