//! Chart Registry
//! Declares the dashboard charts and turns table columns into plottable series.
//! Optional charts are gated on the table schema; a chart whose columns are
//! absent becomes a skip notice instead of an error.

use crate::charts::ColorScale;
use crate::data::{calendar, schema};
use chrono::{NaiveTime, Timelike};
use polars::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// Line with a marker on every point
    Line,
    Bar,
    Scatter,
}

/// How x values are encoded and labelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisKind {
    /// Days since 1970-01-01
    Date,
    /// Fractional hour of day, 0-24
    HourOfDay,
}

impl AxisKind {
    pub fn format_tick(self, value: f64) -> String {
        match self {
            AxisKind::Date => {
                let days = value.round();
                if !days.is_finite() || days.abs() > f64::from(i32::MAX) {
                    return String::new();
                }
                calendar::from_epoch_days(days as i32)
                    .format("%d/%m")
                    .to_string()
            }
            AxisKind::HourOfDay => {
                let minutes = (value * 60.0).round().max(0.0) as i64;
                format!("{:02}:{:02}", minutes / 60, minutes % 60)
            }
        }
    }
}

/// Declarative description of a chart.
#[derive(Debug, Clone, Copy)]
pub struct ChartTemplate {
    pub id: &'static str,
    pub title: &'static str,
    pub kind: ChartKind,
    pub x_column: &'static str,
    pub x_axis: AxisKind,
    pub y_column: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub color_scale: Option<ColorScale>,
    /// Column name shown in the skip notice
    pub display_name: &'static str,
}

/// Always-present daily earnings chart.
pub const EARNINGS_CHART: ChartTemplate = ChartTemplate {
    id: "ganhos_diarios",
    title: "📈 Evolução Diária de Ganhos",
    kind: ChartKind::Line,
    x_column: schema::DATE,
    x_axis: AxisKind::Date,
    y_column: schema::GROSS_EARNINGS,
    x_label: "Data",
    y_label: "R$ Ganhos",
    color_scale: None,
    display_name: "Valor Uber (R$)",
};

/// Charts drawn only when their columns exist in the table.
pub const OPTIONAL_CHARTS: [ChartTemplate; 4] = [
    ChartTemplate {
        id: "eficiencia",
        title: "🔋 Eficiência Energética Diária",
        kind: ChartKind::Bar,
        x_column: schema::DATE,
        x_axis: AxisKind::Date,
        y_column: schema::EFFICIENCY,
        x_label: "Data",
        y_label: "Eficiência (km/kWh)",
        color_scale: Some(ColorScale::Viridis),
        display_name: "Eficiência (km/kWh)",
    },
    ChartTemplate {
        id: "consumo",
        title: "⚡ Consumo Médio de Eletricidade",
        kind: ChartKind::Line,
        x_column: schema::DATE,
        x_axis: AxisKind::Date,
        y_column: schema::CONSUMPTION,
        x_label: "Data",
        y_label: "kWh/100km",
        color_scale: None,
        display_name: "Consumo Médio de Eletricidade (kWh/100km)",
    },
    ChartTemplate {
        id: "ganhos_hora",
        title: "⏱️ Ganhos por Hora Dirigida",
        kind: ChartKind::Bar,
        x_column: schema::DATE,
        x_axis: AxisKind::Date,
        y_column: schema::EARNINGS_PER_HOUR,
        x_label: "Data",
        y_label: "R$/h",
        color_scale: Some(ColorScale::Plasma),
        display_name: "Ganhos por Hora (R$/h)",
    },
    ChartTemplate {
        id: "carga",
        title: "🔌 Tempo Estimado para Carga Total",
        kind: ChartKind::Scatter,
        x_column: schema::CHARGE_START,
        x_axis: AxisKind::HourOfDay,
        y_column: schema::CHARGE_REMAINING,
        x_label: "Início da Carga",
        y_label: "Horas Restantes",
        color_scale: Some(ColorScale::Turbo),
        display_name: "Tempo Restante / Início da Recarga",
    },
];

/// A chart ready to draw: template metadata plus its points.
#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub template: ChartTemplate,
    /// `[x, y]` pairs; rows with a missing x or y are dropped.
    pub points: Vec<[f64; 2]>,
}

impl ChartSpec {
    pub fn id(&self) -> &'static str {
        self.template.id
    }

    pub fn title(&self) -> &'static str {
        self.template.title
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Min and max of the y values, `None` without points.
    pub fn y_bounds(&self) -> Option<(f64, f64)> {
        bounds(self.points.iter().map(|p| p[1]))
    }

    pub fn x_bounds(&self) -> Option<(f64, f64)> {
        bounds(self.points.iter().map(|p| p[0]))
    }
}

fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Result of resolving an optional chart against the table schema.
#[derive(Debug, Clone)]
pub enum ChartOutcome {
    Ready(ChartSpec),
    Skipped {
        id: &'static str,
        title: &'static str,
        missing: Vec<String>,
        notice: String,
    },
}

impl ChartOutcome {
    pub fn id(&self) -> &'static str {
        match self {
            ChartOutcome::Ready(spec) => spec.id(),
            ChartOutcome::Skipped { id, .. } => id,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ChartOutcome::Ready(_))
    }
}

impl ChartTemplate {
    pub fn required_columns(&self) -> [&'static str; 2] {
        [self.x_column, self.y_column]
    }

    /// Required columns absent from `columns`.
    pub fn missing_columns(&self, columns: &[String]) -> Vec<String> {
        self.required_columns()
            .iter()
            .filter(|name| !columns.iter().any(|c| c == *name))
            .map(|name| name.to_string())
            .collect()
    }

    pub fn skip_notice(&self) -> String {
        format!(
            "A coluna '{}' não está disponível nos dados.",
            self.display_name
        )
    }

    /// Extract the chart's points from `rows`.
    pub fn build(&self, rows: &DataFrame) -> PolarsResult<ChartSpec> {
        let xs = axis_values(rows, self.x_column, self.x_axis)?;
        let ys = numeric_values(rows, self.y_column)?;

        let points = xs
            .into_iter()
            .zip(ys)
            .filter_map(|(x, y)| match (x, y) {
                (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some([x, y]),
                _ => None,
            })
            .collect();

        Ok(ChartSpec {
            template: *self,
            points,
        })
    }

    /// Build the chart if `columns` holds every required column, otherwise a skip notice.
    pub fn resolve(&self, columns: &[String], rows: &DataFrame) -> PolarsResult<ChartOutcome> {
        let missing = self.missing_columns(columns);
        if !missing.is_empty() {
            return Ok(ChartOutcome::Skipped {
                id: self.id,
                title: self.title,
                missing,
                notice: self.skip_notice(),
            });
        }
        Ok(ChartOutcome::Ready(self.build(rows)?))
    }
}

/// Daily earnings chart; `None` when the month has no rows.
pub fn earnings_chart(rows: &DataFrame) -> PolarsResult<Option<ChartSpec>> {
    if rows.height() == 0 {
        return Ok(None);
    }
    EARNINGS_CHART.build(rows).map(Some)
}

/// Resolve every optional chart. `columns` is the schema of the full table.
pub fn optional_charts(columns: &[String], rows: &DataFrame) -> PolarsResult<Vec<ChartOutcome>> {
    OPTIONAL_CHARTS
        .iter()
        .map(|template| template.resolve(columns, rows))
        .collect()
}

fn numeric_values(df: &DataFrame, column: &str) -> PolarsResult<Vec<Option<f64>>> {
    let values = df.column(column)?.cast(&DataType::Float64)?;
    Ok(values.f64()?.into_iter().collect())
}

fn axis_values(df: &DataFrame, column: &str, axis: AxisKind) -> PolarsResult<Vec<Option<f64>>> {
    match axis {
        AxisKind::Date => {
            let days = df.column(column)?.cast(&DataType::Int32)?;
            Ok(days.i32()?.into_iter().map(|d| d.map(f64::from)).collect())
        }
        AxisKind::HourOfDay => {
            let column = df.column(column)?;
            Ok((0..column.len())
                .map(|i| column.get(i).ok().and_then(|v| hour_of_day(&v)))
                .collect())
        }
    }
}

/// Hour of day from a time cell: `HH:MM[:SS]` text (optionally after a date),
/// a day fraction below 1, or a plain hour number.
pub fn hour_of_day(value: &AnyValue) -> Option<f64> {
    match value {
        AnyValue::String(s) => hours_from_text(s),
        AnyValue::StringOwned(s) => hours_from_text(s.as_str()),
        AnyValue::Float64(f) if *f < 1.0 && *f >= 0.0 => Some(f * 24.0),
        AnyValue::Float64(f) => Some(*f),
        AnyValue::Int64(i) => Some(*i as f64),
        _ => None,
    }
}

fn hours_from_text(text: &str) -> Option<f64> {
    let token = text.trim().rsplit(' ').next()?;
    let time = NaiveTime::parse_from_str(token, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(token, "%H:%M"))
        .ok()?;
    Some(
        f64::from(time.hour())
            + f64::from(time.minute()) / 60.0
            + f64::from(time.second()) / 3600.0,
    )
}
