//! Dashboard render model.
//! Everything the window draws for one (table, today) pair: metric cards,
//! charts or their skip notices, the detailed table and the CSV download.

use crate::charts::{self, ChartOutcome, ChartSpec};
use crate::data::{calendar, schema};
use crate::export::{self, ExportError};
use crate::stats::format::{format_currency, format_distance, format_optional_currency};
use crate::stats::{KpiCalculator, KpiSet};
use chrono::NaiveDate;
use polars::prelude::*;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

/// Label and formatted value of one KPI.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricCard {
    pub label: &'static str,
    pub value: String,
}

pub fn metric_cards(kpis: &KpiSet) -> Vec<MetricCard> {
    vec![
        MetricCard {
            label: "💵 Ganhos Totais",
            value: format_currency(kpis.total_earnings),
        },
        MetricCard {
            label: "🧮 Lucro Líquido",
            value: format_currency(kpis.net_profit),
        },
        MetricCard {
            label: "🚗 Nº de Viagens",
            value: kpis.trip_count.to_string(),
        },
        MetricCard {
            label: "🛣️ Km Rodados (Trip B)",
            value: format_distance(kpis.distance_km),
        },
        MetricCard {
            label: "📏 Ganhos por Km",
            value: format_optional_currency(kpis.earnings_per_km),
        },
    ]
}

/// Text form of a table cell, as shown in the detail view and written to CSV.
pub fn format_cell(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Boolean(b) => b.to_string(),
        AnyValue::Int32(i) => i.to_string(),
        AnyValue::Int64(i) => i.to_string(),
        AnyValue::Float64(f) if f.is_nan() => String::new(),
        AnyValue::Float64(f) => float_text(*f),
        AnyValue::Date(days) => calendar::from_epoch_days(*days)
            .format("%Y-%m-%d")
            .to_string(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}

/// Shortest round-trip text of `value`, with whole numbers keeping `.0` and
/// exponents written with a sign and two digits (`1e-07`, `1.5e+20`).
fn float_text(value: f64) -> String {
    let text = format!("{:?}", value);
    let Some((mantissa, exponent)) = text.split_once('e') else {
        return text;
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{}e{}{:0>2}", mantissa, sign, digits)
}

/// Filtered rows as text, all columns in table order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableView {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableView {
    pub fn from_frame(df: &DataFrame) -> PolarsResult<Self> {
        let columns = df.get_columns();
        let rows = (0..df.height())
            .map(|i| {
                columns
                    .iter()
                    .map(|column| column.get(i).map(|v| format_cell(&v)))
                    .collect::<PolarsResult<Vec<String>>>()
            })
            .collect::<PolarsResult<Vec<_>>>()?;

        Ok(Self {
            headers: schema::column_names(df),
            rows,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// CSV bytes of the filtered rows, built once per dashboard.
#[derive(Debug, Clone)]
pub struct CsvDownload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Complete render model of the dashboard.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub today: NaiveDate,
    /// `YYYY-MM` of `today`
    pub month: String,
    /// Column names of the full table
    pub columns: Vec<String>,
    pub kpis: KpiSet,
    pub cards: Vec<MetricCard>,
    pub earnings_chart: Option<ChartSpec>,
    pub optional_charts: Vec<ChartOutcome>,
    pub table: TableView,
    pub download: CsvDownload,
}

impl Dashboard {
    /// Build the render model of `table` for the month containing `today`.
    pub fn build(
        table: &DataFrame,
        today: NaiveDate,
        export_context: &str,
    ) -> Result<Self, ReportError> {
        let report = KpiCalculator::aggregate(table, today)?;
        let columns = schema::column_names(table);

        let earnings_chart = charts::earnings_chart(&report.rows)?;
        let optional_charts = charts::optional_charts(&columns, &report.rows)?;

        let view = TableView::from_frame(&report.rows)?;
        let download = CsvDownload {
            file_name: export::export_file_name(export_context, &report.month),
            bytes: export::csv_bytes(&view)?,
        };

        debug!(
            month = %report.month,
            rows = view.rows.len(),
            skipped_charts = optional_charts.iter().filter(|c| !c.is_ready()).count(),
            "Dashboard built"
        );

        Ok(Self {
            today,
            month: report.month,
            columns,
            cards: metric_cards(&report.kpis),
            kpis: report.kpis,
            earnings_chart,
            optional_charts,
            table: view,
            download,
        })
    }

    /// Charts with data, earnings chart first.
    pub fn ready_charts(&self) -> Vec<&ChartSpec> {
        self.earnings_chart
            .iter()
            .chain(self.optional_charts.iter().filter_map(|c| match c {
                ChartOutcome::Ready(spec) => Some(spec),
                ChartOutcome::Skipped { .. } => None,
            }))
            .collect()
    }

    /// Notices of the optional charts that were skipped.
    pub fn skip_notices(&self) -> Vec<&str> {
        self.optional_charts
            .iter()
            .filter_map(|c| match c {
                ChartOutcome::Skipped { notice, .. } => Some(notice.as_str()),
                ChartOutcome::Ready(_) => None,
            })
            .collect()
    }
}
