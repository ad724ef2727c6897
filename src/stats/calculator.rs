//! KPI Calculator Module
//! Selects the current month's trips and reduces them to headline metrics.

use crate::data::{calendar, schema};
use chrono::NaiveDate;
use polars::prelude::*;
use statrs::statistics::Statistics;
use tracing::debug;

/// Headline metrics for one month of trips.
#[derive(Debug, Clone, PartialEq)]
pub struct KpiSet {
    pub total_earnings: f64,
    pub net_profit: f64,
    /// Sum of trips, truncated to an integer.
    pub trip_count: i64,
    pub distance_km: f64,
    /// Mean earnings per km; `None` when the month has no values.
    pub earnings_per_km: Option<f64>,
}

impl Default for KpiSet {
    fn default() -> Self {
        Self {
            total_earnings: 0.0,
            net_profit: 0.0,
            trip_count: 0,
            distance_km: 0.0,
            earnings_per_km: None,
        }
    }
}

/// Current month's rows with their metrics.
#[derive(Debug, Clone)]
pub struct MonthlyReport {
    /// `YYYY-MM` label of the selected month.
    pub month: String,
    pub rows: DataFrame,
    pub kpis: KpiSet,
}

impl MonthlyReport {
    pub fn is_empty(&self) -> bool {
        self.rows.height() == 0
    }
}

/// Sum starting from +0.0, so an empty month never shows as -0.00.
fn sum(values: &[f64]) -> f64 {
    values.iter().fold(0.0, |acc, v| acc + v)
}

/// Month filtering and KPI reductions over the trip table.
pub struct KpiCalculator;

impl KpiCalculator {
    /// Filter `table` to the month containing `today` and compute its KPIs.
    pub fn aggregate(table: &DataFrame, today: NaiveDate) -> PolarsResult<MonthlyReport> {
        let month = calendar::month_label(today);
        let rows = Self::filter_month(table, &month)?;
        let kpis = Self::compute_kpis(&rows)?;

        debug!(month = %month, rows = rows.height(), ?kpis, "Monthly KPIs computed");

        Ok(MonthlyReport { month, rows, kpis })
    }

    /// Rows whose month label equals `month`. Rows without a date never match.
    pub fn filter_month(table: &DataFrame, month: &str) -> PolarsResult<DataFrame> {
        table
            .clone()
            .lazy()
            .filter(col(schema::MONTH).eq(lit(month)))
            .collect()
    }

    /// Reduce the KPI columns of `rows`. Null cells are skipped.
    pub fn compute_kpis(rows: &DataFrame) -> PolarsResult<KpiSet> {
        let total_earnings = sum(&Self::column_values(rows, schema::GROSS_EARNINGS)?);
        let net_profit = sum(&Self::column_values(rows, schema::NET_PROFIT)?);
        let trips = sum(&Self::column_values(rows, schema::TRIP_COUNT)?);
        let distance_km = sum(&Self::column_values(rows, schema::DISTANCE)?);

        let per_km = Self::column_values(rows, schema::EARNINGS_PER_KM)?;
        let mean = per_km.iter().mean();

        Ok(KpiSet {
            total_earnings,
            net_profit,
            trip_count: trips.trunc() as i64,
            distance_km,
            earnings_per_km: (!mean.is_nan()).then_some(mean),
        })
    }

    /// Non-null values of a numeric column as `f64`.
    pub fn column_values(df: &DataFrame, column: &str) -> PolarsResult<Vec<f64>> {
        let values = df.column(column)?.cast(&DataType::Float64)?;
        Ok(values
            .f64()?
            .into_iter()
            .flatten()
            .filter(|v| !v.is_nan())
            .collect())
    }
}
