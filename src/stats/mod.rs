//! Stats module - monthly KPI calculations

mod calculator;
pub mod format;

pub use calculator::{KpiCalculator, KpiSet, MonthlyReport};
