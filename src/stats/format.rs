//! Display formatting for KPI values.

/// Shown where a metric is undefined (mean over no rows).
pub const NOT_AVAILABLE: &str = "N/A";

pub fn format_currency(value: f64) -> String {
    format!("R$ {:.2}", value)
}

pub fn format_distance(km: f64) -> String {
    format!("{:.1} km", km)
}

pub fn format_optional_currency(value: Option<f64>) -> String {
    value
        .map(format_currency)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}
