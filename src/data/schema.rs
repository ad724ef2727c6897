//! Trip Record Schema
//! Exact column names of the source spreadsheet. Some optional headers carry
//! embedded newlines; they must be matched byte for byte.

/// Trip date; parsed into a calendar date at load.
pub const DATE: &str = "Data";
/// Gross earnings reported by the platform.
pub const GROSS_EARNINGS: &str = "Valor Uber (R$)";
pub const NET_PROFIT: &str = "Lucro Líquido (R$)";
pub const TRIP_COUNT: &str = "Qtd. Viagens";
/// Trip B odometer distance in km.
pub const DISTANCE: &str = "Trip B (km)";
pub const EARNINGS_PER_KM: &str = "Ganhos por Km (R$/km)";

pub const EFFICIENCY: &str = "Eficiência (km/kWh)\n=100/consumo médio";
pub const CONSUMPTION: &str = "Consumo Médio Instantâneo\nde Eletricidade (kWh/100km)";
pub const EARNINGS_PER_HOUR: &str = "Ganhos por Hora (R$/h)";
pub const CHARGE_REMAINING: &str = "Tempo Restante\np/ Carga Total (h)";
pub const CHARGE_START: &str = "Hora\n(Início da Recarga)";

/// Derived `YYYY-MM` label.
pub const MONTH: &str = "Mês";
/// Derived Sunday-based week of year, `00`-`53`.
pub const WEEK: &str = "Semana";

/// Numeric columns reduced into KPIs. Validated at load so a renamed column
/// fails in the loader instead of during aggregation.
pub const KPI_COLUMNS: [&str; 5] = [
    GROSS_EARNINGS,
    NET_PROFIT,
    TRIP_COUNT,
    DISTANCE,
    EARNINGS_PER_KM,
];

/// Every column the loader refuses to run without.
pub fn required_columns() -> impl Iterator<Item = &'static str> {
    std::iter::once(DATE).chain(KPI_COLUMNS)
}

/// Column names of a table, in order.
pub fn column_names(df: &polars::prelude::DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect()
}
