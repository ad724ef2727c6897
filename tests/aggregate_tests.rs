mod common;

use calamine::Data;
use common::{date, june_rows, scenario_table, trip_row, trip_table};
use dolphin_dashboard::data::schema;
use dolphin_dashboard::stats::{KpiCalculator, KpiSet};
use polars::prelude::*;

#[test]
fn june_scenario_kpis() {
    let report = KpiCalculator::aggregate(&scenario_table(), date(2024, 6, 15)).unwrap();

    assert_eq!(report.month, "2024-06");
    assert_eq!(report.rows.height(), 3);
    assert_eq!(report.kpis.total_earnings, 450.0);
    assert_eq!(report.kpis.net_profit, 280.0);
    assert_eq!(report.kpis.trip_count, 18);
    assert_eq!(report.kpis.distance_km, 145.0);

    let mean = report.kpis.earnings_per_km.unwrap();
    assert!((mean - 3.0667).abs() < 1e-4, "mean was {}", mean);
}

#[test]
fn filter_keeps_exactly_the_current_month() {
    let table = scenario_table();

    for (today, expected) in [
        (date(2024, 6, 1), 3),
        (date(2024, 5, 20), 1),
        (date(2023, 6, 30), 1),
        (date(2024, 7, 1), 0),
    ] {
        let report = KpiCalculator::aggregate(&table, today).unwrap();
        assert_eq!(report.rows.height(), expected, "rows for {}", today);

        let months = report.rows.column(schema::MONTH).unwrap().str().unwrap();
        assert!(months
            .into_iter()
            .all(|m| m == Some(report.month.as_str())));
    }
}

#[test]
fn empty_month_has_zero_sums_and_no_mean() {
    let report = KpiCalculator::aggregate(&scenario_table(), date(2025, 1, 10)).unwrap();

    assert!(report.is_empty());
    assert_eq!(report.kpis, KpiSet::default());
    assert_eq!(report.kpis.earnings_per_km, None);
    // Schema survives filtering
    assert!(report.rows.column(schema::GROSS_EARNINGS).is_ok());
}

#[test]
fn sum_kpis_are_additive() {
    let rows = june_rows();
    let first = trip_table(&rows[..1]);
    let rest = trip_table(&rows[1..]);
    let all = trip_table(&rows);
    let today = date(2024, 6, 20);

    let a = KpiCalculator::aggregate(&first, today).unwrap().kpis;
    let b = KpiCalculator::aggregate(&rest, today).unwrap().kpis;
    let both = KpiCalculator::aggregate(&all, today).unwrap().kpis;

    assert_eq!(both.total_earnings, a.total_earnings + b.total_earnings);
    assert_eq!(both.net_profit, a.net_profit + b.net_profit);
    assert_eq!(both.trip_count, a.trip_count + b.trip_count);
    assert_eq!(both.distance_km, a.distance_km + b.distance_km);
}

#[test]
fn null_cells_are_skipped() {
    let mut rows = june_rows();
    rows[2][5] = Data::Empty;
    rows[0][1] = Data::Empty;

    let kpis = KpiCalculator::aggregate(&trip_table(&rows), date(2024, 6, 1))
        .unwrap()
        .kpis;

    assert_eq!(kpis.total_earnings, 350.0);
    assert!((kpis.earnings_per_km.unwrap() - 2.6).abs() < 1e-9);
}

#[test]
fn trip_count_is_truncated() {
    let rows = vec![
        trip_row("2024-06-01", 10.0, 5.0, 2.5, 4.0, 2.5),
        trip_row("2024-06-02", 10.0, 5.0, 3.0, 4.0, 2.5),
    ];

    let kpis = KpiCalculator::aggregate(&trip_table(&rows), date(2024, 6, 2))
        .unwrap()
        .kpis;

    assert_eq!(kpis.trip_count, 5);
}

#[test]
fn month_without_per_km_values_has_no_mean() {
    let mut rows = june_rows();
    for row in rows.iter_mut() {
        row[5] = Data::Empty;
    }

    let kpis = KpiCalculator::aggregate(&trip_table(&rows), date(2024, 6, 1))
        .unwrap()
        .kpis;

    assert_eq!(kpis.earnings_per_km, None);
    assert_eq!(kpis.total_earnings, 450.0);
}
