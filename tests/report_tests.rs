mod common;

use calamine::Data;
use common::{date, june_rows, kpi_headers, scenario_table, sheet};
use dolphin_dashboard::charts::{ChartOutcome, OPTIONAL_CHARTS};
use dolphin_dashboard::data::{build_table, schema};
use dolphin_dashboard::report::{metric_cards, Dashboard};
use dolphin_dashboard::stats::KpiSet;

fn card_values(dashboard: &Dashboard) -> Vec<String> {
    dashboard.cards.iter().map(|c| c.value.clone()).collect()
}

#[test]
fn june_dashboard_cards_and_table() {
    let dashboard = Dashboard::build(&scenario_table(), date(2024, 6, 15), "byddolphin").unwrap();

    assert_eq!(dashboard.month, "2024-06");
    assert_eq!(
        card_values(&dashboard),
        vec!["R$ 450.00", "R$ 280.00", "18", "145.0 km", "R$ 3.07"]
    );
    assert_eq!(dashboard.download.file_name, "uber_byddolphin_2024-06.csv");

    assert_eq!(dashboard.table.rows.len(), 3);
    assert_eq!(dashboard.table.headers.len(), 8);
    assert_eq!(dashboard.table.headers[6], schema::MONTH);
    assert_eq!(dashboard.table.headers[7], schema::WEEK);
    assert_eq!(
        dashboard.table.rows[0],
        vec!["2024-06-03", "100", "60", "5", "40", "2.5", "2024-06", "22"]
    );
}

#[test]
fn earnings_chart_has_one_point_per_day() {
    let dashboard = Dashboard::build(&scenario_table(), date(2024, 6, 15), "byddolphin").unwrap();

    let chart = dashboard.earnings_chart.as_ref().unwrap();
    let ys: Vec<f64> = chart.points.iter().map(|p| p[1]).collect();
    assert_eq!(ys, vec![100.0, 150.0, 200.0]);
    assert_eq!(chart.y_bounds(), Some((100.0, 200.0)));
    assert_eq!(dashboard.ready_charts()[0].id(), "ganhos_diarios");
}

#[test]
fn empty_month_renders_placeholders() {
    let dashboard = Dashboard::build(&scenario_table(), date(2025, 2, 1), "byddolphin").unwrap();

    assert_eq!(dashboard.kpis, KpiSet::default());
    assert_eq!(
        card_values(&dashboard),
        vec!["R$ 0.00", "R$ 0.00", "0", "0.0 km", "N/A"]
    );
    assert!(dashboard.earnings_chart.is_none());
    assert!(dashboard.table.is_empty());
    assert_eq!(dashboard.download.file_name, "uber_byddolphin_2025-02.csv");

    let mut reader = csv::Reader::from_reader(dashboard.download.bytes.as_slice());
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, dashboard.table.headers);
    assert_eq!(reader.records().count(), 0);
}

#[test]
fn optional_charts_are_skipped_with_notices() {
    let dashboard = Dashboard::build(&scenario_table(), date(2024, 6, 15), "byddolphin").unwrap();

    assert_eq!(dashboard.optional_charts.len(), OPTIONAL_CHARTS.len());
    assert!(dashboard.optional_charts.iter().all(|c| !c.is_ready()));
    assert_eq!(dashboard.ready_charts().len(), 1);

    let notices = dashboard.skip_notices();
    assert_eq!(notices.len(), 4);
    assert_eq!(
        notices[0],
        "A coluna 'Eficiência (km/kWh)' não está disponível nos dados."
    );

    match &dashboard.optional_charts[3] {
        ChartOutcome::Skipped { id, missing, .. } => {
            assert_eq!(*id, "carga");
            assert_eq!(
                missing,
                &vec![schema::CHARGE_START.to_string(), schema::CHARGE_REMAINING.to_string()]
            );
        }
        other => panic!("expected a skipped chart, got {:?}", other),
    }
}

#[test]
fn efficiency_chart_drops_missing_values() {
    let mut headers = kpi_headers();
    headers.push(schema::EFFICIENCY);
    let mut rows = june_rows();
    rows[0].push(Data::Float(6.1));
    rows[1].push(Data::Empty);
    rows[2].push(Data::Float(6.8));
    let table = build_table(&sheet(&headers, &rows)).unwrap();

    let dashboard = Dashboard::build(&table, date(2024, 6, 30), "byddolphin").unwrap();

    match &dashboard.optional_charts[0] {
        ChartOutcome::Ready(spec) => {
            assert_eq!(spec.id(), "eficiencia");
            let ys: Vec<f64> = spec.points.iter().map(|p| p[1]).collect();
            assert_eq!(ys, vec![6.1, 6.8]);
        }
        other => panic!("expected the efficiency chart, got {:?}", other),
    }
    assert!(dashboard.optional_charts[1..].iter().all(|c| !c.is_ready()));
    assert_eq!(dashboard.skip_notices().len(), 3);
    assert_eq!(dashboard.ready_charts().len(), 2);
}

#[test]
fn charge_scatter_uses_hour_of_day() {
    let mut headers = kpi_headers();
    headers.extend([schema::CHARGE_START, schema::CHARGE_REMAINING]);
    let mut rows = june_rows();
    for (row, (start, remaining)) in rows
        .iter_mut()
        .zip([("07:30:00", 1.5), ("22:00:00", 3.0), ("13:15:00", 0.5)])
    {
        row.push(Data::String(start.to_string()));
        row.push(Data::Float(remaining));
    }
    let table = build_table(&sheet(&headers, &rows)).unwrap();

    let dashboard = Dashboard::build(&table, date(2024, 6, 1), "byddolphin").unwrap();

    let carga = dashboard
        .optional_charts
        .iter()
        .find(|c| c.id() == "carga")
        .unwrap();
    match carga {
        ChartOutcome::Ready(spec) => {
            assert_eq!(spec.points, vec![[7.5, 1.5], [22.0, 3.0], [13.25, 0.5]]);
            assert_eq!(spec.x_bounds(), Some((7.5, 22.0)));
        }
        other => panic!("expected the charge chart, got {:?}", other),
    }
}

#[test]
fn cards_follow_kpi_order() {
    let kpis = KpiSet {
        total_earnings: 1234.5,
        net_profit: -20.0,
        trip_count: 42,
        distance_km: 310.0,
        earnings_per_km: Some(3.98),
    };

    let cards = metric_cards(&kpis);
    let labels: Vec<&str> = cards.iter().map(|c| c.label).collect();

    assert_eq!(
        labels,
        vec![
            "💵 Ganhos Totais",
            "🧮 Lucro Líquido",
            "🚗 Nº de Viagens",
            "🛣️ Km Rodados (Trip B)",
            "📏 Ganhos por Km"
        ]
    );
    assert_eq!(cards[0].value, "R$ 1234.50");
    assert_eq!(cards[1].value, "R$ -20.00");
    assert_eq!(cards[3].value, "310.0 km");
}
