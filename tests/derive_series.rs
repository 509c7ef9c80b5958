use corona_charts::{Metric, Row, SeriesOptions};
use corona_charts::series::{self, DeriveError};

fn region(id: &str, confirmed: &[u64], population: Option<u64>) -> Vec<Row> {
    confirmed
        .iter()
        .enumerate()
        .map(|(i, c)| Row {
            id: id.into(),
            label: id.into(),
            label_en: id.into(),
            date: 20200401 + i as u32,
            confirmed: Some(*c),
            recovered: Some(c / 2),
            deaths: Some(0),
            population,
        })
        .collect()
}

fn opts(daily: bool, ave: usize, cumulative: bool, per100k: bool) -> SeriesOptions {
    SeriesOptions {
        daily,
        average_window: ave,
        cumulative,
        per_capita: per100k,
    }
}

#[test]
fn k_rows_give_k_minus_one_consecutive_differences() {
    let rows = region("DE", &[3, 7, 7, 20, 21], Some(1000));
    let got = series::derive(&rows, Metric::Confirmed, &opts(true, 0, false, false)).unwrap();
    let defined: Vec<f64> = got.daily.iter().flatten().copied().collect();
    assert_eq!(got.daily[0], None);
    assert_eq!(defined, vec![4.0, 0.0, 13.0, 1.0]);
    assert_eq!(defined.len(), rows.len() - 1);
}

#[test]
fn de_scenario_daily_deltas() {
    // Cumulative [10,15,25,25] -> daily [undefined,5,10,0]
    let rows = region("DE", &[10, 15, 25, 25], Some(1000));
    let got = series::derive(&rows, Metric::Confirmed, &opts(true, 0, false, false)).unwrap();
    assert_eq!(got.daily, vec![None, Some(5.0), Some(10.0), Some(0.0)]);
}

#[test]
fn de_scenario_per_capita_scales_by_100x() {
    // population 1000 -> factor 100000/1000 = 100
    let rows = region("DE", &[10, 15, 25, 25], Some(1000));
    let got = series::derive(&rows, Metric::Confirmed, &opts(true, 0, false, true)).unwrap();
    assert_eq!(got.daily, vec![None, Some(500.0), Some(1000.0), Some(0.0)]);
}

#[test]
fn per_capita_is_linear_in_inverse_population() {
    let base = series::derive(
        &region("DE", &[100, 250, 400], Some(10_000)),
        Metric::Confirmed,
        &opts(true, 0, false, true),
    )
    .unwrap();
    let doubled = series::derive(
        &region("DE", &[100, 250, 400], Some(20_000)),
        Metric::Confirmed,
        &opts(true, 0, false, true),
    )
    .unwrap();
    for (a, b) in base.daily.iter().zip(&doubled.daily) {
        match (a, b) {
            (Some(a), Some(b)) => assert!((a - 2.0 * b).abs() < 1e-9),
            (None, None) => {}
            other => panic!("defined/undefined mismatch: {:?}", other),
        }
    }
}

#[test]
fn rolling_average_uses_only_the_trailing_window() {
    // Two series that agree on the last 3 deltas must agree on the average
    // at the final index for window 3 (no look-ahead, no earlier leakage).
    let a = region("DE", &[0, 100, 110, 130, 160], Some(1000));
    let b = region("DE", &[50, 60, 70, 90, 120], Some(1000));
    let opts3 = opts(true, 3, false, false);
    let da = series::derive(&a, Metric::Confirmed, &opts3).unwrap();
    let db = series::derive(&b, Metric::Confirmed, &opts3).unwrap();
    let last = a.len() - 1;
    assert_eq!(da.daily[last - 2..], db.daily[last - 2..]);
    assert_eq!(da.average[last], db.average[last]);
    assert!(da.average[last].is_some());
}

#[test]
fn average_undefined_until_full_window_of_history() {
    let rows = region("DE", &[10, 12, 16, 22, 30], Some(1000));
    let got = series::derive(&rows, Metric::Confirmed, &opts(true, 3, false, false)).unwrap();
    // deltas: [None, 2, 4, 6, 8]; window 3 first defined at index 3
    assert_eq!(got.average[..3], [None, None, None]);
    assert_eq!(got.average[3], Some(4.0));
    assert_eq!(got.average[4], Some(6.0));
}

#[test]
fn single_row_region_has_empty_daily_and_average() {
    let rows = region("DE", &[42], Some(1000));
    let o = opts(true, 7, true, false);
    let got = series::derive(&rows, Metric::Confirmed, &o).unwrap();
    assert!(got.daily.iter().all(|d| d.is_none()));
    assert!(got.average.iter().all(|d| d.is_none()));

    let lines = series::to_lines(&got, Metric::Confirmed, &o, 0);
    let daily = lines.iter().find(|l| l.label.contains("daily")).unwrap();
    let cumulative = lines.iter().find(|l| l.label.contains("confirmed")).unwrap();
    assert!(daily.points.is_empty());
    assert_eq!(cumulative.points.len(), 1);
}

#[test]
fn empty_region_derives_to_empty_series() {
    let got = series::derive(&[], Metric::Confirmed, &opts(true, 7, true, false)).unwrap();
    assert!(got.dates.is_empty());
    assert!(got.daily.is_empty());
}

#[test]
fn zero_population_reports_missing_population() {
    let rows = region("XX", &[1, 2], Some(0));
    let err = series::derive(&rows, Metric::Confirmed, &opts(true, 0, false, true)).unwrap_err();
    assert!(matches!(err, DeriveError::MissingPopulation { .. }));
}

#[test]
fn metric_selection_reads_the_requested_column() {
    let rows = region("DE", &[10, 20, 40], Some(1000));
    let got = series::derive(&rows, Metric::Recovered, &opts(true, 0, false, false)).unwrap();
    // recovered is confirmed/2 in the fixture
    assert_eq!(got.daily, vec![None, Some(5.0), Some(10.0)]);
}
