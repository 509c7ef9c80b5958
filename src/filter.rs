//! Row selection by region id and date range.
//!
//! Filtering never synthesizes or reorders rows; the feed's per-region date
//! order passes through untouched.

use crate::models::{DateRange, Row};

/// Keep rows whose id is in `ids` (empty = all regions) and whose date falls
/// in the inclusive `range`. Date comparison is numeric on the YYYYMMDD value.
pub fn filter_rows(dataset: &[Row], ids: &[String], range: &DateRange) -> Vec<Row> {
    dataset
        .iter()
        .filter(|r| ids.is_empty() || ids.iter().any(|id| id == &r.id))
        .filter(|r| range.contains(r.date))
        .cloned()
        .collect()
}

/// Slice out one region's rows, preserving feed order.
///
/// An id not present in the dataset yields an empty vector; region ids are
/// free-form, so "unknown id" and "no data" are the same condition.
pub fn rows_for_region(dataset: &[Row], id: &str) -> Vec<Row> {
    dataset.iter().filter(|r| r.id == id).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, date: u32) -> Row {
        Row {
            id: id.into(),
            label: id.into(),
            label_en: id.into(),
            date,
            confirmed: Some(1),
            recovered: None,
            deaths: None,
            population: Some(1000),
        }
    }

    #[test]
    fn empty_id_set_means_all_regions() {
        let data = vec![row("DE", 20200301), row("FR", 20200301)];
        let got = filter_rows(&data, &[], &DateRange::default());
        assert_eq!(got.len(), 2);
    }

    #[test]
    fn date_bounds_and_id_filter_combine() {
        let data = vec![
            row("DE", 20200228),
            row("DE", 20200301),
            row("FR", 20200301),
            row("DE", 20200401),
        ];
        let range = DateRange {
            start: Some(20200301),
            end: Some(20200331),
        };
        let got = filter_rows(&data, &["DE".into()], &range);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].date, 20200301);
    }

    #[test]
    fn unknown_region_is_empty_not_an_error() {
        let data = vec![row("DE", 20200301)];
        assert!(rows_for_region(&data, "ZZ").is_empty());
    }
}
