use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One observation from the feed (one region on one day).
///
/// The feed carries cumulative counts; any metric may be absent for a given
/// day. `label`/`label_en` and `population` are constant per region.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Row {
    pub id: String,
    pub label: String,
    pub label_en: String,
    /// Calendar date encoded as YYYYMMDD; numeric order equals date order.
    pub date: u32,
    pub confirmed: Option<u64>,
    pub recovered: Option<u64>,
    pub deaths: Option<u64>,
    pub population: Option<u64>,
}

impl Row {
    /// Decode the YYYYMMDD date field into a calendar date (no timezone).
    pub fn naive_date(&self) -> Option<NaiveDate> {
        let y = (self.date / 10_000) as i32;
        let m = self.date / 100 % 100;
        let d = self.date % 100;
        NaiveDate::from_ymd_opt(y, m, d)
    }
}

/// Which cumulative metric to derive series from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum Metric {
    Confirmed,
    Recovered,
    Deaths,
}

impl Metric {
    /// The metric's value on a row, if reported that day.
    pub fn value(&self, row: &Row) -> Option<u64> {
        match self {
            Metric::Confirmed => row.confirmed,
            Metric::Recovered => row.recovered,
            Metric::Deaths => row.deaths,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Metric::Confirmed => "confirmed",
            Metric::Recovered => "recovered",
            Metric::Deaths => "deaths",
        }
    }
}

/// Inclusive date range on the YYYYMMDD encoding; either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<u32>,
    pub end: Option<u32>,
}

impl DateRange {
    pub fn contains(&self, date: u32) -> bool {
        self.start.is_none_or(|s| date >= s) && self.end.is_none_or(|e| date <= e)
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// Flags controlling which series are derived and how.
#[derive(Debug, Clone, Copy)]
pub struct SeriesOptions {
    /// Emit the per-day delta line.
    pub daily: bool,
    /// Rolling-average window in days; 0 disables averaging.
    pub average_window: usize,
    /// Emit the raw cumulative line.
    pub cumulative: bool,
    /// Normalize deltas to per-100k population.
    pub per_capita: bool,
}

/// Per-region output of the deriver: parallel per-date sequences.
///
/// `daily[i]` and `average[i]` are `None` where the value is undefined (no
/// prior day, missing source value, or not enough history for the window).
/// Freshly allocated per invocation; the input rows are never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedSeries {
    pub region: String,
    pub dates: Vec<NaiveDate>,
    pub cumulative: Vec<Option<f64>>,
    pub daily: Vec<Option<f64>>,
    pub average: Vec<Option<f64>>,
}
