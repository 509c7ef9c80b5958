//! The series deriver: cumulative counts in, plottable line series out.
//!
//! For one region's rows the deriver computes day-over-day deltas, optional
//! per-100k normalization, and an optional rolling average. The input slice
//! is immutable; every call returns a freshly allocated [`DerivedSeries`],
//! so deriving one region can never alias into another.
//!
//! Averaging policy: a **simple trailing mean** over the last `w` deltas,
//! including the current day. The average at index `i` is defined only when
//! every delta in `i-w+1..=i` is defined, so no partial window is ever
//! silently treated as a full one.

use crate::models::{DerivedSeries, Metric, Row, SeriesOptions};
use crate::viz::{LineSpec, LineStyle};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeriveError {
    /// Per-capita normalization requested but the region reports no usable
    /// population. The caller skips the region; this is never a crash.
    #[error("region {region}: population missing or zero, cannot normalize per 100k")]
    MissingPopulation { region: String },
    /// A date field that does not decode to a calendar day.
    #[error("region {region}: invalid date {date}")]
    InvalidDate { region: String, date: u32 },
}

/// Derive the per-date sequences for one region.
///
/// `rows` must be a single region's rows in ascending date order, as the
/// feed delivers them. Zero or one rows produce empty daily/average series
/// rather than an error.
pub fn derive(rows: &[Row], metric: Metric, opts: &SeriesOptions) -> Result<DerivedSeries, DeriveError> {
    let region = rows.first().map(|r| r.id.clone()).unwrap_or_default();

    let mut dates = Vec::with_capacity(rows.len());
    for row in rows {
        let d = row.naive_date().ok_or_else(|| DeriveError::InvalidDate {
            region: region.clone(),
            date: row.date,
        })?;
        dates.push(d);
    }

    let cumulative: Vec<Option<f64>> = rows
        .iter()
        .map(|r| metric.value(r).map(|v| v as f64))
        .collect();

    // delta[0] has no prior day and stays undefined; it is never plotted or
    // averaged as zero.
    let mut daily: Vec<Option<f64>> = vec![None; rows.len()];
    for i in 1..rows.len() {
        if let (Some(prev), Some(cur)) = (cumulative[i - 1], cumulative[i]) {
            daily[i] = Some(cur - prev);
        }
    }

    if opts.per_capita {
        let population = rows
            .iter()
            .find_map(|r| r.population)
            .filter(|p| *p > 0)
            .ok_or_else(|| DeriveError::MissingPopulation {
                region: region.clone(),
            })?;
        for d in daily.iter_mut().flatten() {
            *d = *d / population as f64 * 100_000.0;
        }
    }

    let average = if opts.average_window > 0 {
        trailing_mean(&daily, opts.average_window)
    } else {
        vec![None; rows.len()]
    };

    Ok(DerivedSeries {
        region,
        dates,
        cumulative,
        daily,
        average,
    })
}

/// Simple trailing mean over the last `window` deltas, current day included.
/// Undefined wherever any delta in the window is undefined.
fn trailing_mean(deltas: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; deltas.len()];
    for i in 0..deltas.len() {
        if i + 1 <= window {
            continue; // fewer than `window` deltas of history (delta[0] is undefined)
        }
        let slice = &deltas[i + 1 - window..=i];
        if slice.iter().all(|d| d.is_some()) {
            let sum: f64 = slice.iter().flatten().sum();
            out[i] = Some(sum / window as f64);
        }
    }
    out
}

/// Turn a derived series into styled renderer input.
///
/// Up to three lines per region: daily delta (dashed), rolling average
/// (solid), cumulative (dotted). Undefined entries are simply not emitted as
/// points. All lines of one region share its `color_idx`.
pub fn to_lines(
    derived: &DerivedSeries,
    metric: Metric,
    opts: &SeriesOptions,
    color_idx: usize,
) -> Vec<LineSpec> {
    let mut lines = Vec::new();
    let points = |vals: &[Option<f64>]| -> Vec<_> {
        derived
            .dates
            .iter()
            .zip(vals)
            .filter_map(|(d, v)| v.map(|v| (*d, v)))
            .collect()
    };

    if opts.daily {
        lines.push(LineSpec {
            points: points(&derived.daily),
            label: format!("{} daily new", derived.region),
            color_idx,
            style: LineStyle::Dashed,
        });
    }
    if opts.average_window > 0 {
        lines.push(LineSpec {
            points: points(&derived.average),
            label: format!(
                "{} {}-day rolling average",
                derived.region, opts.average_window
            ),
            color_idx,
            style: LineStyle::Solid,
        });
    }
    if opts.cumulative {
        lines.push(LineSpec {
            points: points(&derived.cumulative),
            label: format!("{} {}", derived.region, metric.name()),
            color_idx,
            style: LineStyle::Dotted,
        });
    }
    lines
}
