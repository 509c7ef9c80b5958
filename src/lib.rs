//! corona-charts
//!
//! A lightweight Rust library for fetching regional pandemic case counts and
//! turning the raw cumulative feed into plottable daily/cumulative line series.
//! Pairs with the `corona` CLI.
//!
//! ### Features
//! - Fetch the remote case-count CSV (one row per region and day)
//! - Filter by region id and inclusive date range
//! - Derive daily deltas, per-100k normalization, and a rolling average
//! - Search regions by label substring
//! - Render SVG/PNG line charts
//!
//! ### Example
//! ```no_run
//! use corona_charts::{Client, Metric, SeriesOptions};
//! use corona_charts::{filter, series, viz};
//!
//! let client = Client::default();
//! let dataset = client.fetch()?;
//! let rows = filter::rows_for_region(&dataset, "DE");
//! let opts = SeriesOptions {
//!     daily: true,
//!     average_window: 7,
//!     cumulative: false,
//!     per_capita: false,
//! };
//! let derived = series::derive(&rows, Metric::Confirmed, &opts)?;
//! let lines = series::to_lines(&derived, Metric::Confirmed, &opts, 0);
//! viz::render(&lines, &viz::ChartMeta::new("DE", 1000, 500), "de.png")?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod api;
pub mod filter;
pub mod models;
pub mod search;
pub mod series;
pub mod viz;

pub use api::Client;
pub use models::{DateRange, DerivedSeries, Metric, Row, SeriesOptions};
pub use series::DeriveError;
