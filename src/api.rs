//! Synchronous client for the remote case-count feed.
//!
//! The feed is a single CSV resource with one row per region and day, in
//! ascending date order per region. This module handles transport and CSV
//! decoding; everything downstream works on the decoded [`Row`] table.
//!
//! There are no retries: a network or decode failure is surfaced once and is
//! fatal to the run, no partial dataset is ever returned.

use crate::models::Row;
use anyhow::{Context, Result, bail};
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use std::io::Read;
use std::time::Duration;

/// Default location of the case-count history feed.
pub const DEFAULT_FEED_URL: &str =
    "https://interaktiv.morgenpost.de/data/corona/history.light.v4.csv";

#[derive(Debug, Clone)]
pub struct Client {
    pub base_url: String,
    http: HttpClient,
}

impl Default for Client {
    fn default() -> Self {
        Self::new(DEFAULT_FEED_URL)
    }
}

impl Client {
    /// Build a client for a specific feed URL (tests point this at a fixture
    /// server or file).
    pub fn new(url: impl Into<String>) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30)) // total request timeout
            .connect_timeout(Duration::from_secs(10)) // connect timeout
            .redirect(Policy::limited(5)) // cap redirects
            .user_agent(concat!("corona_charts/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("reqwest client build");
        Self {
            base_url: url.into(),
            http,
        }
    }

    /// Fetch and decode the full dataset.
    ///
    /// ### Errors
    /// - Network/HTTP error (non-2xx is an error)
    /// - CSV decode error (missing columns, malformed numbers)
    pub fn fetch(&self) -> Result<Vec<Row>> {
        let resp = self
            .http
            .get(&self.base_url)
            .send()
            .with_context(|| format!("GET {}", self.base_url))?;
        if !resp.status().is_success() {
            bail!("request failed with HTTP {}", resp.status());
        }
        parse_csv(resp).with_context(|| format!("decode feed from {}", self.base_url))
    }
}

/// Decode the feed CSV into rows.
///
/// The header row is required. Columns beyond the ones in [`Row`] are
/// ignored; empty metric/population fields decode to `None`. Row order is
/// preserved as delivered.
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<Row>> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let mut out = Vec::new();
    for (i, rec) in rdr.deserialize::<Row>().enumerate() {
        let row = rec.with_context(|| format!("csv record {}", i + 1))?;
        out.push(row);
    }
    Ok(out)
}
