//! Free-text region lookup against the feed's label columns.

use crate::models::Row;

/// One matched region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionMatch {
    pub id: String,
    pub label: String,
    pub label_en: String,
}

/// Case-insensitive substring match of `query` against `label` or
/// `label_en`. Returns distinct regions in dataset row order, first
/// occurrence wins; a region matching on both labels appears once.
pub fn search(dataset: &[Row], query: &str) -> Vec<RegionMatch> {
    let needle = query.to_lowercase();
    let mut out: Vec<RegionMatch> = Vec::new();
    for row in dataset {
        if !row.label.to_lowercase().contains(&needle)
            && !row.label_en.to_lowercase().contains(&needle)
        {
            continue;
        }
        if out.iter().any(|m| m.id == row.id) {
            continue;
        }
        out.push(RegionMatch {
            id: row.id.clone(),
            label: row.label.clone(),
            label_en: row.label_en.clone(),
        });
    }
    out
}

/// Evaluate several queries independently and concatenate their results.
/// Duplicates are removed within one query's match set only.
pub fn search_all(dataset: &[Row], queries: &[String]) -> Vec<RegionMatch> {
    queries.iter().flat_map(|q| search(dataset, q)).collect()
}
