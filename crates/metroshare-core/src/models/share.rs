//! Market-share result table.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Percentage breakdown of point categories within each region.
///
/// Maps `region -> category -> percentage`, percentages rounded to one
/// decimal place. For every region present, the category percentages sum
/// to 100 within rounding tolerance. Regions with zero points are simply
/// absent; the `"Outside Metro"` sentinel is never present.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShareTable {
    rows: BTreeMap<String, BTreeMap<String, f64>>,
}

impl ShareTable {
    /// Build a table from raw (region, category) counts
    pub fn from_counts(counts: BTreeMap<String, BTreeMap<String, usize>>) -> Self {
        let mut rows = BTreeMap::new();
        for (region, by_category) in counts {
            let total: usize = by_category.values().sum();
            if total == 0 {
                continue;
            }
            let shares: BTreeMap<String, f64> = by_category
                .into_iter()
                .map(|(category, count)| {
                    let pct = count as f64 / total as f64 * 100.0;
                    (category, round1(pct))
                })
                .collect();
            rows.insert(region, shares);
        }
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Regions present in the table, sorted
    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    /// Category percentages for a region
    pub fn shares(&self, region: &str) -> Option<&BTreeMap<String, f64>> {
        self.rows.get(region)
    }

    /// Percentage for one (region, category) cell
    pub fn get(&self, region: &str, category: &str) -> Option<f64> {
        self.rows.get(region).and_then(|r| r.get(category)).copied()
    }

    /// Flat `(region, category, percentage)` rows for tabular output
    pub fn iter_rows(&self) -> impl Iterator<Item = (&str, &str, f64)> {
        self.rows.iter().flat_map(|(region, shares)| {
            shares.iter().map(move |(category, pct)| (region.as_str(), category.as_str(), *pct))
        })
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
