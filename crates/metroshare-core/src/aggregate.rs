//! Market-share aggregation over tagged points.

use std::collections::BTreeMap;

use crate::geo::resolve::OUTSIDE_METRO;
use crate::models::point::{CategoryField, TaggedPoint};
use crate::models::share::ShareTable;

/// Compute per-region market shares for the selected classification column.
///
/// Points tagged with the outside sentinel are excluded. Within each region
/// every category's count is divided by the region total, as a percentage
/// rounded to one decimal place. Category values are passed through
/// unchanged; callers wanting a restricted view (for example dropping
/// `"Independents & Minors"`) pre-filter the tagged points instead.
pub fn market_share(tagged: &[TaggedPoint], field: CategoryField) -> ShareTable {
    let mut counts: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();

    for point in tagged {
        if point.metro_area == OUTSIDE_METRO {
            continue;
        }
        *counts
            .entry(point.metro_area.clone())
            .or_default()
            .entry(point.record.category_value(field).to_string())
            .or_default() += 1;
    }

    ShareTable::from_counts(counts)
}
