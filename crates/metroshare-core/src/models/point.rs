//! Point record types.

use serde::{Deserialize, Serialize};

/// The ownership classification column used for grouping.
///
/// The points file carries two interchangeable classification columns:
/// `Corporate` reflects ownership before the merger event, `Corporate 2`
/// after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CategoryField {
    #[default]
    Corporate,
    CorporateTwo,
}

impl std::fmt::Display for CategoryField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryField::Corporate => write!(f, "Corporate"),
            CategoryField::CorporateTwo => write!(f, "Corporate 2"),
        }
    }
}

/// A validated retail point.
///
/// Only rows with both coordinates parseable as finite numbers make it this
/// far; everything else is dropped at the loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    pub name: String,
    pub categories: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postcode: String,
    pub corporate: String,
    pub corporate_two: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl PointRecord {
    /// The value of the selected classification column
    pub fn category_value(&self, field: CategoryField) -> &str {
        match field {
            CategoryField::Corporate => &self.corporate,
            CategoryField::CorporateTwo => &self.corporate_two,
        }
    }
}

/// A point record with its assigned region label.
///
/// Created once per pipeline run and immutable afterward. The label is
/// either a boundary region name or the `"Outside Metro"` sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedPoint {
    #[serde(flatten)]
    pub record: PointRecord,
    pub metro_area: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> PointRecord {
        PointRecord {
            name: "Test Pharmacy".into(),
            categories: "Pharmacy".into(),
            address: "1 Test St".into(),
            city: "Sydney".into(),
            state: "NSW".into(),
            postcode: "2000".into(),
            corporate: "SIG".into(),
            corporate_two: "Mergeco".into(),
            latitude: -33.87,
            longitude: 151.21,
        }
    }

    #[test]
    fn test_category_value_selects_column() {
        let r = record();
        assert_eq!(r.category_value(CategoryField::Corporate), "SIG");
        assert_eq!(r.category_value(CategoryField::CorporateTwo), "Mergeco");
    }

    #[test]
    fn test_tagged_point_serializes_flat() {
        let tagged = TaggedPoint { record: record(), metro_area: "Sydney".into() };
        let json = serde_json::to_value(&tagged).unwrap();
        assert_eq!(json["name"], "Test Pharmacy");
        assert_eq!(json["metro_area"], "Sydney");
    }
}
