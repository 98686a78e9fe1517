//! CSV point loader.
//!
//! Coordinate columns are coerced to floating point; rows where either
//! coordinate is missing or unparseable are dropped rather than reported.
//! Only an unreadable or structurally corrupt file is an error.

use std::fs::File;
use std::path::Path;

use serde::Deserialize;

use crate::error::{MetroshareError, Result};
use crate::models::point::PointRecord;

/// One raw CSV row, before coordinate validation
#[derive(Debug, Deserialize)]
struct RawPointRow {
    #[serde(rename = "Name", default)]
    name: String,
    #[serde(rename = "Categories", default)]
    categories: String,
    #[serde(rename = "Address", default)]
    address: String,
    #[serde(rename = "City", default)]
    city: String,
    #[serde(rename = "State", default)]
    state: String,
    #[serde(rename = "Postcode", default)]
    postcode: String,
    #[serde(rename = "Corporate", default)]
    corporate: String,
    #[serde(rename = "Corporate 2", default)]
    corporate_two: String,
    #[serde(rename = "latitude", default)]
    latitude: String,
    #[serde(rename = "longitude", default)]
    longitude: String,
}

impl RawPointRow {
    fn validate(self) -> Option<PointRecord> {
        let latitude = parse_coordinate(&self.latitude)?;
        let longitude = parse_coordinate(&self.longitude)?;
        Some(PointRecord {
            name: self.name,
            categories: self.categories,
            address: self.address,
            city: self.city,
            state: self.state,
            postcode: self.postcode,
            corporate: self.corporate,
            corporate_two: self.corporate_two,
            latitude,
            longitude,
        })
    }
}

fn parse_coordinate(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Read and validate point records from a CSV file
pub fn read_points(path: &Path) -> Result<Vec<PointRecord>> {
    let file = File::open(path).map_err(|e| MetroshareError::DataUnavailable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut reader = csv::ReaderBuilder::new().from_reader(file);

    let mut points = Vec::new();
    let mut dropped = 0usize;
    for result in reader.deserialize() {
        let row: RawPointRow = result.map_err(|e| MetroshareError::DataUnavailable {
            path: path.to_path_buf(),
            reason: format!("malformed CSV: {}", e),
        })?;
        match row.validate() {
            Some(record) => points.push(record),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        tracing::info!(
            path = %path.display(),
            kept = points.len(),
            dropped,
            "dropped rows without valid coordinates"
        );
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str =
        "Name,Categories,Address,City,State,Postcode,Corporate,Corporate 2,latitude,longitude";

    fn write_csv(rows: &[&str]) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        for row in rows {
            writeln!(file, "{}", row).unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_valid_rows_parsed() {
        let file = write_csv(&[
            "Store A,Pharmacy,1 Main St,Sydney,NSW,2000,SIG,Mergeco,-33.87,151.21",
        ]);
        let points = read_points(file.path()).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].name, "Store A");
        assert_eq!(points[0].corporate_two, "Mergeco");
        assert!((points[0].latitude - -33.87).abs() < 1e-9);
    }

    #[test]
    fn test_unparseable_coordinates_dropped_silently() {
        let file = write_csv(&[
            "Good,Pharmacy,,Sydney,NSW,2000,SIG,Mergeco,-33.87,151.21",
            "Bad lat,Pharmacy,,Sydney,NSW,2000,SIG,Mergeco,not-a-number,151.21",
            "Missing lon,Pharmacy,,Sydney,NSW,2000,SIG,Mergeco,-33.87,",
        ]);
        let points = read_points(file.path()).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].name, "Good");
    }

    #[test]
    fn test_all_null_longitude_gives_empty_set() {
        let file = write_csv(&[
            "A,Pharmacy,,Sydney,NSW,2000,SIG,Mergeco,-33.87,",
            "B,Pharmacy,,Melbourne,VIC,3000,EBO,EBO,-37.81,",
        ]);
        let points = read_points(file.path()).unwrap();
        assert!(points.is_empty());
    }

    #[test]
    fn test_non_finite_coordinates_dropped() {
        let file = write_csv(&["A,Pharmacy,,Sydney,NSW,2000,SIG,Mergeco,NaN,inf"]);
        let points = read_points(file.path()).unwrap();
        assert!(points.is_empty());
    }

    #[test]
    fn test_missing_file_is_data_unavailable() {
        let err = read_points(Path::new("/nonexistent/points.csv")).unwrap_err();
        assert!(matches!(err, MetroshareError::DataUnavailable { .. }));
    }
}
