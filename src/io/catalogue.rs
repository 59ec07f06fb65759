//! Reference dataset loading.
//!
//! The reference CSV is read once at startup to derive:
//! - the closed sets of valid `neighbourhood` and `room_type` values
//! - the form defaults (mean latitude / longitude)
//! - the positions of the reference listings, for the map
//!
//! Any problem here is fatal: the form cannot be built without it.

use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{COL_LATITUDE, COL_LONGITUDE, COL_NEIGHBOURHOOD, COL_ROOM_TYPE};
use crate::error::AppError;

/// Cell values read as missing, the same set pandas' `read_csv` uses.
const NA_TOKENS: [&str; 19] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null", "",
];

const REQUIRED_COLUMNS: [&str; 4] = [COL_NEIGHBOURHOOD, COL_ROOM_TYPE, COL_LATITUDE, COL_LONGITUDE];

/// Closed value sets and defaults derived from the reference dataset.
#[derive(Debug, Clone)]
pub struct Catalogue {
    /// Deduplicated, sorted, missing values excluded.
    pub neighbourhoods: Vec<String>,
    /// Deduplicated, sorted, missing values excluded.
    pub room_types: Vec<String>,
    pub mean_latitude: f64,
    pub mean_longitude: f64,
    /// `(lat, lon)` of every row with both coordinates present.
    pub listings: Vec<(f64, f64)>,
    pub rows_read: usize,
}

/// Load the catalogue from a CSV file.
pub fn load_catalogue(path: &Path) -> Result<Catalogue, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::startup(format!(
            "Failed to open reference dataset '{}': {e}",
            path.display()
        ))
    })?;
    read_catalogue(file).map_err(|e| {
        AppError::startup(format!("Reference dataset '{}': {}", path.display(), e.message()))
    })
}

/// Build the catalogue from any CSV reader.
pub fn read_catalogue<R: Read>(reader: R) -> Result<Catalogue, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::startup(format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    for column in REQUIRED_COLUMNS {
        if !header_map.contains_key(column) {
            return Err(AppError::startup(format!("Missing required column: `{column}`")));
        }
    }

    let mut neighbourhoods = BTreeSet::new();
    let mut room_types = BTreeSet::new();
    let mut lat_acc = MeanAcc::default();
    let mut lon_acc = MeanAcc::default();
    let mut listings = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: header is line 1, records are 1-based.
        let line = idx + 2;
        let record = result
            .map_err(|e| AppError::startup(format!("CSV parse error on line {line}: {e}")))?;
        rows_read += 1;

        if let Some(v) = get_present(&record, &header_map, COL_NEIGHBOURHOOD) {
            neighbourhoods.insert(v.to_string());
        }
        if let Some(v) = get_present(&record, &header_map, COL_ROOM_TYPE) {
            room_types.insert(v.to_string());
        }

        let lat = parse_coordinate(get_present(&record, &header_map, COL_LATITUDE), COL_LATITUDE, line)?;
        let lon = parse_coordinate(get_present(&record, &header_map, COL_LONGITUDE), COL_LONGITUDE, line)?;
        if let Some(lat) = lat {
            lat_acc.push(lat);
        }
        if let Some(lon) = lon {
            lon_acc.push(lon);
        }
        if let (Some(lat), Some(lon)) = (lat, lon) {
            listings.push((lat, lon));
        }
    }

    if neighbourhoods.is_empty() {
        return Err(AppError::startup("No `neighbourhood` values found."));
    }
    if room_types.is_empty() {
        return Err(AppError::startup("No `room_type` values found."));
    }
    let mean_latitude = lat_acc
        .mean()
        .ok_or_else(|| AppError::startup("No valid `latitude` values found."))?;
    let mean_longitude = lon_acc
        .mean()
        .ok_or_else(|| AppError::startup("No valid `longitude` values found."))?;

    log::info!(
        "catalogue: rows={rows_read} neighbourhoods={} room_types={} listings={}",
        neighbourhoods.len(),
        room_types.len(),
        listings.len()
    );

    Ok(Catalogue {
        neighbourhoods: neighbourhoods.into_iter().collect(),
        room_types: room_types.into_iter().collect(),
        mean_latitude,
        mean_longitude,
        listings,
        rows_read,
    })
}

#[derive(Debug, Default)]
struct MeanAcc {
    sum: f64,
    n: usize,
}

impl MeanAcc {
    fn push(&mut self, v: f64) {
        self.sum += v;
        self.n += 1;
    }

    fn mean(&self) -> Option<f64> {
        if self.n == 0 {
            None
        } else {
            Some(self.sum / self.n as f64)
        }
    }
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

/// Cell value, or `None` when the column is absent or the cell is a missing
/// value (empty or an NA token).
fn get_present<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    column: &str,
) -> Option<&'a str> {
    let idx = *header_map.get(column)?;
    let value = record.get(idx)?.trim();
    if NA_TOKENS.contains(&value) { None } else { Some(value) }
}

/// A present coordinate must be a finite number; anything else means the
/// dataset is malformed.
fn parse_coordinate(raw: Option<&str>, column: &str, line: usize) -> Result<Option<f64>, AppError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(AppError::startup(format!(
            "Invalid `{column}` value '{raw}' on line {line}."
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
id,neighbourhood,latitude,longitude,room_type,price
1,Triana,37.38,-6.00,Private room,40
2,Casco Antiguo,37.39,-5.99,Entire home/apt,120
3,Triana,37.40,-6.01,Entire home/apt,95
4,,37.37,-5.98,Shared room,20
5,Nervión,,-5.97,,60
";

    #[test]
    fn catalogues_are_deduplicated_sorted_and_skip_missing() {
        let cat = read_catalogue(CSV.as_bytes()).unwrap();
        assert_eq!(cat.neighbourhoods, vec!["Casco Antiguo", "Nervión", "Triana"]);
        assert_eq!(
            cat.room_types,
            vec!["Entire home/apt", "Private room", "Shared room"]
        );
        assert_eq!(cat.rows_read, 5);
    }

    #[test]
    fn means_skip_missing_cells() {
        let cat = read_catalogue(CSV.as_bytes()).unwrap();
        // Latitude missing on row 5: mean of 4 values.
        assert!((cat.mean_latitude - (37.38 + 37.39 + 37.40 + 37.37) / 4.0).abs() < 1e-12);
        assert!((cat.mean_longitude - (-6.00 - 5.99 - 6.01 - 5.98 - 5.97) / 5.0).abs() < 1e-12);
        assert_eq!(cat.listings.len(), 4);
    }

    #[test]
    fn headers_are_case_insensitive_and_bom_tolerant() {
        let csv = "\u{feff}Neighbourhood,ROOM_TYPE,Latitude,Longitude\nTriana,Private room,37.38,-6.0\n";
        let cat = read_catalogue(csv.as_bytes()).unwrap();
        assert_eq!(cat.neighbourhoods, vec!["Triana"]);
        assert_eq!(cat.room_types, vec!["Private room"]);
    }

    #[test]
    fn missing_required_column_is_fatal() {
        let csv = "neighbourhood,latitude,longitude\nTriana,37.38,-6.0\n";
        let err = read_catalogue(csv.as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_STARTUP);
        assert!(err.message().contains("room_type"));
    }

    #[test]
    fn dataset_without_coordinates_is_fatal() {
        let csv = "neighbourhood,room_type,latitude,longitude\nTriana,Private room,,\n";
        let err = read_catalogue(csv.as_bytes()).unwrap_err();
        assert!(err.message().contains("latitude"));
    }

    #[test]
    fn na_tokens_count_as_missing() {
        let csv = "\
neighbourhood,room_type,latitude,longitude
NA,Private room,37.38,-6.00
Triana,null,NaN,-5.99
N/A,Entire home/apt,37.40,
Triana,Entire home/apt,37.39,-6.01
";
        let cat = read_catalogue(csv.as_bytes()).unwrap();
        assert_eq!(cat.neighbourhoods, vec!["Triana"]);
        assert_eq!(cat.room_types, vec!["Entire home/apt", "Private room"]);
        assert!((cat.mean_latitude - (37.38 + 37.40 + 37.39) / 3.0).abs() < 1e-12);
        assert_eq!(cat.listings.len(), 2);
    }

    #[test]
    fn non_numeric_coordinate_is_fatal_and_names_the_line() {
        let csv = "\
neighbourhood,room_type,latitude,longitude
Triana,Private room,37.38,-6.00
Triana,Private room,not-a-number,-6.00
";
        let err = read_catalogue(csv.as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_STARTUP);
        assert!(err.message().contains("latitude"));
        assert!(err.message().contains("line 3"));
    }

    #[test]
    fn missing_file_is_fatal() {
        let err = load_catalogue(Path::new("does/not/exist.csv")).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_STARTUP);
    }
}
