//! Shared domain types.
//!
//! `ListingQuery` is what the form (or the `predict` subcommand) collects;
//! `FeatureRecord` is the single-row table handed to a classifier;
//! `InferenceResult` is what comes back.

use std::path::PathBuf;

use serde::Serialize;

/// Column names in the order the record is assembled.
pub const COL_ROOM_TYPE: &str = "room_type";
pub const COL_NEIGHBOURHOOD: &str = "neighbourhood";
pub const COL_MINIMUM_NIGHTS: &str = "minimum_nights";
pub const COL_AVAILABILITY_365: &str = "availability_365";
pub const COL_NUMBER_OF_REVIEWS: &str = "number_of_reviews";
pub const COL_REVIEWS_PER_MONTH: &str = "reviews_per_month";
pub const COL_NUMBER_OF_REVIEWS_LTM: &str = "number_of_reviews_ltm";
pub const COL_HOST_LISTINGS_COUNT: &str = "calculated_host_listings_count";
pub const COL_LATITUDE: &str = "latitude";
pub const COL_LONGITUDE: &str = "longitude";

/// Inclusive bounds of the integer inputs.
pub const MINIMUM_NIGHTS_RANGE: (u32, u32) = (1, 365);
pub const AVAILABILITY_365_RANGE: (u32, u32) = (0, 365);
pub const HOST_LISTINGS_MIN: u32 = 1;

/// Form defaults for a fresh query.
pub const DEFAULT_MINIMUM_NIGHTS: u32 = 3;
pub const DEFAULT_AVAILABILITY_365: u32 = 120;
pub const DEFAULT_NUMBER_OF_REVIEWS: u32 = 30;
pub const DEFAULT_REVIEWS_PER_MONTH: f64 = 1.2;
pub const DEFAULT_NUMBER_OF_REVIEWS_LTM: u32 = 10;
pub const DEFAULT_HOST_LISTINGS_COUNT: u32 = 1;

/// Paths and switches resolved from flags and the environment.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub model_path: PathBuf,
    pub dataset_path: PathBuf,
    pub log_file: Option<PathBuf>,
}

/// The single record submitted for inference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingQuery {
    pub room_type: String,
    pub neighbourhood: String,
    pub minimum_nights: u32,
    pub availability_365: u32,
    pub number_of_reviews: u32,
    pub reviews_per_month: f64,
    pub number_of_reviews_ltm: u32,
    pub calculated_host_listings_count: u32,
    pub latitude: f64,
    pub longitude: f64,
}

impl ListingQuery {
    /// A query pre-filled with the form defaults.
    pub fn with_defaults(
        room_type: impl Into<String>,
        neighbourhood: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            room_type: room_type.into(),
            neighbourhood: neighbourhood.into(),
            minimum_nights: DEFAULT_MINIMUM_NIGHTS,
            availability_365: DEFAULT_AVAILABILITY_365,
            number_of_reviews: DEFAULT_NUMBER_OF_REVIEWS,
            reviews_per_month: DEFAULT_REVIEWS_PER_MONTH,
            number_of_reviews_ltm: DEFAULT_NUMBER_OF_REVIEWS_LTM,
            calculated_host_listings_count: DEFAULT_HOST_LISTINGS_COUNT,
            latitude,
            longitude,
        }
    }

    /// Check the documented input ranges.
    ///
    /// The form never produces values outside them, so this matters for queries built
    /// elsewhere (the `predict` subcommand, tests).
    pub fn validate(&self) -> Result<(), String> {
        let (min_n, max_n) = MINIMUM_NIGHTS_RANGE;
        if !(min_n..=max_n).contains(&self.minimum_nights) {
            return Err(format!(
                "minimum_nights must be between {min_n} and {max_n} (got {}).",
                self.minimum_nights
            ));
        }
        let (min_a, max_a) = AVAILABILITY_365_RANGE;
        if !(min_a..=max_a).contains(&self.availability_365) {
            return Err(format!(
                "availability_365 must be between {min_a} and {max_a} (got {}).",
                self.availability_365
            ));
        }
        if self.calculated_host_listings_count < HOST_LISTINGS_MIN {
            return Err(format!(
                "calculated_host_listings_count must be at least {HOST_LISTINGS_MIN}."
            ));
        }
        if !(self.reviews_per_month.is_finite() && self.reviews_per_month >= 0.0) {
            return Err(format!(
                "reviews_per_month must be a finite number >= 0 (got {}).",
                self.reviews_per_month
            ));
        }
        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            return Err("latitude/longitude must be finite numbers.".to_string());
        }
        Ok(())
    }

    /// Assemble the one-row record handed to the classifier.
    pub fn to_record(&self) -> FeatureRecord {
        let mut record = FeatureRecord::default();
        record.push_text(COL_ROOM_TYPE, &self.room_type);
        record.push_text(COL_NEIGHBOURHOOD, &self.neighbourhood);
        record.push_number(COL_MINIMUM_NIGHTS, f64::from(self.minimum_nights));
        record.push_number(COL_AVAILABILITY_365, f64::from(self.availability_365));
        record.push_number(COL_NUMBER_OF_REVIEWS, f64::from(self.number_of_reviews));
        record.push_number(COL_REVIEWS_PER_MONTH, self.reviews_per_month);
        record.push_number(COL_NUMBER_OF_REVIEWS_LTM, f64::from(self.number_of_reviews_ltm));
        record.push_number(
            COL_HOST_LISTINGS_COUNT,
            f64::from(self.calculated_host_listings_count),
        );
        record.push_number(COL_LATITUDE, self.latitude);
        record.push_number(COL_LONGITUDE, self.longitude);
        record
    }
}

/// A single cell of a `FeatureRecord`.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    Text(String),
    Number(f64),
}

/// A named, ordered, single-row table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureRecord {
    columns: Vec<(String, FeatureValue)>,
}

impl FeatureRecord {
    pub fn push_text(&mut self, column: &str, value: &str) {
        self.columns
            .push((column.to_string(), FeatureValue::Text(value.to_string())));
    }

    pub fn push_number(&mut self, column: &str, value: f64) {
        self.columns
            .push((column.to_string(), FeatureValue::Number(value)));
    }

    pub fn get(&self, column: &str) -> Option<&FeatureValue> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }
}

/// User-facing label for the binary class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PriceLabel {
    HighPrice,
    LowPrice,
}

impl PriceLabel {
    /// Class 1 is "High Price"; every other class is "Low Price".
    pub fn from_class(class: usize) -> Self {
        if class == 1 {
            PriceLabel::HighPrice
        } else {
            PriceLabel::LowPrice
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            PriceLabel::HighPrice => "High Price",
            PriceLabel::LowPrice => "Low Price",
        }
    }
}

impl std::fmt::Display for PriceLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Outcome of one prediction. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InferenceResult {
    pub class: usize,
    pub label: PriceLabel,
    /// Maximum class probability as a percentage, one decimal place.
    pub confidence: f64,
}

impl InferenceResult {
    pub fn sentence(&self) -> String {
        format!(
            "There is a {:.1}% probability that this listing will be {}.",
            self.confidence, self.label
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_query;

    #[test]
    fn record_has_all_columns_in_order() {
        let record = sample_query().to_record();
        let names: Vec<&str> = record.column_names().collect();
        assert_eq!(
            names,
            vec![
                COL_ROOM_TYPE,
                COL_NEIGHBOURHOOD,
                COL_MINIMUM_NIGHTS,
                COL_AVAILABILITY_365,
                COL_NUMBER_OF_REVIEWS,
                COL_REVIEWS_PER_MONTH,
                COL_NUMBER_OF_REVIEWS_LTM,
                COL_HOST_LISTINGS_COUNT,
                COL_LATITUDE,
                COL_LONGITUDE,
            ]
        );
        assert_eq!(
            record.get(COL_NEIGHBOURHOOD),
            Some(&FeatureValue::Text("Casco Antiguo".to_string()))
        );
        assert_eq!(record.get(COL_LATITUDE), Some(&FeatureValue::Number(37.39)));
    }

    #[test]
    fn validate_rejects_out_of_range_fields() {
        assert!(sample_query().validate().is_ok());

        let mut q = sample_query();
        q.minimum_nights = 0;
        assert!(q.validate().unwrap_err().contains("minimum_nights"));

        let mut q = sample_query();
        q.availability_365 = 366;
        assert!(q.validate().unwrap_err().contains("availability_365"));

        let mut q = sample_query();
        q.calculated_host_listings_count = 0;
        assert!(q.validate().is_err());

        let mut q = sample_query();
        q.reviews_per_month = -0.1;
        assert!(q.validate().is_err());

        let mut q = sample_query();
        q.latitude = f64::NAN;
        assert!(q.validate().is_err());
    }

    #[test]
    fn label_mapping_is_total_over_binary_classes() {
        assert_eq!(PriceLabel::from_class(1), PriceLabel::HighPrice);
        assert_eq!(PriceLabel::from_class(0), PriceLabel::LowPrice);
        assert_eq!(PriceLabel::HighPrice.to_string(), "High Price");
        assert_eq!(PriceLabel::LowPrice.to_string(), "Low Price");
    }

    #[test]
    fn sentence_uses_one_decimal() {
        let result = InferenceResult {
            class: 1,
            label: PriceLabel::HighPrice,
            confidence: 73.0,
        };
        assert_eq!(
            result.sentence(),
            "There is a 73.0% probability that this listing will be High Price."
        );
    }
}
