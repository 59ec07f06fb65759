//! Text formatting for `lp predict` and `lp catalogue`.
//!
//! Kept apart from the inference code so output changes stay local.

use crate::domain::{InferenceResult, ListingQuery};
use crate::geo::SEVILLA_BOUNDS;
use crate::io::Catalogue;

/// Human-readable prediction report.
pub fn format_prediction(query: &ListingQuery, result: &InferenceResult) -> String {
    let mut out = String::new();

    out.push_str("=== lp - Airbnb Price Classification in Sevilla ===\n");
    out.push_str(&format!(
        "Listing: {} in {} @ ({:.5}, {:.5})\n",
        query.room_type, query.neighbourhood, query.latitude, query.longitude
    ));
    out.push_str(&format!(
        "Stay: min {} night(s) | available {} day(s)/yr | host listings {}\n",
        query.minimum_nights, query.availability_365, query.calculated_host_listings_count
    ));
    out.push_str(&format!(
        "Reviews: {} total | {:.1}/month | {} last 12 months\n",
        query.number_of_reviews, query.reviews_per_month, query.number_of_reviews_ltm
    ));
    if !SEVILLA_BOUNDS.contains(query.latitude, query.longitude) {
        out.push_str("Note: coordinates are outside the Sevilla map area.\n");
    }

    out.push_str("\nPrediction Result:\n");
    out.push_str(&format!("{}\n", result.label));
    out.push_str(&result.sentence());
    out
}

/// Catalogue listing with the form defaults.
pub fn format_catalogue(catalogue: &Catalogue) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Reference rows: {} | listings with coordinates: {}\n",
        catalogue.rows_read,
        catalogue.listings.len()
    ));
    out.push_str(&format!(
        "Default location: latitude {:.5}, longitude {:.5}\n",
        catalogue.mean_latitude, catalogue.mean_longitude
    ));

    out.push_str(&format!("\nNeighbourhoods ({}):\n", catalogue.neighbourhoods.len()));
    for n in &catalogue.neighbourhoods {
        out.push_str(&format!("  {n}\n"));
    }

    out.push_str(&format!("\nRoom types ({}):\n", catalogue.room_types.len()));
    for r in &catalogue.room_types {
        out.push_str(&format!("  {r}\n"));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PriceLabel;
    use crate::test_support::{sample_catalogue, sample_query};

    #[test]
    fn prediction_report_names_label_and_percent() {
        let result = InferenceResult {
            class: 0,
            label: PriceLabel::LowPrice,
            confidence: 81.3,
        };
        let text = format_prediction(&sample_query(), &result);
        assert!(text.contains("Entire home/apt in Casco Antiguo"));
        assert!(text.contains("\nLow Price\n"));
        assert!(text.ends_with("There is a 81.3% probability that this listing will be Low Price."));
        assert!(!text.contains("outside"));
    }

    #[test]
    fn prediction_report_flags_far_coordinates() {
        let mut q = sample_query();
        q.latitude = 40.4;
        let result = InferenceResult {
            class: 1,
            label: PriceLabel::HighPrice,
            confidence: 60.0,
        };
        assert!(format_prediction(&q, &result).contains("outside the Sevilla map area"));
    }

    #[test]
    fn catalogue_report_lists_values() {
        let text = format_catalogue(&sample_catalogue());
        assert!(text.contains("Neighbourhoods (3):"));
        assert!(text.contains("  Nervión\n"));
        assert!(text.contains("Room types (3):"));
    }
}
