//! Fixtures shared by unit tests across modules.

use crate::domain::ListingQuery;
use crate::io::catalogue::{Catalogue, read_catalogue};
use crate::models::{CategoricalColumn, NumericColumn, PipelineArtifact, ARTIFACT_FORMAT};

pub fn sample_query() -> ListingQuery {
    ListingQuery {
        room_type: "Entire home/apt".to_string(),
        neighbourhood: "Casco Antiguo".to_string(),
        minimum_nights: 3,
        availability_365: 120,
        number_of_reviews: 30,
        reviews_per_month: 1.2,
        number_of_reviews_ltm: 10,
        calculated_host_listings_count: 1,
        latitude: 37.39,
        longitude: -5.99,
    }
}

/// Small artifact over three room types and three neighbourhoods.
pub fn sample_artifact() -> PipelineArtifact {
    let numeric = [
        ("minimum_nights", 3.0, 5.0, -0.20),
        ("availability_365", 180.0, 110.0, 0.35),
        ("number_of_reviews", 40.0, 60.0, -0.10),
        ("reviews_per_month", 1.5, 1.4, -0.15),
        ("number_of_reviews_ltm", 12.0, 15.0, 0.05),
        ("calculated_host_listings_count", 6.0, 12.0, 0.40),
        ("latitude", 37.39, 0.02, 0.10),
        ("longitude", -5.99, 0.03, -0.05),
    ];
    let mut coefficients = vec![
        // room_type
        1.10, -0.90, -1.60,
        // neighbourhood
        0.80, -0.20, -0.60,
    ];
    coefficients.extend(numeric.iter().map(|n| n.3));

    PipelineArtifact {
        format: ARTIFACT_FORMAT.to_string(),
        categorical: vec![
            CategoricalColumn {
                column: "room_type".to_string(),
                categories: vec![
                    "Entire home/apt".to_string(),
                    "Private room".to_string(),
                    "Shared room".to_string(),
                ],
            },
            CategoricalColumn {
                column: "neighbourhood".to_string(),
                categories: vec![
                    "Casco Antiguo".to_string(),
                    "Nervión".to_string(),
                    "Triana".to_string(),
                ],
            },
        ],
        numeric: numeric
            .iter()
            .map(|&(column, mean, scale, _)| NumericColumn {
                column: column.to_string(),
                mean,
                scale,
            })
            .collect(),
        coefficients,
        intercept: -0.25,
    }
}

pub const SAMPLE_CSV: &str = "\
id,neighbourhood,latitude,longitude,room_type,price
1,Triana,37.38,-6.00,Private room,40
2,Casco Antiguo,37.39,-5.99,Entire home/apt,120
3,Nervión,37.38,-5.97,Entire home/apt,95
4,Triana,37.37,-6.01,Shared room,20
";

pub fn sample_catalogue() -> Catalogue {
    read_catalogue(SAMPLE_CSV.as_bytes()).expect("fixture catalogue parses")
}
