//! Process-wide, read-only state built once at startup.

use std::sync::Arc;

use crate::domain::{COL_NEIGHBOURHOOD, COL_ROOM_TYPE, ListingQuery, RunConfig};
use crate::error::{AppError, InferenceError};
use crate::io::{Catalogue, load_catalogue, load_pipeline};
use crate::models::{Classifier, LogisticPipeline};

use super::inference::classify;

/// Loaded classifier + catalogue. Immutable after `load`.
pub struct AppContext {
    catalogue: Catalogue,
    classifier: Arc<dyn Classifier>,
}

impl AppContext {
    /// Load the model artifact, then the reference dataset.
    ///
    /// Either one missing or malformed is a startup failure.
    pub fn load(config: &RunConfig) -> Result<Self, AppError> {
        let pipeline = load_pipeline(&config.model_path)?;
        log::info!("loaded model artifact {}", config.model_path.display());

        let catalogue = load_catalogue(&config.dataset_path)?;
        log::info!("loaded reference dataset {}", config.dataset_path.display());

        warn_unknown_categories(&pipeline, &catalogue);
        Ok(Self::new(catalogue, Arc::new(pipeline)))
    }

    pub fn new(catalogue: Catalogue, classifier: Arc<dyn Classifier>) -> Self {
        Self {
            catalogue,
            classifier,
        }
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    /// Score one query against the loaded classifier.
    pub fn classify(
        &self,
        query: &ListingQuery,
    ) -> Result<crate::domain::InferenceResult, InferenceError> {
        classify(self.classifier(), query)
    }

    /// The query a fresh form starts from.
    pub fn default_query(&self) -> ListingQuery {
        let cat = &self.catalogue;
        ListingQuery::with_defaults(
            cat.room_types.first().cloned().unwrap_or_default(),
            cat.neighbourhoods.first().cloned().unwrap_or_default(),
            cat.mean_latitude,
            cat.mean_longitude,
        )
    }
}

/// Catalogue values the encoders do not know will fail at prediction time;
/// say so once at startup.
fn warn_unknown_categories(pipeline: &LogisticPipeline, catalogue: &Catalogue) {
    let checks = [
        (COL_NEIGHBOURHOOD, &catalogue.neighbourhoods),
        (COL_ROOM_TYPE, &catalogue.room_types),
    ];
    for (column, values) in checks {
        let Some(known) = pipeline.categories(column) else {
            log::warn!("model artifact has no encoder for `{column}`");
            continue;
        };
        let unknown: Vec<&str> = values
            .iter()
            .filter(|v| !known.contains(*v))
            .map(String::as_str)
            .collect();
        if !unknown.is_empty() {
            log::warn!(
                "{} `{column}` value(s) unknown to the model: {}",
                unknown.len(),
                unknown.join(", ")
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_artifact, sample_catalogue};

    fn context() -> AppContext {
        let pipeline = LogisticPipeline::from_artifact(sample_artifact()).unwrap();
        AppContext::new(sample_catalogue(), Arc::new(pipeline))
    }

    #[test]
    fn default_query_uses_first_catalogue_entries_and_means() {
        let ctx = context();
        let q = ctx.default_query();
        assert_eq!(q.neighbourhood, "Casco Antiguo");
        assert_eq!(q.room_type, "Entire home/apt");
        assert_eq!(q.minimum_nights, 3);
        assert_eq!(q.availability_365, 120);
        assert_eq!(q.number_of_reviews, 30);
        assert_eq!(q.reviews_per_month, 1.2);
        assert_eq!(q.number_of_reviews_ltm, 10);
        assert_eq!(q.calculated_host_listings_count, 1);
        assert!((q.latitude - ctx.catalogue().mean_latitude).abs() < 1e-12);
        assert!(q.validate().is_ok());
    }

    #[test]
    fn default_query_scores() {
        let ctx = context();
        let result = ctx.classify(&ctx.default_query()).unwrap();
        assert!((0.0..=100.0).contains(&result.confidence));
    }

    #[test]
    fn load_fails_on_missing_artifact() {
        let config = RunConfig {
            model_path: "missing/final_model_pipeline.json".into(),
            dataset_path: "missing/sevilla.listings.csv".into(),
            log_file: None,
        };
        let err = AppContext::load(&config).err().unwrap();
        assert_eq!(err.exit_code(), crate::error::EXIT_STARTUP);
        assert!(err.message().contains("model artifact"));
    }
}
