//! Shared inference logic used by both the CLI and the TUI.
//!
//! query -> one-row record -> predict + predict_proba -> label + confidence
//!
//! The front-ends only differ in how they collect the query and present the
//! result.

use crate::domain::{InferenceResult, ListingQuery, PriceLabel};
use crate::error::InferenceError;
use crate::math::{max_probability, to_percent_1dp};
use crate::models::Classifier;

/// Score one query.
///
/// Latitude and longitude are taken from the query verbatim; a map selection
/// never feeds in here directly.
pub fn classify(
    classifier: &dyn Classifier,
    query: &ListingQuery,
) -> Result<InferenceResult, InferenceError> {
    let record = query.to_record();
    let class = classifier.predict(&record)?;
    let probs = classifier.predict_proba(&record)?;

    let max = max_probability(&probs).ok_or_else(|| {
        InferenceError::InvalidOutput(format!("probabilities {probs:?}"))
    })?;

    Ok(InferenceResult {
        class,
        label: PriceLabel::from_class(class),
        confidence: to_percent_1dp(max),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FeatureRecord;
    use crate::models::LogisticPipeline;
    use crate::test_support::{sample_artifact, sample_query};

    /// Classifier with canned answers.
    struct Fixed {
        class: usize,
        probs: Vec<f64>,
    }

    impl Classifier for Fixed {
        fn predict(&self, _record: &FeatureRecord) -> Result<usize, InferenceError> {
            Ok(self.class)
        }

        fn predict_proba(&self, _record: &FeatureRecord) -> Result<Vec<f64>, InferenceError> {
            Ok(self.probs.clone())
        }
    }

    #[test]
    fn class_one_is_high_price_with_max_probability() {
        let c = Fixed {
            class: 1,
            probs: vec![0.26544, 0.73456],
        };
        let r = classify(&c, &sample_query()).unwrap();
        assert_eq!(r.label, PriceLabel::HighPrice);
        assert_eq!(r.confidence, 73.5);
    }

    #[test]
    fn class_zero_is_low_price() {
        let c = Fixed {
            class: 0,
            probs: vec![0.9, 0.1],
        };
        let r = classify(&c, &sample_query()).unwrap();
        assert_eq!(r.label, PriceLabel::LowPrice);
        assert_eq!(r.confidence, 90.0);
    }

    #[test]
    fn invalid_probability_vector_fails_the_prediction() {
        for probs in [vec![], vec![f64::NAN, 0.5], vec![1.5, -0.5]] {
            let c = Fixed { class: 1, probs };
            assert!(matches!(
                classify(&c, &sample_query()),
                Err(InferenceError::InvalidOutput(_))
            ));
        }
    }

    #[test]
    fn reference_listing_gets_exactly_one_label() {
        let pipeline = LogisticPipeline::from_artifact(sample_artifact()).unwrap();
        let r = classify(&pipeline, &sample_query()).unwrap();
        assert!(matches!(r.label, PriceLabel::HighPrice | PriceLabel::LowPrice));
        assert_eq!(r.label == PriceLabel::HighPrice, r.class == 1);
        assert!((0.0..=100.0).contains(&r.confidence));
        // One decimal place.
        assert!(((r.confidence * 10.0).round() - r.confidence * 10.0).abs() < 1e-9);
        // Binary max probability is never below one half.
        assert!(r.confidence >= 50.0);
    }

    #[test]
    fn same_query_twice_gives_same_result() {
        let pipeline = LogisticPipeline::from_artifact(sample_artifact()).unwrap();
        let q = sample_query();
        assert_eq!(classify(&pipeline, &q), classify(&pipeline, &q));
    }

    #[test]
    fn confidence_stays_in_range_across_inputs() {
        let pipeline = LogisticPipeline::from_artifact(sample_artifact()).unwrap();
        for nights in [1, 2, 30, 365] {
            for avail in [0, 90, 365] {
                let mut q = sample_query();
                q.minimum_nights = nights;
                q.availability_365 = avail;
                q.calculated_host_listings_count = nights;
                let r = classify(&pipeline, &q).unwrap();
                assert!((0.0..=100.0).contains(&r.confidence), "{r:?}");
            }
        }
    }

    #[test]
    fn unseen_category_surfaces_as_error() {
        let pipeline = LogisticPipeline::from_artifact(sample_artifact()).unwrap();
        let mut q = sample_query();
        q.room_type = "Castle".to_string();
        let err = classify(&pipeline, &q).unwrap_err();
        assert!(err.to_string().contains("Castle"));
    }
}
