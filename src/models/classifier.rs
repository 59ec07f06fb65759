use crate::domain::FeatureRecord;
use crate::error::InferenceError;

/// A pre-trained binary classifier over a single-row record.
///
/// Implementations are loaded once and shared read-only, hence `Send + Sync`.
pub trait Classifier: Send + Sync {
    /// Predicted class index (0 or 1 for the price classifier).
    fn predict(&self, record: &FeatureRecord) -> Result<usize, InferenceError>;

    /// Probability per class, indexed by class.
    fn predict_proba(&self, record: &FeatureRecord) -> Result<Vec<f64>, InferenceError>;
}
