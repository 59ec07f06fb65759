//! Logistic pipeline: one-hot + standard scaling + binary logistic regression.
//!
//! The artifact mirrors what a typical tabular pipeline does internally:
//!
//! 1) every categorical column is one-hot encoded over a fixed category list
//!    (an unseen category is an error, never silently ignored)
//! 2) every numeric column is standardised as `(x - mean) / scale`
//! 3) the concatenated vector `[one-hot blocks..., scaled numerics...]` is
//!    scored by a logistic regression
//!
//! The schema is `PipelineArtifact`; `LogisticPipeline` is the validated,
//! ready-to-score form of it.

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::domain::{FeatureRecord, FeatureValue};
use crate::error::InferenceError;
use crate::math::{decision_value, sigmoid};
use crate::models::Classifier;

/// Format tag every artifact must carry.
pub const ARTIFACT_FORMAT: &str = "logistic-pipeline/v1";

/// One-hot encoder settings for a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalColumn {
    pub column: String,
    pub categories: Vec<String>,
}

/// Standard scaler settings for a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericColumn {
    pub column: String,
    pub mean: f64,
    pub scale: f64,
}

/// On-disk pipeline description (JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineArtifact {
    pub format: String,
    pub categorical: Vec<CategoricalColumn>,
    pub numeric: Vec<NumericColumn>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl PipelineArtifact {
    /// Length of the encoded feature vector.
    pub fn feature_len(&self) -> usize {
        self.categorical
            .iter()
            .map(|c| c.categories.len())
            .sum::<usize>()
            + self.numeric.len()
    }
}

/// Validated pipeline, ready to score records.
#[derive(Debug, Clone)]
pub struct LogisticPipeline {
    categorical: Vec<CategoricalColumn>,
    numeric: Vec<NumericColumn>,
    weights: DVector<f64>,
    intercept: f64,
}

impl LogisticPipeline {
    /// Check an artifact for internal consistency.
    ///
    /// Returns a human-readable reason on failure; the caller decides how fatal
    /// that is (it is fatal at startup).
    pub fn from_artifact(artifact: PipelineArtifact) -> Result<Self, String> {
        if artifact.format != ARTIFACT_FORMAT {
            return Err(format!(
                "unsupported artifact format '{}' (expected '{ARTIFACT_FORMAT}')",
                artifact.format
            ));
        }
        if artifact.categorical.is_empty() && artifact.numeric.is_empty() {
            return Err("artifact declares no input columns".to_string());
        }

        let mut seen = std::collections::HashSet::new();
        for name in artifact
            .categorical
            .iter()
            .map(|c| &c.column)
            .chain(artifact.numeric.iter().map(|n| &n.column))
        {
            if !seen.insert(name.as_str()) {
                return Err(format!("column `{name}` is declared twice"));
            }
        }

        for c in &artifact.categorical {
            if c.categories.is_empty() {
                return Err(format!("categorical column `{}` has no categories", c.column));
            }
        }
        for n in &artifact.numeric {
            if !(n.mean.is_finite() && n.scale.is_finite()) || n.scale == 0.0 {
                return Err(format!(
                    "numeric column `{}` needs a finite mean and a finite non-zero scale",
                    n.column
                ));
            }
        }

        let expected = artifact.feature_len();
        if artifact.coefficients.len() != expected {
            return Err(format!(
                "expected {expected} coefficients, found {}",
                artifact.coefficients.len()
            ));
        }
        if !artifact.intercept.is_finite() || artifact.coefficients.iter().any(|w| !w.is_finite()) {
            return Err("coefficients and intercept must be finite".to_string());
        }

        Ok(Self {
            weights: DVector::from_vec(artifact.coefficients),
            intercept: artifact.intercept,
            categorical: artifact.categorical,
            numeric: artifact.numeric,
        })
    }

    /// Categories the encoder for `column` accepts, if it is categorical.
    pub fn categories(&self, column: &str) -> Option<&[String]> {
        self.categorical
            .iter()
            .find(|c| c.column == column)
            .map(|c| c.categories.as_slice())
    }

    /// Names of every input column the pipeline reads.
    pub fn input_columns(&self) -> Vec<&str> {
        self.categorical
            .iter()
            .map(|c| c.column.as_str())
            .chain(self.numeric.iter().map(|n| n.column.as_str()))
            .collect()
    }

    /// Encode a record into the feature vector the regression expects.
    pub fn encode(&self, record: &FeatureRecord) -> Result<DVector<f64>, InferenceError> {
        let mut out = DVector::zeros(self.weights.len());
        let mut offset = 0usize;

        for c in &self.categorical {
            let value = match record.get(&c.column) {
                Some(FeatureValue::Text(v)) => v,
                Some(FeatureValue::Number(_)) => {
                    return Err(InferenceError::WrongType {
                        column: c.column.clone(),
                        expected: "text",
                    });
                }
                None => return Err(InferenceError::MissingColumn(c.column.clone())),
            };
            let pos = c
                .categories
                .iter()
                .position(|cat| cat == value)
                .ok_or_else(|| InferenceError::UnknownCategory {
                    column: c.column.clone(),
                    value: value.clone(),
                })?;
            out[offset + pos] = 1.0;
            offset += c.categories.len();
        }

        for n in &self.numeric {
            let value = match record.get(&n.column) {
                Some(FeatureValue::Number(v)) => *v,
                Some(FeatureValue::Text(_)) => {
                    return Err(InferenceError::WrongType {
                        column: n.column.clone(),
                        expected: "a number",
                    });
                }
                None => return Err(InferenceError::MissingColumn(n.column.clone())),
            };
            if !value.is_finite() {
                return Err(InferenceError::NonFinite(n.column.clone()));
            }
            out[offset] = (value - n.mean) / n.scale;
            offset += 1;
        }

        Ok(out)
    }

    fn decision(&self, record: &FeatureRecord) -> Result<f64, InferenceError> {
        let x = self.encode(record)?;
        let z = decision_value(&self.weights, self.intercept, &x);
        if z.is_finite() {
            Ok(z)
        } else {
            Err(InferenceError::InvalidOutput("non-finite decision value".to_string()))
        }
    }
}

impl Classifier for LogisticPipeline {
    fn predict(&self, record: &FeatureRecord) -> Result<usize, InferenceError> {
        let z = self.decision(record)?;
        Ok(usize::from(z > 0.0))
    }

    fn predict_proba(&self, record: &FeatureRecord) -> Result<Vec<f64>, InferenceError> {
        let p = sigmoid(self.decision(record)?);
        Ok(vec![1.0 - p, p])
    }
}
