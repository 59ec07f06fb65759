//! Logistic link for binary linear classifiers.
//!
//! A binary logistic model scores a feature vector `x` as
//!
//! ```text
//! z = w·x + b
//! p(class 1) = 1 / (1 + e^-z)
//! ```
//!
//! and predicts class 1 exactly when `z > 0`.

use nalgebra::DVector;

/// Linear decision value `w·x + b`.
///
/// # Panics
/// Panics if `weights` and `x` differ in length. Callers size the feature
/// vector from the same artifact that provides the weights.
pub fn decision_value(weights: &DVector<f64>, intercept: f64, x: &DVector<f64>) -> f64 {
    weights.dot(x) + intercept
}

/// Numerically stable sigmoid.
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Largest entry of a probability vector.
///
/// Returns `None` for an empty vector or when any entry is outside `[0, 1]`
/// (NaN included).
pub fn max_probability(probs: &[f64]) -> Option<f64> {
    if probs.is_empty() || probs.iter().any(|p| !(0.0..=1.0).contains(p)) {
        return None;
    }
    probs.iter().copied().reduce(f64::max)
}

/// Express a probability as a percentage rounded to one decimal place.
///
/// The percentage is computed first and then rounded on its exact binary
/// value, so 0.5125 (stored as 51.2499..%) gives 51.2.
pub fn to_percent_1dp(p: f64) -> f64 {
    let pct = p * 100.0;
    format!("{pct:.1}").parse().unwrap_or(pct)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigmoid_is_symmetric_and_bounded() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-15);
        for z in [-800.0, -5.0, -0.3, 0.3, 5.0, 800.0] {
            let p = sigmoid(z);
            assert!((0.0..=1.0).contains(&p), "sigmoid({z}) = {p}");
            assert!((p + sigmoid(-z) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn decision_value_is_dot_plus_intercept() {
        let w = DVector::from_row_slice(&[1.0, -2.0, 0.5]);
        let x = DVector::from_row_slice(&[3.0, 1.0, 4.0]);
        assert!((decision_value(&w, 0.25, &x) - 3.25).abs() < 1e-12);
    }

    #[test]
    fn max_probability_rejects_invalid_vectors() {
        assert_eq!(max_probability(&[0.27, 0.73]), Some(0.73));
        assert_eq!(max_probability(&[]), None);
        assert_eq!(max_probability(&[0.5, f64::NAN]), None);
        assert_eq!(max_probability(&[1.2, -0.2]), None);
    }

    #[test]
    fn percent_rounds_to_one_decimal() {
        assert_eq!(to_percent_1dp(0.73456), 73.5);
        assert_eq!(to_percent_1dp(0.5), 50.0);
        assert_eq!(to_percent_1dp(1.0), 100.0);
        assert_eq!(to_percent_1dp(0.0), 0.0);
    }

    #[test]
    fn percent_rounds_the_stored_value_not_the_decimal_literal() {
        assert_eq!(to_percent_1dp(0.5125), 51.2);
        assert_eq!(to_percent_1dp(0.5135), 51.3);
        assert_eq!(to_percent_1dp(0.5195), 51.9);
    }
}
