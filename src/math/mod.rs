//! Numeric helpers: the logistic link and probability-vector checks.

pub mod logistic;

pub use logistic::*;
