//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - the listing query collected by the form (`ListingQuery`)
//! - the single-row record handed to a classifier (`FeatureRecord`)
//! - prediction outputs (`PriceLabel`, `InferenceResult`)
//! - run configuration (`RunConfig`)

pub mod types;

pub use types::*;
