//! Classification pipelines.
//!
//! Front-ends only ever see the `Classifier` trait; the concrete artifact
//! format lives behind it and can be swapped without touching form logic.

pub mod classifier;
pub mod pipeline;

pub use classifier::*;
pub use pipeline::*;
