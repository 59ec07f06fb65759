//! Synthetic inputs for trying the tool without the trained artifact.

pub mod demo;

pub use demo::*;
