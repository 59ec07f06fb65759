//! Input/output helpers.
//!
//! - reference dataset loading (`catalogue`)
//! - pipeline artifact read/write (`artifact`)

pub mod artifact;
pub mod catalogue;

pub use artifact::*;
pub use catalogue::*;
