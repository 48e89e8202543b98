pub mod domain;
mod model;
mod summary;

pub use domain::{CoverageGap, Granularity, Observation};
pub use model::CoverageModel;
pub use summary::CoverageSummary;
