mod error;
mod pass_finder;
mod tle_loader;
mod types;

pub use error::PredictError;
pub use pass_finder::predict_passes;
pub use tle_loader::TleLoader;
pub use types::Pass;

// Re-export from tracker for convenience
pub use crate::tracker::{propagate_sample, FrequencyPlan, GroundStation};
