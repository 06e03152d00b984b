mod error;
mod ground_station;
mod parsing;
mod sample;
mod tracker;
mod trajectory;
mod types;

pub use error::TrackerError;
pub use ground_station::{GroundStation, EARTH_ROTATION_RAD_S};
pub use sample::TrackerSample;
pub use tracker::{FrequencyPlan, Tracker, TrackerMode};
pub use trajectory::propagate_sample;
pub use types::{Command, RunCommand};
