mod client;
mod error;
mod sample;

pub use client::{TelemetryClient, TelemetrySource, DEFAULT_FETCH_TIMEOUT};
pub use error::FetchError;
pub use sample::{TelemetrySample, Visibility};
