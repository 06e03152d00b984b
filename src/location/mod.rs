mod countries;
mod resolver;

pub use resolver::{HttpGeocoder, ResolvedLocation, ReverseGeocoder, DEFAULT_GEOCODE_TIMEOUT};
