use chrono::DateTime;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Whether the tracked object is in direct sunlight, observable from the
/// ground at night, or in the Earth's shadow. Values the upstream API adds
/// later deserialize as `Unknown` instead of failing the whole sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Visibility {
    Daylight,
    Visible,
    Eclipsed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct TelemetrySample {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_km: f64,
    pub velocity_km_h: f64,
    pub visibility: Visibility,
    pub observed_at: DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visibility_parses_known_values() {
        let vis: Visibility = serde_json::from_str("\"daylight\"").unwrap();
        assert_eq!(vis, Visibility::Daylight);
        let vis: Visibility = serde_json::from_str("\"eclipsed\"").unwrap();
        assert_eq!(vis, Visibility::Eclipsed);
    }

    #[test]
    fn visibility_maps_unexpected_values_to_unknown() {
        let vis: Visibility = serde_json::from_str("\"penumbral\"").unwrap();
        assert_eq!(vis, Visibility::Unknown);
    }

    #[test]
    fn visibility_displays_lowercase() {
        assert_eq!(Visibility::Daylight.to_string(), "daylight");
        assert_eq!(Visibility::Unknown.to_string(), "unknown");
    }
}
