use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::error::FetchError;
use super::sample::{TelemetrySample, Visibility};

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Source of current telemetry for the tracked object.
///
/// The production impl is [`TelemetryClient`]; the tick pipeline only
/// depends on this trait so it can be exercised without a network.
pub trait TelemetrySource: Send + Sync {
    fn fetch(&self) -> impl Future<Output = Result<TelemetrySample, FetchError>> + Send;
}

/// Wire shape of the telemetry endpoint. Only the required fields are
/// deserialized; everything else the API sends is ignored.
#[derive(Deserialize)]
struct RawTelemetry {
    latitude: f64,
    longitude: f64,
    altitude: f64,
    velocity: f64,
    visibility: Visibility,
    timestamp: Option<i64>,
}

pub struct TelemetryClient {
    http: reqwest::Client,
    url: String,
}

impl TelemetryClient {
    pub fn new(url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, url })
    }
}

impl TelemetrySource for TelemetryClient {
    async fn fetch(&self) -> Result<TelemetrySample, FetchError> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        parse_telemetry(&bytes, Utc::now())
    }
}

/// Decode one telemetry response body. `received_at` stands in for the
/// observation time when the body carries no usable timestamp.
fn parse_telemetry(bytes: &[u8], received_at: DateTime<Utc>) -> Result<TelemetrySample, FetchError> {
    let raw: RawTelemetry =
        serde_json::from_slice(bytes).map_err(|e| FetchError::Parse(e.to_string()))?;

    let observed_at = raw
        .timestamp
        .and_then(|t| DateTime::from_timestamp(t, 0))
        .unwrap_or(received_at);

    Ok(TelemetrySample {
        latitude_deg: raw.latitude,
        longitude_deg: raw.longitude,
        altitude_km: raw.altitude,
        velocity_km_h: raw.velocity,
        visibility: raw.visibility,
        observed_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_response_and_ignores_extra_fields() {
        let body = r#"{
            "name": "iss",
            "id": 25544,
            "latitude": 50.11496269845,
            "longitude": 118.07900427317,
            "altitude": 408.05526028199,
            "velocity": 27635.971970874,
            "visibility": "daylight",
            "footprint": 4446.1877699772,
            "timestamp": 1364069476,
            "daynum": 2456375.3411574,
            "solar_lat": 1.3327003598631,
            "solar_lon": 238.78610691196,
            "units": "kilometers"
        }"#;

        let sample = parse_telemetry(body.as_bytes(), Utc::now()).unwrap();
        assert!((sample.latitude_deg - 50.11496269845).abs() < 1e-9);
        assert!((sample.longitude_deg - 118.07900427317).abs() < 1e-9);
        assert!((sample.altitude_km - 408.05526028199).abs() < 1e-9);
        assert!((sample.velocity_km_h - 27635.971970874).abs() < 1e-9);
        assert_eq!(sample.visibility, Visibility::Daylight);
        assert_eq!(sample.observed_at.timestamp(), 1364069476);
    }

    #[test]
    fn missing_required_field_is_a_parse_error() {
        let body = r#"{"latitude": 1.0, "longitude": 2.0, "altitude": 400.0, "visibility": "visible"}"#;
        let err = parse_telemetry(body.as_bytes(), Utc::now()).unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }

    #[test]
    fn non_numeric_field_is_a_parse_error() {
        let body = r#"{"latitude": "north", "longitude": 2.0, "altitude": 400.0, "velocity": 27000.0, "visibility": "visible"}"#;
        let err = parse_telemetry(body.as_bytes(), Utc::now()).unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }

    #[test]
    fn non_json_body_is_a_parse_error() {
        let err = parse_telemetry(b"<html>502</html>", Utc::now()).unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }

    #[test]
    fn missing_timestamp_falls_back_to_receipt_time() {
        let body = r#"{"latitude": 1.0, "longitude": 2.0, "altitude": 400.0, "velocity": 27000.0, "visibility": "eclipsed"}"#;
        let received = Utc::now();
        let sample = parse_telemetry(body.as_bytes(), received).unwrap();
        assert_eq!(sample.observed_at, received);
    }
}
