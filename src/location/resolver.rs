use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::countries::country_name;
use crate::telemetry::FetchError;

/// Shorter than the telemetry timeout: the lookup is a secondary
/// enrichment and must not stall the tick longer than the fetch itself.
pub const DEFAULT_GEOCODE_TIMEOUT: Duration = Duration::from_secs(6);

const FALLBACK_LABEL: &str = "Ocean";
const LABEL_COLOR: &str = "red";

/// Human-readable place label for a coordinate. Recomputed every tick,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct ResolvedLocation {
    pub label: String,
    pub color_hint: String,
}

impl ResolvedLocation {
    pub fn fallback() -> Self {
        Self {
            label: FALLBACK_LABEL.to_string(),
            color_hint: LABEL_COLOR.to_string(),
        }
    }
}

/// Reverse geocoding seam for the tick pipeline.
///
/// `resolve` is total: implementations must degrade to
/// [`ResolvedLocation::fallback`] on any internal failure instead of
/// surfacing an error.
pub trait ReverseGeocoder: Send + Sync {
    fn resolve(&self, lat: f64, lon: f64) -> impl Future<Output = ResolvedLocation> + Send;
}

#[derive(Deserialize)]
struct RawCoordinates {
    country_code: Option<String>,
}

pub struct HttpGeocoder {
    http: reqwest::Client,
    base_url: String,
}

impl HttpGeocoder {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url })
    }

    async fn lookup(&self, lat: f64, lon: f64) -> Result<Option<String>, FetchError> {
        let url = format!("{}/{},{}", self.base_url, lat, lon);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http(status.as_u16()));
        }

        let raw: RawCoordinates = response
            .json()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))?;

        Ok(raw.country_code)
    }
}

impl ReverseGeocoder for HttpGeocoder {
    async fn resolve(&self, lat: f64, lon: f64) -> ResolvedLocation {
        match self.lookup(lat, lon).await {
            Ok(code) => location_for_code(code.as_deref()),
            Err(e) => {
                log::debug!("reverse geocode failed, using fallback: {}", e);
                ResolvedLocation::fallback()
            }
        }
    }
}

/// `"??"` is the endpoint's own marker for open water; anything the
/// country table does not know gets the same treatment.
fn location_for_code(code: Option<&str>) -> ResolvedLocation {
    let name = code
        .filter(|c| !c.is_empty() && *c != "??")
        .and_then(country_name);

    match name {
        Some(name) => ResolvedLocation {
            label: name.to_string(),
            color_hint: LABEL_COLOR.to_string(),
        },
        None => ResolvedLocation::fallback(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_code_resolves_to_country_name() {
        let loc = location_for_code(Some("JP"));
        assert_eq!(loc.label, "Japan");
        assert_eq!(loc.color_hint, "red");
    }

    #[test]
    fn lowercase_code_still_resolves() {
        let loc = location_for_code(Some("fr"));
        assert_eq!(loc.label, "France");
    }

    #[test]
    fn question_marks_mean_ocean() {
        assert_eq!(location_for_code(Some("??")), ResolvedLocation::fallback());
    }

    #[test]
    fn absent_and_empty_codes_mean_ocean() {
        assert_eq!(location_for_code(None), ResolvedLocation::fallback());
        assert_eq!(location_for_code(Some("")), ResolvedLocation::fallback());
    }

    #[test]
    fn unrecognized_code_means_ocean() {
        assert_eq!(location_for_code(Some("ZZ")), ResolvedLocation::fallback());
    }

    #[test]
    fn fallback_is_ocean_red() {
        let loc = ResolvedLocation::fallback();
        assert_eq!(loc.label, "Ocean");
        assert_eq!(loc.color_hint, "red");
    }
}
