use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::config;

/// A resolved geographic coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoding request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("geocoding provider returned status {0}")]
    Status(u16),

    #[error("no geocoding match for {0}")]
    NoMatch(String),

    #[error("geocoding provider returned malformed coordinates")]
    MalformedCoordinates,
}

/// One candidate match from the provider. Nominatim serializes
/// coordinates as strings.
#[derive(Debug, Deserialize)]
struct Candidate {
    lat: String,
    lon: String,
}

/// HTTP client for the external geocoding provider (Nominatim-style
/// search endpoint, configured via `geocoder.base_url`).
pub struct Geocoder {
    client: reqwest::Client,
    base_url: String,
}

impl Geocoder {
    pub fn from_config() -> Result<Self, GeocodeError> {
        let cfg = &config::config().geocoder;
        let client = reqwest::Client::builder()
            .user_agent(cfg.user_agent.clone())
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: cfg.base_url.clone(),
        })
    }

    /// Resolve a postal code to a coordinate (radius search)
    pub async fn geocode_postal_code(&self, postal_code: &str) -> Result<GeoPoint, GeocodeError> {
        self.fetch(&[("postalcode", postal_code)], postal_code).await
    }

    /// Resolve a free-form address to a coordinate (bootcamp creation)
    pub async fn geocode_address(&self, address: &str) -> Result<GeoPoint, GeocodeError> {
        self.fetch(&[("q", address)], address).await
    }

    async fn fetch(
        &self,
        query: &[(&str, &str)],
        description: &str,
    ) -> Result<GeoPoint, GeocodeError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(query)
            .query(&[("format", "jsonv2"), ("limit", "1")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeocodeError::Status(response.status().as_u16()));
        }

        let candidates: Vec<Candidate> = response.json().await?;
        let first = candidates
            .first()
            .ok_or_else(|| GeocodeError::NoMatch(description.to_string()))?;
        to_point(first)
    }
}

/// Providers return a candidate list; only the first match is used.
fn to_point(candidate: &Candidate) -> Result<GeoPoint, GeocodeError> {
    let latitude = candidate
        .lat
        .parse::<f64>()
        .map_err(|_| GeocodeError::MalformedCoordinates)?;
    let longitude = candidate
        .lon
        .parse::<f64>()
        .map_err(|_| GeocodeError::MalformedCoordinates)?;
    Ok(GeoPoint {
        latitude,
        longitude,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_provider_response() {
        let body = r#"[
            {"place_id": 1, "lat": "42.3492", "lon": "-71.0999", "display_name": "Boston"},
            {"place_id": 2, "lat": "40.0000", "lon": "-70.0000", "display_name": "Elsewhere"}
        ]"#;
        let candidates: Vec<Candidate> = serde_json::from_str(body).unwrap();
        // Only the first candidate is used
        let point = to_point(&candidates[0]).unwrap();
        assert_eq!(point.latitude, 42.3492);
        assert_eq!(point.longitude, -71.0999);
    }

    #[test]
    fn empty_response_means_no_match() {
        let candidates: Vec<Candidate> = serde_json::from_str("[]").unwrap();
        assert!(candidates.first().is_none());
    }

    #[test]
    fn malformed_coordinates_are_rejected() {
        let candidate = Candidate {
            lat: "not-a-number".to_string(),
            lon: "-71.0999".to_string(),
        };
        assert!(matches!(
            to_point(&candidate),
            Err(GeocodeError::MalformedCoordinates)
        ));
    }
}
