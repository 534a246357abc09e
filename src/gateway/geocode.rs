//! Nominatim-style geocoding over HTTP.
//!
//! The wire shapes live here as private serde structs; body parsing is
//! split from the HTTP calls so it can be tested without a network.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{GatewayError, Geocoder};
use crate::config::GatewayConfig;
use crate::model::{Coordinates, GeocodedAddress, ReverseAddress};

/// HTTP geocoder against a Nominatim-compatible endpoint.
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimGeocoder {
    /// Build a geocoder for the configured endpoint.
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("fieldops/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GatewayError::Unavailable(format!("http client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.geocode_base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String, GatewayError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| GatewayError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Unavailable(format!("{url} returned {status}")));
        }
        response
            .text()
            .await
            .map_err(|e| GatewayError::Unavailable(e.to_string()))
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<GeocodedAddress>, GatewayError> {
        debug!(address, "geocoding");
        let url = format!("{}/search", self.base_url);
        let body = self
            .get_text(&url, &[("q", address), ("format", "json"), ("limit", "1")])
            .await?;
        parse_search_body(&body)
    }

    async fn reverse(
        &self,
        coordinates: Coordinates,
    ) -> Result<Option<ReverseAddress>, GatewayError> {
        let url = format!("{}/reverse", self.base_url);
        let lat = coordinates.lat.to_string();
        let lon = coordinates.lon.to_string();
        let body = self
            .get_text(&url, &[("lat", &lat), ("lon", &lon), ("format", "json")])
            .await?;
        parse_reverse_body(&body)
    }
}

/// One search hit. Nominatim serializes coordinates as strings.
#[derive(Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
    display_name: String,
}

fn parse_search_body(body: &str) -> Result<Option<GeocodedAddress>, GatewayError> {
    let hits: Vec<SearchHit> =
        serde_json::from_str(body).map_err(|e| GatewayError::BadResponse(e.to_string()))?;

    let Some(hit) = hits.into_iter().next() else {
        return Ok(None);
    };

    let lat = hit.lat.parse::<f64>();
    let lon = hit.lon.parse::<f64>();
    match (lat, lon) {
        (Ok(lat), Ok(lon)) => Ok(Some(GeocodedAddress {
            coordinates: Coordinates { lat, lon },
            formatted: hit.display_name,
        })),
        _ => Err(GatewayError::BadResponse("non-numeric coordinates".to_string())),
    }
}

#[derive(Deserialize)]
struct ReverseHit {
    display_name: Option<String>,
    #[serde(default)]
    address: ReverseFields,
}

#[derive(Deserialize, Default)]
struct ReverseFields {
    road: Option<String>,
    name: Option<String>,
    district: Option<String>,
    suburb: Option<String>,
}

fn parse_reverse_body(body: &str) -> Result<Option<ReverseAddress>, GatewayError> {
    let hit: ReverseHit =
        serde_json::from_str(body).map_err(|e| GatewayError::BadResponse(e.to_string()))?;

    // Nominatim signals "nothing here" with an error body and no name.
    let Some(full_address) = hit.display_name else {
        return Ok(None);
    };

    // Street name priority: road, then place name, then district.
    let street_name = hit
        .address
        .road
        .or(hit.address.name)
        .or(hit.address.district)
        .or(hit.address.suburb)
        .unwrap_or_else(|| "Unknown street".to_string());

    Ok(Some(ReverseAddress { street_name, full_address }))
}
