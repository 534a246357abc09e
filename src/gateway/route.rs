//! OSRM-style drive routing over HTTP.

use std::fmt::Write as _;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{GatewayError, Router};
use crate::config::GatewayConfig;
use crate::model::{Coordinates, RouteLeg, RouteSummary};

/// HTTP router against an OSRM-compatible endpoint, drive profile.
pub struct OsrmRouter {
    client: reqwest::Client,
    base_url: String,
}

impl OsrmRouter {
    /// Build a router for the configured endpoint.
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("fieldops/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GatewayError::Unavailable(format!("http client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.route_base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Router for OsrmRouter {
    async fn route(&self, waypoints: &[Coordinates]) -> Result<RouteSummary, GatewayError> {
        if waypoints.len() < 2 {
            return Err(GatewayError::BadResponse(format!(
                "route needs at least two waypoints, got {}",
                waypoints.len()
            )));
        }

        // OSRM wants lon,lat pairs joined with semicolons in the path.
        let mut coords = String::new();
        for (i, w) in waypoints.iter().enumerate() {
            if i > 0 {
                coords.push(';');
            }
            let _ = write!(coords, "{},{}", w.lon, w.lat);
        }

        let url = format!("{}/route/v1/driving/{coords}", self.base_url);
        debug!(waypoints = waypoints.len(), "routing");

        let response = self
            .client
            .get(&url)
            .query(&[("overview", "full"), ("geometries", "geojson")])
            .send()
            .await
            .map_err(|e| GatewayError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Unavailable(format!("{url} returned {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Unavailable(e.to_string()))?;
        parse_route_body(&body)
    }
}

#[derive(Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
    #[serde(default)]
    legs: Vec<OsrmLeg>,
    geometry: Option<OsrmGeometry>,
}

#[derive(Deserialize)]
struct OsrmLeg {
    distance: f64,
    duration: f64,
}

/// GeoJSON LineString: coordinates as `[lon, lat]` pairs.
#[derive(Deserialize)]
struct OsrmGeometry {
    #[serde(default)]
    coordinates: Vec<[f64; 2]>,
}

fn parse_route_body(body: &str) -> Result<RouteSummary, GatewayError> {
    let parsed: OsrmResponse =
        serde_json::from_str(body).map_err(|e| GatewayError::BadResponse(e.to_string()))?;

    if parsed.code != "Ok" {
        return Err(GatewayError::BadResponse(format!("router said {:?}", parsed.code)));
    }
    let Some(route) = parsed.routes.into_iter().next() else {
        return Err(GatewayError::BadResponse("no route in response".to_string()));
    };

    Ok(RouteSummary {
        distance_meters: route.distance,
        duration_seconds: route.duration,
        legs: route
            .legs
            .into_iter()
            .map(|l| RouteLeg { distance_meters: l.distance, duration_seconds: l.duration })
            .collect(),
        geometry: route
            .geometry
            .map(|g| {
                g.coordinates
                    .into_iter()
                    .map(|[lon, lat]| Coordinates { lat, lon })
                    .collect()
            })
            .unwrap_or_default(),
    })
}
