//! External gateways: geocoding and routing providers.
//!
//! The scheduler only ever sees these two traits. The HTTP
//! implementations live in the submodules; tests substitute stubs.

mod geocode;
mod route;

use async_trait::async_trait;

pub use geocode::NominatimGeocoder;
pub use route::OsrmRouter;

use crate::model::{Coordinates, GeocodedAddress, ReverseAddress, RouteSummary};

/// A gateway call that did not produce a usable answer.
///
/// "No match" is not an error: `Geocoder::geocode` returns `Ok(None)` when
/// the provider was reached but found nothing for the address.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GatewayError {
    /// The provider could not be reached, or refused the request
    /// (transport failure, non-2xx status, misconfigured endpoint).
    #[error("gateway unavailable: {0}")]
    Unavailable(String),

    /// The provider answered, but the body was not usable.
    #[error("unusable gateway response: {0}")]
    BadResponse(String),
}

/// Resolves addresses to coordinates and back.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Forward-geocode an address. `Ok(None)` means the provider found
    /// no match.
    async fn geocode(&self, address: &str) -> Result<Option<GeocodedAddress>, GatewayError>;

    /// Reverse-geocode coordinates to a street name and full address.
    async fn reverse(
        &self,
        coordinates: Coordinates,
    ) -> Result<Option<ReverseAddress>, GatewayError>;
}

/// Computes drive routes through an ordered list of waypoints.
#[async_trait]
pub trait Router: Send + Sync {
    /// Route through `waypoints` in order. Needs at least two.
    async fn route(&self, waypoints: &[Coordinates]) -> Result<RouteSummary, GatewayError>;
}
