//! Geographic primitives shared by the gateways and the journey builder.

use serde::{Deserialize, Serialize};

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Great-circle distance to `other` in kilometers (haversine).
    ///
    /// Used only for service-radius checks and rough estimates; real
    /// travel distances come from the routing gateway.
    pub fn distance_km(self, other: Self) -> f64 {
        const EARTH_RADIUS_KM: f64 = 6371.0;

        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos() * other.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
    }
}

/// A geocoded address: coordinates plus the provider's normalized form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodedAddress {
    pub coordinates: Coordinates,
    pub formatted: String,
}

/// A reverse-geocoded location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReverseAddress {
    pub street_name: String,
    pub full_address: String,
}

/// One point-to-point segment of a route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteLeg {
    pub distance_meters: f64,
    pub duration_seconds: f64,
}

/// A routed path through an ordered list of waypoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub distance_meters: f64,
    pub duration_seconds: f64,
    /// One leg per consecutive waypoint pair, in order.
    pub legs: Vec<RouteLeg>,
    /// Path geometry for map display, as returned by the provider.
    pub geometry: Vec<Coordinates>,
}

/// Meters to display kilometers, rounded to one decimal.
pub fn round_km(meters: f64) -> f64 {
    (meters / 1000.0 * 10.0).round() / 10.0
}

/// Seconds to display minutes, rounded to the nearest whole minute.
pub fn round_minutes(seconds: f64) -> i64 {
    (seconds / 60.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_display_values() {
        assert_eq!(round_km(12_340.0), 12.3);
        assert_eq!(round_km(12_350.0), 12.4);
        assert_eq!(round_km(0.0), 0.0);
        assert_eq!(round_minutes(629.0), 10);
        assert_eq!(round_minutes(631.0), 11);
        assert_eq!(round_minutes(0.0), 0);
    }

    #[test]
    fn haversine_is_plausible() {
        // Kuala Lumpur city centre to Petaling Jaya, roughly 10 km.
        let klcc = Coordinates { lat: 3.1578, lon: 101.7123 };
        let pj = Coordinates { lat: 3.1073, lon: 101.6067 };
        let d = klcc.distance_km(pj);
        assert!((10.0..16.0).contains(&d), "got {d}");
        // Symmetric, zero at the same point.
        assert!((d - pj.distance_km(klcc)).abs() < 1e-9);
        assert!(klcc.distance_km(klcc) < 1e-9);
    }
}
