//! Journey building: one team's door-to-door itinerary for one day.
//!
//! Takes the team's tasks, resolves every site to coordinates, routes the
//! full hub → sites → hub chain, and derives arrival/departure times at
//! every stop. All-or-nothing: a single unresolvable address or routing
//! failure fails the whole journey for that team and day.

use futures::future::try_join_all;

use crate::config::DispatchConfig;
use crate::gateway::{GatewayError, Geocoder, Router};
use crate::model::{
    Coordinates, RouteLeg, ScheduledTask, TeamJourney, TimeOfDay, Waypoint, WaypointStop,
    round_km, round_minutes,
};

/// Why a team's journey could not be computed.
#[derive(Debug, Clone, thiserror::Error)]
pub enum JourneyError {
    /// The geocoder was reached but found no match for this address.
    #[error("address could not be resolved: {address}")]
    UnresolvedAddress { address: String },

    /// A gateway call failed outright.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// A computed journey plus the raw route geometry for map display.
#[derive(Debug, Clone)]
pub struct BuiltJourney {
    pub journey: TeamJourney,
    pub geometry: Vec<Coordinates>,
}

/// Build one team's itinerary from its tasks for the day.
///
/// Tasks are visited in order of effective start time (stated departure,
/// else task start; tasks with neither go last). Zero tasks is a valid
/// empty journey, not an error.
pub async fn build_journey(
    tasks: Vec<ScheduledTask>,
    config: &DispatchConfig,
    geocoder: &dyn Geocoder,
    router: &dyn Router,
) -> Result<BuiltJourney, JourneyError> {
    if tasks.is_empty() {
        return Ok(BuiltJourney { journey: TeamJourney::default(), geometry: Vec::new() });
    }

    let mut tasks = tasks;
    tasks.sort_by_key(effective_start);

    // Resolve the hub and every unresolved site. Site lookups are
    // independent and run concurrently; the first failure wins.
    let hub = resolve(geocoder, &config.hub_address).await?;
    let site_coords =
        try_join_all(tasks.iter().map(|task| resolve_task(geocoder, task))).await?;
    for (task, coords) in tasks.iter_mut().zip(&site_coords) {
        task.coordinates = Some(*coords);
        // A task entered with pinned coordinates but no address gets a
        // display name by reverse lookup. Best-effort only.
        if task.site_address.is_empty()
            && let Ok(Some(place)) = geocoder.reverse(*coords).await
        {
            task.site_address = place.street_name;
        }
    }

    // One routing call over the whole chain; leg-by-leg only when the
    // provider gives no per-leg breakdown.
    let mut chain = Vec::with_capacity(tasks.len() + 2);
    chain.push(hub);
    chain.extend(site_coords.iter().copied());
    chain.push(hub);

    let summary = router.route(&chain).await?;
    let (legs, geometry) = if summary.legs.len() == chain.len() - 1 {
        (summary.legs, summary.geometry)
    } else {
        legs_pairwise(router, &chain).await?
    };

    let leg_mins: Vec<i64> = legs.iter().map(|l| leg_minutes(l, config)).collect();
    let hub_departure = hub_departure(&tasks[0], leg_mins[0], config);

    // Walk the chain, deriving each stop's times from the previous
    // departure plus travel. Stated times only anchor the two ends.
    let mut waypoints = Vec::with_capacity(chain.len());
    waypoints.push(Waypoint {
        stop: WaypointStop::Hub,
        coordinates: hub,
        arrival: hub_departure,
        departure: hub_departure,
    });

    let mut cursor = hub_departure;
    for (i, mut task) in tasks.into_iter().enumerate() {
        let inbound = &legs[i];
        let outbound = &legs[i + 1];
        task.outbound_km = round_km(inbound.distance_meters);
        task.outbound_travel_mins = leg_mins[i];
        task.return_km = round_km(outbound.distance_meters);
        task.return_travel_mins = leg_mins[i + 1];

        let arrival = cursor.plus(leg_mins[i]);
        let stated_end = parse_time(&task.end_time).or_else(|| parse_time(&task.start_time));
        let departure = stated_end.map_or(arrival, |end| end.max(arrival));

        let coordinates = task.coordinates.unwrap_or(hub);
        waypoints.push(Waypoint {
            stop: WaypointStop::Site { task },
            coordinates,
            arrival,
            departure,
        });
        cursor = departure;
    }

    let back_home = cursor.plus(*leg_mins.last().unwrap_or(&0));
    waypoints.push(Waypoint {
        stop: WaypointStop::Hub,
        coordinates: hub,
        arrival: back_home,
        departure: back_home,
    });

    Ok(BuiltJourney { journey: TeamJourney { waypoints }, geometry })
}

/// A leg's travel time in whole minutes. Some providers return distance
/// without duration; those legs are estimated at the configured
/// minutes-per-km.
fn leg_minutes(leg: &RouteLeg, config: &DispatchConfig) -> i64 {
    if leg.duration_seconds > 0.0 {
        round_minutes(leg.duration_seconds)
    } else {
        (leg.distance_meters / 1000.0 * config.minutes_per_km).round() as i64
    }
}

/// Sort key: stated departure, else task start, else last.
fn effective_start(task: &ScheduledTask) -> u32 {
    parse_time(&task.departure_time)
        .or_else(|| parse_time(&task.start_time))
        .map_or(u32::MAX, |t| u32::from(t.minutes()))
}

fn parse_time(raw: &str) -> Option<TimeOfDay> {
    raw.parse().ok()
}

/// When the team leaves the hub. Anchored to the first task's stated
/// departure; otherwise back-computed from its stated arrival, or from
/// its start time minus travel and buffer; otherwise the working day
/// opens the journey.
fn hub_departure(first: &ScheduledTask, first_leg_mins: i64, config: &DispatchConfig) -> TimeOfDay {
    if let Some(departure) = parse_time(&first.departure_time) {
        return departure;
    }
    if let Some(arrival) = parse_time(&first.arrival_time) {
        return arrival.minus(first_leg_mins);
    }
    if let Some(start) = parse_time(&first.start_time) {
        return start.minus(first_leg_mins + config.buffer_mins);
    }
    config.working_hours.start
}

async fn resolve(geocoder: &dyn Geocoder, address: &str) -> Result<Coordinates, JourneyError> {
    match geocoder.geocode(address).await? {
        Some(hit) => Ok(hit.coordinates),
        None => Err(JourneyError::UnresolvedAddress { address: address.to_string() }),
    }
}

async fn resolve_task(
    geocoder: &dyn Geocoder,
    task: &ScheduledTask,
) -> Result<Coordinates, JourneyError> {
    match task.coordinates {
        Some(coords) => Ok(coords),
        None => resolve(geocoder, &task.site_address).await,
    }
}

/// Leg-by-leg fallback: route each consecutive pair and use the pair
/// totals as that leg. Geometry is stitched from the pieces.
async fn legs_pairwise(
    router: &dyn Router,
    chain: &[Coordinates],
) -> Result<(Vec<RouteLeg>, Vec<Coordinates>), JourneyError> {
    let mut legs = Vec::with_capacity(chain.len() - 1);
    let mut geometry = Vec::new();
    for pair in chain.windows(2) {
        let summary = router.route(pair).await?;
        legs.push(RouteLeg {
            distance_meters: summary.distance_meters,
            duration_seconds: summary.duration_seconds,
        });
        geometry.extend(summary.geometry);
    }
    Ok((legs, geometry))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;

    use super::*;
    use crate::model::{Departure, GeocodedAddress, ReverseAddress, RouteSummary, TaskKind};

    struct StubGeocoder {
        known: HashMap<String, Coordinates>,
    }

    impl StubGeocoder {
        fn with(addresses: &[(&str, f64, f64)]) -> Self {
            Self {
                known: addresses
                    .iter()
                    .map(|(a, lat, lon)| ((*a).to_string(), Coordinates { lat: *lat, lon: *lon }))
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl Geocoder for StubGeocoder {
        async fn geocode(&self, address: &str) -> Result<Option<GeocodedAddress>, GatewayError> {
            Ok(self.known.get(address).map(|&coordinates| GeocodedAddress {
                coordinates,
                formatted: address.to_string(),
            }))
        }

        async fn reverse(&self, _: Coordinates) -> Result<Option<ReverseAddress>, GatewayError> {
            Ok(None)
        }
    }

    /// Returns a full per-leg breakdown: 5 km / 10 min per leg.
    struct StubRouter;

    #[async_trait]
    impl Router for StubRouter {
        async fn route(&self, waypoints: &[Coordinates]) -> Result<RouteSummary, GatewayError> {
            let n = waypoints.len() - 1;
            Ok(RouteSummary {
                distance_meters: 5000.0 * n as f64,
                duration_seconds: 600.0 * n as f64,
                legs: vec![
                    RouteLeg { distance_meters: 5000.0, duration_seconds: 600.0 };
                    n
                ],
                geometry: waypoints.to_vec(),
            })
        }
    }

    /// Totals only, no per-leg breakdown: forces the pairwise fallback.
    struct TotalsOnlyRouter;

    #[async_trait]
    impl Router for TotalsOnlyRouter {
        async fn route(&self, waypoints: &[Coordinates]) -> Result<RouteSummary, GatewayError> {
            let n = waypoints.len() - 1;
            Ok(RouteSummary {
                distance_meters: 3000.0 * n as f64,
                duration_seconds: 300.0 * n as f64,
                legs: Vec::new(),
                geometry: Vec::new(),
            })
        }
    }

    struct DownRouter;

    #[async_trait]
    impl Router for DownRouter {
        async fn route(&self, _: &[Coordinates]) -> Result<RouteSummary, GatewayError> {
            Err(GatewayError::Unavailable("connection refused".to_string()))
        }
    }

    fn task(order: &str, address: &str, departure: &str, start: &str, end: &str) -> ScheduledTask {
        ScheduledTask {
            order_number: order.to_string(),
            customer: "customer".to_string(),
            kind: TaskKind::Setup,
            team: "Team A".to_string(),
            site_address: address.to_string(),
            coordinates: None,
            origin: Departure::Hub,
            departure_time: departure.to_string(),
            arrival_time: String::new(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            outbound_km: 0.0,
            outbound_travel_mins: 0,
            return_km: 0.0,
            return_travel_mins: 0,
        }
    }

    fn config() -> DispatchConfig {
        DispatchConfig { hub_address: "hub".to_string(), ..DispatchConfig::default() }
    }

    fn geocoder() -> StubGeocoder {
        StubGeocoder::with(&[
            ("hub", 3.00, 101.50),
            ("site one", 3.10, 101.60),
            ("site two", 3.20, 101.70),
        ])
    }

    #[tokio::test]
    async fn zero_tasks_is_a_valid_empty_journey() {
        let built = build_journey(Vec::new(), &config(), &geocoder(), &StubRouter)
            .await
            .unwrap();
        assert!(built.journey.is_empty());
    }

    #[tokio::test]
    async fn builds_hub_to_hub_with_non_decreasing_times() {
        // Given out of order; "site two" starts earlier.
        let tasks = vec![
            task("ORD-2", "site one", "", "14:00", "15:00"),
            task("ORD-1", "site two", "09:00", "10:00", "11:00"),
        ];
        let built = build_journey(tasks, &config(), &geocoder(), &StubRouter)
            .await
            .unwrap();
        let journey = built.journey;

        assert_eq!(journey.waypoints.len(), 4);
        assert!(matches!(journey.waypoints[0].stop, WaypointStop::Hub));
        assert!(matches!(journey.waypoints[3].stop, WaypointStop::Hub));

        let visited: Vec<&str> =
            journey.site_tasks().map(|t| t.order_number.as_str()).collect();
        assert_eq!(visited, ["ORD-1", "ORD-2"]);

        // Hub departure anchored to the first task's stated departure.
        assert_eq!(journey.waypoints[0].departure.to_string(), "09:00");
        // 10 minutes of travel per leg.
        assert_eq!(journey.waypoints[1].arrival.to_string(), "09:10");
        // Leaves when the task ends.
        assert_eq!(journey.waypoints[1].departure.to_string(), "11:00");
        assert_eq!(journey.waypoints[2].arrival.to_string(), "11:10");
        assert_eq!(journey.waypoints[2].departure.to_string(), "15:00");
        assert_eq!(journey.waypoints[3].arrival.to_string(), "15:10");

        for pair in journey.waypoints.windows(2) {
            assert!(pair[0].departure <= pair[1].arrival);
            assert!(pair[1].arrival <= pair[1].departure);
        }

        for t in journey.site_tasks() {
            assert_eq!(t.outbound_km, 5.0);
            assert_eq!(t.outbound_travel_mins, 10);
            assert_eq!(t.return_km, 5.0);
            assert_eq!(t.return_travel_mins, 10);
        }
    }

    #[tokio::test]
    async fn hub_departure_back_computed_from_start_time() {
        // No stated departure or arrival: start 10:00 minus 10 min travel
        // minus 15 min buffer.
        let tasks = vec![task("ORD-1", "site one", "", "10:00", "11:00")];
        let built = build_journey(tasks, &config(), &geocoder(), &StubRouter)
            .await
            .unwrap();
        assert_eq!(built.journey.waypoints[0].departure.to_string(), "09:35");
    }

    #[tokio::test]
    async fn unresolved_address_fails_and_names_the_address() {
        let tasks = vec![
            task("ORD-1", "site one", "09:00", "", ""),
            task("ORD-2", "no such place", "10:00", "", ""),
        ];
        let err = build_journey(tasks, &config(), &geocoder(), &StubRouter)
            .await
            .unwrap_err();
        match err {
            JourneyError::UnresolvedAddress { address } => {
                assert_eq!(address, "no such place");
            }
            other => panic!("expected UnresolvedAddress, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn pre_resolved_coordinates_skip_geocoding() {
        let mut t = task("ORD-1", "unknown to the geocoder", "09:00", "", "10:00");
        t.coordinates = Some(Coordinates { lat: 3.10, lon: 101.60 });
        let built = build_journey(vec![t], &config(), &geocoder(), &StubRouter)
            .await
            .unwrap();
        assert_eq!(built.journey.waypoints.len(), 3);
    }

    /// Geocoder that also answers reverse lookups.
    struct ReversingGeocoder(StubGeocoder);

    #[async_trait]
    impl Geocoder for ReversingGeocoder {
        async fn geocode(&self, address: &str) -> Result<Option<GeocodedAddress>, GatewayError> {
            self.0.geocode(address).await
        }

        async fn reverse(&self, _: Coordinates) -> Result<Option<ReverseAddress>, GatewayError> {
            Ok(Some(ReverseAddress {
                street_name: "Jalan Ampang".to_string(),
                full_address: "Jalan Ampang, Kuala Lumpur".to_string(),
            }))
        }
    }

    #[tokio::test]
    async fn pinned_coordinates_without_address_get_a_street_name() {
        let mut t = task("ORD-1", "", "09:00", "", "10:00");
        t.coordinates = Some(Coordinates { lat: 3.10, lon: 101.60 });
        let built = build_journey(
            vec![t],
            &config(),
            &ReversingGeocoder(geocoder()),
            &StubRouter,
        )
        .await
        .unwrap();
        let task = built.journey.site_tasks().next().unwrap();
        assert_eq!(task.site_address, "Jalan Ampang");
    }

    #[tokio::test]
    async fn router_failure_fails_the_journey() {
        let tasks = vec![task("ORD-1", "site one", "09:00", "", "")];
        let err = build_journey(tasks, &config(), &geocoder(), &DownRouter)
            .await
            .unwrap_err();
        assert!(matches!(err, JourneyError::Gateway(GatewayError::Unavailable(_))));
    }

    /// Distances but no durations: travel time comes from minutes-per-km.
    struct DistanceOnlyRouter;

    #[async_trait]
    impl Router for DistanceOnlyRouter {
        async fn route(&self, waypoints: &[Coordinates]) -> Result<RouteSummary, GatewayError> {
            let n = waypoints.len() - 1;
            Ok(RouteSummary {
                distance_meters: 6000.0 * n as f64,
                duration_seconds: 0.0,
                legs: vec![RouteLeg { distance_meters: 6000.0, duration_seconds: 0.0 }; n],
                geometry: Vec::new(),
            })
        }
    }

    #[tokio::test]
    async fn missing_leg_durations_use_minutes_per_km() {
        let tasks = vec![task("ORD-1", "site one", "09:00", "", "10:00")];
        // Default 2.0 minutes per km over 6 km legs.
        let built = build_journey(tasks, &config(), &geocoder(), &DistanceOnlyRouter)
            .await
            .unwrap();
        let t = built.journey.site_tasks().next().unwrap();
        assert_eq!(t.outbound_travel_mins, 12);
        assert_eq!(built.journey.waypoints[1].arrival.to_string(), "09:12");
    }

    #[tokio::test]
    async fn falls_back_to_pairwise_legs_when_breakdown_missing() {
        let tasks = vec![
            task("ORD-1", "site one", "09:00", "", "10:00"),
            task("ORD-2", "site two", "11:00", "", "12:00"),
        ];
        let built = build_journey(tasks, &config(), &geocoder(), &TotalsOnlyRouter)
            .await
            .unwrap();
        // Pairwise totals become the legs: 3 km / 5 min each.
        for t in built.journey.site_tasks() {
            assert_eq!(t.outbound_km, 3.0);
            assert_eq!(t.outbound_travel_mins, 5);
        }
    }
}
