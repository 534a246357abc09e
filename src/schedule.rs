//! Day scheduling: fan out journey building across teams, collect the
//! results, and run conflict detection over the lot.
//!
//! Each team's computation is independent: its own tasks, its own gateway
//! calls, its own failure. One team's error never takes down the batch,
//! and dropping the returned future aborts whatever is still in flight
//! while keeping nothing half-written.

use std::collections::BTreeMap;
use std::sync::Arc;

use jiff::civil::Date;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::config::DispatchConfig;
use crate::conflict::{ConflictError, detect_conflicts};
use crate::extract::extract_tasks;
use crate::gateway::{Geocoder, Router};
use crate::journey::build_journey;
use crate::model::{DayReport, Order, ScheduledTask, TeamDaySchedule};

/// Compute the full schedule report for one date.
///
/// Teams come from the orders' schedule windows for that date. A team
/// whose journey fails still appears in the report with its raw task list
/// and the error message; conflict detection runs over whatever was
/// computed.
pub async fn build_day(
    date: Date,
    orders: &[Order],
    config: &DispatchConfig,
    geocoder: Arc<dyn Geocoder>,
    router: Arc<dyn Router>,
) -> Result<DayReport, ConflictError> {
    let mut by_team: BTreeMap<String, Vec<ScheduledTask>> = BTreeMap::new();
    for order in orders {
        for task in extract_tasks(order, date, config) {
            by_team.entry(task.team.clone()).or_default().push(task);
        }
    }
    debug!(%date, teams = by_team.len(), "building day schedules");

    let mut set = JoinSet::new();
    for (team, tasks) in by_team {
        let config = config.clone();
        let geocoder = Arc::clone(&geocoder);
        let router = Arc::clone(&router);
        set.spawn(async move {
            let raw_tasks = tasks.clone();
            match build_journey(tasks, &config, geocoder.as_ref(), router.as_ref()).await {
                Ok(built) => TeamDaySchedule {
                    team,
                    date,
                    // Visit order, with travel fields filled in.
                    tasks: built.journey.site_tasks().cloned().collect(),
                    journey: Some(built.journey),
                    geometry: built.geometry,
                    error: None,
                },
                Err(e) => {
                    warn!(team, error = %e, "journey computation failed");
                    TeamDaySchedule {
                        team,
                        date,
                        tasks: raw_tasks,
                        journey: None,
                        geometry: Vec::new(),
                        error: Some(e.to_string()),
                    }
                }
            }
        });
    }

    let mut schedules = Vec::new();
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok(schedule) => schedules.push(schedule),
            // A panicked team task; surface it like any other per-team failure.
            Err(e) => warn!(error = %e, "schedule task failed to join"),
        }
    }
    schedules.sort_by(|a, b| a.team.cmp(&b.team));

    let conflicts = detect_conflicts(&schedules, config)?;
    Ok(DayReport { date, schedules, conflicts })
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::gateway::GatewayError;
    use crate::model::{
        Coordinates, EventData, GeocodedAddress, Order, OrderConfig, Phase, ReverseAddress,
        RouteLeg, RouteSummary, TaskWindow,
    };

    /// Knows every address except those containing "nowhere".
    struct MostlyKnownGeocoder;

    #[async_trait]
    impl Geocoder for MostlyKnownGeocoder {
        async fn geocode(&self, address: &str) -> Result<Option<GeocodedAddress>, GatewayError> {
            if address.contains("nowhere") {
                return Ok(None);
            }
            Ok(Some(GeocodedAddress {
                coordinates: Coordinates { lat: 3.1, lon: 101.6 },
                formatted: address.to_string(),
            }))
        }

        async fn reverse(&self, _: Coordinates) -> Result<Option<ReverseAddress>, GatewayError> {
            Ok(None)
        }
    }

    struct FlatRouter;

    #[async_trait]
    impl Router for FlatRouter {
        async fn route(&self, waypoints: &[Coordinates]) -> Result<RouteSummary, GatewayError> {
            let n = waypoints.len() - 1;
            Ok(RouteSummary {
                distance_meters: 4000.0 * n as f64,
                duration_seconds: 480.0 * n as f64,
                legs: vec![RouteLeg { distance_meters: 4000.0, duration_seconds: 480.0 }; n],
                geometry: waypoints.to_vec(),
            })
        }
    }

    fn order(number: &str, address: &str, teams: &[&str]) -> Order {
        Order {
            number: number.to_string(),
            customer: "customer".to_string(),
            status: Phase::SettingUp,
            config: OrderConfig::Sales { dismantle_required: true },
            event: EventData {
                venue_address: address.to_string(),
                setup: Some(TaskWindow {
                    date: Some("2026-09-05".parse().unwrap()),
                    teams: teams.iter().map(ToString::to_string).collect(),
                    departure_time: "08:30".to_string(),
                    start_time: "09:00".to_string(),
                    end_time: "11:00".to_string(),
                    ..TaskWindow::default()
                }),
                ..EventData::default()
            },
            items: Vec::new(),
        }
    }

    fn config() -> DispatchConfig {
        DispatchConfig { hub_address: "12 Depot Lane".to_string(), ..DispatchConfig::default() }
    }

    #[tokio::test]
    async fn one_failing_team_does_not_fail_the_batch() {
        let orders = vec![
            order("ORD-1", "Dewan Seri Melati", &["Team A"]),
            order("ORD-2", "middle of nowhere", &["Team B"]),
        ];
        let report = build_day(
            "2026-09-05".parse().unwrap(),
            &orders,
            &config(),
            Arc::new(MostlyKnownGeocoder),
            Arc::new(FlatRouter),
        )
        .await
        .unwrap();

        assert_eq!(report.schedules.len(), 2);

        let team_a = &report.schedules[0];
        assert_eq!(team_a.team, "Team A");
        assert!(team_a.journey.is_some());
        assert!(team_a.error.is_none());
        assert_eq!(team_a.tasks[0].outbound_travel_mins, 8);

        let team_b = &report.schedules[1];
        assert_eq!(team_b.team, "Team B");
        assert!(team_b.journey.is_none());
        let error = team_b.error.as_deref().unwrap();
        assert!(error.contains("middle of nowhere"), "error was: {error}");
        // The raw task list still shows up for the roster view.
        assert_eq!(team_b.tasks.len(), 1);
    }

    #[tokio::test]
    async fn no_orders_for_the_day_is_an_empty_report() {
        let orders = vec![order("ORD-1", "Dewan Seri Melati", &["Team A"])];
        let report = build_day(
            "2026-12-25".parse().unwrap(),
            &orders,
            &config(),
            Arc::new(MostlyKnownGeocoder),
            Arc::new(FlatRouter),
        )
        .await
        .unwrap();
        assert!(report.schedules.is_empty());
        assert!(report.conflicts.is_empty());
    }

    #[tokio::test]
    async fn conflicts_cover_all_computed_teams() {
        // Both teams on the same site, overlapping intervals.
        let orders = vec![order("ORD-1", "Dewan Seri Melati", &["Team A", "Team B"])];
        let mut config = config();
        config.working_hours.start = "05:00".parse().unwrap();
        config.lunch_window.start = "02:00".parse().unwrap();
        config.lunch_window.end = "02:30".parse().unwrap();

        let report = build_day(
            "2026-09-05".parse().unwrap(),
            &orders,
            &config,
            Arc::new(MostlyKnownGeocoder),
            Arc::new(FlatRouter),
        )
        .await
        .unwrap();

        assert!(report
            .conflicts
            .iter()
            .any(|c| matches!(c, crate::model::Conflict::SiteContention { .. })));
    }
}
