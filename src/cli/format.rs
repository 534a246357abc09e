//! Text rendering of the day report for terminal display.

use std::fmt::Write as _;

use crate::config::DispatchConfig;
use crate::model::{Conflict, DayReport, Severity, TeamDaySchedule, WaypointStop};

/// Render a day report: one block per team, then the conflict list.
pub(super) fn format_report(report: &DayReport, config: &DispatchConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Schedule for {}", report.date);

    if report.schedules.is_empty() {
        out.push_str("\nNo field work scheduled.\n");
        return out;
    }

    for schedule in &report.schedules {
        out.push('\n');
        out.push_str(&format_team(schedule, config));
    }

    out.push('\n');
    if report.conflicts.is_empty() {
        out.push_str("No conflicts.\n");
    } else {
        let _ = writeln!(out, "Conflicts ({}):", report.conflicts.len());
        for conflict in &report.conflicts {
            let _ = writeln!(out, "  {}", format_conflict(conflict));
        }
    }
    out
}

fn format_team(schedule: &TeamDaySchedule, config: &DispatchConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} [{}] — {} task(s)",
        schedule.team,
        config.team_color(&schedule.team),
        schedule.tasks.len()
    );

    if let Some(error) = &schedule.error {
        let _ = writeln!(out, "  ! no itinerary: {error}");
        for task in &schedule.tasks {
            let _ = writeln!(
                out,
                "    {} {} at {}",
                task.kind,
                task.order_number,
                if task.site_address.is_empty() { "(no address)" } else { &task.site_address }
            );
        }
        return out;
    }

    let Some(journey) = &schedule.journey else {
        out.push_str("  (no journey)\n");
        return out;
    };
    if journey.is_empty() {
        out.push_str("  (free day)\n");
        return out;
    }

    for waypoint in &journey.waypoints {
        match &waypoint.stop {
            WaypointStop::Hub => {
                if waypoint.arrival == waypoint.departure {
                    let _ = writeln!(out, "  {} hub", waypoint.departure);
                } else {
                    let _ = writeln!(
                        out,
                        "  {} hub (until {})",
                        waypoint.arrival, waypoint.departure
                    );
                }
            }
            WaypointStop::Site { task } => {
                let _ = writeln!(
                    out,
                    "  {}–{} {} {} at {} ({:.1} km, {} min out)",
                    waypoint.arrival,
                    waypoint.departure,
                    task.kind,
                    task.order_number,
                    task.site_address,
                    task.outbound_km,
                    task.outbound_travel_mins,
                );
            }
        }
    }
    out
}

fn format_conflict(conflict: &Conflict) -> String {
    let tag = match conflict.severity() {
        Severity::Hard => "HARD",
        Severity::Soft => "soft",
    };
    let body = match conflict {
        Conflict::DoubleBooking { team, first_order, second_order } => {
            format!("{team} double-booked: {first_order} overlaps {second_order}")
        }
        Conflict::LunchOverlap { team, order_number } => {
            format!("{team} works through lunch on {order_number}")
        }
        Conflict::OutsideWorkingHours { team, order_number } => {
            format!("{team} outside working hours on {order_number}")
        }
        Conflict::SiteContention { site_address, first_team, second_team } => {
            format!("{first_team} and {second_team} both at {site_address}")
        }
        Conflict::OutsideServiceArea { team, order_number, distance_km } => {
            format!("{team}: {order_number} site is {distance_km} km from the hub")
        }
        Conflict::ExcessiveWait { team, order_number, wait_mins } => {
            format!("{team} waits {wait_mins} min before {order_number}")
        }
    };
    format!("[{tag}] {body}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Coordinates, Departure, ScheduledTask, TaskKind, TeamJourney, Waypoint,
    };

    fn site_waypoint(order: &str, arrival: &str, departure: &str) -> Waypoint {
        Waypoint {
            stop: WaypointStop::Site {
                task: ScheduledTask {
                    order_number: order.to_string(),
                    customer: String::new(),
                    kind: TaskKind::Setup,
                    team: "Team A".to_string(),
                    site_address: "Dewan Seri Melati".to_string(),
                    coordinates: None,
                    origin: Departure::Hub,
                    departure_time: String::new(),
                    arrival_time: String::new(),
                    start_time: String::new(),
                    end_time: String::new(),
                    outbound_km: 5.0,
                    outbound_travel_mins: 10,
                    return_km: 5.0,
                    return_travel_mins: 10,
                },
            },
            coordinates: Coordinates { lat: 3.1, lon: 101.6 },
            arrival: arrival.parse().unwrap(),
            departure: departure.parse().unwrap(),
        }
    }

    fn hub_waypoint(at: &str) -> Waypoint {
        Waypoint {
            stop: WaypointStop::Hub,
            coordinates: Coordinates { lat: 3.0, lon: 101.5 },
            arrival: at.parse().unwrap(),
            departure: at.parse().unwrap(),
        }
    }

    #[test]
    fn renders_itinerary_and_conflicts() {
        let journey = TeamJourney {
            waypoints: vec![
                hub_waypoint("08:30"),
                site_waypoint("ORD-1", "08:40", "11:00"),
                hub_waypoint("11:10"),
            ],
        };
        let report = DayReport {
            date: "2026-09-05".parse().unwrap(),
            schedules: vec![TeamDaySchedule {
                team: "Team A".to_string(),
                date: "2026-09-05".parse().unwrap(),
                tasks: journey.site_tasks().cloned().collect(),
                journey: Some(journey),
                geometry: Vec::new(),
                error: None,
            }],
            conflicts: vec![Conflict::LunchOverlap {
                team: "Team A".to_string(),
                order_number: "ORD-1".to_string(),
            }],
        };

        let text = format_report(&report, &DispatchConfig::default());
        assert!(text.contains("Schedule for 2026-09-05"));
        assert!(text.contains("08:40–11:00 setup ORD-1 at Dewan Seri Melati"));
        assert!(text.contains("[soft] Team A works through lunch on ORD-1"));
    }

    #[test]
    fn errored_team_shows_raw_tasks() {
        let WaypointStop::Site { task } = site_waypoint("ORD-2", "09:00", "10:00").stop else {
            unreachable!()
        };
        let report = DayReport {
            date: "2026-09-05".parse().unwrap(),
            schedules: vec![TeamDaySchedule {
                team: "Team B".to_string(),
                date: "2026-09-05".parse().unwrap(),
                tasks: vec![task],
                journey: None,
                geometry: Vec::new(),
                error: Some("address could not be resolved: somewhere".to_string()),
            }],
            conflicts: Vec::new(),
        };

        let text = format_report(&report, &DispatchConfig::default());
        assert!(text.contains("no itinerary: address could not be resolved"));
        assert!(text.contains("setup ORD-2 at Dewan Seri Melati"));
        assert!(text.contains("No conflicts."));
    }
}
