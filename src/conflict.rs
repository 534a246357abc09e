//! Conflict detection over a day's team schedules.
//!
//! Works on minutes-since-midnight, never on raw strings. A task whose
//! time fields are present but unparsable is an input error; a task whose
//! times were simply never entered has no interval and is left out of the
//! interval checks.

use crate::config::{DispatchConfig, TimeWindow};
use crate::model::{Conflict, TeamDaySchedule, TimeOfDay, WaypointStop, round_km};

/// A schedule that cannot be checked as given.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConflictError {
    /// A non-empty time field failed `HH:MM` parsing.
    #[error("malformed time {value:?} on order {order_number} ({team})")]
    MalformedTime {
        value: String,
        order_number: String,
        team: String,
    },
}

/// A task's position in the day, resolved to a comparable interval.
struct TaskInterval<'a> {
    team: &'a str,
    order_number: &'a str,
    site_address: &'a str,
    start: TimeOfDay,
    end: TimeOfDay,
}

/// Check one date's schedules against each other and the configured
/// windows.
///
/// Hard conflicts: the same team booked on two overlapping intervals.
/// Soft: lunch-window overlap, work outside the working hours, two teams
/// on the same site at the same time, sites beyond the service radius,
/// and idle waits past the configured limit.
pub fn detect_conflicts(
    schedules: &[TeamDaySchedule],
    config: &DispatchConfig,
) -> Result<Vec<Conflict>, ConflictError> {
    let mut intervals = Vec::new();
    for schedule in schedules {
        for task in &schedule.tasks {
            let start = parse_field(&task.start_time, task, &schedule.team)?;
            let end = parse_field(&task.end_time, task, &schedule.team)?;
            // No interval entered yet: nothing to compare against.
            let (Some(start), Some(end)) = (start, end) else { continue };
            intervals.push(TaskInterval {
                team: &schedule.team,
                order_number: &task.order_number,
                site_address: &task.site_address,
                start,
                end,
            });
        }
    }

    let mut conflicts = Vec::new();

    // Pairwise: same-team double bookings (hard) and cross-team site
    // contention (soft).
    for (i, a) in intervals.iter().enumerate() {
        for b in &intervals[i + 1..] {
            if !overlaps(a.start, a.end, b.start, b.end) {
                continue;
            }
            if a.team == b.team {
                conflicts.push(Conflict::DoubleBooking {
                    team: a.team.to_string(),
                    first_order: a.order_number.to_string(),
                    second_order: b.order_number.to_string(),
                });
            } else if !a.site_address.is_empty() && a.site_address == b.site_address {
                conflicts.push(Conflict::SiteContention {
                    site_address: a.site_address.to_string(),
                    first_team: a.team.to_string(),
                    second_team: b.team.to_string(),
                });
            }
        }
    }

    // Per-task window checks.
    for interval in &intervals {
        if overlaps_window(interval, config.lunch_window) {
            conflicts.push(Conflict::LunchOverlap {
                team: interval.team.to_string(),
                order_number: interval.order_number.to_string(),
            });
        }
        if interval.start < config.working_hours.start || interval.end > config.working_hours.end {
            conflicts.push(Conflict::OutsideWorkingHours {
                team: interval.team.to_string(),
                order_number: interval.order_number.to_string(),
            });
        }
    }

    // Geometry checks need a computed journey: the hub waypoint anchors
    // the service radius, and waypoint arrivals expose idle waits.
    let wait_limit_mins = (config.waiting_hours * 60.0).round() as i64;
    for schedule in schedules {
        let Some(journey) = &schedule.journey else { continue };
        let Some(hub) = journey.waypoints.first() else { continue };
        let hub_coords = hub.coordinates;

        for waypoint in &journey.waypoints {
            let WaypointStop::Site { task } = &waypoint.stop else { continue };

            if let Some(site) = task.coordinates {
                let distance_km = round_km(hub_coords.distance_km(site) * 1000.0);
                if distance_km > config.service_radius_km {
                    conflicts.push(Conflict::OutsideServiceArea {
                        team: schedule.team.clone(),
                        order_number: task.order_number.clone(),
                        distance_km,
                    });
                }
            }

            if let Ok(start) = task.start_time.parse::<TimeOfDay>() {
                let wait_mins = waypoint.arrival.until(start);
                if wait_mins > wait_limit_mins {
                    conflicts.push(Conflict::ExcessiveWait {
                        team: schedule.team.clone(),
                        order_number: task.order_number.clone(),
                        wait_mins,
                    });
                }
            }
        }
    }

    Ok(conflicts)
}

/// Half-open interval overlap: `[s1, e1)` meets `[s2, e2)`.
fn overlaps(s1: TimeOfDay, e1: TimeOfDay, s2: TimeOfDay, e2: TimeOfDay) -> bool {
    s1 < e2 && s2 < e1
}

fn overlaps_window(interval: &TaskInterval<'_>, window: TimeWindow) -> bool {
    overlaps(interval.start, interval.end, window.start, window.end)
}

fn parse_field(
    raw: &str,
    task: &crate::model::ScheduledTask,
    team: &str,
) -> Result<Option<TimeOfDay>, ConflictError> {
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse().map(Some).map_err(|_| ConflictError::MalformedTime {
        value: raw.to_string(),
        order_number: task.order_number.clone(),
        team: team.to_string(),
    })
}
