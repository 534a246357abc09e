//! Team journeys: a team's full day, hub to hub.

use serde::{Deserialize, Serialize};

use super::clock::TimeOfDay;
use super::geo::Coordinates;
use super::task::ScheduledTask;

/// A stop in a team's day.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum WaypointStop {
    /// The home base. First and last stop of every non-empty journey.
    Hub,
    /// A task site, carrying the task that put it on the route.
    Site { task: ScheduledTask },
}

/// One waypoint with its resolved position and computed timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Waypoint {
    #[serde(flatten)]
    pub stop: WaypointStop,
    pub coordinates: Coordinates,
    pub arrival: TimeOfDay,
    pub departure: TimeOfDay,
}

/// A team's door-to-door itinerary for one day.
///
/// Waypoints are time-ordered. A journey is either empty (the team has no
/// tasks that day) or starts and ends at the hub. An empty journey is a
/// valid result, distinct from a failed computation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamJourney {
    pub waypoints: Vec<Waypoint>,
}

impl TeamJourney {
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// The site tasks along the route, in visit order.
    pub fn site_tasks(&self) -> impl Iterator<Item = &ScheduledTask> {
        self.waypoints.iter().filter_map(|w| match &w.stop {
            WaypointStop::Site { task } => Some(task),
            WaypointStop::Hub => None,
        })
    }
}
