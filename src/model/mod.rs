//! Core data model for fieldops.
//!
//! Orders are the source of truth; tasks, journeys, and day schedules are
//! derived from them per scheduling view and never written back.

mod clock;
mod geo;
mod journey;
mod order;
mod phase;
mod schedule;
mod task;

pub use clock::{MalformedTime, TimeOfDay};
pub use geo::{
    Coordinates, GeocodedAddress, ReverseAddress, RouteLeg, RouteSummary, round_km, round_minutes,
};
pub use journey::{TeamJourney, Waypoint, WaypointStop};
pub use order::{Departure, EventData, LineItem, Order, OrderConfig, TaskWindow};
pub use phase::Phase;
pub use schedule::{Conflict, DayReport, Severity, TeamDaySchedule};
pub use task::{ScheduledTask, TaskKind};
