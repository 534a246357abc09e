//! Per-team day schedules and the assembled day report.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::geo::Coordinates;
use super::journey::TeamJourney;
use super::task::ScheduledTask;

/// One team's slice of a calendar day.
///
/// Request-scoped: built for a scheduling view and thrown away. A team
/// whose journey failed still appears here with its raw task list and the
/// error in place of an itinerary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamDaySchedule {
    pub team: String,
    pub date: Date,
    pub tasks: Vec<ScheduledTask>,
    /// `None` while loading or when the journey computation failed.
    pub journey: Option<TeamJourney>,
    /// Raw route geometry from the routing gateway, for map display.
    #[serde(default)]
    pub geometry: Vec<Coordinates>,
    /// Why `journey` is absent, when it failed.
    #[serde(default)]
    pub error: Option<String>,
}

/// Severity of a detected schedule conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    /// Blocks the schedule: must be resolved before dispatch.
    Hard,
    /// Worth a look, but dispatchable.
    Soft,
}

/// A single detected problem in a day's schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "conflict", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum Conflict {
    /// The same team is booked on two overlapping task intervals.
    DoubleBooking {
        team: String,
        first_order: String,
        second_order: String,
    },
    /// A task interval overlaps the configured lunch window.
    LunchOverlap { team: String, order_number: String },
    /// A task extends outside the configured working hours.
    OutsideWorkingHours { team: String, order_number: String },
    /// Two different teams are at the same site at the same time.
    SiteContention {
        site_address: String,
        first_team: String,
        second_team: String,
    },
    /// A site lies beyond the configured service radius from the hub.
    OutsideServiceArea {
        team: String,
        order_number: String,
        distance_km: f64,
    },
    /// A team idles at a site longer than the configured waiting limit.
    ExcessiveWait {
        team: String,
        order_number: String,
        wait_mins: i64,
    },
}

impl Conflict {
    pub fn severity(&self) -> Severity {
        match self {
            Self::DoubleBooking { .. } => Severity::Hard,
            Self::LunchOverlap { .. }
            | Self::OutsideWorkingHours { .. }
            | Self::SiteContention { .. }
            | Self::OutsideServiceArea { .. }
            | Self::ExcessiveWait { .. } => Severity::Soft,
        }
    }
}

/// Everything the scheduling view needs for one date.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayReport {
    pub date: Date,
    pub schedules: Vec<TeamDaySchedule>,
    pub conflicts: Vec<Conflict>,
}
