//! Scheduled tasks: one unit of field work, derived from an order.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::geo::Coordinates;
use super::order::Departure;

/// The kind of field work a task represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskKind {
    Setup,
    Dismantle,
    OtherAdhoc,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Setup => "setup",
            Self::Dismantle => "dismantle",
            Self::OtherAdhoc => "other-adhoc",
        })
    }
}

/// One unit of field work for one team at one site.
///
/// Derived from an order's schedule windows on every scheduling view and
/// never persisted. Time fields are the raw `HH:MM` strings from the
/// order; travel fields are filled in by the journey builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledTask {
    pub order_number: String,
    pub customer: String,
    pub kind: TaskKind,
    pub team: String,
    pub site_address: String,
    /// Resolved site coordinates; `None` until geocoded.
    pub coordinates: Option<Coordinates>,
    pub origin: Departure,
    pub departure_time: String,
    pub arrival_time: String,
    pub start_time: String,
    pub end_time: String,
    /// Travel into the site, filled by the journey builder.
    #[serde(default)]
    pub outbound_km: f64,
    #[serde(default)]
    pub outbound_travel_mins: i64,
    /// Travel out of the site, filled by the journey builder.
    #[serde(default)]
    pub return_km: f64,
    #[serde(default)]
    pub return_travel_mins: i64,
}
