//! Orders: the source of truth everything else is derived from.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::geo::Coordinates;
use super::phase::Phase;

/// An event order, keyed by its order number.
///
/// Created at quotation conversion and mutated only through phase
/// transitions. Scheduled tasks are recomputed from the order on every
/// scheduling view, never stored back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub number: String,
    #[serde(default)]
    pub customer: String,
    #[serde(default = "default_status")]
    pub status: Phase,
    #[serde(flatten)]
    pub config: OrderConfig,
    #[serde(default)]
    pub event: EventData,
    #[serde(default)]
    pub items: Vec<LineItem>,
}

fn default_status() -> Phase {
    Phase::Scheduling
}

/// Which phases an order must pass through, selected by its source.
///
/// Exactly one variant is authoritative per order; the tag replaces the
/// legacy pair of optional flag bags that had to be cross-checked against
/// `orderSource` on every transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "orderSource", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum OrderConfig {
    /// Converted from a sales quotation: the full fixed sequence.
    Sales {
        /// Whether the dismantling phase is part of this order.
        /// Absent on older records, which always dismantled.
        #[serde(default = "default_true")]
        dismantle_required: bool,
    },

    /// Booked directly: phases are opted into per order.
    AdHoc {
        #[serde(default)]
        requires_packing: bool,
        #[serde(default)]
        requires_setup: bool,
        #[serde(default)]
        requires_dismantle: bool,
        /// Records written before the other-adhoc rename used
        /// `requiresPickup`; resolved here, once, at deserialization.
        #[serde(default, alias = "requiresPickup")]
        requires_other_adhoc: bool,
    },
}

fn default_true() -> bool {
    true
}

/// Event-level schedule data: the site and the field-work windows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventData {
    /// The event site address. Individual windows may override it.
    #[serde(default)]
    pub venue_address: String,
    /// Pre-resolved venue coordinates, when a previous view geocoded them.
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub setup: Option<TaskWindow>,
    #[serde(default)]
    pub dismantle: Option<TaskWindow>,
    #[serde(default)]
    pub other_adhoc: Option<TaskWindow>,
}

/// One scheduled block of field work on an order.
///
/// Time fields are raw `HH:MM` strings exactly as entered on the form;
/// parsing and validation happen downstream. Missing fields stay empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskWindow {
    #[serde(default)]
    pub date: Option<Date>,
    #[serde(default)]
    pub teams: Vec<String>,
    #[serde(default)]
    pub departure_time: String,
    #[serde(default)]
    pub arrival_time: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub origin: Departure,
    /// Site address override; falls back to the event venue.
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

/// Where a team departs from for a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum Departure {
    /// The fixed home base.
    #[default]
    Hub,
    /// Somewhere else, e.g. straight from a supplier.
    Other { address: String },
}

/// An inventory line on the order, used to estimate task durations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}
