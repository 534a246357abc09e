//! Dispatch configuration.
//!
//! Loaded from `~/.fieldops/config.toml` (or an explicit `--config` path).
//! Everything the scheduler would otherwise be tempted to hardcode lives
//! here and is passed in explicitly; no module reads ambient state.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::model::TimeOfDay;

/// Scheduler settings, all injected into the components that need them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DispatchConfig {
    /// The home base every journey starts and ends at.
    pub hub_address: String,
    pub working_hours: TimeWindow,
    pub lunch_window: TimeWindow,
    /// Slack added when back-computing a hub departure from a required
    /// on-site time.
    pub buffer_mins: i64,
    /// Rough travel estimate when no routed duration is available.
    pub minutes_per_km: f64,
    /// Sites farther than this from the hub get flagged.
    pub service_radius_km: f64,
    /// Longest acceptable idle wait at a site before the task starts.
    pub waiting_hours: f64,
    /// Per-inventory-item work durations, keyed by item name.
    pub item_durations: BTreeMap<String, ItemDuration>,
    /// Display colors per team, for report output.
    pub team_colors: BTreeMap<String, String>,
    pub gateways: GatewayConfig,
}

/// A `[start, end)` window within a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

/// Minutes of on-site work one unit of an item adds.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ItemDuration {
    pub setup_mins: i64,
    pub dismantle_mins: i64,
}

/// Base URLs for the external geocoding and routing providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct GatewayConfig {
    pub geocode_base_url: String,
    pub route_base_url: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            hub_address: String::new(),
            working_hours: TimeWindow {
                start: TimeOfDay::new(8, 0).unwrap_or(TimeOfDay::MIDNIGHT),
                end: TimeOfDay::new(18, 0).unwrap_or(TimeOfDay::MIDNIGHT),
            },
            lunch_window: TimeWindow {
                start: TimeOfDay::new(12, 0).unwrap_or(TimeOfDay::MIDNIGHT),
                end: TimeOfDay::new(13, 0).unwrap_or(TimeOfDay::MIDNIGHT),
            },
            buffer_mins: 15,
            minutes_per_km: 2.0,
            service_radius_km: 50.0,
            waiting_hours: 2.0,
            item_durations: BTreeMap::new(),
            team_colors: BTreeMap::new(),
            gateways: GatewayConfig::default(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            geocode_base_url: "https://nominatim.openstreetmap.org".to_string(),
            route_base_url: "https://router.project-osrm.org".to_string(),
        }
    }
}

impl DispatchConfig {
    /// Load config from the given path, or the default location.
    /// Returns an error if the file is missing or invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, String> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path().ok_or("could not determine home directory")?,
        };

        if !path.exists() {
            return Err(format!(
                "no config file found at {}\n\
                 Create one with at minimum:\n\n\
                 hub-address = \"your depot address\"",
                path.display()
            ));
        }

        let contents = fs::read_to_string(&path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?;

        let config: Self = toml::from_str(&contents)
            .map_err(|e| format!("invalid config at {}: {e}", path.display()))?;

        if config.hub_address.is_empty() {
            return Err(format!(
                "hub-address is empty in {}\n\
                 Set it to the depot address teams depart from.",
                path.display()
            ));
        }

        Ok(config)
    }

    /// The default config file path: `~/.fieldops/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".fieldops").join("config.toml"))
    }

    /// The display color for a team, falling back to a neutral default.
    pub fn team_color(&self, team: &str) -> &str {
        self.team_colors.get(team).map_or("#888888", String::as_str)
    }
}
