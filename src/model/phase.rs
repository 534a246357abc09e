//! Fulfillment phases.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A named stage of order fulfillment.
///
/// Which phases an order actually passes through depends on its
/// configuration; see the phase module for the sequencing rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Scheduling,
    Planning,
    Procurement,
    Packing,
    SettingUp,
    /// Tear-down at the site. Older order records call this "returning".
    #[serde(alias = "returning")]
    Dismantling,
    OtherAdhoc,
    Invoice,
    Completed,
}

impl Phase {
    /// The kebab-case name used in order records and CLI output.
    pub fn name(self) -> &'static str {
        match self {
            Self::Scheduling => "scheduling",
            Self::Planning => "planning",
            Self::Procurement => "procurement",
            Self::Packing => "packing",
            Self::SettingUp => "setting-up",
            Self::Dismantling => "dismantling",
            Self::OtherAdhoc => "other-adhoc",
            Self::Invoice => "invoice",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduling" => Ok(Self::Scheduling),
            "planning" => Ok(Self::Planning),
            "procurement" => Ok(Self::Procurement),
            "packing" => Ok(Self::Packing),
            "setting-up" => Ok(Self::SettingUp),
            "dismantling" | "returning" => Ok(Self::Dismantling),
            "other-adhoc" => Ok(Self::OtherAdhoc),
            "invoice" => Ok(Self::Invoice),
            "completed" => Ok(Self::Completed),
            other => Err(format!("unknown phase: {other}")),
        }
    }
}
