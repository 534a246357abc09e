//! CLI interface for fieldops.
//!
//! Non-interactive: arguments in, structured output out. Orders are read
//! from a JSON snapshot file exported from the portal's store; nothing
//! here writes back.
//!
//! - `fieldops phase list|next|prev` — an order's fulfillment sequence.
//! - `fieldops day <date>` — the full dispatch schedule for one date.

mod format;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use jiff::civil::Date;

use crate::config::DispatchConfig;
use crate::gateway::{NominatimGeocoder, OsrmRouter};
use crate::model::Order;
use crate::{phase, schedule};

/// fieldops — phase tracking and field-team dispatch for event orders.
#[derive(Debug, Parser)]
#[command(name = "fieldops", after_long_help = WORKFLOW_HELP)]
pub struct Cli {
    /// Dispatch config file. Defaults to `~/.fieldops/config.toml`.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

const WORKFLOW_HELP: &str = r#"Workflow: planning a delivery day
  1. Export the day's orders from the portal to orders.json
  2. fieldops phase list --orders orders.json --order ORD-1042
  3. fieldops day 2026-09-05 --orders orders.json
     -> per-team itineraries plus any schedule conflicts
  4. fieldops day 2026-09-05 --orders orders.json --json > report.json"#;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show or step an order's fulfillment phases.
    Phase {
        #[command(subcommand)]
        command: PhaseCommand,
    },

    /// Build the dispatch schedule for one date: team itineraries,
    /// travel times, and schedule conflicts.
    Day {
        /// The calendar date, e.g. 2026-09-05.
        date: Date,

        /// Orders snapshot (JSON array of orders).
        #[arg(long)]
        orders: PathBuf,

        /// Emit the full report as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum PhaseCommand {
    /// List the phases this order passes through, marking its status.
    List {
        /// Orders snapshot (JSON array of orders).
        #[arg(long)]
        orders: PathBuf,

        /// Order number.
        #[arg(long)]
        order: String,
    },

    /// Print the phase after the order's current status.
    Next {
        #[arg(long)]
        orders: PathBuf,

        #[arg(long)]
        order: String,
    },

    /// Print the phase before the order's current status.
    Prev {
        #[arg(long)]
        orders: PathBuf,

        #[arg(long)]
        order: String,
    },
}

/// Run the CLI, returning an error message on failure.
pub async fn run() -> Result<(), String> {
    let cli = Cli::parse();

    match cli.command {
        Command::Phase { command } => match command {
            PhaseCommand::List { orders, order } => cmd_phase_list(&orders, &order),
            PhaseCommand::Next { orders, order } => cmd_phase_step(&orders, &order, true),
            PhaseCommand::Prev { orders, order } => cmd_phase_step(&orders, &order, false),
        },
        Command::Day { date, orders, json } => {
            let config = DispatchConfig::load(cli.config.as_deref())?;
            cmd_day(date, &orders, &config, json).await
        }
    }
}

fn cmd_phase_list(orders_path: &Path, number: &str) -> Result<(), String> {
    let orders = load_orders(orders_path)?;
    let order = find_order(&orders, number)?;

    for p in phase::required_phases(&order.config) {
        let marker = if p == order.status { "*" } else { " " };
        println!("{marker} {p}");
    }
    Ok(())
}

fn cmd_phase_step(orders_path: &Path, number: &str, forward: bool) -> Result<(), String> {
    let orders = load_orders(orders_path)?;
    let order = find_order(&orders, number)?;

    let adjacent = if forward {
        phase::next_phase(&order.config, order.status)
    } else {
        phase::previous_phase(&order.config, order.status)
    };
    println!("{adjacent}");
    Ok(())
}

async fn cmd_day(
    date: Date,
    orders_path: &Path,
    config: &DispatchConfig,
    json: bool,
) -> Result<(), String> {
    let orders = load_orders(orders_path)?;

    let geocoder =
        NominatimGeocoder::new(&config.gateways).map_err(|e| format!("geocoder: {e}"))?;
    let router = OsrmRouter::new(&config.gateways).map_err(|e| format!("router: {e}"))?;

    let report = schedule::build_day(date, &orders, config, Arc::new(geocoder), Arc::new(router))
        .await
        .map_err(|e| e.to_string())?;

    if json {
        let out = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("failed to serialize report: {e}"))?;
        println!("{out}");
    } else {
        print!("{}", format::format_report(&report, config));
    }
    Ok(())
}

fn load_orders(path: &Path) -> Result<Vec<Order>, String> {
    let contents =
        fs::read_to_string(path).map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    serde_json::from_str(&contents)
        .map_err(|e| format!("invalid orders file {}: {e}", path.display()))
}

fn find_order<'a>(orders: &'a [Order], number: &str) -> Result<&'a Order, String> {
    orders
        .iter()
        .find(|o| o.number == number)
        .ok_or_else(|| format!("no order {number} in the snapshot"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_and_finds_orders() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("orders.json");
        fs::write(
            &path,
            r#"[
                {"number": "ORD-1", "orderSource": "sales"},
                {"number": "ORD-2", "orderSource": "ad-hoc", "requiresSetup": true}
            ]"#,
        )
        .unwrap();

        let orders = load_orders(&path).unwrap();
        assert_eq!(orders.len(), 2);
        assert!(find_order(&orders, "ORD-2").is_ok());
        assert!(find_order(&orders, "ORD-9").unwrap_err().contains("ORD-9"));
    }

    #[test]
    fn rejects_malformed_snapshot() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("orders.json");
        fs::write(&path, "not json").unwrap();
        assert!(load_orders(&path).unwrap_err().contains("invalid orders file"));
    }
}
