//! Task extraction: from an order's schedule windows to atomic field tasks.
//!
//! Pure and total. Malformed or missing order fields produce tasks with
//! empty strings and unresolved coordinates; nothing here fails. Gateways
//! are never consulted — resolution happens in the journey builder.

use jiff::civil::Date;

use crate::config::DispatchConfig;
use crate::model::{Order, ScheduledTask, TaskKind, TaskWindow, TimeOfDay};

/// Derive the field tasks an order requires on `date`: one per
/// (window kind, team) combination actually scheduled for that day.
pub fn extract_tasks(order: &Order, date: Date, config: &DispatchConfig) -> Vec<ScheduledTask> {
    let windows = [
        (TaskKind::Setup, order.event.setup.as_ref()),
        (TaskKind::Dismantle, order.event.dismantle.as_ref()),
        (TaskKind::OtherAdhoc, order.event.other_adhoc.as_ref()),
    ];

    let mut tasks = Vec::new();
    for (kind, window) in windows {
        let Some(window) = window else { continue };
        if window.date != Some(date) {
            continue;
        }

        let site_address = window
            .address
            .clone()
            .unwrap_or_else(|| order.event.venue_address.clone());
        let coordinates = window.coordinates.or(order.event.coordinates);
        let end_time = effective_end_time(order, window, kind, config);

        for team in &window.teams {
            tasks.push(ScheduledTask {
                order_number: order.number.clone(),
                customer: order.customer.clone(),
                kind,
                team: team.clone(),
                site_address: site_address.clone(),
                coordinates,
                origin: window.origin.clone(),
                departure_time: window.departure_time.clone(),
                arrival_time: window.arrival_time.clone(),
                start_time: window.start_time.clone(),
                end_time: end_time.clone(),
                outbound_km: 0.0,
                outbound_travel_mins: 0,
                return_km: 0.0,
                return_travel_mins: 0,
            });
        }
    }
    tasks
}

/// The window's end time, estimated from the order's inventory when the
/// form left it blank: start plus the configured per-item minutes for
/// this kind of work. Stays empty when nothing can be estimated.
fn effective_end_time(
    order: &Order,
    window: &TaskWindow,
    kind: TaskKind,
    config: &DispatchConfig,
) -> String {
    if !window.end_time.is_empty() {
        return window.end_time.clone();
    }
    let Ok(start) = window.start_time.parse::<TimeOfDay>() else {
        return String::new();
    };

    let work_mins: i64 = order
        .items
        .iter()
        .filter_map(|item| {
            let duration = config.item_durations.get(&item.name)?;
            let per_unit = match kind {
                TaskKind::Setup => duration.setup_mins,
                TaskKind::Dismantle => duration.dismantle_mins,
                TaskKind::OtherAdhoc => return None,
            };
            Some(per_unit * i64::from(item.quantity))
        })
        .sum();

    if work_mins > 0 {
        start.plus(work_mins).to_string()
    } else {
        String::new()
    }
}
