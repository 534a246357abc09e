//! Phase sequencing: which phases an order passes through, and how its
//! status moves between them.
//!
//! Sales orders follow one fixed sequence; ad-hoc orders opt into phases
//! per order. Both directions of traversal are derived from the same
//! required-phase list, so `next_phase` and `previous_phase` are inverses
//! by construction over the reachable set.

use crate::model::{OrderConfig, Phase};

/// The ordered list of phases this order must pass through.
///
/// Sales: scheduling, planning, procurement, packing, setting-up,
/// dismantling (when required), invoice, completed.
///
/// Ad-hoc: scheduling, then each opted-in phase in fixed precedence
/// (packing, setting-up, dismantling, other-adhoc), then invoice and
/// completed. Procurement always follows packing — packing implies
/// something to procure — and appears nowhere else.
pub fn required_phases(config: &OrderConfig) -> Vec<Phase> {
    let mut phases = vec![Phase::Scheduling];

    match *config {
        OrderConfig::Sales { dismantle_required } => {
            phases.extend([
                Phase::Planning,
                Phase::Procurement,
                Phase::Packing,
                Phase::SettingUp,
            ]);
            if dismantle_required {
                phases.push(Phase::Dismantling);
            }
        }
        OrderConfig::AdHoc {
            requires_packing,
            requires_setup,
            requires_dismantle,
            requires_other_adhoc,
        } => {
            if requires_packing {
                phases.extend([Phase::Packing, Phase::Procurement]);
            }
            if requires_setup {
                phases.push(Phase::SettingUp);
            }
            if requires_dismantle {
                phases.push(Phase::Dismantling);
            }
            if requires_other_adhoc {
                phases.push(Phase::OtherAdhoc);
            }
        }
    }

    phases.extend([Phase::Invoice, Phase::Completed]);
    phases
}

/// Whether `phase` is part of this order's sequence.
pub fn is_phase_required(config: &OrderConfig, phase: Phase) -> bool {
    required_phases(config).contains(&phase)
}

/// The phase after `current` for this order.
///
/// Transitions are best-effort: when `current` is not in the order's
/// sequence, or is already the last phase, `current` comes back unchanged.
pub fn next_phase(config: &OrderConfig, current: Phase) -> Phase {
    step(config, current, 1)
}

/// The phase before `current` for this order. Structural inverse of
/// [`next_phase`]: for every reachable `p`,
/// `previous_phase(c, next_phase(c, p)) == p`.
pub fn previous_phase(config: &OrderConfig, current: Phase) -> Phase {
    step(config, current, -1)
}

fn step(config: &OrderConfig, current: Phase, offset: isize) -> Phase {
    let phases = required_phases(config);
    let Some(index) = phases.iter().position(|&p| p == current) else {
        return current;
    };
    let neighbor = index
        .checked_add_signed(offset)
        .and_then(|i| phases.get(i).copied());
    neighbor.unwrap_or(current)
}
