//! Immediate and timed effects of caught power-ups.

use cat_bin_core::{CloseReason, Event, Modifier, PowerUpKind};
use tracing::debug;

use crate::World;

/// Applies the effect of a caught power-up.
///
/// Returns `true` when the effect closed every slot in the grid.
pub(crate) fn activate(world: &mut World, kind: PowerUpKind, out_events: &mut Vec<Event>) -> bool {
    debug!(power_up = ?kind, clock = ?world.clock, "power_up_activated");
    out_events.push(Event::PowerUpActivated { kind });

    match kind {
        PowerUpKind::Broom => {
            close_all(world, CloseReason::Swept, out_events);
            true
        }
        PowerUpKind::Clock => {
            let bonus = world.tuning.clock_bonus_secs;
            let ceiling = world.tuning.max_time_remaining_secs.max(world.time_remaining);
            world.time_remaining = world.time_remaining.saturating_add(bonus).min(ceiling);
            out_events.push(Event::TimeRemainingChanged {
                seconds: world.time_remaining,
            });
            false
        }
        PowerUpKind::Slow | PowerUpKind::Frenzy | PowerUpKind::Freeze => {
            if let Some(modifier) = kind.modifier() {
                start_modifier(world, modifier, out_events);
            }
            false
        }
        PowerUpKind::Repellent => {
            close_all(world, CloseReason::Repelled, out_events);
            start_modifier(world, Modifier::Repelled, out_events);
            true
        }
    }
}

fn start_modifier(world: &mut World, modifier: Modifier, out_events: &mut Vec<Event>) {
    let expires_at = world
        .clock
        .saturating_add(world.tuning.modifier_duration(modifier));
    world.modifiers.activate(modifier, expires_at);
    out_events.push(Event::ModifierActivated {
        modifier,
        expires_at,
    });
}

fn close_all(world: &mut World, reason: CloseReason, out_events: &mut Vec<Event>) {
    for (slot, occupant) in world.slots.close_all() {
        out_events.push(Event::SlotClosed {
            slot,
            kind: occupant.kind,
            reason,
        });
    }
}
