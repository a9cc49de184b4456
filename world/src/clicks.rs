//! Resolution of player clicks against the slot grid.

use cat_bin_core::{CloseReason, Event, Modifier, SlotId};

use crate::{power_ups, World};

/// Resolves a click on `slot`, mutating score, slots and modifiers.
///
/// Every click during play is reported with [`Event::Clicked`]. Clicks outside
/// of active play, on unknown slots or on closed slots leave the world untouched.
pub(crate) fn resolve(world: &mut World, slot: SlotId, out_events: &mut Vec<Event>) {
    if !world.status.is_playing() {
        return;
    }
    out_events.push(Event::Clicked { slot });
    let Some(occupant) = world.slots.occupant(slot) else {
        return;
    };

    if let Some(hits_remaining) = world.slots.register_hit(slot) {
        out_events.push(Event::SlotHit {
            slot,
            hits_remaining,
        });
        return;
    }

    out_events.push(Event::SlotHit {
        slot,
        hits_remaining: 0,
    });

    let kind = occupant.kind;
    let (base_points, grid_cleared) = match kind.power_up() {
        Some(power_up) => {
            let cleared = power_ups::activate(world, power_up, out_events);
            (world.tuning.power_up_points(power_up), cleared)
        }
        None => (kind.base_points(), false),
    };

    if !grid_cleared && world.slots.close(slot).is_some() {
        out_events.push(Event::SlotClosed {
            slot,
            kind,
            reason: CloseReason::Caught,
        });
    }

    let multiplier = if world.modifiers.is_active(Modifier::Frenzy) {
        world.tuning.frenzy_multiplier
    } else {
        1
    };
    let points = u64::from(base_points).saturating_mul(u64::from(multiplier));
    out_events.push(Event::OccupantCaught { slot, kind, points });

    if points > 0 {
        world.score = world.score.saturating_add(points);
        out_events.push(Event::ScoreChanged {
            score: world.score,
            delta: points,
        });
    }
}
