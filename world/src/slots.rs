//! Authoritative slot grid owned by the world for the lifetime of a level.

use std::time::Duration;

use cat_bin_core::{OccupantKind, OccupantSnapshot, SlotId, SlotSnapshot};

/// Occupant stored inside an open slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Occupant {
    /// Kind of occupant revealed.
    pub(crate) kind: OccupantKind,
    /// Simulation time at which the occupant appeared.
    pub(crate) spawned_at: Duration,
    /// Clicks still required to catch the occupant.
    pub(crate) hits_remaining: u8,
}

/// Dense grid of slots indexed by [`SlotId`].
///
/// A slot is open exactly when it stores an occupant, so the hit counter of a
/// closed slot is implicitly one.
#[derive(Clone, Debug, Default)]
pub(crate) struct SlotGrid {
    slots: Vec<Option<Occupant>>,
}

impl SlotGrid {
    /// Creates a grid of closed slots.
    pub(crate) fn new(count: u32) -> Self {
        let capacity = usize::try_from(count).unwrap_or(0);
        Self {
            slots: vec![None; capacity],
        }
    }

    /// Returns the occupant of an open slot.
    pub(crate) fn occupant(&self, slot: SlotId) -> Option<Occupant> {
        self.index(slot)
            .and_then(|index| self.slots.get(index).copied().flatten())
    }

    /// Places a fresh occupant into a closed slot.
    ///
    /// Returns `false` when the slot is unknown or already open.
    pub(crate) fn open(&mut self, slot: SlotId, kind: OccupantKind, now: Duration) -> bool {
        let Some(cell) = self.index(slot).and_then(|index| self.slots.get_mut(index)) else {
            return false;
        };
        if cell.is_some() {
            return false;
        }

        *cell = Some(Occupant {
            kind,
            spawned_at: now,
            hits_remaining: kind.initial_hits(),
        });
        true
    }

    /// Removes and returns the occupant of an open slot.
    pub(crate) fn close(&mut self, slot: SlotId) -> Option<Occupant> {
        self.index(slot)
            .and_then(|index| self.slots.get_mut(index))
            .and_then(Option::take)
    }

    /// Consumes one hit from a multi-hit occupant and returns the hits left.
    ///
    /// Occupants on their final hit are left untouched and yield `None`.
    pub(crate) fn register_hit(&mut self, slot: SlotId) -> Option<u8> {
        let occupant = self
            .index(slot)
            .and_then(|index| self.slots.get_mut(index))
            .and_then(Option::as_mut)?;
        if occupant.hits_remaining <= 1 {
            return None;
        }
        occupant.hits_remaining -= 1;
        Some(occupant.hits_remaining)
    }

    /// Closes every open slot, returning the removed occupants in slot order.
    pub(crate) fn close_all(&mut self) -> Vec<(SlotId, Occupant)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(index, cell)| {
                let occupant = cell.take()?;
                let id = u32::try_from(index).ok()?;
                Some((SlotId::new(id), occupant))
            })
            .collect()
    }

    /// Captures immutable snapshots of every slot.
    pub(crate) fn snapshots(&self) -> Vec<SlotSnapshot> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, cell)| {
                let id = u32::try_from(index).ok()?;
                Some(SlotSnapshot {
                    id: SlotId::new(id),
                    occupant: cell.map(|occupant| OccupantSnapshot {
                        kind: occupant.kind,
                        spawned_at: occupant.spawned_at,
                        hits_remaining: occupant.hits_remaining,
                    }),
                })
            })
            .collect()
    }

    fn index(&self, slot: SlotId) -> Option<usize> {
        let index = usize::try_from(slot.get()).ok()?;
        (index < self.slots.len()).then_some(index)
    }
}
