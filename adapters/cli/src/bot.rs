//! Scripted player used by the headless autoplay mode.

use cat_bin_core::SlotId;
use cat_bin_session::{Clock, Session};
use cat_bin_world::query;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Player that notices each open slot with a fixed probability per step.
#[derive(Debug)]
pub(crate) struct Bot {
    rng: ChaCha8Rng,
    skill: f64,
}

impl Bot {
    /// Creates a bot; `skill` is clamped to `0.0..=1.0`.
    pub(crate) fn new(seed: u64, skill: f64) -> Self {
        let skill = if skill.is_nan() { 0.0 } else { skill.clamp(0.0, 1.0) };
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            skill,
        }
    }

    /// Clicks some of the currently open slots and returns how many were targeted.
    pub(crate) fn act<C: Clock, R: Rng>(&mut self, session: &mut Session<C, R>) -> usize {
        let targets: Vec<(SlotId, u8)> = query::slot_view(session.world())
            .iter()
            .filter(|snapshot| snapshot.is_open())
            .map(|snapshot| (snapshot.id, snapshot.hits_remaining()))
            .collect();

        let mut targeted = 0;
        for (slot, hits) in targets {
            if !self.rng.gen_bool(self.skill) {
                continue;
            }
            targeted += 1;
            for _ in 0..hits {
                session.click(slot);
            }
        }
        targeted
    }
}
