#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure drafting system that answers level-ups with weighted upgrade candidates.

use dungeon_raid_core::{Command, Event, ResourceCategory, UpgradeKind};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Candidates offered per level-up unless configured otherwise.
pub const DEFAULT_DRAFT_SIZE: usize = 3;

/// Configuration parameters for the drafting system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    draft_size: usize,
    rng_seed: u64,
}

impl Config {
    /// Creates a configuration drawing `draft_size` candidates per level-up.
    #[must_use]
    pub const fn new(draft_size: usize, rng_seed: u64) -> Self {
        Self {
            draft_size,
            rng_seed,
        }
    }

    /// Number of candidates requested per draft.
    #[must_use]
    pub const fn draft_size(&self) -> usize {
        self.draft_size
    }

    /// Seed used to initialise the drafting RNG.
    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.rng_seed
    }
}

/// Pure system that samples upgrade candidates for requested drafts.
#[derive(Debug)]
pub struct Drafting {
    draft_size: usize,
    rng: ChaCha8Rng,
}

impl Drafting {
    /// Creates a drafting system with its own seeded RNG.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            draft_size: config.draft_size,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Answers every [`Event::DraftRequested`] with a [`Command::OfferDraft`].
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            if let Event::DraftRequested { category } = event {
                let upgrades = draft(*category, self.draft_size, &mut self.rng);
                debug!(
                    category = category.label(),
                    offered = upgrades.len(),
                    "draft sampled"
                );
                out.push(Command::OfferDraft {
                    category: *category,
                    upgrades,
                });
            }
        }
    }
}

/// Samples up to `count` distinct upgrades of `category`, weighted and without replacement.
///
/// Returns fewer candidates when the category has fewer than `count` upgrades.
pub fn draft<R: Rng>(
    category: ResourceCategory,
    count: usize,
    rng: &mut R,
) -> Vec<UpgradeKind> {
    let mut pool: Vec<UpgradeKind> = UpgradeKind::ALL
        .into_iter()
        .filter(|upgrade| upgrade.category() == category)
        .collect();
    let mut chosen = Vec::with_capacity(count.min(pool.len()));

    while chosen.len() < count && !pool.is_empty() {
        let total: u32 = pool.iter().map(|upgrade| upgrade.weight()).sum();
        let mut remainder = rng.gen_range(0..total);
        let mut picked = pool.len() - 1;
        for (index, upgrade) in pool.iter().enumerate() {
            let weight = upgrade.weight();
            if remainder < weight {
                picked = index;
                break;
            }
            remainder -= weight;
        }
        chosen.push(pool.remove(picked));
    }

    chosen
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn small_pools_are_drained_completely() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let drafted = draft(ResourceCategory::Equipment, 10, &mut rng);
        let unique: HashSet<UpgradeKind> = drafted.iter().copied().collect();
        assert_eq!(drafted.len(), 4);
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn zero_count_draws_nothing() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        assert!(draft(ResourceCategory::Coin, 0, &mut rng).is_empty());
    }

    #[test]
    fn heavier_upgrades_are_drawn_more_often() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let mut wisdom = 0;
        let mut second_wind = 0;
        for _ in 0..2_000 {
            match draft(ResourceCategory::Experience, 1, &mut rng).first() {
                Some(UpgradeKind::Wisdom) => wisdom += 1,
                Some(UpgradeKind::SecondWind) => second_wind += 1,
                _ => {}
            }
        }
        assert!(
            wisdom > second_wind * 2,
            "wisdom {wisdom} vs second wind {second_wind}"
        );
    }

    proptest! {
        #[test]
        fn drafts_are_distinct_and_in_category(seed in any::<u64>(), count in 0usize..10) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            for category in ResourceCategory::ALL {
                let pool = UpgradeKind::ALL
                    .iter()
                    .filter(|upgrade| upgrade.category() == category)
                    .count();
                let drafted = draft(category, count, &mut rng);
                let unique: HashSet<UpgradeKind> = drafted.iter().copied().collect();
                prop_assert_eq!(drafted.len(), count.min(pool));
                prop_assert_eq!(unique.len(), drafted.len());
                prop_assert!(drafted.iter().all(|upgrade| upgrade.category() == category));
            }
        }
    }
}
