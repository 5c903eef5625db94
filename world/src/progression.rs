//! Resource pools and the queue of level-ups awaiting a draft.

use std::collections::VecDeque;

use dungeon_raid_core::{Balance, Event, PoolSnapshot, ResourceCategory};
use tracing::info;

/// Accumulator that wraps at its maximum.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ResourcePool {
    current: u32,
    max: u32,
}

impl ResourcePool {
    pub(crate) const fn new(max: u32) -> Self {
        Self { current: 0, max }
    }

    /// Adds `amount` and returns the number of times the pool wrapped.
    pub(crate) fn add(&mut self, amount: u32) -> u32 {
        self.current = self.current.saturating_add(amount);
        self.normalize()
    }

    /// Lowers the maximum by `percent` (never below 1) and returns level-ups.
    pub(crate) fn shrink_max(&mut self, percent: u32) -> u32 {
        let reduction = (u64::from(self.max) * u64::from(percent.min(100)) / 100) as u32;
        self.max = self.max.saturating_sub(reduction.max(1)).max(1);
        self.normalize()
    }

    fn normalize(&mut self) -> u32 {
        if self.max == 0 {
            return 0;
        }
        let levels = self.current / self.max;
        self.current %= self.max;
        levels
    }

    pub(crate) const fn snapshot(&self) -> PoolSnapshot {
        PoolSnapshot {
            current: self.current,
            max: self.max,
        }
    }
}

/// Tracks the three pools and the FIFO of level-ups they produced.
#[derive(Clone, Debug)]
pub(crate) struct ProgressionTracker {
    coins: ResourcePool,
    equipment: ResourcePool,
    experience: ResourcePool,
    queue: VecDeque<ResourceCategory>,
}

impl ProgressionTracker {
    pub(crate) fn new(balance: &Balance) -> Self {
        Self {
            coins: ResourcePool::new(balance.max_coins),
            equipment: ResourcePool::new(balance.max_equipment),
            experience: ResourcePool::new(balance.max_experience),
            queue: VecDeque::new(),
        }
    }

    pub(crate) const fn pool(&self, category: ResourceCategory) -> &ResourcePool {
        match category {
            ResourceCategory::Coin => &self.coins,
            ResourceCategory::Equipment => &self.equipment,
            ResourceCategory::Experience => &self.experience,
        }
    }

    fn pool_mut(&mut self, category: ResourceCategory) -> &mut ResourcePool {
        match category {
            ResourceCategory::Coin => &mut self.coins,
            ResourceCategory::Equipment => &mut self.equipment,
            ResourceCategory::Experience => &mut self.experience,
        }
    }

    /// Adds to a pool, queueing and announcing one level-up per wrap.
    pub(crate) fn add(&mut self, category: ResourceCategory, amount: u32, out: &mut Vec<Event>) {
        if amount == 0 {
            return;
        }
        let levels = self.pool_mut(category).add(amount);
        self.enqueue(category, levels, out);
    }

    pub(crate) fn shrink_max(
        &mut self,
        category: ResourceCategory,
        percent: u32,
        out: &mut Vec<Event>,
    ) {
        let levels = self.pool_mut(category).shrink_max(percent);
        self.enqueue(category, levels, out);
    }

    fn enqueue(&mut self, category: ResourceCategory, levels: u32, out: &mut Vec<Event>) {
        for _ in 0..levels {
            info!(category = category.label(), "level up");
            self.queue.push_back(category);
            out.push(Event::LevelUp { category });
        }
    }

    /// Category of the level-up at the head of the queue.
    pub(crate) fn next_level_up(&self) -> Option<ResourceCategory> {
        self.queue.front().copied()
    }

    pub(crate) fn complete_level_up(&mut self) -> Option<ResourceCategory> {
        self.queue.pop_front()
    }

    pub(crate) fn pending(&self) -> usize {
        self.queue.len()
    }
}
