use dungeon_raid_core::{Balance, PoolSnapshot};

/// Capped counter used for hit points and defense.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Meter {
    current: u32,
    max: u32,
}

impl Meter {
    pub(crate) fn new(current: u32, max: u32) -> Self {
        Self {
            current: current.min(max),
            max,
        }
    }

    pub(crate) const fn current(&self) -> u32 {
        self.current
    }

    pub(crate) const fn headroom(&self) -> u32 {
        self.max - self.current
    }

    /// Adds up to `amount` without passing the maximum; returns the gain.
    pub(crate) fn restore(&mut self, amount: u32) -> u32 {
        let gained = amount.min(self.headroom());
        self.current += gained;
        gained
    }

    /// Removes up to `amount` without going below zero; returns the loss.
    pub(crate) fn drain(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.current);
        self.current -= lost;
        lost
    }

    pub(crate) fn raise_max(&mut self, amount: u32) {
        self.max = self.max.saturating_add(amount);
    }

    pub(crate) fn set(&mut self, value: u32) {
        self.current = value.min(self.max);
    }

    pub(crate) const fn snapshot(&self) -> PoolSnapshot {
        PoolSnapshot {
            current: self.current,
            max: self.max,
        }
    }
}

/// Combat attributes and run tally of the player.
#[derive(Clone, Debug)]
pub(crate) struct Player {
    pub(crate) hp: Meter,
    pub(crate) defense: Meter,
    pub(crate) base_attack: u32,
    pub(crate) weapon_attack: u32,
    pub(crate) shield_value: u32,
    pub(crate) score: u32,
    pub(crate) high_score: u32,
    pub(crate) second_wind: bool,
}

impl Player {
    pub(crate) fn new(balance: &Balance, high_score: u32) -> Self {
        Self {
            hp: Meter::new(balance.starting_hp, balance.max_hp),
            defense: Meter::new(balance.starting_defense, balance.max_defense),
            base_attack: balance.base_attack,
            weapon_attack: balance.weapon_attack,
            shield_value: balance.shield_value,
            score: 0,
            high_score,
            second_wind: false,
        }
    }

    /// Damage a chain deals before enemy defense is subtracted.
    pub(crate) fn chain_damage(&self, swords: u32) -> u32 {
        self.base_attack
            .saturating_add(swords.saturating_mul(self.weapon_attack))
    }

    pub(crate) const fn is_defeated(&self) -> bool {
        self.hp.current() == 0
    }

    /// Folds the run score into the high score; returns whether it rose.
    pub(crate) fn settle_high_score(&mut self) -> bool {
        if self.score > self.high_score {
            self.high_score = self.score;
            true
        } else {
            false
        }
    }
}
