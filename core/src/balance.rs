//! Tunable balance parameters.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::BonusRates;

/// Every adjustable number the rules engine reads.
///
/// Missing fields fall back to [`Balance::default`] when deserialised, so a
/// configuration file only needs to list the values it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Balance {
    /// Number of grid columns.
    pub columns: u32,
    /// Number of grid rows.
    pub rows: u32,
    /// Centre of the attack band rolled for spawned enemies.
    pub enemy_attack: u32,
    /// Half-width of the enemy attack band.
    pub enemy_attack_spread: u32,
    /// Defense assigned to every spawned enemy.
    pub enemy_defense: u32,
    /// Centre of the hit point band rolled for spawned enemies.
    pub enemy_hp: i32,
    /// Half-width of the enemy hit point band.
    pub enemy_hp_spread: i32,
    /// Player hit point maximum.
    pub max_hp: u32,
    /// Hit points at the start of a run.
    pub starting_hp: u32,
    /// Player defense maximum.
    pub max_defense: u32,
    /// Defense at the start of a run.
    pub starting_defense: u32,
    /// Attack applied to every chain.
    pub base_attack: u32,
    /// Attack added per sword.
    pub weapon_attack: u32,
    /// Defense points per shield tile.
    pub shield_value: u32,
    /// Coins needed per coin level-up.
    pub max_coins: u32,
    /// Equipment needed per equipment level-up.
    pub max_equipment: u32,
    /// Experience needed per experience level-up.
    pub max_experience: u32,
    /// Bonus chance for coin tiles.
    pub coin_bonus_rate: f64,
    /// Bonus chance for shield tiles.
    pub shield_bonus_rate: f64,
    /// Bonus chance for potion tiles.
    pub potion_bonus_rate: f64,
    /// Score awarded per enemy killed.
    pub kill_score: u32,
    /// Number of skill slots.
    pub skill_slots: usize,
    /// Candidates drawn per upgrade draft.
    pub draft_size: usize,
}

impl Default for Balance {
    fn default() -> Self {
        Self {
            columns: 6,
            rows: 6,
            enemy_attack: 5,
            enemy_attack_spread: 1,
            enemy_defense: 0,
            enemy_hp: 3,
            enemy_hp_spread: 1,
            max_hp: 100,
            starting_hp: 100,
            max_defense: 10,
            starting_defense: 10,
            base_attack: 1,
            weapon_attack: 1,
            shield_value: 1,
            max_coins: 10,
            max_equipment: 10,
            max_experience: 10,
            coin_bonus_rate: 0.2,
            shield_bonus_rate: 0.2,
            potion_bonus_rate: 0.2,
            kill_score: 50,
            skill_slots: 4,
            draft_size: 3,
        }
    }
}

impl Balance {
    /// Bonus chances grouped for snapshots and resolution.
    #[must_use]
    pub const fn bonus_rates(&self) -> BonusRates {
        BonusRates {
            coin: self.coin_bonus_rate,
            shield: self.shield_bonus_rate,
            potion: self.potion_bonus_rate,
        }
    }

    /// Number of cells in the configured grid.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Rejects configurations the engine cannot run with.
    pub fn validate(&self) -> Result<(), BalanceError> {
        if self.columns == 0 || self.rows == 0 {
            return Err(BalanceError::EmptyGrid {
                columns: self.columns,
                rows: self.rows,
            });
        }
        if self.max_hp == 0 || self.starting_hp == 0 || self.starting_hp > self.max_hp {
            return Err(BalanceError::StartingHp {
                starting: self.starting_hp,
                max: self.max_hp,
            });
        }
        if self.starting_defense > self.max_defense {
            return Err(BalanceError::StartingDefense {
                starting: self.starting_defense,
                max: self.max_defense,
            });
        }
        if self.max_coins == 0 || self.max_equipment == 0 || self.max_experience == 0 {
            return Err(BalanceError::ZeroPoolMaximum);
        }
        for (name, rate) in [
            ("coin", self.coin_bonus_rate),
            ("shield", self.shield_bonus_rate),
            ("potion", self.potion_bonus_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(BalanceError::BonusRate { name, rate });
            }
        }
        let hp_floor = self.enemy_hp.checked_sub(self.enemy_hp_spread);
        let hp_ceiling = self.enemy_hp.checked_add(self.enemy_hp_spread);
        if self.enemy_attack_spread > self.enemy_attack
            || self.enemy_hp_spread < 0
            || hp_ceiling.is_none()
            || hp_floor.map_or(true, |floor| floor < 1)
        {
            return Err(BalanceError::EnemyBand);
        }
        if self.draft_size == 0 {
            return Err(BalanceError::ZeroDraftSize);
        }
        Ok(())
    }
}

/// Construction-time misconfiguration detected by [`Balance::validate`].
#[derive(Clone, Debug, PartialEq, Error)]
pub enum BalanceError {
    /// The grid has no cells.
    #[error("grid must have at least one cell, got {columns}x{rows}")]
    EmptyGrid {
        /// Configured columns.
        columns: u32,
        /// Configured rows.
        rows: u32,
    },
    /// Starting hit points are zero or above the maximum.
    #[error("starting hp {starting} must lie in 1..={max}")]
    StartingHp {
        /// Configured starting value.
        starting: u32,
        /// Configured maximum.
        max: u32,
    },
    /// Starting defense exceeds the maximum.
    #[error("starting defense {starting} exceeds max defense {max}")]
    StartingDefense {
        /// Configured starting value.
        starting: u32,
        /// Configured maximum.
        max: u32,
    },
    /// A level-up pool has a zero maximum and would level up forever.
    #[error("coin, equipment and experience maxima must be positive")]
    ZeroPoolMaximum,
    /// A bonus rate is not a probability.
    #[error("{name} bonus rate {rate} must lie in 0.0..=1.0")]
    BonusRate {
        /// Category whose rate is invalid.
        name: &'static str,
        /// Offending value.
        rate: f64,
    },
    /// Enemy stat bands could produce negative attack or non-positive hp.
    #[error("enemy stat bands must keep attack non-negative and hp positive")]
    EnemyBand,
    /// Drafts would never offer anything.
    #[error("draft size must be positive")]
    ZeroDraftSize,
    /// A hand-authored layout does not cover the grid exactly.
    #[error("layout has {actual} tiles but the grid needs {expected}")]
    LayoutMismatch {
        /// Cells in the configured grid.
        expected: usize,
        /// Tiles supplied by the layout.
        actual: usize,
    },
}
