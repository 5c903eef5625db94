#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Dungeon Raid engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

mod balance;
mod catalog;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use balance::{Balance, BalanceError};
pub use catalog::{SkillKind, UpgradeKind};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Dungeon Raid.";

/// Shortest chain that has any gameplay effect when committed.
pub const MIN_CHAIN_LENGTH: usize = 3;

/// Describes which stage of the turn pipeline the engine occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnginePhase {
    /// Waiting for a new selection or a skill activation.
    Idle,
    /// A committed selection is being resolved.
    Resolving,
    /// A level-up is waiting for the player to pick an upgrade.
    Drafting,
    /// The player ran out of hit points; only a restart leaves this phase.
    GameOver,
}

impl EnginePhase {
    /// Reports whether the engine accepts new turn input in this phase.
    #[must_use]
    pub const fn accepts_input(self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Commits a finished drag chain for turn resolution.
    CommitSelection {
        /// Tiles in the order they were selected.
        path: Vec<TileId>,
    },
    /// Requests activation of the skill held in a slot.
    ActivateSkill {
        /// Zero-based index of the skill slot.
        slot: usize,
    },
    /// Supplies the candidates drafted for the level-up at the head of the queue.
    OfferDraft {
        /// Resource category whose level-up is being drafted.
        category: ResourceCategory,
        /// Distinct candidate upgrades, possibly fewer than requested.
        upgrades: Vec<UpgradeKind>,
    },
    /// Picks one of the currently offered upgrades.
    ChooseUpgrade {
        /// Index into the offered candidate list.
        choice: usize,
    },
    /// Marks every freshly spawned tile as observed by the presentation layer.
    AcknowledgeSpawns,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that the engine moved to another phase.
    PhaseChanged {
        /// Phase that became active.
        phase: EnginePhase,
    },
    /// Reports that a committed chain was too short to have any effect.
    SelectionDiscarded {
        /// Number of tiles the discarded chain contained.
        length: usize,
    },
    /// Confirms that an enemy tile took damage.
    EnemyDamaged {
        /// Enemy that was hit.
        tile: TileId,
        /// Damage dealt after defense and the minimum-damage floor.
        damage: u32,
        /// Hit points left on the enemy; zero or less means it died.
        remaining_hp: i32,
    },
    /// Confirms that an enemy tile was killed and will be removed.
    EnemyKilled {
        /// Enemy that died.
        tile: TileId,
        /// Score awarded for the kill.
        score: u32,
    },
    /// Summarises the resources a turn produced before they reach the pools.
    ResourcesGathered {
        /// Coins collected, bonuses included.
        coins: u32,
        /// Equipment points gained from shield overflow.
        equipment: u32,
        /// Experience earned from kills.
        experience: u32,
        /// Hit points actually restored by potions.
        healed: u32,
        /// Defense points actually restored by shields.
        defense: u32,
    },
    /// Reports that a resource pool wrapped past its maximum.
    LevelUp {
        /// Pool that levelled up.
        category: ResourceCategory,
    },
    /// Post-collapse diff for presentation layers.
    GridCollapsed {
        /// Tiles that left the grid.
        removed: Vec<TileId>,
        /// Tiles created by the refill; all carry `is_new`.
        spawned: Vec<TileId>,
    },
    /// Reports the enemy counterattack at the end of a turn.
    CounterAttack {
        /// Hit points the player lost.
        damage: u32,
        /// Number of enemies that took part.
        attackers: u32,
    },
    /// Post-turn diff confirming that a committed turn finished resolving.
    TurnResolved {
        /// One-based index of the resolved turn.
        turn: u32,
        /// Tiles removed by the turn's collapse.
        removed: Vec<TileId>,
        /// Tiles spawned by the turn's refill.
        spawned: Vec<TileId>,
        /// Hit points the player lost to the counterattack.
        player_damage: u32,
    },
    /// Confirms that a skill fired.
    SkillActivated {
        /// Slot holding the skill.
        slot: usize,
        /// Skill that fired.
        skill: SkillKind,
    },
    /// Asks drafting systems for candidates for the queued level-up.
    DraftRequested {
        /// Category whose level-up is waiting.
        category: ResourceCategory,
    },
    /// Presents upgrade candidates to the player.
    DraftOffered {
        /// Offered candidates.
        offer: DraftOffer,
    },
    /// Confirms that an upgrade effect was applied.
    UpgradeApplied {
        /// Upgrade that took effect.
        upgrade: UpgradeKind,
    },
    /// Reports that the one-time revive kept the player alive.
    SecondWindTriggered,
    /// Terminal event carrying the final tally.
    GameOver {
        /// Score reached in this run.
        score: u32,
        /// High score after this run.
        high_score: u32,
        /// Whether this run raised the high score.
        new_high_score: bool,
    },
    /// Reports that a command was refused without mutating the world.
    CommandRejected {
        /// Specific reason the command failed.
        reason: RejectionReason,
    },
}

/// Reasons a command may be refused by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum RejectionReason {
    /// A turn or draft is still being resolved.
    #[error("the engine is still resolving the previous action")]
    EngineBusy,
    /// The run already ended.
    #[error("the game is over")]
    GameOver,
    /// The committed path is not a valid chain on the current grid.
    #[error("the selection is not a valid chain")]
    InvalidSelection,
    /// The requested skill slot is empty or does not exist.
    #[error("no skill in that slot")]
    EmptySkillSlot,
    /// The requested skill is still cooling down.
    #[error("the skill is still on cooldown")]
    SkillOnCooldown,
    /// An upgrade was chosen while no draft was on offer.
    #[error("no upgrade draft is pending")]
    NoPendingDraft,
    /// The upgrade choice index lies outside the offered list.
    #[error("the upgrade choice is out of range")]
    InvalidChoice,
    /// Draft candidates arrived for a level-up that is not waiting.
    #[error("no draft was requested for that category")]
    UnexpectedDraft,
}

/// The three accumulating pools whose overflow triggers level-ups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceCategory {
    /// Coins collected from coin tiles.
    Coin,
    /// Equipment points from shield overflow.
    Equipment,
    /// Experience from kills.
    Experience,
}

impl ResourceCategory {
    /// Every category in the order gains are applied.
    pub const ALL: [Self; 3] = [Self::Coin, Self::Equipment, Self::Experience];

    /// Lower-case label used by adapters.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Coin => "coin",
            Self::Equipment => "equipment",
            Self::Experience => "experience",
        }
    }
}

/// Candidate upgrades drafted for one level-up.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftOffer {
    /// Category whose level-up produced the draft.
    pub category: ResourceCategory,
    /// Distinct candidates in draw order.
    pub choices: Vec<UpgradeKind>,
}

/// Unique identifier assigned to a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(u32);

impl TileId {
    /// Creates a new tile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Row zero is the top of the grid; gravity pulls towards higher rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Chebyshev (king-move) distance between two cells.
    #[must_use]
    pub fn chebyshev_distance(self, other: CellCoord) -> u32 {
        self.column
            .abs_diff(other.column)
            .max(self.row.abs_diff(other.row))
    }

    /// Reports whether two distinct cells touch, diagonals included.
    #[must_use]
    pub fn is_adjacent(self, other: CellCoord) -> bool {
        self.chebyshev_distance(other) == 1
    }
}

/// Kinds of tile that can occupy a grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Adds weapon attack to the chain's damage.
    Sword,
    /// Restores defense; overflow becomes equipment.
    Shield,
    /// Restores hit points.
    Potion,
    /// Adds coins.
    Coin,
    /// Hostile tile carrying [`CombatStats`].
    Enemy,
}

impl TileKind {
    /// Every kind, used for uniform refill draws.
    pub const ALL: [Self; 5] = [
        Self::Sword,
        Self::Shield,
        Self::Potion,
        Self::Coin,
        Self::Enemy,
    ];

    /// Reports whether two kinds may follow each other in a chain.
    ///
    /// Identical kinds always link; swords and enemies link in either order.
    #[must_use]
    pub fn links_with(self, other: TileKind) -> bool {
        self == other
            || matches!(
                (self, other),
                (Self::Sword, Self::Enemy) | (Self::Enemy, Self::Sword)
            )
    }

    /// Single-character glyph used by text adapters.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Sword => 'S',
            Self::Shield => 'D',
            Self::Potion => 'P',
            Self::Coin => 'C',
            Self::Enemy => 'E',
        }
    }
}

/// Attack, defense and hit points carried by enemy tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CombatStats {
    /// Damage contributed to the counterattack.
    pub attack: u32,
    /// Flat reduction applied to incoming damage.
    pub defense: u32,
    /// Remaining hit points; the enemy dies at zero or below.
    pub hp: i32,
}

impl CombatStats {
    /// Creates a new stat block.
    #[must_use]
    pub const fn new(attack: u32, defense: u32, hp: i32) -> Self {
        Self {
            attack,
            defense,
            hp,
        }
    }
}

/// Immutable representation of a single tile used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileSnapshot {
    /// Unique identifier assigned to the tile.
    pub id: TileId,
    /// Kind of the tile.
    pub kind: TileKind,
    /// Cell currently occupied by the tile.
    pub cell: CellCoord,
    /// Whether the tile was spawned by the latest refill and not yet observed.
    pub is_new: bool,
    /// Number of committed turns the tile has been present for.
    pub turns_alive: u32,
    /// Combat statistics, present iff the tile is an enemy.
    pub stats: Option<CombatStats>,
}

/// Read-only snapshot of the full tile grid.
#[derive(Clone, Debug, Default)]
pub struct TileView {
    columns: u32,
    rows: u32,
    tiles: Vec<TileSnapshot>,
    index: HashMap<TileId, usize>,
}

impl TileView {
    /// Creates a new tile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(columns: u32, rows: u32, mut snapshots: Vec<TileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| (snapshot.cell.row(), snapshot.cell.column()));
        let index = snapshots
            .iter()
            .enumerate()
            .map(|(position, snapshot)| (snapshot.id, position))
            .collect();
        Self {
            columns,
            rows,
            tiles: snapshots,
            index,
        }
    }

    /// Provides the dimensions of the grid as `(columns, rows)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Returns the tile occupying the provided cell, if any.
    #[must_use]
    pub fn at(&self, cell: CellCoord) -> Option<&TileSnapshot> {
        if cell.column() >= self.columns || cell.row() >= self.rows {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        self.tiles
            .get(row * width + column)
            .filter(|snapshot| snapshot.cell == cell)
    }

    /// Looks a tile up by identifier.
    #[must_use]
    pub fn tile(&self, id: TileId) -> Option<&TileSnapshot> {
        self.index
            .get(&id)
            .and_then(|position| self.tiles.get(*position))
    }

    /// Iterator over the captured tiles in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &TileSnapshot> {
        self.tiles.iter()
    }
}

/// Current and maximum value of a bounded player pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoolSnapshot {
    /// Current value, never above `max`.
    pub current: u32,
    /// Upper bound of the pool.
    pub max: u32,
}

/// Chance that a resource tile deep in a chain yields double.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BonusRates {
    /// Probability applied to coin tiles.
    pub coin: f64,
    /// Probability applied to shield tiles.
    pub shield: f64,
    /// Probability applied to potion tiles.
    pub potion: f64,
}

impl BonusRates {
    /// Returns the rate for a resource tile kind; other kinds never roll.
    #[must_use]
    pub fn for_kind(&self, kind: TileKind) -> Option<f64> {
        match kind {
            TileKind::Coin => Some(self.coin),
            TileKind::Shield => Some(self.shield),
            TileKind::Potion => Some(self.potion),
            TileKind::Sword | TileKind::Enemy => None,
        }
    }
}

/// Immutable representation of the player's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Hit points.
    pub hp: PoolSnapshot,
    /// Defense absorbing the counterattack.
    pub defense: PoolSnapshot,
    /// Coin pool.
    pub coins: PoolSnapshot,
    /// Equipment pool.
    pub equipment: PoolSnapshot,
    /// Experience pool.
    pub experience: PoolSnapshot,
    /// Attack applied to every chain.
    pub base_attack: u32,
    /// Attack added per sword in a chain.
    pub weapon_attack: u32,
    /// Defense points granted per shield tile.
    pub shield_value: u32,
    /// Per-category bonus rates.
    pub bonus_rates: BonusRates,
    /// Score reached in the current run.
    pub score: u32,
    /// Best score across runs.
    pub high_score: u32,
    /// Whether the one-time revive is still available.
    pub second_wind: bool,
}

/// Immutable representation of a skill slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SkillSlotSnapshot {
    /// Zero-based slot index.
    pub slot: usize,
    /// Skill held in the slot, if any.
    pub skill: Option<SkillKind>,
    /// Turns left before the skill can fire again.
    pub cooldown_current: u32,
    /// Cooldown applied after each activation.
    pub cooldown_max: u32,
}

impl SkillSlotSnapshot {
    /// Reports whether the slot holds a skill that can fire now.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.skill.is_some() && self.cooldown_current == 0
    }
}
