#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Dungeon Raid.

mod combat;
mod grid;
mod player;
mod progression;
mod skills;
mod upgrades;

use dungeon_raid_core::{
    Balance, BalanceError, Command, DraftOffer, EnginePhase, Event, RejectionReason,
    ResourceCategory, TileId, UpgradeKind, MIN_CHAIN_LENGTH, WELCOME_BANNER,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

pub use grid::TileSeed;

use grid::TileGrid;
use player::Player;
use progression::ProgressionTracker;
use skills::SkillSlots;

/// Construction parameters for a [`World`].
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    balance: Balance,
    rng_seed: u64,
    high_score: u32,
}

impl Config {
    /// Creates a configuration with the provided balance and RNG seed.
    #[must_use]
    pub const fn new(balance: Balance, rng_seed: u64) -> Self {
        Self {
            balance,
            rng_seed,
            high_score: 0,
        }
    }

    /// Carries a previously persisted high score into the run.
    #[must_use]
    pub const fn with_high_score(mut self, high_score: u32) -> Self {
        self.high_score = high_score;
        self
    }
}

/// Represents the authoritative Dungeon Raid world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    balance: Balance,
    grid: TileGrid,
    player: Player,
    progression: ProgressionTracker,
    skills: SkillSlots,
    phase: EnginePhase,
    pending_offer: Option<DraftOffer>,
    turn: u32,
    rng: ChaCha8Rng,
}

/// Split mutable borrows handed to combat, skill and upgrade effects.
pub(crate) struct Context<'a> {
    pub(crate) balance: &'a Balance,
    pub(crate) grid: &'a mut TileGrid,
    pub(crate) player: &'a mut Player,
    pub(crate) progression: &'a mut ProgressionTracker,
    pub(crate) skills: &'a mut SkillSlots,
    pub(crate) rng: &'a mut ChaCha8Rng,
}

impl World {
    /// Creates a world with a randomly generated grid.
    pub fn new(config: Config) -> Result<Self, BalanceError> {
        config.balance.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.rng_seed);
        let grid = TileGrid::generate(&config.balance, &mut rng);
        Ok(Self::assemble(config, grid, rng))
    }

    /// Creates a world whose grid is built from row-major seeds.
    ///
    /// The seeds must cover every cell of the configured grid. Later refills
    /// still draw from the seeded RNG.
    pub fn with_layout(config: Config, layout: Vec<TileSeed>) -> Result<Self, BalanceError> {
        config.balance.validate()?;
        let rng = ChaCha8Rng::seed_from_u64(config.rng_seed);
        let grid = TileGrid::from_layout(&config.balance, layout)?;
        Ok(Self::assemble(config, grid, rng))
    }

    fn assemble(config: Config, grid: TileGrid, rng: ChaCha8Rng) -> Self {
        let Config {
            balance,
            high_score,
            ..
        } = config;
        Self {
            banner: WELCOME_BANNER,
            player: Player::new(&balance, high_score),
            progression: ProgressionTracker::new(&balance),
            skills: SkillSlots::new(balance.skill_slots),
            phase: EnginePhase::Idle,
            pending_offer: None,
            turn: 0,
            grid,
            rng,
            balance,
        }
    }

    pub(crate) fn context(&mut self) -> Context<'_> {
        Context {
            balance: &self.balance,
            grid: &mut self.grid,
            player: &mut self.player,
            progression: &mut self.progression,
            skills: &mut self.skills,
            rng: &mut self.rng,
        }
    }

    fn set_phase(&mut self, phase: EnginePhase, out_events: &mut Vec<Event>) {
        if self.phase != phase {
            debug!(from = ?self.phase, to = ?phase, "phase changed");
            self.phase = phase;
            out_events.push(Event::PhaseChanged { phase });
        }
    }

    /// Moves to the next queued draft, or back to idle when none remain.
    fn advance(&mut self, out_events: &mut Vec<Event>) {
        match self.progression.next_level_up() {
            Some(category) => {
                self.set_phase(EnginePhase::Drafting, out_events);
                out_events.push(Event::DraftRequested { category });
            }
            None => self.set_phase(EnginePhase::Idle, out_events),
        }
    }

    fn commit_selection(&mut self, path: Vec<TileId>, out_events: &mut Vec<Event>) {
        if let Err(reason) = self.ensure_idle() {
            reject(reason, out_events);
            return;
        }
        if path.len() < MIN_CHAIN_LENGTH {
            out_events.push(Event::SelectionDiscarded { length: path.len() });
            return;
        }
        if !self.grid.is_valid_chain(&path) {
            reject(RejectionReason::InvalidSelection, out_events);
            return;
        }

        self.set_phase(EnginePhase::Resolving, out_events);
        self.turn = self.turn.saturating_add(1);
        let turn = self.turn;
        combat::resolve_turn(&mut self.context(), &path, turn, out_events);

        if self.player.is_defeated() {
            if self.player.second_wind {
                self.player.second_wind = false;
                self.player.hp.set(1);
                info!("second wind triggered");
                out_events.push(Event::SecondWindTriggered);
            } else {
                self.finish(out_events);
                return;
            }
        }
        self.advance(out_events);
    }

    fn finish(&mut self, out_events: &mut Vec<Event>) {
        let new_high_score = self.player.settle_high_score();
        let score = self.player.score;
        let high_score = self.player.high_score;
        info!(score, high_score, new_high_score, "game over");
        out_events.push(Event::GameOver {
            score,
            high_score,
            new_high_score,
        });
        self.set_phase(EnginePhase::GameOver, out_events);
    }

    fn activate_skill(&mut self, slot: usize, out_events: &mut Vec<Event>) {
        if let Err(reason) = self.ensure_idle() {
            reject(reason, out_events);
            return;
        }
        match skills::activate(&mut self.context(), slot, out_events) {
            Ok(_) => self.advance(out_events),
            Err(reason) => reject(reason, out_events),
        }
    }

    fn offer_draft(
        &mut self,
        category: ResourceCategory,
        upgrades: Vec<UpgradeKind>,
        out_events: &mut Vec<Event>,
    ) {
        if self.phase == EnginePhase::GameOver {
            reject(RejectionReason::GameOver, out_events);
            return;
        }
        let expected = self.phase == EnginePhase::Drafting
            && self.pending_offer.is_none()
            && self.progression.next_level_up() == Some(category);
        if !expected || upgrades.iter().any(|upgrade| upgrade.category() != category) {
            reject(RejectionReason::UnexpectedDraft, out_events);
            return;
        }

        let mut choices: Vec<UpgradeKind> = Vec::with_capacity(upgrades.len());
        for upgrade in upgrades {
            if !choices.contains(&upgrade) {
                choices.push(upgrade);
            }
        }

        if choices.is_empty() {
            debug!(category = category.label(), "empty draft resolves level-up");
            let _ = self.progression.complete_level_up();
            self.advance(out_events);
            return;
        }

        let offer = DraftOffer { category, choices };
        self.pending_offer = Some(offer.clone());
        out_events.push(Event::DraftOffered { offer });
    }

    fn choose_upgrade(&mut self, choice: usize, out_events: &mut Vec<Event>) {
        if self.phase == EnginePhase::GameOver {
            reject(RejectionReason::GameOver, out_events);
            return;
        }
        let Some(offer) = self.pending_offer.as_ref() else {
            reject(RejectionReason::NoPendingDraft, out_events);
            return;
        };
        let Some(upgrade) = offer.choices.get(choice).copied() else {
            reject(RejectionReason::InvalidChoice, out_events);
            return;
        };

        self.pending_offer = None;
        upgrades::apply_upgrade(&mut self.context(), upgrade, out_events);
        let _ = self.progression.complete_level_up();
        self.advance(out_events);
    }

    fn ensure_idle(&self) -> Result<(), RejectionReason> {
        match self.phase {
            EnginePhase::Idle => Ok(()),
            EnginePhase::GameOver => Err(RejectionReason::GameOver),
            EnginePhase::Resolving | EnginePhase::Drafting => Err(RejectionReason::EngineBusy),
        }
    }
}

fn reject(reason: RejectionReason, out_events: &mut Vec<Event>) {
    warn!(%reason, "command rejected");
    out_events.push(Event::CommandRejected { reason });
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::CommitSelection { path } => world.commit_selection(path, out_events),
        Command::ActivateSkill { slot } => world.activate_skill(slot, out_events),
        Command::OfferDraft { category, upgrades } => {
            world.offer_draft(category, upgrades, out_events);
        }
        Command::ChooseUpgrade { choice } => world.choose_upgrade(choice, out_events),
        Command::AcknowledgeSpawns => world.grid.clear_new_flags(),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use dungeon_raid_core::{
        Balance, DraftOffer, EnginePhase, PlayerSnapshot, ResourceCategory, SkillSlotSnapshot,
        TileView,
    };

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Balance parameters the world runs with.
    #[must_use]
    pub fn balance(world: &World) -> &Balance {
        &world.balance
    }

    /// Current phase of the turn pipeline.
    #[must_use]
    pub fn phase(world: &World) -> EnginePhase {
        world.phase
    }

    /// Number of committed turns resolved so far.
    #[must_use]
    pub fn turn(world: &World) -> u32 {
        world.turn
    }

    /// Captures a read-only view of every tile on the grid.
    #[must_use]
    pub fn tile_view(world: &World) -> TileView {
        world.grid.view()
    }

    /// Captures the player's pools, attributes and score.
    #[must_use]
    pub fn player_snapshot(world: &World) -> PlayerSnapshot {
        let player = &world.player;
        PlayerSnapshot {
            hp: player.hp.snapshot(),
            defense: player.defense.snapshot(),
            coins: world.progression.pool(ResourceCategory::Coin).snapshot(),
            equipment: world
                .progression
                .pool(ResourceCategory::Equipment)
                .snapshot(),
            experience: world
                .progression
                .pool(ResourceCategory::Experience)
                .snapshot(),
            base_attack: player.base_attack,
            weapon_attack: player.weapon_attack,
            shield_value: player.shield_value,
            bonus_rates: world.balance.bonus_rates(),
            score: player.score,
            high_score: player.high_score,
            second_wind: player.second_wind,
        }
    }

    /// Captures every skill slot in order.
    #[must_use]
    pub fn skill_slots(world: &World) -> Vec<SkillSlotSnapshot> {
        world.skills.snapshots()
    }

    /// Reports whether a freeze will cancel the next counterattack.
    #[must_use]
    pub fn freeze_armed(world: &World) -> bool {
        world.skills.freeze_armed()
    }

    /// Offer currently waiting for the player's choice, if any.
    #[must_use]
    pub fn pending_offer(world: &World) -> Option<&DraftOffer> {
        world.pending_offer.as_ref()
    }

    /// Number of level-ups still waiting for a draft, the current one included.
    #[must_use]
    pub fn pending_level_ups(world: &World) -> usize {
        world.progression.pending()
    }
}

#[cfg(test)]
mod tests {
    use dungeon_raid_core::TileKind;

    use super::*;

    fn layout_world(columns: u32, rows: u32, layout: Vec<TileSeed>) -> World {
        let balance = Balance {
            columns,
            rows,
            coin_bonus_rate: 0.0,
            shield_bonus_rate: 0.0,
            potion_bonus_rate: 0.0,
            ..Balance::default()
        };
        World::with_layout(Config::new(balance, 3), layout).expect("layout")
    }

    fn ids(raw: &[u32]) -> Vec<TileId> {
        raw.iter().copied().map(TileId::new).collect()
    }

    #[test]
    fn new_world_starts_idle_with_a_full_grid() {
        let world = World::new(Config::new(Balance::default(), 1)).expect("world");
        assert_eq!(query::phase(&world), EnginePhase::Idle);
        assert_eq!(query::tile_view(&world).iter().count(), 36);
        assert_eq!(query::welcome_banner(&world), WELCOME_BANNER);
    }

    #[test]
    fn invalid_balance_is_refused() {
        let balance = Balance {
            draft_size: 0,
            ..Balance::default()
        };
        assert_eq!(
            World::new(Config::new(balance, 1)).err(),
            Some(BalanceError::ZeroDraftSize)
        );
    }

    #[test]
    fn short_chains_are_discarded_without_a_turn() {
        let mut world = layout_world(3, 1, vec![TileSeed::new(TileKind::Coin); 3]);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::CommitSelection { path: ids(&[0, 1]) },
            &mut events,
        );

        assert_eq!(events, vec![Event::SelectionDiscarded { length: 2 }]);
        assert_eq!(query::turn(&world), 0);
    }

    #[test]
    fn broken_chains_are_rejected() {
        let layout = vec![
            TileSeed::new(TileKind::Coin),
            TileSeed::new(TileKind::Shield),
            TileSeed::new(TileKind::Coin),
        ];
        let mut world = layout_world(3, 1, layout);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::CommitSelection {
                path: ids(&[0, 1, 2]),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::CommandRejected {
                reason: RejectionReason::InvalidSelection
            }]
        );
    }

    #[test]
    fn acknowledging_spawns_clears_new_flags() {
        let mut world = World::new(Config::new(Balance::default(), 9)).expect("world");
        assert!(query::tile_view(&world).iter().all(|tile| tile.is_new));

        let mut events = Vec::new();
        apply(&mut world, Command::AcknowledgeSpawns, &mut events);

        assert!(events.is_empty());
        assert!(query::tile_view(&world).iter().all(|tile| !tile.is_new));
    }

    #[test]
    fn choosing_without_an_offer_is_rejected() {
        let mut world = layout_world(1, 1, vec![TileSeed::new(TileKind::Coin)]);
        let mut events = Vec::new();
        apply(&mut world, Command::ChooseUpgrade { choice: 0 }, &mut events);
        assert_eq!(
            events,
            vec![Event::CommandRejected {
                reason: RejectionReason::NoPendingDraft
            }]
        );
    }
}
