//! Wires the world to the selection and drafting systems.

use anyhow::{bail, Context, Result};
use dungeon_raid_core::{Balance, CellCoord, Command, Event};
use dungeon_raid_system_drafting::{Config as DraftingConfig, Drafting};
use dungeon_raid_system_selection::{SelectionInput, SelectionSession};
use dungeon_raid_world::{self as world, query, Config as WorldConfig, World};

use crate::input::cell_label;

/// Mixed into the run seed so the draft stream differs from the grid stream.
const DRAFT_SEED_SALT: u64 = 0x6472_6166_7473;

/// A running game plus the systems that feed it commands.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    selection: SelectionSession,
    drafting: Drafting,
    seed: u64,
}

impl Simulation {
    /// Starts a run from `seed` with the persisted best score.
    pub(crate) fn new(balance: Balance, seed: u64, high_score: u32) -> Result<Self> {
        let world = World::new(WorldConfig::new(balance, seed).with_high_score(high_score))
            .context("failed to create the world")?;
        Ok(Self::from_world(world, seed))
    }

    fn from_world(world: World, seed: u64) -> Self {
        let drafting = Drafting::new(DraftingConfig::new(
            query::balance(&world).draft_size,
            seed ^ DRAFT_SEED_SALT,
        ));
        Self {
            world,
            selection: SelectionSession::new(),
            drafting,
            seed,
        }
    }

    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    pub(crate) fn seed(&self) -> u64 {
        self.seed
    }

    /// Drags through `cells` in order and releases.
    ///
    /// Fails without committing when a cell is empty or does not continue the chain.
    pub(crate) fn select(&mut self, cells: &[CellCoord]) -> Result<Vec<Event>> {
        let view = query::tile_view(&self.world);
        let tiles = cells
            .iter()
            .map(|cell| {
                view.at(*cell)
                    .map(|tile| tile.id)
                    .with_context(|| format!("there is no tile at {}", cell_label(*cell)))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut commands = Vec::new();
        for (index, tile) in tiles.iter().enumerate() {
            let input = if index == 0 {
                SelectionInput::Start(*tile)
            } else {
                SelectionInput::Extend(*tile)
            };
            let _ = self
                .selection
                .handle(&[], Some(input), &view, &mut commands);
            if self.selection.path() != &tiles[..=index] {
                let _ = self.selection.cancel();
                if index == 0 {
                    bail!("a chain cannot be started right now");
                }
                bail!("{} does not continue the chain", cell_label(cells[index]));
            }
        }
        let _ = self
            .selection
            .handle(&[], Some(SelectionInput::End), &view, &mut commands);

        Ok(self.pump(commands))
    }

    pub(crate) fn activate_skill(&mut self, slot: usize) -> Vec<Event> {
        self.pump(vec![Command::ActivateSkill { slot }])
    }

    pub(crate) fn choose_upgrade(&mut self, choice: usize) -> Vec<Event> {
        self.pump(vec![Command::ChooseUpgrade { choice }])
    }

    /// Tells the world the latest spawns have been shown.
    pub(crate) fn acknowledge_spawns(&mut self) {
        let _ = self.pump(vec![Command::AcknowledgeSpawns]);
    }

    /// Replaces the run with a fresh one on the next seed.
    pub(crate) fn restart(&mut self, high_score: u32) -> Result<()> {
        let balance = query::balance(&self.world).clone();
        *self = Self::new(balance, self.seed.wrapping_add(1), high_score)?;
        Ok(())
    }

    /// Applies commands until the systems stop answering, returning every event.
    fn pump(&mut self, mut pending: Vec<Command>) -> Vec<Event> {
        let mut log = Vec::new();
        while !pending.is_empty() {
            let mut events = Vec::new();
            for command in std::mem::take(&mut pending) {
                world::apply(&mut self.world, command, &mut events);
            }
            let view = query::tile_view(&self.world);
            let _ = self.selection.handle(&events, None, &view, &mut pending);
            self.drafting.handle(&events, &mut pending);
            log.extend(events);
        }
        log
    }
}
