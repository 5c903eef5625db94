//! Fixed-size tile matrix with gravity and refill.

use std::collections::{HashMap, HashSet};

use dungeon_raid_core::{
    Balance, BalanceError, CellCoord, CombatStats, TileId, TileKind, TileSnapshot, TileView,
};
use rand::Rng;

/// Hand-authored tile used to build deterministic layouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileSeed {
    kind: TileKind,
    stats: Option<CombatStats>,
}

impl TileSeed {
    /// Creates a seed of the provided kind.
    ///
    /// Enemy seeds created this way receive the baseline enemy stats.
    #[must_use]
    pub const fn new(kind: TileKind) -> Self {
        Self { kind, stats: None }
    }

    /// Creates an enemy seed with explicit statistics.
    #[must_use]
    pub const fn enemy(attack: u32, defense: u32, hp: i32) -> Self {
        Self {
            kind: TileKind::Enemy,
            stats: Some(CombatStats::new(attack, defense, hp)),
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Tile {
    pub(crate) id: TileId,
    pub(crate) kind: TileKind,
    pub(crate) cell: CellCoord,
    pub(crate) is_new: bool,
    pub(crate) turns_alive: u32,
    pub(crate) stats: Option<CombatStats>,
}

impl Tile {
    fn snapshot(&self) -> TileSnapshot {
        TileSnapshot {
            id: self.id,
            kind: self.kind,
            cell: self.cell,
            is_new: self.is_new,
            turns_alive: self.turns_alive,
            stats: self.stats,
        }
    }
}

/// Stat bands rolled for freshly spawned enemies.
#[derive(Clone, Copy, Debug)]
struct EnemyBand {
    attack: u32,
    attack_spread: u32,
    defense: u32,
    hp: i32,
    hp_spread: i32,
}

impl EnemyBand {
    fn from_balance(balance: &Balance) -> Self {
        Self {
            attack: balance.enemy_attack,
            attack_spread: balance.enemy_attack_spread,
            defense: balance.enemy_defense,
            hp: balance.enemy_hp,
            hp_spread: balance.enemy_hp_spread,
        }
    }

    fn baseline(&self) -> CombatStats {
        CombatStats::new(self.attack, self.defense, self.hp)
    }

    fn roll<R: Rng>(&self, rng: &mut R) -> CombatStats {
        let attack = rng.gen_range(
            self.attack.saturating_sub(self.attack_spread)
                ..=self.attack.saturating_add(self.attack_spread),
        );
        let hp = rng.gen_range(
            self.hp.saturating_sub(self.hp_spread)..=self.hp.saturating_add(self.hp_spread),
        );
        CombatStats::new(attack, self.defense, hp)
    }
}

/// Tiles removed and created by a single collapse.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct CollapseReport {
    pub(crate) removed: Vec<TileId>,
    pub(crate) spawned: Vec<TileId>,
}

/// Row-major tile storage that is full whenever it is observable.
#[derive(Clone, Debug)]
pub(crate) struct TileGrid {
    columns: u32,
    rows: u32,
    cells: Vec<Option<Tile>>,
    index: HashMap<TileId, usize>,
    next_id: u32,
    enemies: EnemyBand,
}

impl TileGrid {
    fn empty(balance: &Balance) -> Self {
        Self {
            columns: balance.columns,
            rows: balance.rows,
            cells: vec![None; balance.cell_count()],
            index: HashMap::with_capacity(balance.cell_count()),
            next_id: 0,
            enemies: EnemyBand::from_balance(balance),
        }
    }

    /// Fills a fresh grid with uniformly random tiles.
    pub(crate) fn generate<R: Rng>(balance: &Balance, rng: &mut R) -> Self {
        let mut grid = Self::empty(balance);
        for row in 0..grid.rows {
            for column in 0..grid.columns {
                let (kind, stats) = grid.roll_tile(rng);
                let _ = grid.place(CellCoord::new(column, row), kind, stats, true);
            }
        }
        grid
    }

    /// Builds a grid from row-major seeds; the seeds must cover every cell.
    pub(crate) fn from_layout(balance: &Balance, layout: Vec<TileSeed>) -> Result<Self, BalanceError> {
        let expected = balance.cell_count();
        if layout.len() != expected {
            return Err(BalanceError::LayoutMismatch {
                expected,
                actual: layout.len(),
            });
        }

        let mut grid = Self::empty(balance);
        let mut seeds = layout.into_iter();
        for row in 0..grid.rows {
            for column in 0..grid.columns {
                let Some(seed) = seeds.next() else {
                    continue;
                };
                let stats = match seed.kind {
                    TileKind::Enemy => Some(seed.stats.unwrap_or_else(|| grid.enemies.baseline())),
                    _ => None,
                };
                let _ = grid.place(CellCoord::new(column, row), seed.kind, stats, false);
            }
        }
        Ok(grid)
    }

    pub(crate) const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    fn cell_index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() >= self.columns || cell.row() >= self.rows {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        Some(row * width + column)
    }

    /// Returns the tile at `cell`; `None` when out of bounds.
    pub(crate) fn get(&self, cell: CellCoord) -> Option<&Tile> {
        self.cell_index(cell)
            .and_then(|index| self.cells.get(index))
            .and_then(Option::as_ref)
    }

    pub(crate) fn tile(&self, id: TileId) -> Option<&Tile> {
        self.index
            .get(&id)
            .and_then(|index| self.cells.get(*index))
            .and_then(Option::as_ref)
    }

    pub(crate) fn tile_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        let index = *self.index.get(&id)?;
        self.cells.get_mut(index).and_then(Option::as_mut)
    }

    /// Reports whether two tiles occupy touching cells, diagonals included.
    pub(crate) fn is_adjacent(&self, first: TileId, second: TileId) -> bool {
        match (self.tile(first), self.tile(second)) {
            (Some(first), Some(second)) => first.cell.is_adjacent(second.cell),
            _ => false,
        }
    }

    /// Checks that `path` is a chain the player could have dragged.
    ///
    /// Every id must be on the grid and appear once, and each step must move to
    /// an adjacent tile whose kind links with the previous one.
    pub(crate) fn is_valid_chain(&self, path: &[TileId]) -> bool {
        let mut seen = HashSet::with_capacity(path.len());
        if !path.iter().all(|id| self.tile(*id).is_some() && seen.insert(*id)) {
            return false;
        }

        path.windows(2).all(|pair| {
            let (Some(from), Some(to)) = (self.tile(pair[0]), self.tile(pair[1])) else {
                return false;
            };
            self.is_adjacent(from.id, to.id) && from.kind.links_with(to.kind)
        })
    }

    /// Iterates the tiles in row-major order.
    pub(crate) fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.cells.iter().flatten()
    }

    fn tiles_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.cells.iter_mut().flatten()
    }

    /// Identifiers of every enemy in row-major order.
    pub(crate) fn enemy_ids(&self) -> Vec<TileId> {
        self.tiles()
            .filter(|tile| tile.kind == TileKind::Enemy)
            .map(|tile| tile.id)
            .collect()
    }

    pub(crate) fn clear_new_flags(&mut self) {
        for tile in self.tiles_mut() {
            tile.is_new = false;
        }
    }

    pub(crate) fn age_tiles(&mut self) {
        for tile in self.tiles_mut() {
            tile.turns_alive = tile.turns_alive.saturating_add(1);
        }
    }

    /// Turns every enemy into `kind` in place, keeping ids and cells.
    pub(crate) fn convert_enemies(&mut self, kind: TileKind) -> usize {
        let mut converted = 0;
        for tile in self.tiles_mut() {
            if tile.kind == TileKind::Enemy {
                tile.kind = kind;
                tile.stats = None;
                converted += 1;
            }
        }
        converted
    }

    /// Removes the listed tiles, applies gravity per column and refills the top.
    ///
    /// Unknown and repeated ids are ignored. Survivors keep their relative
    /// order within a column; survivors that move lose `is_new`.
    pub(crate) fn remove_and_collapse<R: Rng>(
        &mut self,
        ids: &[TileId],
        rng: &mut R,
    ) -> CollapseReport {
        let mut report = CollapseReport::default();
        for id in ids {
            let Some(index) = self.index.remove(id) else {
                continue;
            };
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = None;
            }
            report.removed.push(*id);
        }

        if report.removed.is_empty() {
            return report;
        }

        for column in 0..self.columns {
            let mut write_row = self.rows;
            for row in (0..self.rows).rev() {
                let Some(from) = self.cell_index(CellCoord::new(column, row)) else {
                    continue;
                };
                let Some(mut tile) = self.cells[from].take() else {
                    continue;
                };
                write_row -= 1;
                let cell = CellCoord::new(column, write_row);
                let Some(to) = self.cell_index(cell) else {
                    continue;
                };
                if to != from {
                    tile.is_new = false;
                }
                tile.cell = cell;
                let _ = self.index.insert(tile.id, to);
                self.cells[to] = Some(tile);
            }

            for row in 0..write_row {
                let (kind, stats) = self.roll_tile(rng);
                if let Some(id) = self.place(CellCoord::new(column, row), kind, stats, true) {
                    report.spawned.push(id);
                }
            }
        }

        report
    }

    fn roll_tile<R: Rng>(&self, rng: &mut R) -> (TileKind, Option<CombatStats>) {
        let kind = TileKind::ALL[rng.gen_range(0..TileKind::ALL.len())];
        let stats = match kind {
            TileKind::Enemy => Some(self.enemies.roll(rng)),
            _ => None,
        };
        (kind, stats)
    }

    fn place(
        &mut self,
        cell: CellCoord,
        kind: TileKind,
        stats: Option<CombatStats>,
        is_new: bool,
    ) -> Option<TileId> {
        let index = self.cell_index(cell)?;
        let id = TileId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        let _ = self.index.insert(id, index);
        self.cells[index] = Some(Tile {
            id,
            kind,
            cell,
            is_new,
            turns_alive: 0,
            stats,
        });
        Some(id)
    }

    /// Captures an immutable snapshot for queries.
    pub(crate) fn view(&self) -> TileView {
        let snapshots = self.tiles().map(Tile::snapshot).collect();
        TileView::from_snapshots(self.columns, self.rows, snapshots)
    }
}
