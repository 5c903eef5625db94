#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure selection system that turns drag input into chain commit commands.

use dungeon_raid_core::{Command, EnginePhase, Event, TileId, TileView};
use tracing::debug;

/// Drag input resolved to tiles by the adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionInput {
    /// Pointer pressed on a tile.
    Start(TileId),
    /// Pointer moved onto a tile while pressed.
    Extend(TileId),
    /// Pointer released.
    End,
}

/// Drag-chain state machine with backtracking.
///
/// The session only starts new drags while the engine is idle, as reported
/// through [`Event::PhaseChanged`].
#[derive(Clone, Debug)]
pub struct SelectionSession {
    phase: EnginePhase,
    dragging: bool,
    path: Vec<TileId>,
}

impl Default for SelectionSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionSession {
    /// Creates an idle session that assumes the engine starts idle.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: EnginePhase::Idle,
            dragging: false,
            path: Vec::new(),
        }
    }

    /// Tiles selected so far, in drag order.
    #[must_use]
    pub fn path(&self) -> &[TileId] {
        &self.path
    }

    /// Reports whether a drag is in progress.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Engine phase last observed by the session.
    #[must_use]
    pub const fn phase(&self) -> EnginePhase {
        self.phase
    }

    /// Begins a drag at `tile`, restarting any drag in progress.
    ///
    /// Returns `false` without changing state unless the engine is idle.
    pub fn start(&mut self, tile: TileId) -> bool {
        if !self.phase.accepts_input() {
            return false;
        }
        self.dragging = true;
        self.path.clear();
        self.path.push(tile);
        true
    }

    /// Extends, backtracks or ignores according to the current path.
    ///
    /// Returns whether the path changed.
    pub fn extend(&mut self, tile: TileId, view: &TileView) -> bool {
        if !self.dragging {
            return false;
        }

        let length = self.path.len();
        if length >= 2 && self.path[length - 2] == tile {
            let _ = self.path.pop();
            return true;
        }
        if self.path.contains(&tile) {
            return false;
        }

        let Some(last) = self.path.last().copied() else {
            return false;
        };
        let (Some(from), Some(to)) = (view.tile(last), view.tile(tile)) else {
            return false;
        };
        if from.cell.is_adjacent(to.cell) && from.kind.links_with(to.kind) {
            self.path.push(tile);
            true
        } else {
            false
        }
    }

    /// Finishes the drag, emitting the path as a commit regardless of length.
    ///
    /// Returns whether a drag was in progress.
    pub fn end(&mut self, out: &mut Vec<Command>) -> bool {
        if !self.dragging {
            return false;
        }
        self.dragging = false;
        let path = std::mem::take(&mut self.path);
        debug!(length = path.len(), "selection committed");
        out.push(Command::CommitSelection { path });
        true
    }

    /// Abandons the drag without committing; returns whether one was active.
    pub fn cancel(&mut self) -> bool {
        if !self.dragging {
            return false;
        }
        self.dragging = false;
        self.path.clear();
        true
    }

    /// Consumes world events and one input to emit commit commands.
    ///
    /// A drag in progress is cancelled when the engine leaves the idle phase
    /// or the grid collapses under it. Returns whether the path changed.
    pub fn handle(
        &mut self,
        events: &[Event],
        input: Option<SelectionInput>,
        view: &TileView,
        out: &mut Vec<Command>,
    ) -> bool {
        let mut changed = false;
        for event in events {
            match event {
                Event::PhaseChanged { phase } => {
                    self.phase = *phase;
                    if !phase.accepts_input() {
                        changed |= self.cancel();
                    }
                }
                Event::GridCollapsed { .. } => changed |= self.cancel(),
                _ => {}
            }
        }

        match input {
            Some(SelectionInput::Start(tile)) if view.tile(tile).is_some() => {
                changed |= self.start(tile);
            }
            Some(SelectionInput::Extend(tile)) => changed |= self.extend(tile, view),
            Some(SelectionInput::End) => changed |= self.end(out),
            Some(SelectionInput::Start(_)) | None => {}
        }
        changed
    }
}
