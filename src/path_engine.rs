/*
path_engine.rs

Copyright 2025 Hervé Quatremain

This file is part of Gridlink.

Gridlink is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Gridlink is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Gridlink. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Validate the paths that the player draws.
//!
//! The player connects the points in increasing order. Path `k` starts on point `k` and ends
//! on point `k + 1`. The [`PathEngine`] object accepts the strokes cell by cell:
//!
//! * [`PathEngine::try_start`] starts a path on the point that is expected next.
//! * [`PathEngine::try_extend`] adds a cell to the active path. Moving back over a cell of the
//!   active path truncates the path at that cell. Reaching the next point commits the path.
//! * [`PathEngine::cancel`] discards the active path.
//! * [`PathEngine::undo`] reverts the last commit from the history.
//!
//! Invalid strokes are not errors: the methods return a [`Rejection`] that the caller uses to
//! give feedback to the player.

use log::{debug, info, warn};
use std::collections::BTreeSet;

use derive_more::{Display, IsVariant};
use serde::{Deserialize, Serialize};

use crate::config::HINT_LENGTH;
use crate::events::{Event, EventBus};
use crate::generator::level::{Level, SolutionSegment};
use crate::grid::{Cell, GridModel, Position};
use crate::history::{HistorySnapshotStore, Snapshot};

/// Path drawn by the player, committed or in progress.
///
/// The first cell is the point that gives its number to the path.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DrawnPath {
    number: usize,
    cells: Vec<Position>,
}

impl DrawnPath {
    /// Create a [`DrawnPath`] object that contains only the starting point.
    pub fn new(number: usize, start: Position) -> Self {
        Self {
            number,
            cells: vec![start],
        }
    }

    /// Create a [`DrawnPath`] object from a list of cells.
    pub fn from_cells(number: usize, cells: Vec<Position>) -> Self {
        Self { number, cells }
    }

    /// Number of the point where the path starts.
    pub fn number(&self) -> usize {
        self.number
    }

    pub fn cells(&self) -> &[Position] {
        &self.cells
    }

    pub fn last(&self) -> Option<Position> {
        self.cells.last().copied()
    }

    /// Index of the given cell in the path.
    pub fn position_of(&self, pos: Position) -> Option<usize> {
        self.cells.iter().position(|c| *c == pos)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn push(&mut self, pos: Position) {
        self.cells.push(pos);
    }

    /// Keep the cells up to `index` included and return the removed cells.
    fn truncate_after(&mut self, index: usize) -> Vec<Position> {
        self.cells.split_off(index + 1)
    }
}

/// Reasons for refusing a stroke.
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq, Hash, IsVariant)]
pub enum Rejection {
    #[display("the cell is not a point")]
    NotAPoint,

    #[display("the point is not the one expected next")]
    WrongPoint,

    #[display("a path is already being drawn")]
    AlreadyDrawing,

    #[display("no path is being drawn")]
    NoActivePath,

    #[display("the cell is already the end of the path")]
    SameCell,

    #[display("the cell is not adjacent to the end of the path")]
    NotAdjacent,

    #[display("the cell is occupied")]
    CellOccupied,

    #[display("the cell is outside the grid or is an obstacle")]
    InvalidCell,

    #[display("the level is complete")]
    Locked,
}

impl Rejection {
    /// Reason code, as reported to the user interface.
    pub fn code(self) -> &'static str {
        match self {
            Rejection::NotAPoint => "not_a_point",
            Rejection::WrongPoint => "wrong_point",
            Rejection::AlreadyDrawing => "already_drawing",
            Rejection::NoActivePath => "no_active_path",
            Rejection::SameCell => "same_cell",
            Rejection::NotAdjacent => "not_adjacent",
            Rejection::CellOccupied => "cell_occupied",
            Rejection::InvalidCell => "invalid_cell",
            Rejection::Locked => "locked",
        }
    }
}

/// Result of an accepted stroke.
#[derive(Debug, Copy, Clone, PartialEq, Eq, IsVariant)]
pub enum StrokeOutcome {
    /// A new path started.
    Started,

    /// The cell was appended to the active path.
    Extended,

    /// The player moved back over the active path, which was truncated.
    Backtracked,

    /// The path reached the next point and was committed.
    Completed { level_complete: bool },
}

/// Puzzle state, derived from the session.
#[derive(Debug, Copy, Clone, PartialEq, Eq, IsVariant)]
pub enum PuzzleState {
    Idle,
    Drawing,
    Completed,
}

/// State of the puzzle being played.
#[derive(Debug, Clone)]
pub struct Session {
    /// Number of the point that starts the next path.
    current_number: usize,

    /// Numbers of the points already connected.
    connected: BTreeSet<usize>,

    committed: Vec<DrawnPath>,
    active: Option<DrawnPath>,
    history: HistorySnapshotStore,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create a [`Session`] object.
    pub fn new() -> Self {
        Self {
            current_number: 1,
            connected: BTreeSet::new(),
            committed: Vec::new(),
            active: None,
            history: HistorySnapshotStore::new(),
        }
    }

    pub fn current_number(&self) -> usize {
        self.current_number
    }

    pub fn connected(&self) -> &BTreeSet<usize> {
        &self.connected
    }

    pub fn committed(&self) -> &[DrawnPath] {
        &self.committed
    }

    pub fn active(&self) -> Option<&DrawnPath> {
        self.active.as_ref()
    }

    pub fn history(&self) -> &HistorySnapshotStore {
        &self.history
    }
}

/// Interactive state machine for one puzzle.
#[derive(Debug)]
pub struct PathEngine {
    level: Level,
    grid: GridModel,
    session: Session,
    events: EventBus,
}

impl PathEngine {
    /// Create a [`PathEngine`] object for the given level.
    pub fn new(level: Level) -> Self {
        let grid: GridModel = GridModel::new(level.size, &level.points, &level.obstacles);
        Self {
            level,
            grid,
            session: Session::new(),
            events: EventBus::new(),
        }
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn grid(&self) -> &GridModel {
        &self.grid
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Event bus, to subscribe to the engine events.
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    /// Whether all the points are connected.
    pub fn is_complete(&self) -> bool {
        let total: usize = self.level.point_count();
        total > 0 && self.session.connected.len() == total
    }

    pub fn state(&self) -> PuzzleState {
        if self.is_complete() {
            PuzzleState::Completed
        } else if self.session.active.is_some() {
            PuzzleState::Drawing
        } else {
            PuzzleState::Idle
        }
    }

    /// Start a path on the given cell.
    ///
    /// The cell must be the point that is expected next, and no path must be in progress.
    pub fn try_start(&mut self, pos: Position) -> Result<StrokeOutcome, Rejection> {
        let cell: Cell = *self.grid.cell(pos).ok_or(Rejection::InvalidCell)?;
        if self.session.active.is_some() {
            return Err(Rejection::AlreadyDrawing);
        }
        let number: usize = cell.point.ok_or(Rejection::NotAPoint)?;
        if number != self.session.current_number {
            return Err(Rejection::WrongPoint);
        }

        self.grid
            .occupy(pos, number)
            .map_err(|_| Rejection::InvalidCell)?;
        self.session.active = Some(DrawnPath::new(number, pos));
        debug!("Path {number} started at {pos}");
        self.events.emit(Event::PathStarted { number, start: pos });
        Ok(StrokeOutcome::Started)
    }

    /// Extend the active path with the given cell.
    pub fn try_extend(&mut self, pos: Position) -> Result<StrokeOutcome, Rejection> {
        let Some(active) = self.session.active.as_ref() else {
            return Err(Rejection::NoActivePath);
        };
        let cell: Cell = *self.grid.cell(pos).ok_or(Rejection::InvalidCell)?;
        if cell.is_obstacle {
            return Err(Rejection::InvalidCell);
        }
        let end: Position = active.last().ok_or(Rejection::NoActivePath)?;
        if pos == end {
            return Err(Rejection::SameCell);
        }
        if !pos.is_adjacent(end) {
            return Err(Rejection::NotAdjacent);
        }

        let number: usize = active.number();
        if let Some(index) = active.position_of(pos) {
            self.backtrack(index);
            return Ok(StrokeOutcome::Backtracked);
        }
        if cell.point == Some(number + 1) {
            return self.commit(pos);
        }
        if cell.point.is_some() || cell.occupied_by.is_some() {
            return Err(Rejection::CellOccupied);
        }

        self.grid
            .occupy(pos, number)
            .map_err(|_| Rejection::InvalidCell)?;
        if let Some(active) = self.session.active.as_mut() {
            active.push(pos);
        }
        self.events.emit(Event::PathExtended { number, cell: pos });
        Ok(StrokeOutcome::Extended)
    }

    /// Truncate the active path after the given index and release the removed cells.
    fn backtrack(&mut self, index: usize) {
        let Some(active) = self.session.active.as_mut() else {
            return;
        };
        let removed: Vec<Position> = active.truncate_after(index);
        let number: usize = active.number();
        let end: Position = active.cells()[index];
        for pos in &removed {
            self.grid.release(*pos);
        }
        self.events.emit(Event::PathTruncated {
            number,
            end,
            removed,
        });
    }

    /// Append the target point to the active path and commit the path.
    ///
    /// The snapshot pushed for undo only holds the committed paths, so it is taken once the
    /// active path is out of the session.
    fn commit(&mut self, pos: Position) -> Result<StrokeOutcome, Rejection> {
        let Some(mut path) = self.session.active.take() else {
            return Err(Rejection::NoActivePath);
        };
        let snapshot: Snapshot = self.snapshot();
        self.session.history.push(snapshot);

        let number: usize = path.number();
        path.push(pos);
        // Target point cells are never obstacles
        let _ = self.grid.occupy(pos, number);

        self.session.connected.insert(number);
        self.session.connected.insert(number + 1);
        self.session.current_number = number + 1;
        self.session.committed.push(path.clone());
        debug!("Path {number} committed ({} cells)", path.len());
        self.events.emit(Event::PathCompleted { path });

        let level_complete: bool = self.is_complete();
        if level_complete {
            info!("Level complete");
            self.events.emit(Event::LevelComplete {
                point_count: self.level.point_count(),
            });
        }
        Ok(StrokeOutcome::Completed { level_complete })
    }

    /// Snapshot of the committed state.
    ///
    /// The occupancy is rebuilt from the committed paths only, so that the cells of the active
    /// path are not part of the snapshot.
    fn snapshot(&self) -> Snapshot {
        let mut grid: GridModel = self.grid.clone();
        grid.rebuild_from_paths(&self.session.committed);
        Snapshot {
            committed: self.session.committed.clone(),
            occupancy: grid.occupancy(),
            connected: self.session.connected.clone(),
            current_number: self.session.current_number,
        }
    }

    /// Discard the active path. Return whether a path was active.
    pub fn cancel(&mut self) -> bool {
        let Some(path) = self.session.active.take() else {
            return false;
        };
        let released: Vec<Position> = path.cells().iter().skip(1).copied().collect();
        for pos in &released {
            self.grid.release(*pos);
        }
        debug!("Path {} cancelled", path.number());
        self.events.emit(Event::PathCancelled {
            number: path.number(),
            released,
        });
        true
    }

    /// Revert the last commit. Return false if there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.session.history.pop() else {
            return false;
        };
        self.session.committed = snapshot.committed;
        self.session.connected = snapshot.connected;
        self.session.current_number = snapshot.current_number;
        self.session.active = None;
        self.grid.rebuild_from_paths(&self.session.committed);
        if self.grid.occupancy() != snapshot.occupancy {
            warn!("Occupancy rebuilt after undo differs from the saved snapshot");
        }

        debug!(
            "Undo applied, next point is {}",
            self.session.current_number
        );
        self.events.emit(Event::UndoApplied {
            current_number: self.session.current_number,
            committed: self.session.committed.clone(),
        });
        true
    }

    /// Restart the puzzle from scratch. The history is cleared.
    pub fn reset(&mut self) {
        self.session = Session::new();
        self.grid.rebuild_from_paths(&self.session.committed);
        debug!("Session reset");
        self.events.emit(Event::SessionReset {
            current_number: self.session.current_number,
        });
    }

    /// Return the next cells of the solution.
    ///
    /// The active path is compared with the solution segment of the current point. The method
    /// returns the cells that follow the longest matching prefix, or None if there is no
    /// segment for the current point or the active path already covers the segment.
    pub fn hint(&self) -> Option<Vec<Position>> {
        let segment: &SolutionSegment = self.level.segment_from(self.session.current_number)?;
        let matched: usize = match &self.session.active {
            Some(active) => active
                .cells()
                .iter()
                .zip(&segment.cells)
                .take_while(|(a, b)| a == b)
                .count(),
            None => 0,
        };
        let next: Vec<Position> = segment
            .cells
            .iter()
            .skip(matched)
            .take(HINT_LENGTH)
            .copied()
            .collect();
        if next.is_empty() { None } else { Some(next) }
    }
}
