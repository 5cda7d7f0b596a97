/*
grid.rs

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

//! Occupancy map of the puzzle grid.
//!
//! The [`GridModel`] object is the authoritative view of the cells for one puzzle: which cells
//! are obstacles, which cells hold a numbered point, and which path currently occupies a cell.
//! Points are permanent anchors: releasing a point cell never clears it.

use std::fmt;

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

use crate::generator::level::Point;
use crate::path_engine::DrawnPath;

/// Cell coordinates in the grid.
#[derive(
    Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    /// Create a [`Position`] object.
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Manhattan distance between two positions.
    pub fn distance(self, other: Position) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Whether the two positions share an edge (4-directional adjacency).
    pub fn is_adjacent(self, other: Position) -> bool {
        self.distance(other) == 1
    }

    /// Index of the position in a row-major `size`×`size` matrix.
    pub fn index(self, size: usize) -> usize {
        self.row * size + self.col
    }

    /// Position for the given row-major index.
    pub fn from_index(index: usize, size: usize) -> Self {
        Self::new(index / size, index % size)
    }

    /// The four corners of a `size`×`size` grid.
    pub fn corners(size: usize) -> [Position; 4] {
        let last: usize = size.saturating_sub(1);
        [
            Position::new(0, 0),
            Position::new(0, last),
            Position::new(last, 0),
            Position::new(last, last),
        ]
    }

    /// Adjacent positions that lie within a `size`×`size` grid.
    pub fn neighbors(self, size: usize) -> impl Iterator<Item = Position> {
        let Position { row, col } = self;
        [
            row.checked_sub(1).map(|r| Position::new(r, col)),
            (row + 1 < size).then(|| Position::new(row + 1, col)),
            col.checked_sub(1).map(|c| Position::new(row, c)),
            (col + 1 < size).then(|| Position::new(row, col + 1)),
        ]
        .into_iter()
        .flatten()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// State of a single grid cell.
///
/// A cell is never an obstacle and a point, and an obstacle is never occupied.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Cell {
    pub position: Position,
    pub is_obstacle: bool,

    /// Number of the point anchored on this cell.
    pub point: Option<usize>,

    /// Number of the path that goes through this cell.
    pub occupied_by: Option<usize>,
}

impl Cell {
    /// Whether the cell is neither an obstacle nor occupied.
    pub fn is_free(&self) -> bool {
        !self.is_obstacle && self.occupied_by.is_none()
    }
}

/// Errors raised when changing the occupancy of a cell.
#[derive(Debug, Display, Error, Copy, Clone, PartialEq, Eq)]
pub enum GridError {
    #[display("cell {_0} is outside the grid")]
    OutOfBounds(#[error(not(source))] Position),

    #[display("cell {_0} is an obstacle")]
    Obstacle(#[error(not(source))] Position),
}

/// Authoritative occupancy map for one puzzle instance.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct GridModel {
    size: usize,

    /// Cells in row-major order.
    cells: Vec<Cell>,
}

impl GridModel {
    /// Create a [`GridModel`] object with the given points and obstacles.
    pub fn new(size: usize, points: &[Point], obstacles: &[Position]) -> Self {
        let mut grid: GridModel = Self::default();
        grid.initialize(size, points, obstacles);
        grid
    }

    /// Rebuild the cell matrix, mark the obstacles and the points, and clear the occupancy.
    ///
    /// Points or obstacles outside the grid are ignored.
    pub fn initialize(&mut self, size: usize, points: &[Point], obstacles: &[Position]) {
        self.size = size;
        self.cells = (0..size * size)
            .map(|i| Cell {
                position: Position::from_index(i, size),
                ..Cell::default()
            })
            .collect();

        for pos in obstacles {
            if let Some(cell) = self.cell_mut(*pos) {
                cell.is_obstacle = true;
            }
        }
        for point in points {
            if let Some(cell) = self.cell_mut(point.position) {
                cell.is_obstacle = false;
                cell.point = Some(point.number);
            }
        }
    }

    /// Number of rows (and columns) in the grid.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether the position lies within the grid.
    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    /// Return the cell at the given position, or None if the position is outside the grid.
    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        if self.contains(pos) {
            self.cells.get(pos.index(self.size))
        } else {
            None
        }
    }

    fn cell_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        if self.contains(pos) {
            self.cells.get_mut(pos.index(self.size))
        } else {
            None
        }
    }

    /// Iterate over all the cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Number of the point at the given position, if any.
    pub fn point_at(&self, pos: Position) -> Option<usize> {
        self.cell(pos).and_then(|c| c.point)
    }

    /// Whether the position is an obstacle. Positions outside the grid are not obstacles.
    pub fn is_obstacle(&self, pos: Position) -> bool {
        self.cell(pos).is_some_and(|c| c.is_obstacle)
    }

    /// Number of the path occupying the given position, if any.
    pub fn occupant(&self, pos: Position) -> Option<usize> {
        self.cell(pos).and_then(|c| c.occupied_by)
    }

    /// Mark a cell as belonging to the given path.
    ///
    /// # Errors
    ///
    /// The method returns an error if the position is outside the grid or is an obstacle. The
    /// grid is not modified in that case.
    pub fn occupy(&mut self, pos: Position, path_number: usize) -> Result<(), GridError> {
        let cell: &mut Cell = self.cell_mut(pos).ok_or(GridError::OutOfBounds(pos))?;
        if cell.is_obstacle {
            return Err(GridError::Obstacle(pos));
        }
        cell.occupied_by = Some(path_number);
        Ok(())
    }

    /// Clear the occupancy of a cell. Point cells are never released.
    pub fn release(&mut self, pos: Position) {
        if let Some(cell) = self.cell_mut(pos)
            && cell.point.is_none()
        {
            cell.occupied_by = None;
        }
    }

    /// Return the positions at Manhattan distance 1 that lie within the grid.
    pub fn neighbors(&self, pos: Position) -> Vec<Position> {
        if !self.contains(pos) {
            return Vec::new();
        }
        pos.neighbors(self.size).collect()
    }

    /// Reset the occupancy of every cell, points included, and replay the given paths.
    pub fn rebuild_from_paths<'a, I>(&mut self, paths: I)
    where
        I: IntoIterator<Item = &'a DrawnPath>,
    {
        for cell in &mut self.cells {
            cell.occupied_by = None;
        }
        for path in paths {
            for pos in path.cells() {
                // Paths come from the engine, which never stores an obstacle cell
                let _ = self.occupy(*pos, path.number());
            }
        }
    }

    /// Copy of the occupancy map in row-major order.
    pub fn occupancy(&self) -> Vec<Option<usize>> {
        self.cells.iter().map(|c| c.occupied_by).collect()
    }
}

impl fmt::Display for GridModel {
    /// ASCII view of the grid: `#` for obstacles, point numbers, `.` for free cells, and `*`
    /// for occupied cells.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.cells.chunks(self.size.max(1)) {
            let line: Vec<String> = row
                .iter()
                .map(|c| match (c.is_obstacle, c.point, c.occupied_by) {
                    (true, _, _) => String::from("#"),
                    (_, Some(n), _) => n.to_string(),
                    (_, None, Some(_)) => String::from("*"),
                    _ => String::from("."),
                })
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_grid() -> GridModel {
        let points: Vec<Point> = vec![
            Point::new(1, Position::new(0, 0)),
            Point::new(2, Position::new(3, 3)),
        ];
        GridModel::new(4, &points, &[Position::new(1, 1), Position::new(2, 2)])
    }

    #[test]
    fn initialize_marks_points_and_obstacles() {
        let grid: GridModel = sample_grid();
        assert_eq!(grid.size(), 4);
        assert_eq!(grid.cells().count(), 16);
        assert_eq!(grid.point_at(Position::new(0, 0)), Some(1));
        assert_eq!(grid.point_at(Position::new(3, 3)), Some(2));
        assert!(grid.is_obstacle(Position::new(1, 1)));
        assert!(grid.is_obstacle(Position::new(2, 2)));
        assert!(grid.occupancy().iter().all(Option::is_none));
    }

    #[test]
    fn occupy_rejects_obstacles_and_out_of_bounds() {
        let mut grid: GridModel = sample_grid();
        assert_eq!(
            grid.occupy(Position::new(1, 1), 1),
            Err(GridError::Obstacle(Position::new(1, 1)))
        );
        assert_eq!(
            grid.occupy(Position::new(4, 0), 1),
            Err(GridError::OutOfBounds(Position::new(4, 0)))
        );
        assert_eq!(grid.occupant(Position::new(1, 1)), None);

        assert!(grid.occupy(Position::new(0, 1), 1).is_ok());
        assert_eq!(grid.occupant(Position::new(0, 1)), Some(1));
    }

    #[test]
    fn release_keeps_point_cells() {
        let mut grid: GridModel = sample_grid();
        grid.occupy(Position::new(0, 0), 1).unwrap();
        grid.occupy(Position::new(0, 1), 1).unwrap();

        grid.release(Position::new(0, 0));
        grid.release(Position::new(0, 1));

        assert_eq!(grid.occupant(Position::new(0, 0)), Some(1));
        assert_eq!(grid.occupant(Position::new(0, 1)), None);
    }

    #[test]
    fn neighbors_stay_within_bounds() {
        let grid: GridModel = sample_grid();
        let mut corner: Vec<Position> = grid.neighbors(Position::new(0, 0));
        corner.sort();
        assert_eq!(corner, vec![Position::new(0, 1), Position::new(1, 0)]);

        assert_eq!(grid.neighbors(Position::new(2, 1)).len(), 4);
        assert_eq!(grid.neighbors(Position::new(3, 2)).len(), 3);
        assert!(grid.neighbors(Position::new(7, 7)).is_empty());
    }

    #[test]
    fn rebuild_replays_paths_and_drops_stale_occupancy() {
        let mut grid: GridModel = sample_grid();
        grid.occupy(Position::new(2, 0), 5).unwrap();

        let path: DrawnPath = DrawnPath::from_cells(
            1,
            vec![
                Position::new(0, 0),
                Position::new(0, 1),
                Position::new(0, 2),
            ],
        );
        grid.rebuild_from_paths([&path]);

        assert_eq!(grid.occupant(Position::new(2, 0)), None);
        assert_eq!(grid.occupant(Position::new(0, 0)), Some(1));
        assert_eq!(grid.occupant(Position::new(0, 2)), Some(1));
        assert_eq!(grid.occupancy().iter().flatten().count(), 3);
    }

    #[test]
    fn display_renders_ascii_grid() {
        let grid: GridModel = sample_grid();
        let text: String = grid.to_string();
        assert_eq!(text, "1 . . .\n. # . .\n. . # .\n. . . 2\n");
    }
}
