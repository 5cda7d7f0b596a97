/*
level.rs

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

//! Level representation.
//!
//! A [`Level`] is created once, by the generator or by loading a level pack, and is then
//! consumed read-only for the duration of the puzzle.

use std::collections::HashSet;

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

use crate::grid::Position;

/// Numbered anchor cell.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Point {
    pub number: usize,
    pub position: Position,
}

impl Point {
    /// Create a [`Point`] object.
    pub const fn new(number: usize, position: Position) -> Self {
        Self { number, position }
    }
}

/// Portion of the reference solution between two consecutive points.
///
/// `cells` includes both endpoints.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SolutionSegment {
    pub from: usize,
    pub to: usize,
    pub cells: Vec<Position>,
}

/// Problems detected in a level definition.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum LevelError {
    #[display("the level has an empty grid")]
    EmptyGrid,

    #[display("a level needs at least two points, found {_0}")]
    TooFewPoints(#[error(not(source))] usize),

    #[display("point numbers must be 1..={_0} without gaps")]
    NonContiguousPoints(#[error(not(source))] usize),

    #[display("cell {_0} is outside the grid")]
    OutOfBounds(#[error(not(source))] Position),

    #[display("cell {_0} holds more than one point or obstacle")]
    Overlap(#[error(not(source))] Position),

    #[display("solution segment {from}->{to} is not a valid path")]
    BrokenSegment { from: usize, to: usize },
}

/// Puzzle definition.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Level {
    /// Number of rows and columns.
    pub size: usize,

    /// Points, sorted by number.
    pub points: Vec<Point>,

    pub obstacles: Vec<Position>,

    /// One segment per consecutive point pair: 1→2, 2→3, ...
    #[serde(default)]
    pub solution: Vec<SolutionSegment>,
}

impl Level {
    /// Number of points in the level.
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Return the point with the given number.
    pub fn point(&self, number: usize) -> Option<&Point> {
        self.points.iter().find(|p| p.number == number)
    }

    /// Return the number of the point at the given position.
    pub fn point_at(&self, pos: Position) -> Option<usize> {
        self.points
            .iter()
            .find(|p| p.position == pos)
            .map(|p| p.number)
    }

    /// Return the solution segment that starts at the given point number.
    pub fn segment_from(&self, number: usize) -> Option<&SolutionSegment> {
        self.solution.iter().find(|s| s.from == number)
    }

    /// Number of cells that are not obstacles.
    pub fn free_cell_count(&self) -> usize {
        (self.size * self.size).saturating_sub(self.obstacles.len())
    }

    /// Rebuild the full solution path from the segments.
    ///
    /// Junction cells shared by two consecutive segments appear once.
    pub fn solution_path(&self) -> Vec<Position> {
        let mut path: Vec<Position> = Vec::new();
        for segment in &self.solution {
            let skip: usize = usize::from(!path.is_empty());
            path.extend(segment.cells.iter().skip(skip));
        }
        path
    }

    /// Verify the level definition, typically after loading it from a level pack.
    ///
    /// # Errors
    ///
    /// The method returns the first problem found: an empty grid, fewer than two points,
    /// non-contiguous point numbers, cells outside the grid, overlapping points and
    /// obstacles, or a solution segment that does not join its two points.
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.size == 0 {
            return Err(LevelError::EmptyGrid);
        }
        let n: usize = self.points.len();
        if n < 2 {
            return Err(LevelError::TooFewPoints(n));
        }
        let numbers: HashSet<usize> = self.points.iter().map(|p| p.number).collect();
        if numbers.len() != n || !(1..=n).all(|k| numbers.contains(&k)) {
            return Err(LevelError::NonContiguousPoints(n));
        }

        let mut used: HashSet<Position> = HashSet::with_capacity(n + self.obstacles.len());
        let anchors = self
            .points
            .iter()
            .map(|p| p.position)
            .chain(self.obstacles.iter().copied());
        for pos in anchors {
            if pos.row >= self.size || pos.col >= self.size {
                return Err(LevelError::OutOfBounds(pos));
            }
            if !used.insert(pos) {
                return Err(LevelError::Overlap(pos));
            }
        }

        let obstacles: HashSet<&Position> = self.obstacles.iter().collect();
        for segment in &self.solution {
            let broken = LevelError::BrokenSegment {
                from: segment.from,
                to: segment.to,
            };
            let (Some(first), Some(last)) = (segment.cells.first(), segment.cells.last()) else {
                return Err(broken);
            };
            if segment.to != segment.from + 1
                || self.point(segment.from).map(|p| p.position) != Some(*first)
                || self.point(segment.to).map(|p| p.position) != Some(*last)
                || segment.cells.windows(2).any(|w| !w[0].is_adjacent(w[1]))
                || segment.cells.iter().any(|c| obstacles.contains(c))
            {
                return Err(broken);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(row: usize, col: usize) -> Position {
        Position::new(row, col)
    }

    fn two_point_level() -> Level {
        Level {
            size: 2,
            points: vec![Point::new(1, p(0, 0)), Point::new(2, p(1, 0))],
            obstacles: Vec::new(),
            solution: vec![SolutionSegment {
                from: 1,
                to: 2,
                cells: vec![p(0, 0), p(0, 1), p(1, 1), p(1, 0)],
            }],
        }
    }

    #[test]
    fn valid_level_passes() {
        assert_eq!(two_point_level().validate(), Ok(()));
    }

    #[test]
    fn gaps_in_point_numbers_are_rejected() {
        let mut level: Level = two_point_level();
        level.points[1].number = 3;
        assert_eq!(level.validate(), Err(LevelError::NonContiguousPoints(2)));
    }

    #[test]
    fn point_on_obstacle_is_rejected() {
        let mut level: Level = two_point_level();
        level.obstacles.push(p(0, 0));
        assert_eq!(level.validate(), Err(LevelError::Overlap(p(0, 0))));
    }

    #[test]
    fn broken_segment_is_rejected() {
        let mut level: Level = two_point_level();
        level.solution[0].cells = vec![p(0, 0), p(1, 1), p(1, 0)];
        assert_eq!(
            level.validate(),
            Err(LevelError::BrokenSegment { from: 1, to: 2 })
        );
    }

    #[test]
    fn solution_path_shares_junctions_once() {
        let level = Level {
            size: 3,
            points: vec![
                Point::new(1, p(0, 0)),
                Point::new(2, p(0, 2)),
                Point::new(3, p(1, 2)),
            ],
            obstacles: Vec::new(),
            solution: vec![
                SolutionSegment {
                    from: 1,
                    to: 2,
                    cells: vec![p(0, 0), p(0, 1), p(0, 2)],
                },
                SolutionSegment {
                    from: 2,
                    to: 3,
                    cells: vec![p(0, 2), p(1, 2)],
                },
            ],
        };
        assert_eq!(
            level.solution_path(),
            vec![p(0, 0), p(0, 1), p(0, 2), p(1, 2)]
        );
        assert_eq!(level.segment_from(2).map(|s| s.to), Some(3));
        assert_eq!(level.point_at(p(0, 2)), Some(2));
    }

    #[test]
    fn level_json_round_trip() {
        let level: Level = two_point_level();
        let json: String = serde_json::to_string(&level).unwrap();
        let back: Level = serde_json::from_str(&json).unwrap();
        assert_eq!(back, level);
    }
}
