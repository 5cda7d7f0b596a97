/*
hamiltonian.rs

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

//! Find a random Hamiltonian path in a grid with obstacles.
//!
//! The search starts from one of the grid corners and performs a depth-first search with
//! backtracking. Candidate cells are visited by ascending number of onward moves (Warnsdorff's
//! rule). Candidates with the same number of onward moves are sometimes shuffled so that the
//! same grid does not always produce the same path.
//!
//! Layouts that cannot hold a Hamiltonian path are rejected before the search starts: the free
//! cells must be connected, at most two of them can be dead ends, and the two checkerboard
//! colors must hold the same number of free cells, give or take one. During the search, a move
//! that strands unvisited cells is abandoned right away.
//!
//! The number of recursive steps is capped. Once the cap is exceeded, the search gives up and
//! the caller can retry with another obstacle layout.

use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;

use super::path::SearchPath;
use crate::grid::Position;

/// Type of errors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// No Hamiltonian path starts from any of the corners.
    NoPath,

    /// The step budget ran out before a path was found.
    StepsExceeded,
}

/// Checkerboard color of a cell.
pub fn color(pos: Position) -> usize {
    (pos.row + pos.col) % 2
}

/// [`HamiltonianSearch`] object.
pub struct HamiltonianSearch<'a> {
    /// Number of rows and columns in the grid.
    size: usize,

    /// Obstacle markers indexed by the row-major cell index.
    blocked: &'a [bool],

    /// Number of cells the path must visit.
    pub num_free_cells: usize,

    /// Recursive steps allowed for one call to [`HamiltonianSearch::find_path`].
    max_steps: usize,

    /// Probability of shuffling the candidate cells that tie under Warnsdorff's rule.
    shuffle_probability: f64,

    /// Number of steps it took to run the last search.
    pub steps: usize,
}

impl<'a> HamiltonianSearch<'a> {
    /// Create the object.
    pub fn new(
        size: usize,
        blocked: &'a [bool],
        max_steps: usize,
        shuffle_probability: f64,
    ) -> Self {
        Self {
            size,
            blocked,
            num_free_cells: blocked.iter().filter(|b| !**b).count(),
            max_steps,
            shuffle_probability: shuffle_probability.clamp(0.0, 1.0),
            steps: 0,
        }
    }

    /// Find and return a path that visits every free cell exactly once.
    ///
    /// The corners that are not obstacles are tried in random order. The step budget is shared
    /// by all the corners.
    ///
    /// # Errors
    ///
    /// The method returns [`SearchError::NoPath`] if no corner leads to a Hamiltonian path, and
    /// [`SearchError::StepsExceeded`] if the step budget ran out.
    pub fn find_path<R: Rng>(&mut self, rng: &mut R) -> Result<Vec<Position>, SearchError> {
        self.steps = 0;
        if self.num_free_cells == 0 || !self.is_feasible() {
            debug!("The layout cannot hold a Hamiltonian path");
            return Err(SearchError::NoPath);
        }

        // With an odd number of free cells, the path starts and ends on the majority color
        let majority: Option<usize> = match self.color_balance() {
            0 => None,
            b if b > 0 => Some(0),
            _ => Some(1),
        };
        let mut corners: Vec<Position> = Position::corners(self.size).to_vec();
        corners.dedup();
        corners.retain(|c| !self.is_blocked(*c) && majority.is_none_or(|m| color(*c) == m));
        corners.shuffle(rng);

        let mut path: SearchPath = SearchPath::new(self.size);
        for start in corners {
            debug!("Searching from corner {start}");
            path.clear();
            if self.visit(start, &mut path, rng)? {
                debug!("Path found in {} steps", self.steps);
                return Ok(path.into_cells());
            }
        }
        debug!("No path after {} steps", self.steps);
        Err(SearchError::NoPath)
    }

    fn is_blocked(&self, pos: Position) -> bool {
        self.blocked.get(pos.index(self.size)).copied().unwrap_or(true)
    }

    /// Number of free cells of color 0 minus the number of free cells of color 1.
    fn color_balance(&self) -> isize {
        self.free_cells()
            .map(|c| if color(c) == 0 { 1 } else { -1 })
            .sum()
    }

    fn free_cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.size * self.size)
            .map(|i| Position::from_index(i, self.size))
            .filter(|c| !self.is_blocked(*c))
    }

    /// Whether the free cells can hold a Hamiltonian path at all.
    fn is_feasible(&self) -> bool {
        if self.color_balance().abs() > 1 {
            return false;
        }
        let dead_ends: usize = self
            .free_cells()
            .filter(|c| c.neighbors(self.size).filter(|n| !self.is_blocked(*n)).count() <= 1)
            .count();
        if self.num_free_cells > 1 && dead_ends > 2 {
            return false;
        }
        let empty: SearchPath = SearchPath::new(self.size);
        match self.free_cells().next() {
            Some(first) => self.reachable(&[first], &empty) == self.num_free_cells,
            None => false,
        }
    }

    /// Number of unvisited free cells reachable from the given unvisited cells.
    fn reachable(&self, from: &[Position], path: &SearchPath) -> usize {
        let mut seen: Vec<bool> = vec![false; self.size * self.size];
        let mut stack: Vec<Position> = from.to_vec();
        for pos in from {
            seen[pos.index(self.size)] = true;
        }

        let mut count: usize = 0;
        while let Some(pos) = stack.pop() {
            count += 1;
            for n in pos.neighbors(self.size) {
                let i: usize = n.index(self.size);
                if !seen[i] && !self.is_blocked(n) && !path.contains(n) {
                    seen[i] = true;
                    stack.push(n);
                }
            }
        }
        count
    }

    /// Unvisited, non-obstacle cells adjacent to the given cell.
    fn onward_moves(&self, pos: Position, path: &SearchPath) -> Vec<Position> {
        pos.neighbors(self.size)
            .filter(|n| !self.is_blocked(*n) && !path.contains(*n))
            .collect()
    }

    /// Whether the unvisited cells can still be covered from the last cell of the path.
    ///
    /// `candidates` holds the onward moves of the last cell with their own number of onward
    /// moves.
    fn can_complete(&self, candidates: &[(usize, Position)], path: &SearchPath) -> bool {
        let remaining: usize = self.num_free_cells - path.len();

        // A neighbor without onward moves can only be the last cell of the path
        if remaining > 1 && candidates.iter().any(|(moves, _)| *moves == 0) {
            return false;
        }
        let from: Vec<Position> = candidates.iter().map(|(_, c)| *c).collect();
        self.reachable(&from, path) == remaining
    }

    /// Recursively extend the path from the given cell.
    ///
    /// Return `true` once the path covers all the free cells. On a dead end, the cell is
    /// removed from the path before returning `false`.
    fn visit<R: Rng>(
        &mut self,
        pos: Position,
        path: &mut SearchPath,
        rng: &mut R,
    ) -> Result<bool, SearchError> {
        self.steps += 1;
        if self.steps > self.max_steps {
            return Err(SearchError::StepsExceeded);
        }

        path.push(pos);
        if path.len() == self.num_free_cells {
            return Ok(true);
        }

        let visited: &SearchPath = path;
        let mut candidates: Vec<(usize, Position)> = self
            .onward_moves(pos, visited)
            .into_iter()
            .map(|c| (self.onward_moves(c, visited).len(), c))
            .collect();
        if !self.can_complete(&candidates, visited) {
            path.pop();
            return Ok(false);
        }

        // Warnsdorff's rule: most constrained cell first
        candidates.sort_by_key(|(moves, _)| *moves);
        for tied in candidates.chunk_by_mut(|a, b| a.0 == b.0) {
            if tied.len() > 1 && rng.random_bool(self.shuffle_probability) {
                tied.shuffle(rng);
            }
        }

        for (_, next) in candidates {
            if self.visit(next, path, rng)? {
                return Ok(true);
            }
        }
        path.pop();
        Ok(false)
    }
}

/// Build a serpentine path that covers every cell of an obstacle-free `size`×`size` grid.
///
/// Rows are walked alternately left to right and right to left, so consecutive cells are always
/// adjacent.
pub fn serpentine(size: usize) -> Vec<Position> {
    let mut path: Vec<Position> = Vec::with_capacity(size * size);
    for row in 0..size {
        if row % 2 == 0 {
            path.extend((0..size).map(|col| Position::new(row, col)));
        } else {
            path.extend((0..size).rev().map(|col| Position::new(row, col)));
        }
    }
    path
}

/// Map a cell through one of the eight symmetries of the square grid.
///
/// Bit 0 of `symmetry` mirrors the columns, bit 1 mirrors the rows, and bit 2 swaps the rows
/// and the columns.
pub fn transform(pos: Position, size: usize, symmetry: u8) -> Position {
    let last: usize = size.saturating_sub(1);
    let col: usize = if symmetry & 1 != 0 { last - pos.col } else { pos.col };
    let row: usize = if symmetry & 2 != 0 { last - pos.row } else { pos.row };
    if symmetry & 4 != 0 {
        Position::new(col, row)
    } else {
        Position::new(row, col)
    }
}

/// Serpentine path turned by a random symmetry of the grid.
pub fn random_serpentine<R: Rng>(size: usize, rng: &mut R) -> Vec<Position> {
    let symmetry: u8 = rng.random_range(0..8);
    serpentine(size)
        .into_iter()
        .map(|pos| transform(pos, size, symmetry))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;
    use std::collections::HashSet;

    fn assert_hamiltonian(path: &[Position], size: usize, blocked: &[bool]) {
        let free: usize = blocked.iter().filter(|b| !**b).count();
        assert_eq!(path.len(), free);
        let unique: HashSet<&Position> = path.iter().collect();
        assert_eq!(unique.len(), path.len());
        assert!(path.iter().all(|p| !blocked[p.index(size)]));
        assert!(path.windows(2).all(|w| w[0].is_adjacent(w[1])));
        assert!(Position::corners(size).contains(&path[0]));
    }

    #[test]
    fn finds_path_on_open_grids() {
        for size in [2, 3, 4, 5, 6] {
            let blocked: Vec<bool> = vec![false; size * size];
            let mut rng: Pcg64 = Pcg64::seed_from_u64(size as u64);
            let mut search = HamiltonianSearch::new(size, &blocked, 50_000, 0.3);
            let path: Vec<Position> = search.find_path(&mut rng).unwrap();
            assert_hamiltonian(&path, size, &blocked);
        }
    }

    #[test]
    fn finds_path_around_obstacles() {
        let size: usize = 4;
        let mut blocked: Vec<bool> = vec![false; size * size];
        blocked[Position::new(1, 1).index(size)] = true;
        blocked[Position::new(1, 2).index(size)] = true;
        let mut rng: Pcg64 = Pcg64::seed_from_u64(7);
        let mut search = HamiltonianSearch::new(size, &blocked, 50_000, 0.3);
        let path: Vec<Position> = search.find_path(&mut rng).unwrap();
        assert_hamiltonian(&path, size, &blocked);
    }

    #[test]
    fn isolated_cell_has_no_path() {
        // The top-left corner is cut off from the rest of the grid
        let size: usize = 3;
        let mut blocked: Vec<bool> = vec![false; size * size];
        blocked[Position::new(1, 1).index(size)] = true;
        blocked[Position::new(1, 0).index(size)] = true;
        blocked[Position::new(0, 1).index(size)] = true;
        let mut rng: Pcg64 = Pcg64::seed_from_u64(3);
        let mut search = HamiltonianSearch::new(size, &blocked, 50_000, 0.3);
        assert_eq!(search.find_path(&mut rng), Err(SearchError::NoPath));
    }

    #[test]
    fn step_budget_is_enforced() {
        let size: usize = 6;
        let blocked: Vec<bool> = vec![false; size * size];
        let mut rng: Pcg64 = Pcg64::seed_from_u64(11);
        let mut search = HamiltonianSearch::new(size, &blocked, 5, 0.3);
        assert_eq!(search.find_path(&mut rng), Err(SearchError::StepsExceeded));
        assert_eq!(search.steps, 6);
    }

    #[test]
    fn same_seed_gives_same_path() {
        let size: usize = 6;
        let blocked: Vec<bool> = vec![false; size * size];
        let first = HamiltonianSearch::new(size, &blocked, 50_000, 0.3)
            .find_path(&mut Pcg64::seed_from_u64(42));
        let second = HamiltonianSearch::new(size, &blocked, 50_000, 0.3)
            .find_path(&mut Pcg64::seed_from_u64(42));
        assert!(first.is_ok());
        assert_eq!(first, second);
    }

    #[test]
    fn open_grids_are_solved_within_budget() {
        for size in [8, 10, 12] {
            let blocked: Vec<bool> = vec![false; size * size];
            for seed in 0..10 {
                let mut rng: Pcg64 = Pcg64::seed_from_u64(seed);
                let mut search = HamiltonianSearch::new(size, &blocked, 50_000, 0.3);
                let path: Vec<Position> = search.find_path(&mut rng).unwrap();
                assert_hamiltonian(&path, size, &blocked);
            }
        }
    }

    #[test]
    fn tie_shuffle_varies_the_path() {
        let size: usize = 8;
        let blocked: Vec<bool> = vec![false; size * size];
        let paths: HashSet<Vec<Position>> = (0..10)
            .map(|seed| {
                HamiltonianSearch::new(size, &blocked, 50_000, 0.3)
                    .find_path(&mut Pcg64::seed_from_u64(seed))
                    .unwrap()
            })
            .collect();
        assert!(paths.len() > 1);
    }

    #[test]
    fn unbalanced_colors_have_no_path() {
        // Two cells of the same color are blocked on a 4x4 grid
        let size: usize = 4;
        let mut blocked: Vec<bool> = vec![false; size * size];
        blocked[Position::new(1, 1).index(size)] = true;
        blocked[Position::new(2, 2).index(size)] = true;
        let mut search = HamiltonianSearch::new(size, &blocked, 50_000, 0.3);
        assert_eq!(
            search.find_path(&mut Pcg64::seed_from_u64(1)),
            Err(SearchError::NoPath)
        );
        assert_eq!(search.steps, 0);
    }

    #[test]
    fn odd_free_cells_start_on_majority_color() {
        let size: usize = 5;
        let blocked: Vec<bool> = vec![false; size * size];
        for seed in 0..5 {
            let path: Vec<Position> = HamiltonianSearch::new(size, &blocked, 50_000, 0.3)
                .find_path(&mut Pcg64::seed_from_u64(seed))
                .unwrap();
            assert_eq!(color(path[0]), 0);
            assert_eq!(color(path[path.len() - 1]), 0);
        }
    }

    #[test]
    fn serpentine_covers_grid() {
        for size in [1, 2, 5, 12] {
            let path: Vec<Position> = serpentine(size);
            assert_hamiltonian(&path, size, &vec![false; size * size]);
        }
    }

    #[test]
    fn symmetries_keep_serpentine_hamiltonian() {
        let size: usize = 6;
        let blocked: Vec<bool> = vec![false; size * size];
        let mut paths: HashSet<Vec<Position>> = HashSet::new();
        for symmetry in 0..8 {
            let path: Vec<Position> = serpentine(size)
                .into_iter()
                .map(|pos| transform(pos, size, symmetry))
                .collect();
            assert!(path.windows(2).all(|w| w[0].is_adjacent(w[1])));
            assert_hamiltonian(&path, size, &blocked);
            paths.insert(path);
        }
        assert_eq!(paths.len(), 8);
    }

    #[test]
    fn random_serpentine_is_not_always_the_same() {
        let paths: HashSet<Vec<Position>> = (0..20)
            .map(|seed| random_serpentine(6, &mut Pcg64::seed_from_u64(seed)))
            .collect();
        assert!(paths.len() > 1);
    }
}
