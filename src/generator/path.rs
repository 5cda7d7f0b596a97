/*
path.rs

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

//! Path being built by the Hamiltonian path search.

use crate::grid::Position;

/// Path object.
#[derive(Debug, Default, Clone)]
pub struct SearchPath {
    /// Path as an ordered list of cells.
    path: Vec<Position>,

    /// Visited status of each cell, indexed by the row-major cell index.
    /// Instead of looking for the cell in the [`SearchPath::path`] vector, this array
    /// speeds up the lookup.
    visited: Vec<bool>,

    /// Grid size, used to compute the cell index.
    size: usize,
}

impl PartialEq for SearchPath {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl SearchPath {
    /// Create a [`SearchPath`] object for a `size`×`size` grid.
    pub fn new(size: usize) -> Self {
        Self {
            path: Vec::with_capacity(size * size),
            visited: vec![false; size * size],
            size,
        }
    }

    /// Remove all the cells from the path.
    pub fn clear(&mut self) {
        self.path.clear();
        self.visited.fill(false);
    }

    /// Add a cell to the path.
    pub fn push(&mut self, pos: Position) {
        self.visited[pos.index(self.size)] = true;
        self.path.push(pos);
    }

    /// Remove the last cell from the path.
    pub fn pop(&mut self) {
        if let Some(pos) = self.path.pop() {
            self.visited[pos.index(self.size)] = false;
        }
    }

    /// Get the number of cells in the path.
    pub fn len(&self) -> usize {
        self.path.len()
    }

    /// Whether the path has no cells.
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Whether the cell is in the path or not.
    pub fn contains(&self, pos: Position) -> bool {
        self.visited
            .get(pos.index(self.size))
            .copied()
            .unwrap_or(false)
    }

    /// Return a reference to the path vector.
    pub fn get(&self) -> &[Position] {
        &self.path
    }

    /// Consume the object and return the ordered cells.
    pub fn into_cells(self) -> Vec<Position> {
        self.path
    }

    /// Return the last cell in the path.
    pub fn get_last(&self) -> Option<Position> {
        self.path.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_pop_maintain_visited_markers() {
        let mut path: SearchPath = SearchPath::new(3);
        path.push(Position::new(0, 0));
        path.push(Position::new(0, 1));
        assert!(path.contains(Position::new(0, 1)));
        assert_eq!(path.get_last(), Some(Position::new(0, 1)));

        path.pop();
        assert!(!path.contains(Position::new(0, 1)));
        assert!(path.contains(Position::new(0, 0)));
        assert_eq!(path.len(), 1);

        path.clear();
        assert!(path.is_empty());
        assert!(!path.contains(Position::new(0, 0)));
    }
}
