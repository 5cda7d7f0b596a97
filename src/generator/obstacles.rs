/*
obstacles.rs

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

//! Random obstacle placement.
//!
//! Obstacles favor interior cells. The four corners are never blocked because the path search
//! starts from them.
//!
//! The layouts are kept within reach of the path search: obstacles alternate between the two
//! checkerboard colors, and an obstacle is never placed where it would leave a free neighbor
//! with fewer than two free neighbors of its own.

use log::debug;
use rand::Rng;

use super::hamiltonian::color;
use crate::grid::Position;

/// Probability of drawing an obstacle among the interior cells rather than the whole grid.
const INTERIOR_BIAS: f64 = 0.8;

/// Number of random draws allowed per requested obstacle. Draws that hit a corner, an existing
/// obstacle, a cell of the wrong color or a cell that would create a dead end are lost, so
/// fewer obstacles than requested may be placed.
const DRAWS_PER_OBSTACLE: usize = 10;

/// Maximum number of obstacles for the given grid size and obstacle percentage.
pub fn max_obstacles(size: usize, obstacle_percent: u8) -> usize {
    size * size * usize::from(obstacle_percent) / 100
}

/// Randomly place up to `count` obstacles on a `size`×`size` grid.
///
/// The returned obstacle markers are indexed by the row-major cell index.
pub fn place_obstacles<R: Rng>(size: usize, count: usize, rng: &mut R) -> Vec<bool> {
    let mut blocked: Vec<bool> = vec![false; size * size];
    if size == 0 || count == 0 {
        return blocked;
    }
    let corners: [Position; 4] = Position::corners(size);
    let has_interior: bool = size > 2;

    let mut placed: usize = 0;
    let mut draws: usize = 0;
    while placed < count && draws < count * DRAWS_PER_OBSTACLE {
        draws += 1;
        let pos: Position = if has_interior && rng.random_bool(INTERIOR_BIAS) {
            Position::new(rng.random_range(1..size - 1), rng.random_range(1..size - 1))
        } else {
            Position::new(rng.random_range(0..size), rng.random_range(0..size))
        };
        if corners.contains(&pos)
            || blocked[pos.index(size)]
            || color(pos) != placed % 2
            || creates_dead_end(&blocked, size, pos)
        {
            continue;
        }
        blocked[pos.index(size)] = true;
        placed += 1;
    }
    debug!("Placed {placed} obstacles out of {count} in {draws} draws");
    blocked
}

fn free_degree(blocked: &[bool], size: usize, pos: Position) -> usize {
    pos.neighbors(size)
        .filter(|n| !blocked[n.index(size)])
        .count()
}

/// Whether blocking the cell would leave one of its free neighbors with fewer than two free
/// neighbors.
fn creates_dead_end(blocked: &[bool], size: usize, pos: Position) -> bool {
    pos.neighbors(size)
        .filter(|n| !blocked[n.index(size)])
        .any(|n| free_degree(blocked, size, n) <= 2)
}
