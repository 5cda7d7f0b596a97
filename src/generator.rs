/*
generator.rs

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

//! Generate random levels.
//!
//! [`level::Level`] objects describe a puzzle: the grid size, the numbered points, the
//! obstacles, and the reference solution cut into [`level::SolutionSegment`] objects.
//!
//! To create a level, create a [`level_generator::LevelGenerator`] object with an injected
//! random source (or a seed) and use its [`level_generator::LevelGenerator::generate`] method.
//! The generator places obstacles with the [`obstacles`] module, then looks for a path that
//! visits every free cell with a [`hamiltonian::HamiltonianSearch`] object.
//! If the search takes too many steps, the generator retries with other obstacles, and finally
//! without obstacles.
//!
//! The [`presets`] module provides the generation parameters for each difficulty level.

pub mod hamiltonian;
pub mod level;
pub mod level_generator;
pub mod obstacles;
pub mod path;
pub mod presets;
