/*
lib.rs

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

//! Gridlink: connect the numbered points with a path that does not cross itself.
//!
//! A [`generator::level_generator::LevelGenerator`] builds a level from a Hamiltonian path on
//! the grid. The [`path_engine::PathEngine`] validates the paths that the player draws on a
//! [`grid::GridModel`], and keeps an undo [`history`]. The [`game::Game`] object adds the
//! timer and the hint counter, and [`progression`] sequences the levels into packs.

pub mod cli_options;
pub mod config;
pub mod events;
pub mod game;
pub mod generator;
pub mod grid;
pub mod history;
pub mod path_engine;
pub mod progression;
pub mod saver;
