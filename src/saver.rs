/*
saver.rs

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

//! Save and restore data in JSON files.
//!
//! * [`store`] provides the key-value stores: an in-memory store and a store backed by a JSON
//!   file in the data directory.
//! * [`progress`] saves the completion records, the daily puzzle records, and the last viewed
//!   level on top of a key-value store.
//! * [`levels`] loads the level packs from a JSON file.

pub mod levels;
pub mod progress;
pub mod store;
