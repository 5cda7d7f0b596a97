/*
presets.rs

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

//! Generation presets.
//!
//! When no level pack is available, levels are generated with one of these presets. The number
//! of points and the obstacle density grow with the grid size.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::FromRepr;

/// Preset difficulty level.
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Copy,
    Clone,
    PartialOrd,
    Ord,
    PartialEq,
    Eq,
    Hash,
    ValueEnum,
    FromRepr,
    Default,
)]
#[repr(u8)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
    Expert,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Medium => write!(f, "Medium"),
            Difficulty::Hard => write!(f, "Hard"),
            Difficulty::Expert => write!(f, "Expert"),
        }
    }
}

/// Generation parameters.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct Preset {
    pub size: usize,
    pub num_points: usize,
    pub obstacle_percent: u8,
}

impl Difficulty {
    /// All the difficulty levels, from the smallest grid to the largest.
    pub fn all() -> impl Iterator<Item = Difficulty> {
        (0..).map_while(Difficulty::from_repr)
    }

    /// Generation parameters for the difficulty level.
    pub fn preset(self) -> Preset {
        match self {
            Difficulty::Easy => Preset {
                size: 6,
                num_points: 5,
                obstacle_percent: 5,
            },
            Difficulty::Medium => Preset {
                size: 8,
                num_points: 7,
                obstacle_percent: 8,
            },
            Difficulty::Hard => Preset {
                size: 10,
                num_points: 9,
                obstacle_percent: 10,
            },
            Difficulty::Expert => Preset {
                size: 12,
                num_points: 12,
                obstacle_percent: 12,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_cover_supported_sizes() {
        let sizes: Vec<usize> = Difficulty::all().map(|d| d.preset().size).collect();
        assert_eq!(sizes, vec![6, 8, 10, 12]);
    }

    #[test]
    fn presets_scale_with_size() {
        let presets: Vec<Preset> = Difficulty::all().map(Difficulty::preset).collect();
        for pair in presets.windows(2) {
            assert!(pair[0].num_points <= pair[1].num_points);
            assert!(pair[0].obstacle_percent <= pair[1].obstacle_percent);
        }
    }
}
