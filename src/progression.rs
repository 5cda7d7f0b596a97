/*
progression.rs

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

//! Sequence the levels into packs.
//!
//! The levels come from a [`LevelSource`], usually the level pack file. When the source has no
//! level, one pack per [`Difficulty`] preset is generated.
//!
//! The daily puzzle is selected from the date: the same date always gives the same puzzle.

use log::{info, warn};
use std::error::Error;

use chrono::Local;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::generator::level::Level;
use crate::generator::level_generator::{GenerationError, LevelGenerator};
use crate::generator::presets::{Difficulty, Preset};

/// Group of levels.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Pack {
    pub name: String,
    pub levels: Vec<Level>,
}

/// Provider of pre-built levels.
pub trait LevelSource {
    /// Return the level packs. An empty list means that no level is available.
    fn load_packs(&self) -> Result<Vec<Pack>, Box<dyn Error>>;
}

/// Provider of the current date.
pub trait Clock {
    /// Current date, as `YYYY-MM-DD`.
    fn today(&self) -> String;
}

/// Local time clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> String {
        Local::now().format("%Y-%m-%d").to_string()
    }
}

/// Clock that always returns the same date.
#[derive(Debug, Clone)]
pub struct FixedClock(pub String);

impl Clock for FixedClock {
    fn today(&self) -> String {
        self.0.clone()
    }
}

/// Rolling hash of a date string: `h = h * 31 + c` on 32-bit signed integers.
pub fn date_hash(date: &str) -> u32 {
    let h: i32 = date.chars().fold(0i32, |h, c| {
        h.wrapping_shl(5).wrapping_sub(h).wrapping_add(c as i32)
    });
    h.unsigned_abs()
}

/// Puzzle of the day.
#[derive(Debug, Clone, Copy)]
pub struct DailyPuzzle<'a> {
    /// Index of the level over all the packs.
    pub index: usize,
    pub pack: usize,
    pub level_index: usize,
    pub level: &'a Level,
}

/// Ordered list of packs.
#[derive(Debug, Clone, Default)]
pub struct ProgressionCatalog {
    packs: Vec<Pack>,
}

impl ProgressionCatalog {
    /// Create a [`ProgressionCatalog`] object. Empty packs are dropped.
    pub fn from_packs(packs: Vec<Pack>) -> Self {
        Self {
            packs: packs.into_iter().filter(|p| !p.levels.is_empty()).collect(),
        }
    }

    /// Generate `levels_per_pack` levels for each difficulty preset.
    ///
    /// # Errors
    ///
    /// The method returns an error if a level cannot be generated.
    pub fn generate_presets(settings: &Settings, seed: u64) -> Result<Self, GenerationError> {
        let mut generator: LevelGenerator<Pcg64> =
            LevelGenerator::with_config(Pcg64::seed_from_u64(seed), settings.generator);
        let mut packs: Vec<Pack> = Vec::new();
        for difficulty in Difficulty::all() {
            let preset: Preset = difficulty.preset();
            let levels: Vec<Level> = (0..settings.levels_per_pack)
                .map(|_| {
                    generator.generate(preset.size, preset.num_points, preset.obstacle_percent)
                })
                .collect::<Result<Vec<Level>, GenerationError>>()?;
            packs.push(Pack {
                name: difficulty.to_string(),
                levels,
            });
        }
        Ok(Self::from_packs(packs))
    }

    /// Load the packs from the source, and fall back to generated packs when the source fails
    /// or has no level.
    pub fn load<L: LevelSource>(
        source: &L,
        settings: &Settings,
        seed: u64,
    ) -> Result<Self, GenerationError> {
        match source.load_packs() {
            Ok(packs) => {
                let catalog: ProgressionCatalog = Self::from_packs(packs);
                if catalog.total_levels() > 0 {
                    info!(
                        "Loaded {} levels in {} packs",
                        catalog.total_levels(),
                        catalog.packs.len()
                    );
                    return Ok(catalog);
                }
                info!("No level available, generating the preset packs");
            }
            Err(e) => warn!("Cannot load the level packs ({e}), generating the preset packs"),
        }
        Self::generate_presets(settings, seed)
    }

    pub fn packs(&self) -> &[Pack] {
        &self.packs
    }

    pub fn pack(&self, pack: usize) -> Option<&Pack> {
        self.packs.get(pack)
    }

    pub fn level(&self, pack: usize, index: usize) -> Option<&Level> {
        self.packs.get(pack)?.levels.get(index)
    }

    /// Number of levels over all the packs.
    pub fn total_levels(&self) -> usize {
        self.packs.iter().map(|p| p.levels.len()).sum()
    }

    /// Return the pack and level indexes that follow the given level, or None after the last
    /// level of the last pack.
    pub fn next_level(&self, pack: usize, index: usize) -> Option<(usize, usize)> {
        let current: &Pack = self.packs.get(pack)?;
        if index + 1 < current.levels.len() {
            Some((pack, index + 1))
        } else if pack + 1 < self.packs.len() {
            Some((pack + 1, 0))
        } else {
            None
        }
    }

    /// Return the pack and level indexes for an index over all the packs.
    pub fn locate(&self, mut index: usize) -> Option<(usize, usize)> {
        for (i, pack) in self.packs.iter().enumerate() {
            if index < pack.levels.len() {
                return Some((i, index));
            }
            index -= pack.levels.len();
        }
        None
    }

    /// Index, over all the packs, of the puzzle for the given date.
    pub fn daily_index(&self, date: &str) -> Option<usize> {
        let total: usize = self.total_levels();
        if total == 0 {
            return None;
        }
        Some(date_hash(date) as usize % total)
    }

    /// Return the puzzle of the day.
    pub fn daily_level<C: Clock>(&self, clock: &C) -> Option<DailyPuzzle<'_>> {
        let index: usize = self.daily_index(&clock.today())?;
        let (pack, level_index) = self.locate(index)?;
        let level: &Level = self.level(pack, level_index)?;
        Some(DailyPuzzle {
            index,
            pack,
            level_index,
            level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoLevels;

    impl LevelSource for NoLevels {
        fn load_packs(&self) -> Result<Vec<Pack>, Box<dyn Error>> {
            Ok(Vec::new())
        }
    }

    struct BrokenSource;

    impl LevelSource for BrokenSource {
        fn load_packs(&self) -> Result<Vec<Pack>, Box<dyn Error>> {
            Err("unreadable".into())
        }
    }

    fn pack(name: &str, count: usize) -> Pack {
        Pack {
            name: name.to_string(),
            levels: (0..count)
                .map(|i| Level {
                    size: i + 2,
                    ..Level::default()
                })
                .collect(),
        }
    }

    fn catalog() -> ProgressionCatalog {
        ProgressionCatalog::from_packs(vec![pack("a", 3), pack("empty", 0), pack("b", 2)])
    }

    fn small_settings() -> Settings {
        Settings {
            levels_per_pack: 1,
            ..Settings::default()
        }
    }

    #[test]
    fn empty_packs_are_dropped() {
        let catalog: ProgressionCatalog = catalog();
        assert_eq!(catalog.packs().len(), 2);
        assert_eq!(catalog.total_levels(), 5);
        assert_eq!(catalog.level(1, 1).map(|l| l.size), Some(3));
        assert!(catalog.level(2, 0).is_none());
    }

    #[test]
    fn next_level_crosses_packs() {
        let catalog: ProgressionCatalog = catalog();
        assert_eq!(catalog.next_level(0, 0), Some((0, 1)));
        assert_eq!(catalog.next_level(0, 2), Some((1, 0)));
        assert_eq!(catalog.next_level(1, 1), None);
        assert_eq!(catalog.next_level(5, 0), None);
    }

    #[test]
    fn locate_flat_index() {
        let catalog: ProgressionCatalog = catalog();
        assert_eq!(catalog.locate(0), Some((0, 0)));
        assert_eq!(catalog.locate(3), Some((1, 0)));
        assert_eq!(catalog.locate(4), Some((1, 1)));
        assert_eq!(catalog.locate(5), None);
    }

    #[test]
    fn date_hash_matches_rolling_hash() {
        assert_eq!(date_hash("2025-01-01"), 274_162_049);
        assert_eq!(date_hash("2025-03-14"), 274_221_665);
        assert_eq!(date_hash(""), 0);
    }

    #[test]
    fn daily_puzzle_is_stable_for_a_date() {
        let catalog: ProgressionCatalog = catalog();
        let clock = FixedClock(String::from("2025-03-14"));
        let first = catalog.daily_level(&clock).unwrap();
        let second = catalog.daily_level(&clock).unwrap();
        assert_eq!(first.index, second.index);
        assert_eq!(first.index, 274_221_665 % 5);
        assert_eq!((first.pack, first.level_index), (0, 0));

        assert!(ProgressionCatalog::default().daily_level(&clock).is_none());
    }

    #[test]
    fn system_clock_format() {
        let today: String = SystemClock.today();
        assert_eq!(today.len(), 10);
        assert_eq!(today.as_bytes()[4], b'-');
        assert_eq!(today.as_bytes()[7], b'-');
    }

    #[test]
    fn falls_back_to_preset_packs() {
        let settings: Settings = small_settings();
        for catalog in [
            ProgressionCatalog::load(&NoLevels, &settings, 7).unwrap(),
            ProgressionCatalog::load(&BrokenSource, &settings, 7).unwrap(),
        ] {
            let sizes: Vec<usize> = catalog.packs().iter().map(|p| p.levels[0].size).collect();
            assert_eq!(sizes, vec![6, 8, 10, 12]);
            assert_eq!(catalog.packs()[0].name, "Easy");
        }
    }

    #[test]
    fn loaded_packs_are_used() {
        struct OnePack;

        impl LevelSource for OnePack {
            fn load_packs(&self) -> Result<Vec<Pack>, Box<dyn Error>> {
                Ok(vec![pack("only", 2)])
            }
        }

        let catalog = ProgressionCatalog::load(&OnePack, &small_settings(), 0).unwrap();
        assert_eq!(catalog.total_levels(), 2);
        assert_eq!(catalog.packs()[0].name, "only");
    }
}
