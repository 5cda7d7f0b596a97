/*
config.rs

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

//! Tunable parameters and user settings.
//!
//! The [`Settings`] object is stored as `settings.json` in the data directory. A missing file
//! means default settings.

use log::debug;
use std::env;
use std::error::Error;
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const COPYRIGHT_NOTICE: &str = "Copyright 2025 Hervé Quatremain
License GPLv3+: GNU GPL version 3 or later <https://gnu.org/licenses/gpl.html>";

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "GRIDLINK_DATA_DIR";

/// Number of snapshots kept for undo. The oldest snapshot is dropped beyond that.
pub const HISTORY_CAPACITY: usize = 50;

/// Maximum number of cells returned by a hint.
pub const HINT_LENGTH: usize = 3;

/// Parameters of the level generator.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Number of obstacle layouts tried before falling back to a grid without obstacles.
    pub max_attempts: usize,

    /// Recursive steps allowed for one Hamiltonian path search.
    pub max_steps: usize,

    /// Probability of shuffling the candidate cells that tie under Warnsdorff's rule.
    pub shuffle_probability: f64,

    /// When even the obstacle-free search fails, build a serpentine path instead of reporting
    /// a generation failure.
    pub serpentine_fallback: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_attempts: 50,
            max_steps: 50_000,
            shuffle_probability: 0.3,
            serpentine_fallback: true,
        }
    }
}

/// User settings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub generator: GeneratorConfig,

    /// Number of levels generated for each preset pack when no level pack is available.
    pub levels_per_pack: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig::default(),
            levels_per_pack: 10,
        }
    }
}

impl Settings {
    /// Load the settings from the `settings.json` file in the given directory.
    ///
    /// Return the default settings if the file does not exist.
    pub fn load(mut data_dir: PathBuf) -> Result<Self, Box<dyn Error>> {
        data_dir.push("settings.json");
        debug!("Settings file: {data_dir:?}");
        let file: File = match File::open(&data_dir) {
            Ok(f) => f,
            Err(error) => match error.kind() {
                ErrorKind::NotFound => return Ok(Self::default()),
                _ => return Err(Box::new(error)),
            },
        };
        let settings: Settings = serde_json::from_reader(BufReader::new(file))?;
        Ok(settings)
    }
}

/// Return the directory where progress and settings are stored.
pub fn data_dir() -> PathBuf {
    match env::var_os(DATA_DIR_ENV) {
        Some(dir) => PathBuf::from(dir),
        None => PathBuf::from(".gridlink"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_settings_use_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"generator": {"max_steps": 1000}}"#).unwrap();
        assert_eq!(settings.generator.max_steps, 1000);
        assert_eq!(settings.generator.max_attempts, 50);
        assert_eq!(settings.levels_per_pack, 10);
    }

    #[test]
    fn missing_settings_file_gives_defaults() {
        let dir: PathBuf = env::temp_dir().join("gridlink-missing-settings-dir");
        let settings: Settings = Settings::load(dir).unwrap();
        assert_eq!(settings, Settings::default());
    }
}
