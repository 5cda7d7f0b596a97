/*
levels.rs

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

//! Load and save level packs.
//!
//! The `levels.json` file contains a list of [`Pack`] objects. Levels that fail validation are
//! skipped.

use log::{debug, warn};
use std::error::Error;
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::generator::level::Level;
use crate::progression::{LevelSource, Pack};

/// Level packs stored in a JSON file.
pub struct JsonLevelSource {
    /// Absolute path to the level file.
    file: PathBuf,
}

impl JsonLevelSource {
    /// Create a [`JsonLevelSource`] object for the `levels.json` file in the given directory.
    pub fn new(mut data_dir: PathBuf) -> Self {
        data_dir.push("levels.json");
        debug!("Level file: {data_dir:?}");
        Self { file: data_dir }
    }

    /// Create a [`JsonLevelSource`] object for the given file.
    pub fn from_file(file: &Path) -> Self {
        Self {
            file: file.to_path_buf(),
        }
    }

    /// Save the given packs, replacing the file.
    pub fn save_packs(&self, packs: &[Pack]) -> Result<(), Box<dyn Error>> {
        let file: File = File::create(&self.file)?;
        let mut writer: BufWriter<File> = BufWriter::new(file);

        serde_json::to_writer_pretty(&mut writer, packs)?;
        writer.flush()?;
        Ok(())
    }
}

impl LevelSource for JsonLevelSource {
    /// Return the packs from the file, or an empty list if the file does not exist.
    fn load_packs(&self) -> Result<Vec<Pack>, Box<dyn Error>> {
        let file: File = match File::open(&self.file) {
            Ok(f) => f,
            Err(error) => match error.kind() {
                ErrorKind::NotFound => return Ok(Vec::new()),
                _ => return Err(Box::new(error)),
            },
        };
        let reader: BufReader<File> = BufReader::new(file);
        let mut packs: Vec<Pack> = serde_json::from_reader(reader)?;

        for pack in &mut packs {
            let name: &str = &pack.name;
            pack.levels.retain(|level: &Level| match level.validate() {
                Ok(()) => true,
                Err(e) => {
                    warn!("Skipping an invalid level in pack {name}: {e}");
                    false
                }
            });
        }
        Ok(packs)
    }
}
