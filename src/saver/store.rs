/*
store.rs

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

//! Key-value stores.
//!
//! Values are JSON values, so that the callers can store any [`serde`] serializable object.

use log::debug;
use std::collections::BTreeMap;
use std::error::Error;
use std::fs::{self, File, remove_file};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::PathBuf;

use serde_json::Value;

/// Opaque key-value store. A missing key is not an error.
pub trait KeyValueStore {
    /// Return the value for the key, or None if the key is absent.
    fn get(&self, key: &str) -> Result<Option<Value>, Box<dyn Error>>;

    fn set(&mut self, key: &str, value: Value) -> Result<(), Box<dyn Error>>;

    fn remove(&mut self, key: &str) -> Result<(), Box<dyn Error>>;
}

/// Store that keeps the values in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: BTreeMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, Box<dyn Error>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), Box<dyn Error>> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), Box<dyn Error>> {
        self.values.remove(key);
        Ok(())
    }
}

/// Store backed by the `progress.json` file.
///
/// The whole file is read when the object is created, and rewritten after each change.
pub struct JsonFileStore {
    /// Absolute path to the save file.
    save_file: PathBuf,

    values: BTreeMap<String, Value>,
}

impl JsonFileStore {
    /// Create a [`JsonFileStore`] object.
    ///
    /// The provided [`PathBuf`] is the path to the directory where the file is stored. The
    /// directory is created when the first value is saved.
    pub fn new(mut data_dir: PathBuf) -> Result<Self, Box<dyn Error>> {
        data_dir.push("progress.json");
        debug!("Progress file: {data_dir:?}");
        let values: BTreeMap<String, Value> = match File::open(&data_dir) {
            Ok(f) => serde_json::from_reader(BufReader::new(f))?,
            Err(error) => match error.kind() {
                ErrorKind::NotFound => BTreeMap::new(),
                _ => return Err(Box::new(error)),
            },
        };
        Ok(Self {
            save_file: data_dir,
            values,
        })
    }

    fn save(&self) -> Result<(), Box<dyn Error>> {
        if let Some(dir) = self.save_file.parent() {
            fs::create_dir_all(dir)?;
        }
        let file: File = File::create(&self.save_file)?;
        let mut writer: BufWriter<File> = BufWriter::new(file);

        serde_json::to_writer(&mut writer, &self.values)?;
        writer.flush()?;
        Ok(())
    }

    /// Delete the progress file.
    pub fn delete_save(&mut self) {
        self.values.clear();
        let _ = remove_file(&self.save_file);
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>, Box<dyn Error>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), Box<dyn Error>> {
        self.values.insert(key.to_string(), value);
        self.save()
    }

    fn remove(&mut self, key: &str) -> Result<(), Box<dyn Error>> {
        if self.values.remove(key).is_some() {
            self.save()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::env;

    #[test]
    fn memory_store_absent_semantics() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("missing").unwrap(), None);
        store.set("k", json!({"a": 1})).unwrap();
        assert_eq!(store.get("k").unwrap(), Some(json!({"a": 1})));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn file_store_persists_values() {
        let dir: PathBuf = env::temp_dir().join(format!("gridlink-store-{}", std::process::id()));
        {
            let mut store = JsonFileStore::new(dir.clone()).unwrap();
            store.set("last_viewed", json!([1, 2])).unwrap();
        }
        let mut store = JsonFileStore::new(dir.clone()).unwrap();
        assert_eq!(store.get("last_viewed").unwrap(), Some(json!([1, 2])));

        store.delete_save();
        let store = JsonFileStore::new(dir.clone()).unwrap();
        assert_eq!(store.get("last_viewed").unwrap(), None);
        let _ = fs::remove_dir(dir);
    }
}
