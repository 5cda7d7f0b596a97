/*
progress.rs

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

//! Save and restore the player progress.
//!
//! Records are serialized with [`serde`] and stored under these keys:
//!
//! * `level:<pack>:<index>` for the completion record of a level,
//! * `daily:<YYYY-MM-DD>` for the daily puzzle,
//! * `last_viewed` for the last pack and level that the player opened.

use log::debug;
use std::error::Error;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::store::KeyValueStore;

const LAST_VIEWED_KEY: &str = "last_viewed";

/// Completion of a level.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionRecord {
    pub completed: bool,

    /// How long it took to solve the level, in seconds.
    pub time_secs: u64,

    pub hints_used: usize,

    /// Completion time, in milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl CompletionRecord {
    /// Whether this record beats the other one: faster, or as fast with fewer hints.
    pub fn is_better_than(&self, other: &CompletionRecord) -> bool {
        if !other.completed {
            return self.completed;
        }
        self.completed
            && (self.time_secs, self.hints_used) < (other.time_secs, other.hints_used)
    }
}

/// Completion of the daily puzzle.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DailyRecord {
    /// Day of the puzzle, as `YYYY-MM-DD`.
    pub date: String,

    /// Index of the puzzle in the catalog.
    pub level_index: usize,

    pub record: CompletionRecord,
}

/// Last pack and level that the player opened.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LastViewed {
    pub pack: usize,
    pub level: usize,
}

/// Typed access to the progress data.
pub struct ProgressStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> ProgressStore<S> {
    /// Create a [`ProgressStore`] object on top of the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, Box<dyn Error>> {
        match self.store.get(key)? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    fn write<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), Box<dyn Error>> {
        let value: Value = serde_json::to_value(value)?;
        self.store.set(key, value)
    }

    /// Return the completion record of a level, or None if the level was never completed.
    pub fn level_record(
        &self,
        pack: usize,
        index: usize,
    ) -> Result<Option<CompletionRecord>, Box<dyn Error>> {
        self.read(&format!("level:{pack}:{index}"))
    }

    /// Save the completion record of a level if it beats the saved one.
    ///
    /// Return whether the record was saved.
    pub fn record_completion(
        &mut self,
        pack: usize,
        index: usize,
        record: CompletionRecord,
    ) -> Result<bool, Box<dyn Error>> {
        if let Some(best) = self.level_record(pack, index)?
            && !record.is_better_than(&best)
        {
            debug!("Level {pack}:{index}: keeping the best record {best:?}");
            return Ok(false);
        }
        self.write(&format!("level:{pack}:{index}"), &record)?;
        Ok(true)
    }

    /// Number of completed levels in a pack.
    pub fn completed_count(&self, pack: usize, levels: usize) -> Result<usize, Box<dyn Error>> {
        let mut count: usize = 0;
        for index in 0..levels {
            if self
                .level_record(pack, index)?
                .is_some_and(|r| r.completed)
            {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Return the daily puzzle record for the given date.
    pub fn daily_record(&self, date: &str) -> Result<Option<DailyRecord>, Box<dyn Error>> {
        self.read(&format!("daily:{date}"))
    }

    pub fn record_daily(&mut self, record: &DailyRecord) -> Result<(), Box<dyn Error>> {
        self.write(&format!("daily:{}", record.date), record)
    }

    pub fn last_viewed(&self) -> Result<Option<LastViewed>, Box<dyn Error>> {
        self.read(LAST_VIEWED_KEY)
    }

    pub fn set_last_viewed(&mut self, last: LastViewed) -> Result<(), Box<dyn Error>> {
        self.write(LAST_VIEWED_KEY, &last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::saver::store::MemoryStore;

    fn record(time_secs: u64, hints_used: usize) -> CompletionRecord {
        CompletionRecord {
            completed: true,
            time_secs,
            hints_used,
            timestamp: 1_700_000_000_000,
        }
    }

    #[test]
    fn best_record_is_kept() {
        let mut progress = ProgressStore::new(MemoryStore::new());
        assert_eq!(progress.level_record(0, 3).unwrap(), None);

        assert!(progress.record_completion(0, 3, record(90, 1)).unwrap());
        assert!(!progress.record_completion(0, 3, record(120, 0)).unwrap());
        assert!(!progress.record_completion(0, 3, record(90, 2)).unwrap());
        assert!(progress.record_completion(0, 3, record(90, 0)).unwrap());

        assert_eq!(progress.level_record(0, 3).unwrap(), Some(record(90, 0)));
        assert_eq!(progress.completed_count(0, 5).unwrap(), 1);
    }

    #[test]
    fn daily_records_are_keyed_by_date() {
        let mut progress = ProgressStore::new(MemoryStore::new());
        let daily = DailyRecord {
            date: String::from("2025-03-14"),
            level_index: 7,
            record: record(60, 0),
        };
        progress.record_daily(&daily).unwrap();

        assert_eq!(progress.daily_record("2025-03-14").unwrap(), Some(daily));
        assert_eq!(progress.daily_record("2025-03-15").unwrap(), None);
    }

    #[test]
    fn last_viewed_round_trip() {
        let mut progress = ProgressStore::new(MemoryStore::new());
        assert_eq!(progress.last_viewed().unwrap(), None);
        progress
            .set_last_viewed(LastViewed { pack: 2, level: 4 })
            .unwrap();
        assert_eq!(
            progress.last_viewed().unwrap(),
            Some(LastViewed { pack: 2, level: 4 })
        );
    }
}
