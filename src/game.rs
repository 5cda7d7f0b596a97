/*
game.rs

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

//! Manage the status of a game in progress.
//!
//! The [`Game`] object wraps the [`PathEngine`] of the level being played. It refuses the
//! strokes once the level is complete, counts the hints, and measures the play time.

use log::debug;
use std::time::{Duration, Instant};

use chrono::Utc;

use crate::generator::level::Level;
use crate::grid::Position;
use crate::path_engine::{PathEngine, Rejection, StrokeOutcome};
use crate::saver::progress::CompletionRecord;

/// Manage the status of the game in progress.
#[derive(Debug)]
pub struct Game {
    engine: PathEngine,

    /// Number of hints that the player asked for.
    hints_used: usize,

    /// Whether the player paused the game.
    pub paused: bool,

    /// Time when the game started. Used to compute game duration.
    start_time: Instant,

    /// The elapsed time when the player paused the game.
    pause_duration: Option<Duration>,

    /// The game duration, frozen when the level is complete.
    final_duration: Option<Duration>,
}

impl Game {
    /// Create a [`Game`] object for the given level and start the timer.
    pub fn new(level: Level) -> Self {
        Self {
            engine: PathEngine::new(level),
            hints_used: 0,
            paused: false,
            start_time: Instant::now(),
            pause_duration: None,
            final_duration: None,
        }
    }

    pub fn engine(&self) -> &PathEngine {
        &self.engine
    }

    /// Mutable access to the engine, mostly to subscribe to its events.
    pub fn engine_mut(&mut self) -> &mut PathEngine {
        &mut self.engine
    }

    /// Whether the puzzle is solved. No stroke is accepted after that.
    pub fn is_solved(&self) -> bool {
        self.engine.is_complete()
    }

    pub fn hints_used(&self) -> usize {
        self.hints_used
    }

    fn check_unlocked(&self) -> Result<(), Rejection> {
        if self.is_solved() {
            Err(Rejection::Locked)
        } else {
            Ok(())
        }
    }

    /// Start a path. See [`PathEngine::try_start`].
    pub fn try_start(&mut self, pos: Position) -> Result<StrokeOutcome, Rejection> {
        self.check_unlocked()?;
        self.engine.try_start(pos)
    }

    /// Extend the active path. See [`PathEngine::try_extend`].
    pub fn try_extend(&mut self, pos: Position) -> Result<StrokeOutcome, Rejection> {
        self.check_unlocked()?;
        let outcome: StrokeOutcome = self.engine.try_extend(pos)?;
        if let StrokeOutcome::Completed {
            level_complete: true,
        } = outcome
        {
            self.final_duration = Some(self.get_duration());
            debug!(
                "Level solved in {:?} with {} hints",
                self.final_duration, self.hints_used
            );
        }
        Ok(outcome)
    }

    pub fn cancel(&mut self) -> bool {
        self.engine.cancel()
    }

    /// Revert the last commit. Undo is not available once the level is complete.
    pub fn undo(&mut self) -> Result<bool, Rejection> {
        self.check_unlocked()?;
        Ok(self.engine.undo())
    }

    /// Return the next cells of the solution and count the hint.
    pub fn hint(&mut self) -> Option<Vec<Position>> {
        if self.is_solved() {
            return None;
        }
        let cells: Vec<Position> = self.engine.hint()?;
        self.hints_used += 1;
        Some(cells)
    }

    /// Restart the level: clear the paths, the hint counter, and the timer.
    pub fn reset(&mut self) {
        self.engine.reset();
        self.hints_used = 0;
        self.paused = false;
        self.start_time = Instant::now();
        self.pause_duration = None;
        self.final_duration = None;
    }

    /// Pause the game.
    pub fn pause(&mut self) {
        if self.paused {
            return;
        }
        // Store the played time so far, so that the pause time can be deduced when the
        // player resumes the game.
        self.pause_duration = Some(self.start_time.elapsed());
        self.paused = true;
    }

    /// Resume the game.
    pub fn resume(&mut self) {
        if let Some(d) = self.pause_duration {
            self.start_time += self.start_time.elapsed() - d;
            self.pause_duration = None;
        }
        self.paused = false;
    }

    /// Return the game duration.
    pub fn get_duration(&self) -> Duration {
        if let Some(d) = self.final_duration {
            return d;
        }
        match self.pause_duration {
            Some(d) => d,
            None => self.start_time.elapsed(),
        }
    }

    /// Return the game duration in hours, minutes, and seconds
    pub fn get_duration_hms(&self) -> (u64, u64, u64) {
        let duration: u64 = self.get_duration().as_secs();
        (
            duration / 3600,
            (duration % 3600) / 60,
            (duration % 3600) % 60,
        )
    }

    /// Completion record to store, or None if the level is not solved yet.
    pub fn completion_record(&self) -> Option<CompletionRecord> {
        if !self.is_solved() {
            return None;
        }
        Some(CompletionRecord {
            completed: true,
            time_secs: self.get_duration().as_secs(),
            hints_used: self.hints_used,
            timestamp: Utc::now().timestamp_millis(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::hamiltonian::serpentine;
    use crate::generator::level_generator::build_level;

    fn p(row: usize, col: usize) -> Position {
        Position::new(row, col)
    }

    /// 2x2 level: 1=(0,0), 2=(1,0) along the serpentine.
    fn small_game() -> Game {
        Game::new(build_level(2, &serpentine(2), &[false; 4], 2))
    }

    fn solve_from_start(game: &mut Game) {
        game.try_extend(p(0, 1)).unwrap();
        game.try_extend(p(1, 1)).unwrap();
        game.try_extend(p(1, 0)).unwrap();
    }

    fn solve(game: &mut Game) {
        game.try_start(p(0, 0)).unwrap();
        solve_from_start(game);
    }

    #[test]
    fn strokes_are_locked_after_completion() {
        let mut game = small_game();
        assert!(game.completion_record().is_none());
        solve(&mut game);

        assert!(game.is_solved());
        assert_eq!(game.try_start(p(1, 0)), Err(Rejection::Locked));
        assert_eq!(game.try_extend(p(1, 1)), Err(Rejection::Locked));
        assert_eq!(game.undo(), Err(Rejection::Locked));
        assert_eq!(game.hint(), None);
    }

    #[test]
    fn hints_are_counted() {
        let mut game = small_game();
        assert_eq!(game.hint(), Some(vec![p(0, 0), p(0, 1), p(1, 1)]));
        game.try_start(p(0, 0)).unwrap();
        assert!(game.hint().is_some());
        assert_eq!(game.hints_used(), 2);

        solve_from_start(&mut game);
        let record: CompletionRecord = game.completion_record().unwrap();
        assert!(record.completed);
        assert_eq!(record.hints_used, 2);
        assert!(record.timestamp > 0);
    }

    #[test]
    fn reset_unlocks_and_clears_counters() {
        let mut game = small_game();
        game.hint();
        solve(&mut game);

        game.reset();
        assert!(!game.is_solved());
        assert_eq!(game.hints_used(), 0);
        assert_eq!(game.try_start(p(0, 0)), Ok(StrokeOutcome::Started));
    }

    #[test]
    fn paused_duration_does_not_grow() {
        let mut game = small_game();
        game.pause();
        let paused: Duration = game.get_duration();
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(game.get_duration(), paused);

        game.resume();
        assert!(!game.paused);
        assert!(game.get_duration() < paused + Duration::from_millis(20));
    }

    #[test]
    fn duration_is_frozen_once_solved() {
        let mut game = small_game();
        solve(&mut game);
        let solved: Duration = game.get_duration();
        std::thread::sleep(Duration::from_millis(10));
        assert_eq!(game.get_duration(), solved);
    }
}
