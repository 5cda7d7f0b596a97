/*
level_generator.rs

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

//! Generate a random level.
//!
//! Generating a level is done in three steps:
//!
//! * Obstacles are randomly placed, and a Hamiltonian path is searched over the remaining
//!   cells. Each attempt has a bounded step budget. After a bounded number of failed attempts,
//!   one last search runs without obstacles.
//! * The points are spread along the path: the first and the last cells of the path are
//!   points, and the other points are evenly spaced in between.
//! * The path is cut into solution segments, one per pair of consecutive points. These
//!   segments are used for hints.

use log::{debug, info, warn};
use std::thread;
use std::time::{Duration, Instant};

use derive_more::{Display, Error};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use super::hamiltonian::{self, HamiltonianSearch, SearchError};
use super::level::{Level, Point, SolutionSegment};
use super::obstacles;
use crate::config::GeneratorConfig;
use crate::grid::Position;

/// Type of errors.
#[derive(Debug, Display, Error, Copy, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[display("the grid size must be at least 1")]
    InvalidSize,

    #[display("cannot place {requested} points on {available} cells")]
    InvalidPointCount { requested: usize, available: usize },

    #[display("the obstacle percentage must be below 100, got {_0}")]
    InvalidObstaclePercent(#[error(not(source))] u8),

    #[display("no path found after {attempts} attempts")]
    Exhausted { attempts: usize },
}

/// Statistics about the last generated level.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GenerationStats {
    /// Number of obstacle layouts tried, including the obstacle-free search.
    pub attempts: usize,

    /// Total number of search steps over all the attempts.
    pub steps: usize,

    /// How long the generation took.
    pub duration: Duration,

    /// Whether the level was produced without obstacles after all the attempts failed.
    pub without_obstacles: bool,

    /// Whether the serpentine path was used because the obstacle-free search also failed.
    pub serpentine: bool,
}

/// [`LevelGenerator`] object.
///
/// The random source is injected so that generation is reproducible with a seeded generator.
pub struct LevelGenerator<R: Rng> {
    rng: R,
    config: GeneratorConfig,

    /// Statistics for the last call to [`LevelGenerator::generate`].
    pub stats: GenerationStats,
}

impl LevelGenerator<Pcg64> {
    /// Create a generator seeded with the given value.
    pub fn from_seed(seed: u64) -> Self {
        Self::new(Pcg64::seed_from_u64(seed))
    }

    /// Create a generator seeded from the operating system.
    pub fn from_os_rng() -> Self {
        Self::new(Pcg64::from_os_rng())
    }
}

impl<R: Rng> LevelGenerator<R> {
    /// Create the object with the default configuration.
    pub fn new(rng: R) -> Self {
        Self::with_config(rng, GeneratorConfig::default())
    }

    /// Create the object.
    pub fn with_config(rng: R, config: GeneratorConfig) -> Self {
        Self {
            rng,
            config,
            stats: GenerationStats::default(),
        }
    }

    /// Return the generator parameters.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate a level.
    ///
    /// # Errors
    ///
    /// The method returns an error if the parameters are invalid, or if no path could be found,
    /// even without obstacles, and the serpentine fallback is disabled.
    pub fn generate(
        &mut self,
        size: usize,
        num_points: usize,
        obstacle_percent: u8,
    ) -> Result<Level, GenerationError> {
        if size == 0 {
            return Err(GenerationError::InvalidSize);
        }
        if obstacle_percent >= 100 {
            return Err(GenerationError::InvalidObstaclePercent(obstacle_percent));
        }
        let max_obstacles: usize = obstacles::max_obstacles(size, obstacle_percent);
        // Points must fit even if every obstacle is placed
        let available: usize = size * size - max_obstacles;
        if num_points < 2 || num_points > available {
            return Err(GenerationError::InvalidPointCount {
                requested: num_points,
                available,
            });
        }

        let start: Instant = Instant::now();
        self.stats = GenerationStats::default();

        let (path, blocked) = self.find_path(size, max_obstacles)?;
        let level: Level = build_level(size, &path, &blocked, num_points);

        self.stats.duration = start.elapsed();
        info!(
            "Generated a {size}x{size} level with {num_points} points and {} obstacles \
             (attempts = {}, steps = {}, duration = {:?})",
            level.obstacles.len(),
            self.stats.attempts,
            self.stats.steps,
            self.stats.duration
        );
        Ok(level)
    }

    /// Search for a Hamiltonian path, first with obstacles, then without.
    fn find_path(
        &mut self,
        size: usize,
        max_obstacles: usize,
    ) -> Result<(Vec<Position>, Vec<bool>), GenerationError> {
        for attempt in 1..=self.config.max_attempts {
            let blocked: Vec<bool> = obstacles::place_obstacles(size, max_obstacles, &mut self.rng);
            match self.search(size, &blocked) {
                Ok(path) => return Ok((path, blocked)),
                Err(e) => debug!("Attempt {attempt} failed: {e:?}"),
            }
        }

        warn!(
            "No path after {} attempts, retrying without obstacles",
            self.stats.attempts
        );
        self.stats.without_obstacles = true;
        let blocked: Vec<bool> = vec![false; size * size];
        match self.search(size, &blocked) {
            Ok(path) => Ok((path, blocked)),
            Err(e) if self.config.serpentine_fallback => {
                warn!("Obstacle-free search failed ({e:?}), using a serpentine path");
                self.stats.serpentine = true;
                Ok((hamiltonian::random_serpentine(size, &mut self.rng), blocked))
            }
            Err(_) => Err(GenerationError::Exhausted {
                attempts: self.stats.attempts,
            }),
        }
    }

    fn search(&mut self, size: usize, blocked: &[bool]) -> Result<Vec<Position>, SearchError> {
        let mut search: HamiltonianSearch = HamiltonianSearch::new(
            size,
            blocked,
            self.config.max_steps,
            self.config.shuffle_probability,
        );
        let res: Result<Vec<Position>, SearchError> = search.find_path(&mut self.rng);
        self.stats.attempts += 1;
        self.stats.steps += search.steps;
        res
    }
}

/// Path indexes of the points: first and last cells, and evenly spaced cells in between.
///
/// `num_points` must be between 2 and `path_len`, which [`LevelGenerator::generate`] checks.
pub(crate) fn point_indexes(path_len: usize, num_points: usize) -> Vec<usize> {
    let spacing: usize = path_len / num_points;
    let mut indexes: Vec<usize> = (0..num_points - 1).map(|i| i * spacing).collect();
    indexes.push(path_len - 1);
    indexes
}

/// Build the level from a Hamiltonian path.
pub(crate) fn build_level(
    size: usize,
    path: &[Position],
    blocked: &[bool],
    num_points: usize,
) -> Level {
    let indexes: Vec<usize> = point_indexes(path.len(), num_points);

    let points: Vec<Point> = indexes
        .iter()
        .enumerate()
        .map(|(i, idx)| Point::new(i + 1, path[*idx]))
        .collect();

    let solution: Vec<SolutionSegment> = indexes
        .windows(2)
        .enumerate()
        .map(|(i, w)| SolutionSegment {
            from: i + 1,
            to: i + 2,
            cells: path[w[0]..=w[1]].to_vec(),
        })
        .collect();

    let obstacles: Vec<Position> = blocked
        .iter()
        .enumerate()
        .filter(|(_, b)| **b)
        .map(|(i, _)| Position::from_index(i, size))
        .collect();

    Level {
        size,
        points,
        obstacles,
        solution,
    }
}

/// Generate a level on a worker thread.
///
/// The result is sent over the returned channel once the generation completes, so that the
/// caller is never blocked by the search.
pub fn spawn_generation(
    seed: u64,
    config: GeneratorConfig,
    size: usize,
    num_points: usize,
    obstacle_percent: u8,
) -> async_channel::Receiver<Result<Level, GenerationError>> {
    let (sender, receiver) = async_channel::bounded::<Result<Level, GenerationError>>(1);
    thread::spawn(move || {
        let mut generator = LevelGenerator::with_config(Pcg64::seed_from_u64(seed), config);
        let res: Result<Level, GenerationError> =
            generator.generate(size, num_points, obstacle_percent);
        if sender.send_blocking(res).is_err() {
            debug!("Generated level dropped: the receiver is closed");
        }
    });
    receiver
}
