/*
cli_options.rs

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

//! Process command-line options.
//!
//! These options are intended for developers creating level packs.
//!
//! # Examples
//!
//! List the generation presets:
//!
//! ```text
//! $ gridlink --ls
//! Easy      6x6   5 points   5% obstacles
//! Medium    8x8   7 points   8% obstacles
//! Hard     10x10  9 points  10% obstacles
//! Expert   12x12 12 points  12% obstacles
//! ```
//!
//! Generate two easy levels with a fixed seed and print them:
//!
//! ```text
//! $ gridlink -f easy -c 2 --seed 42
//! ```
//!
//! Generate a pack of ten hard levels and save it as a level file:
//!
//! ```text
//! $ gridlink -f hard -c 10 -o levels.json
//! ```

use clap::Parser;
use log::{debug, warn};
use std::env;
use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use rand::SeedableRng;
use rand_pcg::Pcg64;

use crate::config::{self, COPYRIGHT_NOTICE, Settings};
use crate::generator::level::Level;
use crate::generator::level_generator::{GenerationError, LevelGenerator};
use crate::generator::presets::{Difficulty, Preset};
use crate::grid::GridModel;
use crate::progression::{Pack, ProgressionCatalog, SystemClock};
use crate::saver::levels::JsonLevelSource;
use crate::saver::progress::ProgressStore;
use crate::saver::store::JsonFileStore;

/// Generate Gridlink levels for developers.
#[derive(Parser)]
#[command(about, long_about = None, version, long_version = COPYRIGHT_NOTICE)]
struct Args {
    /// List the generation presets
    #[arg(short, long, default_value_t = false)]
    ls: bool,

    /// Difficulty preset for the generated levels
    #[arg(value_enum, short = 'f', long, default_value_t = Difficulty::Easy)]
    difficulty: Difficulty,

    /// Grid size, overriding the preset
    #[arg(long)]
    size: Option<usize>,

    /// Number of points, overriding the preset
    #[arg(long)]
    points: Option<usize>,

    /// Obstacle percentage, overriding the preset
    #[arg(long)]
    obstacles: Option<u8>,

    /// Number of levels to generate
    #[arg(short, long, default_value_t = 1)]
    count: usize,

    /// Seed for reproducible generation
    #[arg(long)]
    seed: Option<u64>,

    /// Print the levels in JSON format instead of ASCII grids
    #[arg(short, long, default_value_t = false)]
    json: bool,

    /// Save the generated levels as a level pack file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the daily puzzle of the level catalog
    #[arg(long, default_value_t = false)]
    daily: bool,

    /// Print the completion status of the level catalog
    #[arg(long, default_value_t = false)]
    progress: bool,

    /// Print some statistics after generating the levels
    #[arg(short, long, default_value_t = false)]
    summary: bool,

    /// Enable debug messages
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

/// Parse and process command-line options. Return the exit code.
pub fn parse() -> u8 {
    let args: Args = Args::parse();

    if args.debug {
        unsafe {
            env::set_var("RUST_LOG", "debug");
        }
    }
    env_logger::init();

    let settings: Settings = match Settings::load(config::data_dir()) {
        Ok(s) => s,
        Err(e) => {
            warn!("Cannot read the settings, using the defaults: {e}");
            Settings::default()
        }
    };

    let ret: Result<(), Box<dyn Error>> = if args.ls {
        list_presets();
        Ok(())
    } else if args.daily || args.progress {
        catalog_status(&args, &settings)
    } else {
        generate(&args, &settings)
    };

    match ret {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    }
}

fn list_presets() {
    for difficulty in Difficulty::all() {
        let preset: Preset = difficulty.preset();
        println!(
            "{:<8} {:>2}x{:<2} {:>2} points  {:>2}% obstacles",
            difficulty.to_string(),
            preset.size,
            preset.size,
            preset.num_points,
            preset.obstacle_percent
        );
    }
}

/// Load the level catalog and print the daily puzzle or the progress.
fn catalog_status(args: &Args, settings: &Settings) -> Result<(), Box<dyn Error>> {
    let data_dir: PathBuf = config::data_dir();
    let source: JsonLevelSource = JsonLevelSource::new(data_dir.clone());
    let catalog: ProgressionCatalog =
        ProgressionCatalog::load(&source, settings, args.seed.unwrap_or_default())?;

    if args.daily
        && let Some(daily) = catalog.daily_level(&SystemClock)
    {
        println!(
            "Daily puzzle: {} level {} ({}x{}, {} points)",
            catalog.packs()[daily.pack].name,
            daily.level_index + 1,
            daily.level.size,
            daily.level.size,
            daily.level.point_count()
        );
        print_level(daily.level, args.json)?;
    }

    if args.progress {
        let progress: ProgressStore<JsonFileStore> =
            ProgressStore::new(JsonFileStore::new(data_dir)?);
        for (i, pack) in catalog.packs().iter().enumerate() {
            let done: usize = progress.completed_count(i, pack.levels.len())?;
            println!("{:<12} {done}/{}", pack.name, pack.levels.len());
        }
        if let Some(last) = progress.last_viewed()? {
            println!("Last viewed: pack {} level {}", last.pack + 1, last.level + 1);
        }
    }
    Ok(())
}

fn print_level(level: &Level, json: bool) -> Result<(), Box<dyn Error>> {
    if json {
        println!("{}", serde_json::to_string(level)?);
    } else {
        let grid: GridModel = GridModel::new(level.size, &level.points, &level.obstacles);
        println!("{grid}");
    }
    Ok(())
}

/// Generate the requested levels.
fn generate(args: &Args, settings: &Settings) -> Result<(), Box<dyn Error>> {
    let preset: Preset = args.difficulty.preset();
    let size: usize = args.size.unwrap_or(preset.size);
    let num_points: usize = args.points.unwrap_or(preset.num_points);
    let obstacle_percent: u8 = args.obstacles.unwrap_or(preset.obstacle_percent);

    let rng: Pcg64 = match args.seed {
        Some(seed) => Pcg64::seed_from_u64(seed),
        None => Pcg64::from_os_rng(),
    };
    let mut generator: LevelGenerator<Pcg64> = LevelGenerator::with_config(rng, settings.generator);

    let mut levels: Vec<Level> = Vec::with_capacity(args.count);
    let mut total: Duration = Duration::ZERO;
    let mut max: Duration = Duration::ZERO;
    let mut attempts: usize = 0;
    let mut steps: usize = 0;
    let mut fallbacks: usize = 0;
    let mut errors: usize = 0;

    for i in 0..args.count {
        debug!("Iteration {i}");
        let ret: Result<Level, GenerationError> =
            generator.generate(size, num_points, obstacle_percent);
        total += generator.stats.duration;
        max = max.max(generator.stats.duration);
        attempts += generator.stats.attempts;
        steps += generator.stats.steps;
        if generator.stats.without_obstacles {
            fallbacks += 1;
        }
        match ret {
            Ok(level) => {
                if args.output.is_none() {
                    print_level(&level, args.json)?;
                }
                levels.push(level);
            }
            // Invalid parameters fail for every level
            Err(e @ GenerationError::Exhausted { .. }) => {
                errors += 1;
                debug!("ERROR generating a level: {e}");
            }
            Err(e) => return Err(Box::new(e)),
        }
    }

    if let Some(output) = &args.output {
        let pack: Pack = Pack {
            name: args.difficulty.to_string(),
            levels,
        };
        JsonLevelSource::from_file(output).save_packs(&[pack])?;
    }

    // Print some stats
    if args.summary {
        let count: u32 = u32::try_from(args.count.max(1)).unwrap_or(u32::MAX);
        println!(
            "
        total time = {total:?}
      average time = {:?}
          max time = {max:?}
  average attempts = {}
     average steps = {}
         fallbacks = {fallbacks}
            errors = {errors}",
            total / count,
            attempts / args.count.max(1),
            steps / args.count.max(1),
        );
    }
    Ok(())
}
