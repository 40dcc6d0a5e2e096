#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Procedural level generation keyed by level number.

use std::ops::RangeInclusive;

use log::debug;
use rand::Rng;
use serde::Deserialize;
use sokobot_core::{CellCoord, LevelId, Tile, PLACEMENT_ATTEMPTS};
use sokobot_world::{GridError, TileGrid};
use thiserror::Error;

/// Tuning knobs controlling how boards grow with the level number.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Tiles per line on the first level.
    pub base_width: u32,
    /// Lines on the first level.
    pub base_height: u32,
    /// Upper bound on tiles per line.
    pub max_width: u32,
    /// Upper bound on lines.
    pub max_height: u32,
    /// Upper bound on box and goal pairs.
    pub max_boxes: u32,
    /// Box pairs per point of difficulty.
    pub box_ratio: f64,
    /// Tiles per line added for each level.
    pub width_growth: f64,
    /// Lines added for each level.
    pub height_growth: f64,
    /// Level from which one enemy roams the board.
    pub first_enemy_level: u32,
    /// Level from which a second enemy joins.
    pub second_enemy_level: u32,
    /// Random cells sampled per tile before generation gives up.
    pub placement_attempts: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_width: 5,
            base_height: 5,
            max_width: 10,
            max_height: 10,
            max_boxes: 12,
            box_ratio: 0.51,
            width_growth: 0.15,
            height_growth: 0.1,
            first_enemy_level: 10,
            second_enemy_level: 100,
            placement_attempts: PLACEMENT_ATTEMPTS,
        }
    }
}

impl GeneratorConfig {
    /// Derives the board shape and population for a level.
    ///
    /// `difficulty` scales the number of boxes while `level` scales the board
    /// size and the number of enemies.
    #[must_use]
    pub fn plan(&self, difficulty: u32, level: u32) -> LevelPlan {
        let grow = |base: u32, rate: f64, max: u32| {
            let size = (f64::from(base) + rate * f64::from(level)).round();
            (size as u32).clamp(1, max.max(1))
        };
        let box_count = ((f64::from(difficulty) * self.box_ratio).round() as u32).min(self.max_boxes);
        let enemy_count =
            u32::from(level >= self.first_enemy_level) + u32::from(level >= self.second_enemy_level);

        LevelPlan {
            width: grow(self.base_width, self.width_growth, self.max_width),
            height: grow(self.base_height, self.height_growth, self.max_height),
            box_count,
            enemy_count,
        }
    }
}

/// Shape and population of a board about to be generated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelPlan {
    /// Tiles per line.
    pub width: u32,
    /// Number of lines.
    pub height: u32,
    /// Number of box and goal pairs.
    pub box_count: u32,
    /// Number of enemies.
    pub enemy_count: u32,
}

/// Errors raised when a board cannot be populated.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// No free cell was found for a tile within the sampling budget.
    #[error("could not find a free cell for {tile} after {attempts} attempts")]
    PlacementExhausted {
        /// Tile that could not be placed.
        tile: Tile,
        /// Number of cells sampled.
        attempts: usize,
    },
    /// The planned board could not be allocated.
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Pure system that produces random boards.
#[derive(Clone, Debug, Default)]
pub struct LevelGenerator {
    config: GeneratorConfig,
}

impl LevelGenerator {
    /// Creates a new generator using the supplied configuration.
    #[must_use]
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Generates the board for a level, using the level number as difficulty.
    pub fn generate<R>(&self, level: LevelId, rng: &mut R) -> Result<TileGrid, GenerationError>
    where
        R: Rng + ?Sized,
    {
        self.generate_plan(self.config.plan(level.get(), level.get()), rng)
    }

    /// Generates a board with the provided shape and population.
    ///
    /// Goals, boxes and the player are kept off the outermost ring whenever
    /// the board is large enough to have an interior. Enemies may start
    /// anywhere.
    pub fn generate_plan<R>(&self, plan: LevelPlan, rng: &mut R) -> Result<TileGrid, GenerationError>
    where
        R: Rng + ?Sized,
    {
        debug!(
            "generating {}x{} board with {} boxes and {} enemies",
            plan.width, plan.height, plan.box_count, plan.enemy_count
        );
        let mut grid = TileGrid::filled(plan.height, plan.width, Tile::Empty)?;
        let interior = Region::interior(&grid);
        let anywhere = Region::whole(&grid);
        let attempts = self.config.placement_attempts;

        for _ in 0..plan.box_count {
            place(&mut grid, Tile::Goal, &interior, attempts, rng)?;
            place(&mut grid, Tile::Box, &interior, attempts, rng)?;
        }
        place(&mut grid, Tile::Player, &interior, attempts, rng)?;
        for _ in 0..plan.enemy_count {
            place(&mut grid, Tile::Enemy, &anywhere, attempts, rng)?;
        }

        Ok(grid)
    }
}

#[derive(Clone, Debug)]
struct Region {
    columns: RangeInclusive<u32>,
    rows: RangeInclusive<u32>,
}

impl Region {
    fn whole(grid: &TileGrid) -> Self {
        let (columns, rows) = grid.dimensions();
        Self {
            columns: 0..=columns - 1,
            rows: 0..=rows - 1,
        }
    }

    fn interior(grid: &TileGrid) -> Self {
        let (columns, rows) = grid.dimensions();
        Self {
            columns: inset(columns),
            rows: inset(rows),
        }
    }

    fn sample<R>(&self, rng: &mut R) -> CellCoord
    where
        R: Rng + ?Sized,
    {
        CellCoord::new(
            rng.gen_range(self.columns.clone()),
            rng.gen_range(self.rows.clone()),
        )
    }
}

fn inset(len: u32) -> RangeInclusive<u32> {
    if len >= 3 {
        1..=len - 2
    } else {
        0..=len.saturating_sub(1)
    }
}

fn place<R>(
    grid: &mut TileGrid,
    tile: Tile,
    region: &Region,
    attempts: usize,
    rng: &mut R,
) -> Result<(), GenerationError>
where
    R: Rng + ?Sized,
{
    for _ in 0..attempts {
        let cell = region.sample(rng);
        if grid.tile(cell) == Some(Tile::Empty) {
            grid.set(cell, tile)?;
            return Ok(());
        }
    }
    Err(GenerationError::PlacementExhausted { tile, attempts })
}
