//! Level sources and the move budgets attached to generated levels.

use serde::{Deserialize, Serialize};
use sokobot_core::LevelId;

const BUDGET_RATIO: f64 = 0.51;

/// How a run of generated levels is played.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Levels carry no move budget.
    #[default]
    Infinite,
    /// Every level has to be solved within a move budget.
    Challenge,
}

impl GameMode {
    /// Budget for a run that starts at `level`.
    #[must_use]
    pub fn starting_budget(self, level: LevelId) -> Option<u32> {
        match self {
            GameMode::Infinite => None,
            GameMode::Challenge => Some(
                scaled(level, 0.0).saturating_mul(10).saturating_add(5),
            ),
        }
    }

    /// Budget for the level that follows a win on `won`.
    #[must_use]
    pub fn continuation_budget(self, won: LevelId) -> Option<u32> {
        match self {
            GameMode::Infinite => None,
            GameMode::Challenge => Some(
                scaled(won, 1.0).saturating_mul(8).saturating_add(7),
            ),
        }
    }
}

fn scaled(level: LevelId, offset: f64) -> u32 {
    (BUDGET_RATIO * f64::from(level.get()) + offset).round() as u32
}

/// Where the board of a new session comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LevelSource {
    /// A freshly generated level at the start of a run.
    Generated {
        /// Level to generate.
        level: LevelId,
        /// Mode of the run.
        mode: GameMode,
    },
    /// The generated level following a win, inside an ongoing run.
    Continued {
        /// Level that was just won.
        won: LevelId,
        /// Mode of the run.
        mode: GameMode,
    },
    /// Level text typed by the player.
    CustomText(String),
    /// An uploaded level file.
    CustomFile(Vec<u8>),
    /// Level text previously saved to the level store.
    Saved(String),
}
