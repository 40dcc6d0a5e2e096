#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Sokobot puzzle engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative board, and pure systems. Adapters submit [`Command`] values
//! describing a player's input, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing every
//! tile transition that happened as a result.
//!
//! Coordinates follow the layout of level text: a [`CellCoord`]'s column picks
//! one line of the level and its row picks the offset inside that line.

use std::{fmt, num::ParseIntError, str::FromStr};

use serde::{Deserialize, Serialize};

/// Upper bound applied to every move budget unless configured otherwise.
pub const DEFAULT_MAX_MOVE_BUDGET: u32 = 100;

/// Number of random destinations an enemy samples before giving up for the turn.
pub const ENEMY_STEP_ATTEMPTS: usize = 10;

/// Number of random cells sampled per tile before level generation gives up.
pub const PLACEMENT_ATTEMPTS: usize = 1_000;

/// Typed content of a single board cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tile {
    /// The piece controlled by the player.
    Player,
    /// Open floor.
    Empty,
    /// A box that has not reached a goal.
    Box,
    /// A box resting on a goal.
    CompletedBox,
    /// Impassable wall.
    Wall,
    /// An uncovered goal.
    Goal,
    /// A randomly wandering obstacle.
    Enemy,
}

impl Tile {
    /// Every tile kind in declaration order.
    pub const ALL: [Tile; 7] = [
        Tile::Player,
        Tile::Empty,
        Tile::Box,
        Tile::CompletedBox,
        Tile::Wall,
        Tile::Goal,
        Tile::Enemy,
    ];

    /// Textual token used for the tile in level text.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Tile::Player => "player",
            Tile::Empty => "empty",
            Tile::Box => "box",
            Tile::CompletedBox => "completed_box",
            Tile::Wall => "wall",
            Tile::Goal => "goal",
            Tile::Enemy => "enemy",
        }
    }

    /// Resolves a token produced by [`Tile::token`].
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        Tile::ALL.into_iter().find(|tile| tile.token() == token)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Location of a single board cell.
///
/// `column` selects a line of the board and `row` the offset within it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based line index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based offset of the cell within its line.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Returns the neighbouring cell in the provided direction.
    ///
    /// Yields `None` when the step would leave the non-negative quadrant; the
    /// caller remains responsible for checking the upper bounds.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<Self> {
        let (column_delta, row_delta) = direction.delta();
        let column = self.column.checked_add_signed(column_delta)?;
        let row = self.row.checked_add_signed(row_delta)?;
        Some(Self::new(column, row))
    }
}

/// Directions a player may move in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward the previous offset within the current line.
    Left,
    /// Toward the next offset within the current line.
    Right,
    /// Toward the previous line.
    Up,
    /// Toward the next line.
    Down,
}

impl Direction {
    /// Every direction, in the order reactions are offered to players.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Up,
        Direction::Right,
        Direction::Down,
    ];

    /// Column and row delta applied by a single step.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
        }
    }
}

/// Identifier of the person playing a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(u64);

impl PlayerId {
    /// Creates a new player identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PlayerId {
    type Err = ParseIntError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value.trim().parse().map(Self)
    }
}

/// Identifier of the channel a session is played in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChannelId(u64);

impl ChannelId {
    /// Creates a new channel identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Numeric identifier of a generated level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LevelId(u32);

impl LevelId {
    /// The level a new infinite run starts at.
    pub const FIRST: LevelId = LevelId(1);

    /// Creates a new level identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Identifier of the level that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl Default for LevelId {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LevelId {
    type Err = ParseIntError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value.trim().parse().map(Self)
    }
}

/// Commands that express all permissible board mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Moves the player one cell, pushing a box if one is in the way.
    Step {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Restores the board to its initial layout and clears the move counter.
    Reset,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the player moved between two cells.
    PlayerMoved {
        /// Cell the player occupied before moving.
        from: CellCoord,
        /// Cell the player occupies after the move.
        to: CellCoord,
    },
    /// Confirms that a box was pushed.
    BoxPushed {
        /// Cell the box occupied before the push.
        from: CellCoord,
        /// Cell the box occupies after the push.
        to: CellCoord,
        /// Whether the box came to rest on a goal.
        completed: bool,
    },
    /// Reports that a step was blocked and left the board untouched.
    MoveIgnored {
        /// Direction of the rejected step.
        direction: Direction,
    },
    /// Confirms that an enemy wandered to a new cell.
    EnemyMoved {
        /// Cell the enemy occupied before moving.
        from: CellCoord,
        /// Cell the enemy occupies after moving.
        to: CellCoord,
    },
    /// Reports that an enemy found no free destination and stayed put.
    EnemyHeld {
        /// Cell the enemy keeps occupying.
        cell: CellCoord,
    },
    /// Confirms that the board was restored to its initial layout.
    BoardReset {
        /// Cell the player occupies after the reset.
        player: CellCoord,
    },
    /// Announces that no goal remains uncovered.
    LevelCompleted {
        /// Number of moves spent on the level.
        moves_used: u32,
    },
    /// Announces that the move budget ran out before the level was completed.
    MovesExhausted {
        /// Number of moves spent on the level.
        moves_used: u32,
    },
}

/// Summary of a single resolved command.
#[must_use]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Whether the board changed.
    pub moved: bool,
    /// Whether the level is now complete.
    pub win: bool,
    /// Whether the move budget is exhausted without completing the level.
    pub loss: bool,
}

impl MoveOutcome {
    /// Outcome of a command that left the board untouched.
    pub const UNCHANGED: MoveOutcome = MoveOutcome {
        moved: false,
        win: false,
        loss: false,
    };

    /// Reports whether the session ends with this outcome.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.win || self.loss
    }
}
