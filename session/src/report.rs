//! Reports handed back to the front end after each input.

use sokobot_core::{ChannelId, Event, LevelId, MoveOutcome, PlayerId};

use crate::mode::{GameMode, LevelSource};

/// Everything that happened while resolving one input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnReport {
    /// Summary of the resolved move.
    pub outcome: MoveOutcome,
    /// Tile transitions in the order they happened.
    pub events: Vec<Event>,
    /// Set when the input ended the session.
    pub ending: Option<SessionEnd>,
}

/// Terminal state reached by a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEnd {
    /// Every goal was covered.
    Won(WinEvent),
    /// The move budget ran out.
    Lost(LossEvent),
}

/// Reward for solving a level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WinEvent {
    /// Player that solved the level.
    pub player: PlayerId,
    /// Channel the level was played in.
    pub channel: ChannelId,
    /// Moves the solution took.
    pub moves_used: u32,
    /// Glyph the player was drawn with, carried over to the next level.
    pub appearance: Option<String>,
    /// What the win unlocks.
    pub reward: WinReward,
}

impl WinEvent {
    /// Source of the next level in a generated run.
    #[must_use]
    pub fn next_source(&self) -> Option<LevelSource> {
        match self.reward {
            WinReward::NextLevel { won, mode, .. } => Some(LevelSource::Continued { won, mode }),
            WinReward::Custom { .. } => None,
        }
    }

    /// Request to store the solved custom level, if saving was offered.
    #[must_use]
    pub fn save_request(&self) -> Option<SaveRequest> {
        match &self.reward {
            WinReward::Custom {
                board_text,
                save_offer: true,
            } => Some(SaveRequest {
                player: self.player,
                board_text: board_text.clone(),
            }),
            _ => None,
        }
    }
}

/// What a win unlocks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WinReward {
    /// A generated run continues with the next level.
    NextLevel {
        /// Level that was solved.
        won: LevelId,
        /// Level to play next.
        next: LevelId,
        /// Mode of the run.
        mode: GameMode,
    },
    /// A custom level was solved.
    Custom {
        /// Canonical text of the solved level.
        board_text: String,
        /// Set unless the level already came from the level store.
        save_offer: bool,
    },
}

/// Report for a session that ran out of moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LossEvent {
    /// Player that lost.
    pub player: PlayerId,
    /// Levels solved in the run, for generated levels only.
    pub levels_completed: Option<u32>,
}

/// Asks the level store to keep a solved level in the player's single slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaveRequest {
    /// Owner of the slot.
    pub player: PlayerId,
    /// Level text to store, replacing any previous level.
    pub board_text: String,
}
