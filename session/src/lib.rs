#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Game sessions binding players and channels to boards.
//!
//! The [`SessionRegistry`] is the single owner of every live [`GameSession`].
//! It guarantees that a player and a channel each take part in at most one
//! session, builds boards from generated or authored levels, and tears a
//! session down as soon as it is won or lost.

mod mode;
mod report;
mod session;

use std::collections::HashMap;

use log::{debug, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use sokobot_core::{ChannelId, Command, LevelId, PlayerId, DEFAULT_MAX_MOVE_BUDGET};
use sokobot_system_level_generator::{GenerationError, GeneratorConfig, LevelGenerator};
use sokobot_system_level_parser::{
    format_level, parse, parse_bytes, LevelError, LevelLayout, ValidationError,
};
use sokobot_world::{self as world, Board, GridError};
use thiserror::Error;

pub use mode::{GameMode, LevelSource};
pub use report::{LossEvent, SaveRequest, SessionEnd, TurnReport, WinEvent, WinReward};
pub use session::GameSession;

/// Settings shared by every session in a registry.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Upper bound applied to every move budget.
    pub max_move_budget: u32,
    /// Settings used to generate random levels.
    pub generator: GeneratorConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_move_budget: DEFAULT_MAX_MOVE_BUDGET,
            generator: GeneratorConfig::default(),
        }
    }
}

/// Errors raised while managing sessions.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SessionError {
    /// The player or the channel already takes part in a session.
    #[error("Cannot start game: game is already active in this channel")]
    SessionConflict {
        /// Player that asked for a session.
        player: PlayerId,
        /// Channel the session was requested in.
        channel: ChannelId,
    },
    /// The player has no session to act on.
    #[error("no game is active for player {player}")]
    NoActiveSession {
        /// Player that sent the input.
        player: PlayerId,
    },
    /// The authored level is unplayable.
    #[error(transparent)]
    InvalidLevel(#[from] ValidationError),
    /// A random level could not be generated.
    #[error(transparent)]
    Generation(#[from] GenerationError),
    /// The level could not be turned into a board.
    #[error(transparent)]
    Grid(#[from] GridError),
}

impl From<LevelError> for SessionError {
    fn from(error: LevelError) -> Self {
        match error {
            LevelError::Invalid(error) => SessionError::InvalidLevel(error),
            LevelError::Grid(error) => SessionError::Grid(error),
        }
    }
}

/// Owner of every live session.
#[derive(Debug)]
pub struct SessionRegistry {
    config: SessionConfig,
    generator: LevelGenerator,
    rng: ChaCha8Rng,
    sessions: HashMap<PlayerId, GameSession>,
}

impl SessionRegistry {
    /// Creates an empty registry whose randomness derives from `seed`.
    #[must_use]
    pub fn new(config: SessionConfig, seed: u64) -> Self {
        Self {
            generator: LevelGenerator::new(config.generator.clone()),
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
            sessions: HashMap::new(),
        }
    }

    /// Reports whether the player or the channel takes part in a session.
    #[must_use]
    pub fn is_active(&self, player: PlayerId, channel: ChannelId) -> bool {
        self.sessions.contains_key(&player)
            || self
                .sessions
                .values()
                .any(|session| session.channel() == channel)
    }

    /// Session owned by the player, if any.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> Option<&GameSession> {
        self.sessions.get(&player)
    }

    /// Number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Reports whether no session is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Starts a session for the player in the channel.
    ///
    /// Nothing is created when either key is already taken or when the level
    /// cannot be built.
    pub fn create(
        &mut self,
        player: PlayerId,
        channel: ChannelId,
        source: LevelSource,
        appearance: Option<String>,
    ) -> Result<&GameSession, SessionError> {
        if self.is_active(player, channel) {
            warn!("[{player}] Cannot start game: game is already active in channel {channel}");
            return Err(SessionError::SessionConflict { player, channel });
        }

        let session = match self.build(player, channel, source, appearance) {
            Ok(session) => session,
            Err(error) => {
                warn!("[{player}] Level was deemed invalid: {error}");
                return Err(error);
            }
        };
        info!("[{player}] Started {}", session.title());
        Ok(self.sessions.entry(player).or_insert(session))
    }

    /// Ends the player's session and returns the level a run would continue with.
    pub fn delete(&mut self, player: PlayerId) -> Option<LevelId> {
        let session = self.sessions.remove(&player)?;
        info!("[{player}] Ended game");
        Some(session.next_level())
    }

    /// Applies one input to the player's board.
    ///
    /// A session that is won or lost by the input is removed before the report
    /// is returned.
    pub fn handle_input(
        &mut self,
        player: PlayerId,
        command: Command,
    ) -> Result<TurnReport, SessionError> {
        let session = self
            .sessions
            .get_mut(&player)
            .ok_or(SessionError::NoActiveSession { player })?;

        let mut events = Vec::new();
        let outcome = world::apply(&mut session.board, command, &mut self.rng, &mut events);
        match command {
            Command::Reset => debug!("[{player}] Reset board"),
            Command::Step { direction } => debug!("[{player}] Moved player piece {direction:?}"),
        }

        let ending = if outcome.win {
            if session.is_random {
                info!("[{player}] Won level");
            } else {
                info!("[{player}] Won custom level");
            }
            Some(SessionEnd::Won(session.win_event()))
        } else if outcome.loss {
            info!("[{player}] Lost level, ran out of moves");
            Some(SessionEnd::Lost(session.loss_event()))
        } else {
            None
        };

        if outcome.is_terminal() {
            let _ = self.sessions.remove(&player);
        }
        Ok(TurnReport {
            outcome,
            events,
            ending,
        })
    }

    fn build(
        &mut self,
        player: PlayerId,
        channel: ChannelId,
        source: LevelSource,
        appearance: Option<String>,
    ) -> Result<GameSession, SessionError> {
        let (level, mode, budget) = match source {
            LevelSource::Generated { level, mode } => (level, mode, mode.starting_budget(level)),
            LevelSource::Continued { won, mode } => {
                (won.next(), mode, mode.continuation_budget(won))
            }
            LevelSource::CustomText(text) => {
                return self.custom(player, channel, parse(&text), false, appearance)
            }
            LevelSource::CustomFile(bytes) => {
                return self.custom(player, channel, parse_bytes(&bytes), false, appearance)
            }
            LevelSource::Saved(text) => {
                return self.custom(player, channel, parse(&text), true, appearance)
            }
        };

        let grid = self.generator.generate(level, &mut self.rng)?;
        let move_budget = self.clamp_budget(budget);
        let source_text = format_level(&grid, move_budget);
        Ok(GameSession {
            player,
            channel,
            board: Board::new(grid, move_budget)?,
            level_id: level,
            mode,
            is_random: true,
            is_saved: false,
            source_text,
            appearance,
        })
    }

    fn custom(
        &self,
        player: PlayerId,
        channel: ChannelId,
        layout: LevelLayout,
        is_saved: bool,
        appearance: Option<String>,
    ) -> Result<GameSession, SessionError> {
        let level = layout.into_level()?;
        let move_budget = self.clamp_budget(level.move_budget);
        let mode = if move_budget.is_some() {
            GameMode::Challenge
        } else {
            GameMode::Infinite
        };
        Ok(GameSession {
            player,
            channel,
            board: Board::new(level.grid, move_budget)?,
            level_id: LevelId::FIRST,
            mode,
            is_random: false,
            is_saved,
            source_text: level.source_text,
            appearance,
        })
    }

    fn clamp_budget(&self, budget: Option<u32>) -> Option<u32> {
        budget.map(|budget| budget.min(self.config.max_move_budget))
    }
}
