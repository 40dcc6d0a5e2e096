use sokobot_core::{ChannelId, LevelId, PlayerId};
use sokobot_world::{query, Board};

use crate::{
    mode::GameMode,
    report::{LossEvent, WinEvent, WinReward},
};

/// The live state of one player's in-progress game.
#[derive(Clone, Debug)]
pub struct GameSession {
    pub(crate) player: PlayerId,
    pub(crate) channel: ChannelId,
    pub(crate) board: Board,
    pub(crate) level_id: LevelId,
    pub(crate) mode: GameMode,
    pub(crate) is_random: bool,
    pub(crate) is_saved: bool,
    pub(crate) source_text: String,
    pub(crate) appearance: Option<String>,
}

impl GameSession {
    /// Player that owns the session.
    #[must_use]
    pub fn player(&self) -> PlayerId {
        self.player
    }

    /// Channel the session is played in.
    #[must_use]
    pub fn channel(&self) -> ChannelId {
        self.channel
    }

    /// Board being played.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Level number. Custom levels always report the first level.
    #[must_use]
    pub fn level_id(&self) -> LevelId {
        self.level_id
    }

    /// Level the run continues with after a win.
    #[must_use]
    pub fn next_level(&self) -> LevelId {
        self.level_id.next()
    }

    /// Mode of the run. Custom levels are played as [`GameMode::Infinite`]
    /// unless their text declares a budget.
    #[must_use]
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Reports whether the board was generated rather than authored.
    #[must_use]
    pub fn is_random(&self) -> bool {
        self.is_random
    }

    /// Reports whether the board was loaded from the level store.
    #[must_use]
    pub fn is_saved(&self) -> bool {
        self.is_saved
    }

    /// Canonical text of the starting board.
    #[must_use]
    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    /// Glyph the player asked to be drawn with, if any.
    #[must_use]
    pub fn appearance(&self) -> Option<&str> {
        self.appearance.as_deref()
    }

    /// Heading shown above the board.
    #[must_use]
    pub fn title(&self) -> String {
        if self.is_random {
            format!("Level {}", self.level_id)
        } else {
            "Custom Level".to_owned()
        }
    }

    pub(crate) fn win_event(&self) -> WinEvent {
        let reward = if self.is_random {
            WinReward::NextLevel {
                won: self.level_id,
                next: self.next_level(),
                mode: self.mode,
            }
        } else {
            WinReward::Custom {
                board_text: self.source_text.clone(),
                save_offer: !self.is_saved,
            }
        };
        WinEvent {
            player: self.player,
            channel: self.channel,
            moves_used: query::moves_made(&self.board),
            appearance: self.appearance.clone(),
            reward,
        }
    }

    pub(crate) fn loss_event(&self) -> LossEvent {
        LossEvent {
            player: self.player,
            levels_completed: self
                .is_random
                .then(|| self.level_id.get().saturating_sub(1)),
        }
    }
}
