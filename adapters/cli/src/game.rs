use std::{
    io::{BufRead, Write},
    time::Instant,
};

use anyhow::{Context, Result};
use log::info;
use sokobot_core::{ChannelId, Command, Direction, PlayerId};
use sokobot_rendering::{render_session, GlyphTheme};
use sokobot_session::{
    LevelSource, LossEvent, SessionEnd, SessionError, SessionRegistry, WinEvent, WinReward,
};

use crate::store::LevelStore;

const CONTROLS: &str = "a/d/w/s to move, r to reset, q to quit";

/// One line of player input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Input {
    Board(Command),
    Save,
    Quit,
}

pub(crate) fn parse_input(line: &str) -> Option<Input> {
    let step = |direction| Some(Input::Board(Command::Step { direction }));
    match line.trim().to_ascii_lowercase().as_str() {
        "a" | "left" => step(Direction::Left),
        "d" | "right" => step(Direction::Right),
        "w" | "up" => step(Direction::Up),
        "s" | "down" => step(Direction::Down),
        "r" | "reset" => Some(Input::Board(Command::Reset)),
        "save" => Some(Input::Save),
        "q" | "quit" | "end" => Some(Input::Quit),
        _ => None,
    }
}

/// Terminal stand-in for the chat front end, playing as a single player.
#[derive(Debug)]
pub(crate) struct Frontend {
    registry: SessionRegistry,
    store: LevelStore,
    theme: GlyphTheme,
    player: PlayerId,
    channel: ChannelId,
}

impl Frontend {
    pub(crate) fn new(
        registry: SessionRegistry,
        store: LevelStore,
        theme: GlyphTheme,
        player: PlayerId,
        channel: ChannelId,
    ) -> Self {
        Self {
            registry,
            store,
            theme,
            player,
            channel,
        }
    }

    /// Plays from `source` until the run ends or input runs dry.
    pub(crate) fn run<R, W>(
        &mut self,
        source: LevelSource,
        appearance: Option<String>,
        input: &mut R,
        output: &mut W,
    ) -> Result<()>
    where
        R: BufRead,
        W: Write,
    {
        if !self.start(source, appearance, output)? {
            return Ok(());
        }
        writeln!(output, "{CONTROLS}")?;

        let mut line = String::new();
        loop {
            line.clear();
            if input.read_line(&mut line)? == 0 {
                let _ = self.registry.delete(self.player);
                break;
            }
            let Some(parsed) = parse_input(&line) else {
                writeln!(output, "Unknown input `{}`; use {CONTROLS}", line.trim())?;
                continue;
            };

            match parsed {
                Input::Quit => {
                    let _ = self.registry.delete(self.player);
                    writeln!(output, "Ended game!")?;
                    break;
                }
                Input::Save => {
                    self.store.flush()?;
                    writeln!(output, "Saved {} custom levels", self.store.len())?;
                }
                Input::Board(command) => {
                    let report = self.registry.handle_input(self.player, command)?;
                    let keep_playing = match report.ending {
                        None => {
                            self.show(output)?;
                            true
                        }
                        Some(SessionEnd::Won(event)) => self.win(event, input, output)?,
                        Some(SessionEnd::Lost(event)) => {
                            self.loss(event, output)?;
                            false
                        }
                    };
                    if !keep_playing {
                        break;
                    }
                }
            }
            let _ = self.store.flush_if_due(Instant::now())?;
        }
        Ok(())
    }

    /// Writes the store to disk before the front end exits.
    pub(crate) fn shutdown(mut self) -> Result<()> {
        self.store.flush()
    }

    fn start<W: Write>(
        &mut self,
        source: LevelSource,
        appearance: Option<String>,
        output: &mut W,
    ) -> Result<bool> {
        if let Err(error) = self.theme.player_glyph(appearance.as_deref()) {
            writeln!(output, "{error}")?;
            return Ok(false);
        }
        match self
            .registry
            .create(self.player, self.channel, source, appearance)
        {
            Ok(session) => {
                writeln!(output, "{}", render_session(session, &self.theme)?)?;
                Ok(true)
            }
            Err(error @ (SessionError::InvalidLevel(_) | SessionError::SessionConflict { .. })) => {
                writeln!(output, "{error}")?;
                Ok(false)
            }
            Err(error) => Err(error).context("failed to start game"),
        }
    }

    fn show<W: Write>(&self, output: &mut W) -> Result<()> {
        if let Some(session) = self.registry.get(self.player) {
            writeln!(output, "{}", render_session(session, &self.theme)?)?;
        }
        Ok(())
    }

    fn win<R, W>(&mut self, event: WinEvent, input: &mut R, output: &mut W) -> Result<bool>
    where
        R: BufRead,
        W: Write,
    {
        if let WinReward::NextLevel { next, .. } = event.reward {
            writeln!(output, "You win! Wow! Good job!\nNext level: {next}")?;
            let Some(source) = event.next_source() else {
                return Ok(false);
            };
            return self.start(source, event.appearance, output);
        }

        let Some(request) = event.save_request() else {
            writeln!(output, "Level completed!")?;
            return Ok(false);
        };
        writeln!(
            output,
            "Level completed! Would you like to save your level? [y/n]\n\
             You can only save one custom level at a time, this will overwrite any \
             previous level you have saved"
        )?;
        let mut answer = String::new();
        let _ = input.read_line(&mut answer)?;
        if matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes") {
            self.store.save(request);
            writeln!(output, "Level saved!")?;
        } else {
            info!("[{}] Not saving custom level", self.player);
        }
        Ok(false)
    }

    fn loss<W: Write>(&self, event: LossEvent, output: &mut W) -> Result<()> {
        writeln!(output, "You lost... Better luck next time")?;
        if let Some(levels) = event.levels_completed {
            writeln!(output, "Levels completed: {levels}")?;
        }
        Ok(())
    }
}
