#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Sokobot adapters.
//!
//! Boards are presented as a grid of glyphs wrapped in a one glyph border.

mod theme;

use std::fmt;

use anyhow::{bail, Context, Result};
use sokobot_core::Tile;
use sokobot_session::GameSession;
use sokobot_world::{query, Board};

pub use theme::GlyphTheme;

/// Glyph grid ready to be shown to a player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardFrame {
    /// Heading shown above the board.
    pub title: String,
    /// Glyphs of every line, border included.
    pub lines: Vec<Vec<String>>,
    /// Moves left before the budget runs out, if the level has one.
    pub moves_left: Option<u32>,
}

impl BoardFrame {
    /// Board glyphs with one line of text per board line.
    #[must_use]
    pub fn board_text(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.concat())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Reads the drawn board back into level text.
    ///
    /// `player_glyph` must match the override the frame was rendered with.
    pub fn to_level_text(&self, theme: &GlyphTheme, player_glyph: Option<&str>) -> Result<String> {
        let Some(inner) = self
            .lines
            .get(1..self.lines.len().saturating_sub(1))
            .filter(|inner| !inner.is_empty())
        else {
            bail!("frame has no board inside its border");
        };

        let mut text = Vec::with_capacity(inner.len());
        for line in inner {
            let Some(cells) = line
                .get(1..line.len().saturating_sub(1))
                .filter(|cells| !cells.is_empty())
            else {
                bail!("frame line has no cells inside its border");
            };
            let tokens = cells
                .iter()
                .map(|glyph| {
                    if Some(glyph.as_str()) == player_glyph {
                        return Ok(Tile::Player.token());
                    }
                    theme
                        .tile_for(glyph)
                        .map(Tile::token)
                        .with_context(|| format!("unknown glyph `{glyph}` in frame"))
                })
                .collect::<Result<Vec<_>>>()?;
            text.push(tokens.join(" "));
        }
        Ok(text.join("\n"))
    }
}

impl fmt::Display for BoardFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        write!(f, "{}", self.board_text())?;
        if let Some(moves_left) = self.moves_left {
            write!(f, "\nMoves left: {moves_left}")?;
        }
        Ok(())
    }
}

/// Draws a board with the theme, optionally overriding the player glyph.
///
/// Fails when the override is the glyph of another tile.
pub fn render_board(
    board: &Board,
    title: impl Into<String>,
    theme: &GlyphTheme,
    player_glyph: Option<&str>,
) -> Result<BoardFrame> {
    let player = theme.player_glyph(player_glyph)?;
    let grid = query::grid(board);
    let border = theme.border().to_owned();
    let width = grid.rows() as usize + 2;

    let mut lines = Vec::with_capacity(grid.columns() as usize + 2);
    lines.push(vec![border.clone(); width]);
    for line in grid.lines() {
        let mut glyphs = Vec::with_capacity(width);
        glyphs.push(border.clone());
        glyphs.extend(line.iter().map(|tile| match tile {
            Tile::Player => player.to_owned(),
            _ => theme.glyph(*tile).to_owned(),
        }));
        glyphs.push(border.clone());
        lines.push(glyphs);
    }
    lines.push(vec![border; width]);

    Ok(BoardFrame {
        title: title.into(),
        lines,
        moves_left: query::remaining_moves(board),
    })
}

/// Draws the board of a live session using its title and player glyph.
pub fn render_session(session: &GameSession, theme: &GlyphTheme) -> Result<BoardFrame> {
    render_board(session.board(), session.title(), theme, session.appearance())
}
