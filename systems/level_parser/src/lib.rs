#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns player-authored level text into boards.
//!
//! Level text is one line per board line with tiles separated by single
//! spaces, for example:
//!
//! ```text
//! wall wall wall wall
//! player box goal wall
//! moves: 12
//! ```
//!
//! Parsing is lenient: unknown tokens become empty floor and a surrounding
//! code fence is ignored. Validation is a separate step that reports every
//! problem it finds at once.

use std::{fmt, sync::OnceLock};

use log::debug;
use regex::Regex;
use sokobot_core::Tile;
use sokobot_world::{GridError, TileGrid};
use thiserror::Error;

const FENCE: &str = "```";
const MOVES_DIRECTIVE: &str = r"(?i)-?[ \t]*moves[ \t]*:[ \t]*(\d+)";

/// Lines of tiles and the optional move budget read from level text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelLayout {
    lines: Vec<Vec<Tile>>,
    move_budget: Option<u32>,
}

impl LevelLayout {
    /// Tiles of every parsed line, in order.
    #[must_use]
    pub fn lines(&self) -> &[Vec<Tile>] {
        &self.lines
    }

    /// Move budget declared by a `moves: N` directive, before any clamping.
    #[must_use]
    pub const fn move_budget(&self) -> Option<u32> {
        self.move_budget
    }

    /// Checks that the layout describes a playable level.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate(&self.lines)
    }

    /// Validates the layout and converts it into a board-ready level.
    pub fn into_level(self) -> Result<ParsedLevel, LevelError> {
        self.validate()?;
        let grid = TileGrid::from_lines(self.lines)?;
        let source_text = format_level(&grid, self.move_budget);
        Ok(ParsedLevel {
            grid,
            move_budget: self.move_budget,
            source_text,
        })
    }
}

/// A validated custom level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedLevel {
    /// Initial layout of the board.
    pub grid: TileGrid,
    /// Move budget declared by the level text, before any clamping.
    pub move_budget: Option<u32>,
    /// Canonical level text, suitable for saving and re-parsing.
    pub source_text: String,
}

/// Problems that make a level unplayable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    /// Boxes and goals are not paired up.
    #[error("Box amount [{boxes}] is not equal to goal amount [{goals}], rendering level impossible.")]
    ImbalancedLevel {
        /// Number of box tiles.
        boxes: usize,
        /// Number of goal tiles.
        goals: usize,
    },
    /// The level has no boxes or no goals.
    #[error("No boxes or goals are included in the level")]
    EmptyLevel,
    /// The level does not contain exactly one player.
    #[error("Either none or more than one player tile included in the level")]
    PlayerCountError {
        /// Number of player tiles.
        found: usize,
    },
    /// Lines differ in length.
    #[error("All rows are not the same width as each other.")]
    RowWidthMismatch,
    /// A box sits in a corner, where it can never be moved.
    #[error("A box is placed in a corner, rendering the level impossible")]
    UnsolvableCornerBox,
}

/// Every validation problem found in a level.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{}", join_issues(.issues))]
pub struct ValidationError {
    issues: Vec<ValidationIssue>,
}

impl ValidationError {
    /// Problems found, in the order they were checked.
    #[must_use]
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// Reports whether a specific problem was found.
    #[must_use]
    pub fn contains(&self, issue: ValidationIssue) -> bool {
        self.issues.contains(&issue)
    }
}

fn join_issues(issues: &[ValidationIssue]) -> JoinedIssues<'_> {
    JoinedIssues(issues)
}

struct JoinedIssues<'a>(&'a [ValidationIssue]);

impl fmt::Display for JoinedIssues<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, issue) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

/// Errors raised while turning level text into a playable level.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LevelError {
    /// The level failed validation.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    /// The validated lines could not form a grid.
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Parses level text into lines of tiles without validating it.
#[must_use]
pub fn parse(text: &str) -> LevelLayout {
    let text = text.replace('\r', "");
    let mut move_budget = None;
    let mut lines = Vec::new();

    for raw_line in text.split('\n') {
        if raw_line.trim_start().starts_with(FENCE) {
            continue;
        }
        // A closing fence may share the last board line.
        let raw_line = raw_line.trim_end_matches('`');

        let line = match moves_directive().captures(raw_line) {
            Some(captures) => {
                if move_budget.is_none() {
                    move_budget = Some(captures[1].parse::<u32>().unwrap_or(u32::MAX));
                }
                let stripped = moves_directive().replace_all(raw_line, "");
                let stripped = stripped.trim();
                if stripped.is_empty() {
                    continue;
                }
                stripped.to_owned()
            }
            None => raw_line.to_owned(),
        };

        let tokens: Vec<&str> = line.split(' ').collect();
        if tokens == [""] {
            continue;
        }
        lines.push(tokens.into_iter().map(authored_tile).collect());
    }

    LevelLayout { lines, move_budget }
}

/// Parses an uploaded level file.
///
/// Invalid UTF-8 sequences are replaced rather than rejected.
#[must_use]
pub fn parse_bytes(bytes: &[u8]) -> LevelLayout {
    parse(&String::from_utf8_lossy(bytes))
}

/// Parses and validates level text in one go.
pub fn parse_level(text: &str) -> Result<ParsedLevel, LevelError> {
    parse(text).into_level()
}

/// Checks that lines of tiles describe a playable level.
pub fn validate(lines: &[Vec<Tile>]) -> Result<(), ValidationError> {
    let count = |tile: Tile| {
        lines
            .iter()
            .flatten()
            .filter(|candidate| **candidate == tile)
            .count()
    };
    let boxes = count(Tile::Box);
    let goals = count(Tile::Goal);
    let players = count(Tile::Player);

    let mut issues = Vec::new();
    if boxes != goals {
        issues.push(ValidationIssue::ImbalancedLevel { boxes, goals });
    }
    if boxes == 0 || goals == 0 {
        issues.push(ValidationIssue::EmptyLevel);
    }
    if players != 1 {
        issues.push(ValidationIssue::PlayerCountError { found: players });
    }
    if let Some((first, rest)) = lines.split_first() {
        if rest.iter().any(|line| line.len() != first.len()) {
            issues.push(ValidationIssue::RowWidthMismatch);
        }
    }
    if corners(lines).any(|tile| tile == Tile::Box) {
        issues.push(ValidationIssue::UnsolvableCornerBox);
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { issues })
    }
}

/// Renders a grid as canonical level text.
///
/// The output re-parses to the same grid as long as it holds no completed
/// boxes, which only ever appear during play.
#[must_use]
pub fn format_level(grid: &TileGrid, move_budget: Option<u32>) -> String {
    let mut text = grid
        .lines()
        .map(|line| {
            line.iter()
                .map(|tile| tile.token())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n");
    if let Some(budget) = move_budget {
        text.push_str(&format!("\nmoves: {budget}"));
    }
    text
}

fn corners(lines: &[Vec<Tile>]) -> impl Iterator<Item = Tile> + '_ {
    [lines.first(), lines.last()]
        .into_iter()
        .flatten()
        .flat_map(|line| [line.first(), line.last()])
        .flatten()
        .copied()
}

fn authored_tile(token: &str) -> Tile {
    match Tile::from_token(token) {
        Some(Tile::CompletedBox) | None => {
            debug!("treating unknown level token {token:?} as empty");
            Tile::Empty
        }
        Some(tile) => tile,
    }
}

fn moves_directive() -> &'static Regex {
    static DIRECTIVE: OnceLock<Regex> = OnceLock::new();
    DIRECTIVE.get_or_init(|| {
        Regex::new(MOVES_DIRECTIVE).expect("moves directive pattern is valid")
    })
}
