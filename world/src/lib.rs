#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative board state management for Sokobot.
//!
//! A [`Board`] owns the active [`TileGrid`] together with an independent copy
//! of the layout it started from. The snapshot is consulted whenever a piece
//! leaves a cell, so that uncovered goals reappear, and whenever the player
//! asks to start over.

mod enemies;
pub mod grid;

use rand::Rng;
use sokobot_core::{CellCoord, Command, Direction, Event, MoveOutcome, Tile};

pub use grid::{GridError, TileGrid};

/// Represents one in-progress puzzle.
#[derive(Clone, Debug)]
pub struct Board {
    grid: TileGrid,
    snapshot: TileGrid,
    player: CellCoord,
    moves_made: u32,
    move_budget: Option<u32>,
}

impl Board {
    /// Creates a board from its initial layout.
    ///
    /// The layout must contain exactly one player tile.
    pub fn new(grid: TileGrid, move_budget: Option<u32>) -> Result<Self, GridError> {
        let player = locate_player(&grid)?;
        Ok(Self {
            snapshot: grid.deep_copy(),
            grid,
            player,
            moves_made: 0,
            move_budget,
        })
    }

    fn step<R>(
        &mut self,
        direction: Direction,
        rng: &mut R,
        out_events: &mut Vec<Event>,
    ) -> MoveOutcome
    where
        R: Rng + ?Sized,
    {
        let Some(target) = self.player.step(direction) else {
            out_events.push(Event::MoveIgnored { direction });
            return MoveOutcome::UNCHANGED;
        };
        let Some(target_tile) = self.grid.tile(target) else {
            out_events.push(Event::MoveIgnored { direction });
            return MoveOutcome::UNCHANGED;
        };

        match target_tile {
            Tile::Wall | Tile::Enemy => {
                out_events.push(Event::MoveIgnored { direction });
                return MoveOutcome::UNCHANGED;
            }
            Tile::Box | Tile::CompletedBox => {
                let Some(beyond) = target.step(direction) else {
                    out_events.push(Event::MoveIgnored { direction });
                    return MoveOutcome::UNCHANGED;
                };
                // A completed box in the way is overwritten rather than blocking.
                if matches!(
                    self.grid.tile(beyond),
                    None | Some(Tile::Wall | Tile::Enemy | Tile::Box)
                ) {
                    out_events.push(Event::MoveIgnored { direction });
                    return MoveOutcome::UNCHANGED;
                }
                let completed = matches!(
                    self.snapshot.tile(beyond),
                    Some(Tile::Goal | Tile::CompletedBox)
                );
                let pushed = if completed {
                    Tile::CompletedBox
                } else {
                    Tile::Box
                };
                self.grid.replace(beyond, pushed);
                out_events.push(Event::BoxPushed {
                    from: target,
                    to: beyond,
                    completed,
                });
            }
            Tile::Player | Tile::Empty | Tile::Goal => {}
        }

        let from = self.player;
        self.grid.replace(from, vacated_tile(&self.snapshot, from));
        self.grid.replace(target, Tile::Player);
        self.player = target;
        out_events.push(Event::PlayerMoved { from, to: target });

        enemies::wander(&mut self.grid, &self.snapshot, rng, out_events);
        self.moves_made = self.moves_made.saturating_add(1);

        let win = self.is_complete();
        let loss = !win && self.is_out_of_moves();
        if win {
            out_events.push(Event::LevelCompleted {
                moves_used: self.moves_made,
            });
        } else if loss {
            out_events.push(Event::MovesExhausted {
                moves_used: self.moves_made,
            });
        }

        MoveOutcome {
            moved: true,
            win,
            loss,
        }
    }

    fn reset(&mut self, out_events: &mut Vec<Event>) -> MoveOutcome {
        self.grid = self.snapshot.deep_copy();
        if let Ok(player) = locate_player(&self.grid) {
            self.player = player;
        }
        self.moves_made = 0;
        out_events.push(Event::BoardReset {
            player: self.player,
        });
        MoveOutcome {
            moved: true,
            win: false,
            loss: false,
        }
    }

    // Completion only looks for uncovered goals. Any tile that covers a goal,
    // the player included, hides it from the count.
    fn is_complete(&self) -> bool {
        self.grid.count(Tile::Goal) == 0
    }

    fn is_out_of_moves(&self) -> bool {
        self.move_budget.is_some_and(|budget| self.moves_made >= budget)
    }
}

/// Applies the provided command to the board, mutating state in place.
///
/// Blocked steps are not errors: they leave the board untouched, emit
/// [`Event::MoveIgnored`] and report [`MoveOutcome::UNCHANGED`].
pub fn apply<R>(
    board: &mut Board,
    command: Command,
    rng: &mut R,
    out_events: &mut Vec<Event>,
) -> MoveOutcome
where
    R: Rng + ?Sized,
{
    match command {
        Command::Step { direction } => board.step(direction, rng, out_events),
        Command::Reset => board.reset(out_events),
    }
}

/// Tile a cell reverts to once its occupant leaves.
///
/// Cells that started out holding a movable piece become floor so the piece is
/// not resurrected. A box that started on a goal leaves the goal behind.
pub(crate) fn vacated_tile(snapshot: &TileGrid, cell: CellCoord) -> Tile {
    match snapshot.tile(cell) {
        None | Some(Tile::Box | Tile::Player | Tile::Enemy) => Tile::Empty,
        Some(Tile::CompletedBox) => Tile::Goal,
        Some(tile) => tile,
    }
}

fn locate_player(grid: &TileGrid) -> Result<CellCoord, GridError> {
    let players = grid.positions(Tile::Player);
    match players.as_slice() {
        [player] => Ok(*player),
        _ => Err(GridError::PlayerCount {
            found: players.len(),
        }),
    }
}

/// Query functions that provide read-only access to the board state.
pub mod query {
    use super::{Board, TileGrid};
    use sokobot_core::CellCoord;

    /// Provides read-only access to the active grid.
    #[must_use]
    pub fn grid(board: &Board) -> &TileGrid {
        &board.grid
    }

    /// Provides read-only access to the layout the board started from.
    #[must_use]
    pub fn snapshot(board: &Board) -> &TileGrid {
        &board.snapshot
    }

    /// Cell currently occupied by the player.
    #[must_use]
    pub fn player(board: &Board) -> CellCoord {
        board.player
    }

    /// Number of moves made since the board was created or last reset.
    #[must_use]
    pub fn moves_made(board: &Board) -> u32 {
        board.moves_made
    }

    /// Upper bound on the number of moves, if the level has one.
    #[must_use]
    pub fn move_budget(board: &Board) -> Option<u32> {
        board.move_budget
    }

    /// Moves left before the budget runs out, if the level has one.
    #[must_use]
    pub fn remaining_moves(board: &Board) -> Option<u32> {
        board
            .move_budget
            .map(|budget| budget.saturating_sub(board.moves_made))
    }

    /// Reports whether no goal remains uncovered.
    #[must_use]
    pub fn is_complete(board: &Board) -> bool {
        board.is_complete()
    }
}
