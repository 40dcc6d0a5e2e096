//! Random wandering for enemy tiles.

use rand::Rng;
use sokobot_core::{CellCoord, Event, Tile, ENEMY_STEP_ATTEMPTS};

use crate::{grid::TileGrid, vacated_tile};

/// Moves every enemy present on the grid by at most one cell.
///
/// Each enemy samples up to [`ENEMY_STEP_ATTEMPTS`] destinations and stays in
/// place when none of them is free.
pub(crate) fn wander<R>(
    grid: &mut TileGrid,
    snapshot: &TileGrid,
    rng: &mut R,
    out_events: &mut Vec<Event>,
) where
    R: Rng + ?Sized,
{
    let (columns, rows) = grid.dimensions();
    for from in grid.positions(Tile::Enemy) {
        let destination = (0..ENEMY_STEP_ATTEMPTS)
            .map(|_| sample_destination(from, columns, rows, rng))
            .find(|candidate| !blocks_enemy(grid.tile(*candidate)));

        match destination {
            Some(to) => {
                grid.replace(from, vacated_tile(snapshot, from));
                grid.replace(to, Tile::Enemy);
                out_events.push(Event::EnemyMoved { from, to });
            }
            None => out_events.push(Event::EnemyHeld { cell: from }),
        }
    }
}

fn sample_destination<R>(from: CellCoord, columns: u32, rows: u32, rng: &mut R) -> CellCoord
where
    R: Rng + ?Sized,
{
    let delta: i64 = rng.gen_range(-1..=1);
    if rng.gen_bool(0.5) {
        CellCoord::new(clamp_axis(from.column(), delta, columns), from.row())
    } else {
        CellCoord::new(from.column(), clamp_axis(from.row(), delta, rows))
    }
}

fn clamp_axis(value: u32, delta: i64, len: u32) -> u32 {
    let max = i64::from(len.saturating_sub(1));
    (i64::from(value) + delta).clamp(0, max) as u32
}

fn blocks_enemy(tile: Option<Tile>) -> bool {
    matches!(
        tile,
        None | Some(Tile::Box | Tile::CompletedBox | Tile::Wall | Tile::Enemy | Tile::Player)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_to_grid_edges() {
        assert_eq!(clamp_axis(0, -1, 4), 0);
        assert_eq!(clamp_axis(3, 1, 4), 3);
        assert_eq!(clamp_axis(2, 1, 4), 3);
        assert_eq!(clamp_axis(0, 1, 1), 0);
    }

    #[test]
    fn only_floor_and_goals_are_enterable() {
        assert!(!blocks_enemy(Some(Tile::Empty)));
        assert!(!blocks_enemy(Some(Tile::Goal)));
        for tile in [
            Tile::Box,
            Tile::CompletedBox,
            Tile::Wall,
            Tile::Enemy,
            Tile::Player,
        ] {
            assert!(blocks_enemy(Some(tile)), "{tile} must block enemies");
        }
        assert!(blocks_enemy(None));
    }
}
