//! Dense rectangular tile storage.

use sokobot_core::{CellCoord, Tile};
use thiserror::Error;

/// Errors raised when constructing or indexing a [`TileGrid`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// The requested cell lies outside the grid.
    #[error("cell ({column}, {row}) lies outside the board")]
    OutOfBounds {
        /// Line index that was requested.
        column: u32,
        /// Offset within the line that was requested.
        row: u32,
    },
    /// The grid would contain no cells.
    #[error("a board needs at least one non-empty line")]
    EmptyGrid,
    /// A line differs in length from the first line.
    #[error("line {line} holds {found} tiles but the first line holds {expected}")]
    RaggedLine {
        /// Index of the offending line.
        line: usize,
        /// Length of the first line.
        expected: usize,
        /// Length of the offending line.
        found: usize,
    },
    /// An active board must contain exactly one player.
    #[error("a board needs exactly one player tile, found {found}")]
    PlayerCount {
        /// Number of player tiles on the board.
        found: usize,
    },
}

/// Rectangular board of typed tiles.
///
/// The grid is laid out as `columns` lines of `rows` tiles each, mirroring the
/// text a level is authored in.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TileGrid {
    columns: u32,
    rows: u32,
    cells: Vec<Tile>,
}

impl TileGrid {
    /// Creates a grid where every cell holds `tile`.
    pub fn filled(columns: u32, rows: u32, tile: Tile) -> Result<Self, GridError> {
        if columns == 0 || rows == 0 {
            return Err(GridError::EmptyGrid);
        }
        let len = usize::try_from(u64::from(columns) * u64::from(rows))
            .map_err(|_| GridError::EmptyGrid)?;
        Ok(Self {
            columns,
            rows,
            cells: vec![tile; len],
        })
    }

    /// Builds a grid from lines of tiles, rejecting ragged or empty input.
    pub fn from_lines(lines: Vec<Vec<Tile>>) -> Result<Self, GridError> {
        let expected = lines.first().map_or(0, Vec::len);
        if expected == 0 {
            return Err(GridError::EmptyGrid);
        }
        if let Some((line, found)) = lines
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|(_, len)| *len != expected)
        {
            return Err(GridError::RaggedLine {
                line,
                expected,
                found,
            });
        }

        let columns = u32::try_from(lines.len()).map_err(|_| GridError::EmptyGrid)?;
        let rows = u32::try_from(expected).map_err(|_| GridError::EmptyGrid)?;
        Ok(Self {
            columns,
            rows,
            cells: lines.into_iter().flatten().collect(),
        })
    }

    /// Number of lines and the length of each line, in that order.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Number of lines contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of tiles in every line.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Retrieves the tile stored at `cell`.
    pub fn get(&self, cell: CellCoord) -> Result<Tile, GridError> {
        self.tile(cell).ok_or(GridError::OutOfBounds {
            column: cell.column(),
            row: cell.row(),
        })
    }

    /// Stores `tile` at `cell`.
    pub fn set(&mut self, cell: CellCoord, tile: Tile) -> Result<(), GridError> {
        let index = self.index(cell).ok_or(GridError::OutOfBounds {
            column: cell.column(),
            row: cell.row(),
        })?;
        self.cells[index] = tile;
        Ok(())
    }

    /// Retrieves the tile stored at `cell`, or `None` outside the grid.
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> Option<Tile> {
        self.index(cell).map(|index| self.cells[index])
    }

    /// Returns an independent copy of the grid.
    #[must_use]
    pub fn deep_copy(&self) -> Self {
        self.clone()
    }

    /// Iterates over the grid one line at a time.
    pub fn lines(&self) -> impl Iterator<Item = &[Tile]> + '_ {
        self.cells.chunks(self.rows as usize)
    }

    /// Iterates over every cell alongside its coordinate, line by line.
    pub fn cells(&self) -> impl Iterator<Item = (CellCoord, Tile)> + '_ {
        let rows = self.rows;
        self.cells.iter().enumerate().map(move |(index, tile)| {
            let index = index as u32;
            (CellCoord::new(index / rows, index % rows), *tile)
        })
    }

    /// Coordinates of every cell holding `tile`, line by line.
    #[must_use]
    pub fn positions(&self, tile: Tile) -> Vec<CellCoord> {
        self.cells()
            .filter(|(_, candidate)| *candidate == tile)
            .map(|(cell, _)| cell)
            .collect()
    }

    /// Number of cells holding `tile`.
    #[must_use]
    pub fn count(&self, tile: Tile) -> usize {
        self.cells.iter().filter(|candidate| **candidate == tile).count()
    }

    pub(crate) fn replace(&mut self, cell: CellCoord, tile: Tile) {
        if let Some(index) = self.index(cell) {
            self.cells[index] = tile;
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.contains(cell) {
            let column = usize::try_from(cell.column()).ok()?;
            let row = usize::try_from(cell.row()).ok()?;
            let width = usize::try_from(self.rows).ok()?;
            Some(column * width + row)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_lines_rejects_ragged_input() {
        let error = TileGrid::from_lines(vec![
            vec![Tile::Empty, Tile::Empty],
            vec![Tile::Empty],
        ])
        .expect_err("ragged lines must be rejected");
        assert_eq!(
            error,
            GridError::RaggedLine {
                line: 1,
                expected: 2,
                found: 1,
            }
        );
    }

    #[test]
    fn from_lines_rejects_empty_input() {
        assert_eq!(TileGrid::from_lines(Vec::new()), Err(GridError::EmptyGrid));
        assert_eq!(
            TileGrid::from_lines(vec![Vec::new()]),
            Err(GridError::EmptyGrid)
        );
    }

    #[test]
    fn get_reports_out_of_bounds() {
        let grid = TileGrid::filled(2, 3, Tile::Empty).expect("grid builds");
        assert_eq!(grid.dimensions(), (2, 3));
        assert_eq!(grid.get(CellCoord::new(1, 2)), Ok(Tile::Empty));
        assert_eq!(
            grid.get(CellCoord::new(2, 0)),
            Err(GridError::OutOfBounds { column: 2, row: 0 })
        );
        assert_eq!(
            grid.get(CellCoord::new(0, 3)),
            Err(GridError::OutOfBounds { column: 0, row: 3 })
        );
    }

    #[test]
    fn set_mutates_only_the_requested_cell() {
        let mut grid = TileGrid::filled(2, 2, Tile::Empty).expect("grid builds");
        grid.set(CellCoord::new(1, 0), Tile::Wall)
            .expect("cell is in bounds");
        assert_eq!(grid.count(Tile::Wall), 1);
        assert_eq!(grid.positions(Tile::Wall), vec![CellCoord::new(1, 0)]);
        assert!(grid.set(CellCoord::new(5, 5), Tile::Wall).is_err());
    }

    #[test]
    fn deep_copy_is_independent() {
        let original = TileGrid::filled(1, 2, Tile::Empty).expect("grid builds");
        let mut copy = original.deep_copy();
        copy.replace(CellCoord::new(0, 1), Tile::Goal);
        assert_eq!(original.tile(CellCoord::new(0, 1)), Some(Tile::Empty));
        assert_eq!(copy.tile(CellCoord::new(0, 1)), Some(Tile::Goal));
    }

    #[test]
    fn lines_preserve_layout() {
        let grid = TileGrid::from_lines(vec![
            vec![Tile::Player, Tile::Box],
            vec![Tile::Goal, Tile::Wall],
        ])
        .expect("grid builds");
        let lines: Vec<Vec<Tile>> = grid.lines().map(<[Tile]>::to_vec).collect();
        assert_eq!(
            lines,
            vec![vec![Tile::Player, Tile::Box], vec![Tile::Goal, Tile::Wall]]
        );
        assert_eq!(grid.positions(Tile::Goal), vec![CellCoord::new(1, 0)]);
    }
}
