//! Boolean occupancy grids and the boundary coercion parser.

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, MpbError};
use crate::types::Cell;

/// Wall tokens accepted by [`OccupancyGrid::parse_tokens`].
const BLOCKED_TOKENS: [&str; 6] = ["1", "x", "#", "wall", "blocked", "true"];

/// Rectangular occupancy grid with a single boolean blocked/free state per
/// cell.
///
/// The grid is the only cell representation planners ever see. Ambiguous
/// encodings (numeric grids, wall strings) are coerced exactly once, at
/// construction, by [`OccupancyGrid::parse_tokens`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyGrid {
    rows: usize,
    cols: usize,
    blocked: Vec<bool>,
}

impl OccupancyGrid {
    /// Creates a fully free grid of the given shape.
    pub fn new_free(rows: usize, cols: usize) -> Result<Self, MpbError> {
        if rows == 0 || cols == 0 {
            return Err(MpbError::Grid(
                ErrorInfo::new("grid-shape", "grid must have at least one row and one column")
                    .with_context("rows", rows.to_string())
                    .with_context("cols", cols.to_string()),
            ));
        }
        Ok(Self {
            rows,
            cols,
            blocked: vec![false; rows * cols],
        })
    }

    /// Creates a fully blocked grid of the given shape.
    pub fn new_blocked(rows: usize, cols: usize) -> Result<Self, MpbError> {
        let mut grid = Self::new_free(rows, cols)?;
        grid.blocked.fill(true);
        Ok(grid)
    }

    /// Builds a grid from row-major boolean rows (`true` = blocked).
    pub fn from_bool_rows(rows: &[Vec<bool>]) -> Result<Self, MpbError> {
        let (nrows, ncols) = rectangular_shape(rows.iter().map(Vec::len), rows.len())?;
        let mut blocked = Vec::with_capacity(nrows * ncols);
        for row in rows {
            blocked.extend_from_slice(row);
        }
        Ok(Self {
            rows: nrows,
            cols: ncols,
            blocked,
        })
    }

    /// Builds a grid from text tokens using the documented coercion rule:
    /// a token parsing as a number is blocked iff nonzero; otherwise it is
    /// blocked iff it matches one of the recognized wall words
    /// (`1`, `x`, `#`, `wall`, `blocked`, `true`, case-insensitive).
    pub fn parse_tokens(rows: &[Vec<String>]) -> Result<Self, MpbError> {
        let (nrows, ncols) = rectangular_shape(rows.iter().map(Vec::len), rows.len())?;
        let mut blocked = Vec::with_capacity(nrows * ncols);
        for row in rows {
            for token in row {
                blocked.push(token_is_blocked(token));
            }
        }
        Ok(Self {
            rows: nrows,
            cols: ncols,
            blocked,
        })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns true when the cell lies inside the grid.
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    /// Returns true when the in-bounds cell is blocked.
    pub fn is_blocked(&self, cell: Cell) -> bool {
        self.blocked[cell.row * self.cols + cell.col]
    }

    /// Returns true when the in-bounds cell is free.
    pub fn is_free(&self, cell: Cell) -> bool {
        !self.is_blocked(cell)
    }

    /// Marks a cell blocked or free.
    pub fn set_blocked(&mut self, cell: Cell, value: bool) {
        self.blocked[cell.row * self.cols + cell.col] = value;
    }

    /// Returns true when the signed coordinate is inside the grid and free.
    pub fn walkable_signed(&self, row: i64, col: i64) -> bool {
        self.cell_at(row, col).map_or(false, |cell| self.is_free(cell))
    }

    /// Returns true when the signed coordinate is outside the grid or blocked.
    pub fn blocked_or_outside(&self, row: i64, col: i64) -> bool {
        !self.walkable_signed(row, col)
    }

    /// Converts a signed coordinate to a cell when it lies inside the grid.
    pub fn cell_at(&self, row: i64, col: i64) -> Option<Cell> {
        if row < 0 || col < 0 {
            return None;
        }
        let cell = Cell::new(row as usize, col as usize);
        self.in_bounds(cell).then_some(cell)
    }

    /// Iterates over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| Cell::new(row, col)))
    }
}

fn rectangular_shape(
    row_lengths: impl Iterator<Item = usize>,
    nrows: usize,
) -> Result<(usize, usize), MpbError> {
    let mut cols = None;
    for (idx, len) in row_lengths.enumerate() {
        match cols {
            None => cols = Some(len),
            Some(expected) if expected != len => {
                return Err(MpbError::Grid(
                    ErrorInfo::new("grid-shape", "grid must be rectangular")
                        .with_context("row", idx.to_string())
                        .with_context("expected_cols", expected.to_string())
                        .with_context("found_cols", len.to_string()),
                ));
            }
            Some(_) => {}
        }
    }
    let cols = cols.unwrap_or(0);
    if nrows == 0 || cols == 0 {
        return Err(MpbError::Grid(ErrorInfo::new(
            "grid-shape",
            "grid must have at least one row and one column",
        )));
    }
    Ok((nrows, cols))
}

fn token_is_blocked(token: &str) -> bool {
    let trimmed = token.trim();
    if let Ok(value) = trimmed.parse::<f64>() {
        return value != 0.0;
    }
    let lowered = trimmed.to_ascii_lowercase();
    BLOCKED_TOKENS.contains(&lowered.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tokens_coerces_numbers_and_wall_words() {
        let rows = vec![
            vec!["0".to_string(), "1".to_string(), "#".to_string()],
            vec!["free".to_string(), "Wall".to_string(), "0.0".to_string()],
        ];
        let grid = OccupancyGrid::parse_tokens(&rows).unwrap();
        assert!(grid.is_free(Cell::new(0, 0)));
        assert!(grid.is_blocked(Cell::new(0, 1)));
        assert!(grid.is_blocked(Cell::new(0, 2)));
        assert!(grid.is_free(Cell::new(1, 0)));
        assert!(grid.is_blocked(Cell::new(1, 1)));
        assert!(grid.is_free(Cell::new(1, 2)));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let rows = vec![vec![false, false], vec![false]];
        let err = OccupancyGrid::from_bool_rows(&rows).unwrap_err();
        assert_eq!(err.info().code, "grid-shape");
    }

    #[test]
    fn empty_grids_are_rejected() {
        assert!(OccupancyGrid::from_bool_rows(&[]).is_err());
        assert!(OccupancyGrid::new_free(0, 4).is_err());
    }

    #[test]
    fn signed_lookups_handle_the_boundary() {
        let grid = OccupancyGrid::new_free(2, 2).unwrap();
        assert!(grid.walkable_signed(0, 0));
        assert!(!grid.walkable_signed(-1, 0));
        assert!(grid.blocked_or_outside(2, 0));
        assert_eq!(grid.cell_at(1, 1), Some(Cell::new(1, 1)));
        assert_eq!(grid.cell_at(-1, 1), None);
    }
}
