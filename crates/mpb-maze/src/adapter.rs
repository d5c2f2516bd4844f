//! Maze to occupancy-grid conversion.

use mpb_core::{Cell, MpbError, OccupancyGrid};

use crate::maze::Maze;

/// Converts a wall-grid maze into the boolean occupancy grid planners
/// consume, returning the grid together with the mapped start and goal.
///
/// The grid has shape `(2*height + 1) x (2*width + 1)`. Maze cell `(x, y)`
/// maps to grid cell `(2y + 1, 2x + 1)`, which is always free; the cell
/// between two adjacent maze cells is free iff no wall separates them;
/// every other cell is blocked.
pub fn occupancy_from_maze(maze: &Maze) -> Result<(OccupancyGrid, Cell, Cell), MpbError> {
    let rows = 2 * maze.height() + 1;
    let cols = 2 * maze.width() + 1;
    let mut grid = OccupancyGrid::new_blocked(rows, cols)?;

    for y in 0..maze.height() {
        for x in 0..maze.width() {
            grid.set_blocked(Cell::new(2 * y + 1, 2 * x + 1), false);
            if x + 1 < maze.width() && !maze.has_wall_between((x, y), (x + 1, y)) {
                grid.set_blocked(Cell::new(2 * y + 1, 2 * x + 2), false);
            }
            if y + 1 < maze.height() && !maze.has_wall_between((x, y), (x, y + 1)) {
                grid.set_blocked(Cell::new(2 * y + 2, 2 * x + 1), false);
            }
        }
    }

    let (sx, sy) = maze.start();
    let (gx, gy) = maze.goal();
    let start = Cell::new(2 * sy + 1, 2 * sx + 1);
    let goal = Cell::new(2 * gy + 1, 2 * gx + 1);
    Ok((grid, start, goal))
}
