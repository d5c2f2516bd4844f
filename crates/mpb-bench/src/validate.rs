//! Independent validation of claimed-success paths.

use mpb_core::{Cell, OccupancyGrid};
use mpb_plan::supercover_hops;

/// Checks a claimed path against the grid and measures its length.
///
/// The planner's own accounting is never trusted: the path must start at
/// `start`, end at `goal`, stay on free in-bounds cells, and every
/// consecutive pair must be joined by a clear supercover segment. The
/// returned value is the summed raster hop count, which becomes the
/// authoritative `path_length` for the trial.
pub fn validate_claimed_path(
    grid: &OccupancyGrid,
    start: Cell,
    goal: Cell,
    path: &[Cell],
) -> Result<u64, String> {
    let Some(&first) = path.first() else {
        return Err("claimed success with an empty path".to_string());
    };
    if first != start {
        return Err(format!("path starts at {first} instead of {start}"));
    }
    let last = path[path.len() - 1];
    if last != goal {
        return Err(format!("path ends at {last} instead of {goal}"));
    }
    for &cell in path {
        if !grid.in_bounds(cell) {
            return Err(format!("path leaves the grid at {cell}"));
        }
        if grid.is_blocked(cell) {
            return Err(format!("path crosses a blocked cell at {cell}"));
        }
    }
    let mut hops = 0u64;
    for pair in path.windows(2) {
        match supercover_hops(grid, pair[0], pair[1]) {
            Some(count) => hops += count as u64,
            None => {
                return Err(format!(
                    "no clear line between {} and {}",
                    pair[0], pair[1]
                ));
            }
        }
    }
    Ok(hops)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_step_paths_measure_their_hop_count() {
        let grid = OccupancyGrid::new_free(4, 4).unwrap();
        let path = vec![Cell::new(0, 0), Cell::new(0, 1), Cell::new(1, 1)];
        let hops = validate_claimed_path(&grid, Cell::new(0, 0), Cell::new(1, 1), &path).unwrap();
        assert_eq!(hops, 2);
    }

    #[test]
    fn smoothed_segments_count_raster_hops_not_vertices() {
        let grid = OccupancyGrid::new_free(5, 5).unwrap();
        let path = vec![Cell::new(0, 0), Cell::new(4, 4)];
        let hops = validate_claimed_path(&grid, Cell::new(0, 0), Cell::new(4, 4), &path).unwrap();
        assert_eq!(hops, 4);
    }

    #[test]
    fn wrong_endpoints_and_walls_are_called_out() {
        let mut grid = OccupancyGrid::new_free(3, 3).unwrap();
        let detail =
            validate_claimed_path(&grid, Cell::new(0, 0), Cell::new(2, 2), &[]).unwrap_err();
        assert!(detail.contains("empty path"));

        let path = vec![Cell::new(0, 1), Cell::new(0, 2)];
        let detail =
            validate_claimed_path(&grid, Cell::new(0, 0), Cell::new(0, 2), &path).unwrap_err();
        assert!(detail.contains("starts at (0, 1)"));

        grid.set_blocked(Cell::new(0, 1), true);
        let path = vec![Cell::new(0, 0), Cell::new(0, 1), Cell::new(0, 2)];
        let detail =
            validate_claimed_path(&grid, Cell::new(0, 0), Cell::new(0, 2), &path).unwrap_err();
        assert!(detail.contains("blocked cell at (0, 1)"));
    }

    #[test]
    fn pinched_diagonal_shortcuts_are_rejected() {
        let mut grid = OccupancyGrid::new_free(3, 3).unwrap();
        grid.set_blocked(Cell::new(0, 1), true);
        grid.set_blocked(Cell::new(1, 0), true);
        let path = vec![Cell::new(0, 0), Cell::new(1, 1), Cell::new(2, 2)];
        let detail =
            validate_claimed_path(&grid, Cell::new(0, 0), Cell::new(2, 2), &path).unwrap_err();
        assert!(detail.contains("no clear line"));
    }
}
