use mpb_core::Cell;
use mpb_maze::{generate, occupancy_from_maze, EpisodeMazes, MazeAlgorithm};

#[test]
fn identical_seeds_reproduce_identical_wall_grids() {
    for algorithm in [MazeAlgorithm::Backtracker, MazeAlgorithm::Prim] {
        let first = generate(12, 9, 41, algorithm).unwrap();
        let second = generate(12, 9, 41, algorithm).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn different_seeds_usually_differ() {
    let first = generate(12, 9, 41, MazeAlgorithm::Backtracker).unwrap();
    let second = generate(12, 9, 42, MazeAlgorithm::Backtracker).unwrap();
    assert_ne!(first, second);
}

#[test]
fn generated_mazes_are_fully_connected_and_solvable() {
    for algorithm in [MazeAlgorithm::Backtracker, MazeAlgorithm::Prim] {
        for seed in 0..8u64 {
            let maze = generate(7, 5, seed, algorithm).unwrap();
            assert_eq!(maze.reachable_count(), 7 * 5);
            assert!(maze.is_solvable());
        }
    }
}

#[test]
fn pinned_ten_by_eight_scenario() {
    let maze = generate(10, 8, 123, MazeAlgorithm::Backtracker).unwrap();
    assert_eq!(maze.start(), (0, 0));
    assert_eq!(maze.goal(), (5, 4));

    let (grid, start, goal) = occupancy_from_maze(&maze).unwrap();
    assert_eq!(grid.rows(), 17);
    assert_eq!(grid.cols(), 21);
    assert_eq!(start, Cell::new(1, 1));
    assert_eq!(goal, Cell::new(9, 11));
    assert!(grid.is_free(start));
    assert!(grid.is_free(goal));

    let again = generate(10, 8, 123, MazeAlgorithm::Backtracker).unwrap();
    assert_eq!(maze, again);
}

#[test]
fn occupancy_edges_match_walls() {
    let maze = generate(6, 6, 5, MazeAlgorithm::Prim).unwrap();
    let (grid, _, _) = occupancy_from_maze(&maze).unwrap();
    for y in 0..maze.height() {
        for x in 0..maze.width() {
            assert!(grid.is_free(Cell::new(2 * y + 1, 2 * x + 1)));
            if x + 1 < maze.width() {
                let open = !maze.has_wall_between((x, y), (x + 1, y));
                assert_eq!(grid.is_free(Cell::new(2 * y + 1, 2 * x + 2)), open);
            }
            if y + 1 < maze.height() {
                let open = !maze.has_wall_between((x, y), (x, y + 1));
                assert_eq!(grid.is_free(Cell::new(2 * y + 2, 2 * x + 1)), open);
            }
        }
    }
    // Lattice corners between four maze cells never open up.
    for y in 0..grid.rows() {
        for x in 0..grid.cols() {
            if y % 2 == 0 && x % 2 == 0 {
                assert!(grid.is_blocked(Cell::new(y, x)));
            }
        }
    }
}

#[test]
fn episode_seeds_offset_the_base_seed() {
    let episodes = EpisodeMazes {
        base_seed: 7,
        width: 5,
        height: 5,
        algorithm: MazeAlgorithm::Backtracker,
    };
    assert_eq!(episodes.episode_seed(0), 7);
    assert_eq!(episodes.episode_seed(3), 10);
    let direct = generate(5, 5, 10, MazeAlgorithm::Backtracker).unwrap();
    assert_eq!(episodes.generate(3).unwrap(), direct);
}
