use dynamic_search::algorithms::bfs::BreadthFirst;
use dynamic_search::algorithms::dls::DepthLimited;
use dynamic_search::algorithms::iddfs::IterativeDeepening;
use dynamic_search::statistics::optimal_path_length;
use dynamic_search::{find_path, Algorithm, Grid, PathfindingAlgorithm, Position, SearchLimits, SearchStep};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rstest::{fixture, rstest};

fn p(row: usize, col: usize) -> Position {
    Position::new(row, col)
}

fn solve(algorithm: Algorithm, grid: &Grid, start: Position, target: Position) -> Option<Vec<Position>> {
    let mut search = algorithm.create(start, target, &SearchLimits::default());
    find_path(search.as_mut(), grid, |_| {})
}

fn assert_valid_path(grid: &Grid, path: &[Position], start: Position, target: Position) {
    assert_eq!(path.first(), Some(&start));
    assert_eq!(path.last(), Some(&target));
    for pair in path.windows(2) {
        assert!(
            grid.get_neighbors(&pair[0]).contains(&pair[1]),
            "{} -> {} is not a legal move",
            pair[0],
            pair[1]
        );
    }
}

/// 5x5 board with column 2 walled except for a gap at row 3.
#[fixture]
fn gap_wall_grid() -> Grid {
    let mut grid = Grid::new(5);
    grid.add_wall_segment(0, 2, 3);
    grid.add_wall_segment(4, 2, 1);
    grid
}

/// Board of walls with a single open row.
fn corridor(size: usize, row: usize) -> Grid {
    let mut grid = Grid::new(size);
    for r in (0..size).filter(|r| *r != row) {
        for col in 0..size {
            grid.toggle_wall(p(r, col));
        }
    }
    grid
}

fn scattered(seed: u64, size: usize, start: Position, target: Position) -> Grid {
    let mut grid = Grid::new(size);
    let mut rng = StdRng::seed_from_u64(seed);
    grid.random_scatter(&mut rng, 0.3);
    for anchor in [start, target] {
        if !grid.is_traversable(anchor) {
            grid.toggle_wall(anchor);
        }
    }
    grid
}

#[test]
fn bfs_crosses_open_board_diagonally() {
    let grid = Grid::new(5);
    let mut search = BreadthFirst::new(p(0, 0), p(4, 4));
    let mut most_visited = 0;
    let path = find_path(&mut search, &grid, |e| most_visited = e.visited_count()).unwrap();

    assert_eq!(path, vec![p(0, 0), p(1, 1), p(2, 2), p(3, 3), p(4, 4)]);
    assert!(most_visited <= 25);
}

#[rstest]
#[case(p(0, 0), p(6, 6))]
#[case(p(3, 3), p(0, 5))]
#[case(p(6, 0), p(2, 1))]
#[case(p(1, 4), p(1, 0))]
fn bfs_length_is_chebyshev_distance_on_open_board(#[case] start: Position, #[case] target: Position) {
    let grid = Grid::new(7);
    let path = solve(Algorithm::Bfs, &grid, start, target).unwrap();
    let chebyshev = start.row.abs_diff(target.row).max(start.col.abs_diff(target.col));
    assert_eq!(path.len() - 1, chebyshev);
    assert_valid_path(&grid, &path, start, target);
}

#[rstest]
fn every_algorithm_passes_through_the_gap(
    gap_wall_grid: Grid,
    #[values(
        Algorithm::Bfs,
        Algorithm::Dfs,
        Algorithm::Ucs,
        Algorithm::DepthLimited,
        Algorithm::IterativeDeepening,
        Algorithm::Bidirectional
    )]
    algorithm: Algorithm,
) {
    let path = solve(algorithm, &gap_wall_grid, p(0, 0), p(0, 4)).unwrap();
    assert!(path.contains(&p(3, 2)), "{:?} avoided the gap: {:?}", algorithm, path);
    assert_valid_path(&gap_wall_grid, &path, p(0, 0), p(0, 4));
}

#[rstest]
fn paths_are_legal_on_scattered_boards(
    #[values(0, 1, 2, 3, 4, 5, 6, 7)] seed: u64,
    #[values(
        Algorithm::Bfs,
        Algorithm::Dfs,
        Algorithm::Ucs,
        Algorithm::DepthLimited,
        Algorithm::IterativeDeepening,
        Algorithm::Bidirectional
    )]
    algorithm: Algorithm,
) {
    let (start, target) = (p(0, 0), p(9, 9));
    let grid = scattered(seed, 10, start, target);
    if let Some(path) = solve(algorithm, &grid, start, target) {
        assert_valid_path(&grid, &path, start, target);
    } else {
        // Only the complete searches are obliged to find every path.
        if matches!(algorithm, Algorithm::Bfs | Algorithm::Dfs | Algorithm::Ucs | Algorithm::Bidirectional) {
            assert_eq!(optimal_path_length(&grid, start, target), None);
        }
    }
}

#[rstest]
fn bfs_and_ucs_agree_with_reference_shortest_length(#[values(10, 11, 12, 13, 14, 15)] seed: u64) {
    let (start, target) = (p(1, 0), p(10, 11));
    let grid = scattered(seed, 12, start, target);
    let expected = optimal_path_length(&grid, start, target);

    let bfs = solve(Algorithm::Bfs, &grid, start, target).map(|path| path.len() - 1);
    let ucs = solve(Algorithm::Ucs, &grid, start, target).map(|path| path.len() - 1);
    assert_eq!(bfs, expected);
    assert_eq!(ucs, expected);
}

#[rstest]
#[case(7, 3)]
#[case(8, 0)]
fn bidirectional_matches_bfs_on_a_single_route(#[case] size: usize, #[case] row: usize) {
    let grid = corridor(size, row);
    let (start, target) = (p(row, 0), p(row, size - 1));
    let bfs = solve(Algorithm::Bfs, &grid, start, target).unwrap();
    let both = solve(Algorithm::Bidirectional, &grid, start, target).unwrap();
    assert_eq!(both, bfs);
    assert_eq!(both.len(), size);
}

#[test]
fn depth_limit_one_misses_distant_target() {
    let grid = Grid::new(5);
    let mut search = DepthLimited::new(p(0, 0), p(0, 2), 1);
    assert_eq!(find_path(&mut search, &grid, |_| {}), None);
}

#[rstest]
#[case(1, false)]
#[case(2, false)]
#[case(20, true)]
fn depth_limited_paths_respect_the_limit(#[case] limit: usize, #[case] reachable: bool) {
    let grid = Grid::new(6);
    let mut search = DepthLimited::new(p(0, 0), p(3, 1), limit);
    let path = find_path(&mut search, &grid, |_| {});
    assert_eq!(path.is_some(), reachable);
    if let Some(path) = path {
        assert!(path.len() - 1 <= limit);
        assert_valid_path(&grid, &path, p(0, 0), p(3, 1));
    }
}

#[test]
fn iterative_deepening_finds_shortest_depth_on_single_route() {
    let grid = corridor(7, 2);
    let (start, target) = (p(2, 0), p(2, 6));

    let mut enough = IterativeDeepening::new(start, target, 6);
    let path = find_path(&mut enough, &grid, |_| {}).unwrap();
    assert_eq!(path.len() - 1, 6);
    assert_eq!(enough.depth(), 6);

    let mut too_shallow = IterativeDeepening::new(start, target, 5);
    assert_eq!(find_path(&mut too_shallow, &grid, |_| {}), None);
}

#[test]
fn iterative_deepening_never_beats_the_true_distance() {
    let grid = Grid::new(6);
    let mut search = IterativeDeepening::new(p(0, 0), p(5, 4), 30);
    let path = find_path(&mut search, &grid, |_| {}).unwrap();
    assert!(path.len() - 1 >= 5);
    assert!(path.len() - 1 <= 30);
    assert_valid_path(&grid, &path, p(0, 0), p(5, 4));
}

#[rstest]
fn observer_does_not_change_the_result(
    gap_wall_grid: Grid,
    #[values(
        Algorithm::Bfs,
        Algorithm::Dfs,
        Algorithm::Ucs,
        Algorithm::DepthLimited,
        Algorithm::IterativeDeepening,
        Algorithm::Bidirectional
    )]
    algorithm: Algorithm,
) {
    let limits = SearchLimits::default();
    let mut quiet = algorithm.create(p(4, 0), p(1, 4), &limits);
    let mut watched = algorithm.create(p(4, 0), p(1, 4), &limits);

    let silent_path = find_path(quiet.as_mut(), &gap_wall_grid, |_| {});
    let mut nodes = Vec::new();
    let watched_path = find_path(watched.as_mut(), &gap_wall_grid, |e| {
        nodes.push(e.node);
        assert!(e.is_visited(&e.node));
    });

    assert_eq!(silent_path, watched_path);
    assert!(!nodes.is_empty());
}

#[rstest]
fn each_event_admits_one_new_cell(#[values(Algorithm::Bfs, Algorithm::Dfs, Algorithm::Ucs)] algorithm: Algorithm) {
    let grid = Grid::new(6);
    let mut search = algorithm.create(p(0, 0), p(5, 5), &SearchLimits::default());
    let mut events = 0;
    find_path(search.as_mut(), &grid, |e| {
        events += 1;
        assert_eq!(e.visited_count(), events + 1);
    });
    assert!(events > 0);
}

#[test]
fn spent_search_stays_exhausted() {
    let grid = Grid::new(3);
    let mut search = BreadthFirst::new(p(0, 0), p(0, 1));
    assert!(find_path(&mut search, &grid, |_| {}).is_some());
    assert!(matches!(search.step(&grid), SearchStep::Exhausted));
}

#[test]
fn grid_edits_between_steps_are_seen_by_later_expansions() {
    let mut grid = Grid::new(5);
    let mut search = BreadthFirst::new(p(0, 0), p(0, 4));

    assert!(matches!(search.step(&grid), SearchStep::Expanded(_)));
    grid.add_wall_segment(0, 3, 5);

    let path = find_path(&mut search, &grid, |e| assert_ne!(e.node.col, 3));
    assert_eq!(path, None);
}
