//! Breadth-first shortest paths over the cave grid
//!
//! The frontier is a queue of coordinates. Each coordinate is marked visited
//! when it is enqueued, so every cell enters the queue at most once, and its
//! parent is recorded at the same time. The route is rebuilt by walking the
//! parents back from the end once the end is dequeued.
//!
//! Neighbours are explored left, right, up, down (see [`Grid::neighbors`]).
//! That order picks which of several equally short routes is returned.

use std::collections::VecDeque;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::error::LevelError;
use crate::grid::{Coord, Grid};

/// Ordered route from a start to an end, both included.
///
/// Empty when the end cannot be reached.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPath {
    coords: Vec<Coord>,
}

impl SearchPath {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of cells on the route, endpoints included.
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Number of moves needed to walk the route.
    pub fn steps(&self) -> usize {
        self.coords.len().saturating_sub(1)
    }

    pub fn coords(&self) -> &[Coord] {
        &self.coords
    }

    pub fn first(&self) -> Option<Coord> {
        self.coords.first().copied()
    }

    pub fn last(&self) -> Option<Coord> {
        self.coords.last().copied()
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.coords.contains(&coord)
    }
}

fn flat_index(grid: &Grid, coord: Coord) -> usize {
    coord.y * grid.width() + coord.x
}

/// Find the shortest walkable route from `start` to `end`.
///
/// Returns an empty path when no route exists, including when either endpoint
/// is a wall.
///
/// # Errors
///
/// Returns [`LevelError::OutOfBounds`] if either endpoint lies outside the grid.
pub fn solve(grid: &Grid, start: Coord, end: Coord) -> Result<SearchPath, LevelError> {
    grid.check_bounds(start)?;
    grid.check_bounds(end)?;

    if grid.is_wall(start) || grid.is_wall(end) {
        return Ok(SearchPath::empty());
    }

    let cells = grid.width() * grid.height();
    let mut visited = vec![false; cells];
    let mut parents: Vec<Option<Coord>> = vec![None; cells];
    let mut queue = VecDeque::new();

    visited[flat_index(grid, start)] = true;
    queue.push_back(start);
    let mut expanded = 0usize;

    while let Some(current) = queue.pop_front() {
        if current == end {
            trace!("Reached {} after expanding {} cells", end, expanded);
            return Ok(backtrack(&parents, grid, start, end));
        }
        expanded += 1;

        for next in grid.neighbors(current) {
            let idx = flat_index(grid, next);
            if visited[idx] || grid.is_wall(next) {
                continue;
            }
            visited[idx] = true;
            parents[idx] = Some(current);
            queue.push_back(next);
        }
    }

    trace!("{} unreachable from {} after expanding {} cells", end, start, expanded);
    Ok(SearchPath::empty())
}

/// Rebuild the route by following parents from `end` back to `start`.
fn backtrack(parents: &[Option<Coord>], grid: &Grid, start: Coord, end: Coord) -> SearchPath {
    let mut coords = vec![end];
    let mut current = end;
    while current != start {
        match parents[flat_index(grid, current)] {
            Some(parent) => {
                coords.push(parent);
                current = parent;
            }
            None => break,
        }
    }
    coords.reverse();
    SearchPath { coords }
}

/// Step distances from one origin to every reachable floor cell.
#[derive(Clone, Debug)]
pub struct DistanceMap {
    width: usize,
    height: usize,
    distances: Vec<Option<usize>>,
}

impl DistanceMap {
    /// Distance in moves to `coord`, or `None` when it cannot be reached.
    pub fn get(&self, coord: Coord) -> Option<usize> {
        if coord.x < self.width && coord.y < self.height {
            self.distances[coord.y * self.width + coord.x]
        } else {
            None
        }
    }

    pub fn reachable_count(&self) -> usize {
        self.distances.iter().filter(|d| d.is_some()).count()
    }

    /// The reachable cell furthest from the origin, first in row order on ties.
    pub fn farthest(&self) -> Option<(Coord, usize)> {
        let mut best: Option<(Coord, usize)> = None;
        for (idx, dist) in self.distances.iter().enumerate() {
            if let Some(d) = *dist {
                if best.map_or(true, |(_, b)| d > b) {
                    best = Some((Coord::new(idx % self.width, idx / self.width), d));
                }
            }
        }
        best
    }
}

/// Breadth-first distances from `origin`, using the same expansion rules as [`solve`].
///
/// # Errors
///
/// Returns [`LevelError::OutOfBounds`] if `origin` lies outside the grid.
pub fn distance_map(grid: &Grid, origin: Coord) -> Result<DistanceMap, LevelError> {
    grid.check_bounds(origin)?;

    let mut distances = vec![None; grid.width() * grid.height()];
    let mut queue = VecDeque::new();

    if grid.is_floor(origin) {
        distances[flat_index(grid, origin)] = Some(0);
        queue.push_back(origin);
    }

    while let Some(current) = queue.pop_front() {
        let base = distances[flat_index(grid, current)].unwrap_or(0);
        for next in grid.neighbors(current) {
            let idx = flat_index(grid, next);
            if distances[idx].is_some() || grid.is_wall(next) {
                continue;
            }
            distances[idx] = Some(base + 1);
            queue.push_back(next);
        }
    }

    Ok(DistanceMap {
        width: grid.width(),
        height: grid.height(),
        distances,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::excavation::{excavate, ExcavationParams};
    use crate::grid::Cell;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn corridor_grid() -> Grid {
        let mut grid = Grid::solid(5, 5);
        grid.carve_line(Coord::new(0, 2), Coord::new(4, 2)).unwrap();
        grid
    }

    fn assert_valid_path(grid: &Grid, path: &SearchPath, start: Coord, end: Coord) {
        assert_eq!(path.first(), Some(start));
        assert_eq!(path.last(), Some(end));
        for pair in path.coords().windows(2) {
            assert!(pair[0].is_adjacent(&pair[1]), "{} -> {} not adjacent", pair[0], pair[1]);
        }
        assert!(path.coords().iter().all(|c| grid.is_floor(*c)));
    }

    /// Exhaustive search over simple paths, pruned once it cannot beat the best.
    fn brute_force_len(grid: &Grid, start: Coord, end: Coord) -> Option<usize> {
        fn walk(
            grid: &Grid,
            current: Coord,
            end: Coord,
            on_path: &mut Vec<Coord>,
            best: &mut Option<usize>,
        ) {
            if best.map_or(false, |b| on_path.len() >= b) {
                return;
            }
            if current == end {
                *best = Some(on_path.len());
                return;
            }
            for next in grid.neighbors(current) {
                if grid.is_floor(next) && !on_path.contains(&next) {
                    on_path.push(next);
                    walk(grid, next, end, on_path, best);
                    on_path.pop();
                }
            }
        }

        if !grid.is_floor(start) || !grid.is_floor(end) {
            return None;
        }
        let mut best = None;
        walk(grid, start, end, &mut vec![start], &mut best);
        best
    }

    #[test]
    fn test_straight_corridor() {
        let grid = corridor_grid();
        let path = solve(&grid, Coord::new(0, 2), Coord::new(4, 2)).unwrap();

        let expected: Vec<Coord> = (0..5).map(|x| Coord::new(x, 2)).collect();
        assert_eq!(path.coords(), expected.as_slice());
        assert_eq!(path.len(), 5);
        assert_eq!(path.steps(), 4);
    }

    #[test]
    fn test_wall_endpoints_are_unreachable() {
        let grid = corridor_grid();
        let path = solve(&grid, Coord::new(0, 0), Coord::new(4, 4)).unwrap();
        assert!(path.is_empty());
        assert_eq!(path.len(), 0);
    }

    #[test]
    fn test_enclosed_end_is_unreachable() {
        let mut grid = corridor_grid();
        // Floor pocket with no floor neighbour
        grid.set(Coord::new(2, 0), Cell::Floor).unwrap();

        let path = solve(&grid, Coord::new(0, 2), Coord::new(2, 0)).unwrap();
        assert!(path.is_empty());
    }

    #[test]
    fn test_start_equals_end() {
        let grid = corridor_grid();
        let path = solve(&grid, Coord::new(3, 2), Coord::new(3, 2)).unwrap();
        assert_eq!(path.coords(), &[Coord::new(3, 2)]);
        assert_eq!(path.steps(), 0);
    }

    #[test]
    fn test_out_of_bounds_endpoint() {
        let grid = corridor_grid();
        let err = solve(&grid, Coord::new(0, 2), Coord::new(5, 2)).unwrap_err();
        assert!(matches!(err, LevelError::OutOfBounds { x: 5, y: 2, .. }));
    }

    #[test]
    fn test_tie_break_follows_neighbor_order() {
        let grid = Grid::new_with(3, 3, Cell::Floor);
        let path = solve(&grid, Coord::new(0, 0), Coord::new(2, 2)).unwrap();

        // Right is explored before down, so the route hugs the top row first
        assert_eq!(
            path.coords(),
            &[
                Coord::new(0, 0),
                Coord::new(1, 0),
                Coord::new(2, 0),
                Coord::new(2, 1),
                Coord::new(2, 2),
            ]
        );
    }

    #[test]
    fn test_detour_around_wall() {
        // .#.
        // .#.
        // ...
        let mut grid = Grid::new_with(3, 3, Cell::Floor);
        grid.set(Coord::new(1, 0), Cell::Wall).unwrap();
        grid.set(Coord::new(1, 1), Cell::Wall).unwrap();

        let path = solve(&grid, Coord::new(0, 0), Coord::new(2, 0)).unwrap();
        assert_eq!(path.len(), 7);
        assert_valid_path(&grid, &path, Coord::new(0, 0), Coord::new(2, 0));
    }

    #[test]
    fn test_matches_brute_force_on_caves() {
        let params = ExcavationParams::new(10, 10, 15, 2);
        for seed in 0..30 {
            let cave = excavate(&params, &mut ChaCha8Rng::seed_from_u64(seed)).unwrap();
            let path = solve(&cave.grid, cave.start, cave.end).unwrap();
            let expected = brute_force_len(&cave.grid, cave.start, cave.end);

            assert_eq!(Some(path.len()), expected, "seed {}", seed);
            assert_valid_path(&cave.grid, &path, cave.start, cave.end);
        }
    }

    #[test]
    fn test_matches_brute_force_on_random_grids() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..40 {
            let mut grid = Grid::solid(5, 5);
            for y in 0..5 {
                for x in 0..5 {
                    if rng.gen_bool(0.6) {
                        grid.set(Coord::new(x, y), Cell::Floor).unwrap();
                    }
                }
            }
            let start = Coord::new(rng.gen_range(0..5), rng.gen_range(0..5));
            let end = Coord::new(rng.gen_range(0..5), rng.gen_range(0..5));

            let path = solve(&grid, start, end).unwrap();
            match brute_force_len(&grid, start, end) {
                Some(len) => {
                    assert_eq!(path.len(), len);
                    assert_valid_path(&grid, &path, start, end);
                }
                None => assert!(path.is_empty()),
            }
        }
    }

    #[test]
    fn test_distance_map_agrees_with_solve() {
        let params = ExcavationParams::new(20, 14, 60, 2);
        let cave = excavate(&params, &mut ChaCha8Rng::seed_from_u64(4)).unwrap();
        let distances = distance_map(&cave.grid, cave.start).unwrap();

        assert_eq!(distances.get(cave.start), Some(0));
        // A drunken walk is connected, so every floor cell is reachable from the start
        assert_eq!(distances.reachable_count(), cave.grid.floor_count());

        for (coord, cell) in cave.grid.iter() {
            if cell == Cell::Floor {
                let path = solve(&cave.grid, cave.start, coord).unwrap();
                assert_eq!(distances.get(coord), Some(path.steps()));
            } else {
                assert_eq!(distances.get(coord), None);
            }
        }

        let (far, dist) = distances.farthest().unwrap();
        assert_eq!(solve(&cave.grid, cave.start, far).unwrap().steps(), dist);
    }

    #[test]
    fn test_distance_map_from_wall() {
        let grid = corridor_grid();
        let distances = distance_map(&grid, Coord::new(0, 0)).unwrap();
        assert_eq!(distances.reachable_count(), 0);
        assert_eq!(distances.farthest(), None);
    }
}
