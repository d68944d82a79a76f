use glam::{IVec2, UVec2};
use rand::{Rng, RngCore};

use crate::{Grid, Tile};

/// Build the initial random grid.
///
/// Row `y = 0` is solid wall. The last row and the first and last columns are
/// open; the wall row wins where they overlap. Every other cell is a wall with
/// a chance of `fill_percent` in 100.
///
/// Cells are visited with `x` as the outer loop and `y` as the inner one, and
/// only the randomized cells consume a draw from `prng`. That order is what
/// makes a seed reproduce the same map, so it must not change.
pub fn fill_rand(size: UVec2, fill_percent: u32, mut prng: impl RngCore) -> Grid {
    let mut grid = Grid::new(size, Tile::Open);
    let imax = size.x.saturating_sub(1);
    let jmax = size.y.saturating_sub(1);
    for i in 0..size.x {
        for j in 0..size.y {
            let value = if j == 0 {
                Tile::Wall
            } else if j == jmax || i == 0 || i == imax {
                Tile::Open
            } else if prng.gen_range(0..100u32) < fill_percent {
                Tile::Wall
            } else {
                Tile::Open
            };
            grid.set(IVec2::new(i as i32, j as i32), value);
        }
    }
    grid
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn fill(size: UVec2, fill_percent: u32) -> Grid {
        fill_rand(size, fill_percent, ChaCha8Rng::seed_from_u64(7))
    }

    #[test]
    fn boundary_rows_and_columns() {
        let grid = fill(UVec2::new(12, 9), 60);
        assert!(grid.row(0).iter().all(|&t| t == Tile::Wall));
        assert!(grid.row(8).iter().all(|&t| t == Tile::Open));
        for j in 1..9 {
            assert_eq!(grid.cell(IVec2::new(0, j)), Some(Tile::Open));
            assert_eq!(grid.cell(IVec2::new(11, j)), Some(Tile::Open));
        }
    }

    #[test]
    fn extreme_fill() {
        let grid = fill(UVec2::new(6, 6), 100);
        for j in 1..5 {
            for i in 1..5 {
                assert_eq!(grid.cell(IVec2::new(i, j)), Some(Tile::Wall));
            }
        }
        let grid = fill(UVec2::new(6, 6), 0);
        assert_eq!(grid.count(Tile::Wall), 6);
    }

    #[test]
    fn floor_row_wins_on_tiny_grids() {
        let grid = fill(UVec2::new(2, 1), 50);
        assert_eq!(grid.as_bytes(), &[1, 1]);
        let grid = fill(UVec2::new(1, 2), 50);
        assert_eq!(grid.as_bytes(), &[1, 0]);
    }

    #[test]
    fn same_stream_same_grid() {
        let a = fill(UVec2::new(20, 15), 45);
        let b = fill(UVec2::new(20, 15), 45);
        assert_eq!(a, b);
    }
}
