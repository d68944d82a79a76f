use glam::UVec2;

use crate::{Grid, Tile};

/// Return a copy of `grid` with `border` solid rows added below it.
///
/// The result is `width x (height + border)`. Rows `0..border` are walls and
/// row `border + y` holds row `y` of the source. The height saturates at
/// `u32::MAX`; [`GenerationConfig::validate()`] rejects such borders upfront.
///
/// [`GenerationConfig::validate()`]: crate::GenerationConfig::validate
pub fn pad_border(grid: &Grid, border: u32) -> Grid {
    let size = UVec2::new(grid.width(), grid.height().saturating_add(border));
    let mut padded = Grid::new(size, Tile::Wall);
    for (pos, tile) in grid.iter() {
        padded.set(pos.with_y(pos.y.saturating_add_unsigned(border)), tile);
    }
    padded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_shifted_up() {
        let grid = Grid::from_rows(&[[0, 1, 0], [0, 0, 0]]);
        let padded = pad_border(&grid, 2);
        assert_eq!(padded.size(), UVec2::new(3, 4));
        assert_eq!(
            padded,
            Grid::from_rows(&[[1, 1, 1], [1, 1, 1], [0, 1, 0], [0, 0, 0]])
        );
        // source untouched
        assert_eq!(grid.size(), UVec2::new(3, 2));
    }

    #[test]
    fn zero_border_is_a_copy() {
        let grid = Grid::from_rows(&[[1, 0], [0, 1]]);
        assert_eq!(pad_border(&grid, 0), grid);
    }
}
