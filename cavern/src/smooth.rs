use glam::IVec2;

use crate::{Grid, OffGridRule, Tile};

/// Count the walls in the Moore neighborhood of `pos`, the cell itself
/// excluded. Off-grid neighbors are counted according to `rule`.
pub fn count_neighbors(grid: &Grid, pos: IVec2, rule: OffGridRule) -> u8 {
    let mut count = 0;
    let mut xy = pos;
    for j in (pos.y - 1)..=(pos.y + 1) {
        xy.y = j;
        for i in (pos.x - 1)..=(pos.x + 1) {
            xy.x = i;
            if xy == pos {
                continue;
            }
            let wall = match grid.cell(xy) {
                Some(tile) => tile == Tile::Wall,
                None => rule.counts_as_wall(i, j),
            };
            if wall {
                count += 1;
            }
        }
    }
    count
}

/// Apply one smoothing pass and return the number of cells that changed.
///
/// A cell with more than `threshold` wall neighbors becomes a wall, one with
/// fewer becomes open, and one with exactly `threshold` keeps its value. All
/// counts are taken from the grid as it was before the pass.
pub fn smooth(grid: &mut Grid, threshold: u8, rule: OffGridRule) -> usize {
    #[cfg(feature = "trace")]
    let _span = tracing::info_span!("smooth").entered();

    let snapshot = grid.clone();
    let mut changed = 0;
    for (pos, tile) in snapshot.iter() {
        // 5-8/5-8/2/M at the default threshold of 4
        let c = count_neighbors(&snapshot, pos, rule);
        let next = if c > threshold {
            Tile::Wall
        } else if c < threshold {
            Tile::Open
        } else {
            tile
        };
        if next != tile {
            grid.set(pos, next);
            changed += 1;
        }
    }
    changed
}
