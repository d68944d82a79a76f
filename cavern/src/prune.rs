use crate::{find_regions, Grid, Region, Tile};

/// Outcome of a pruning pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PruneReport {
    /// Wall regions found before pruning.
    pub wall_regions: usize,
    /// Wall regions opened because they were under the wall threshold.
    pub walls_removed: usize,
    /// Open regions found after the wall regions were pruned.
    pub room_regions: usize,
    /// Open regions filled in because they were under the room threshold.
    pub rooms_filled: usize,
}

/// Flip every region smaller than `threshold` to the opposite tile. Returns the
/// number of flipped regions.
fn flip_small(grid: &mut Grid, regions: &[Region], threshold: usize) -> usize {
    let mut flipped = 0;
    for region in regions.iter().filter(|r| r.len() < threshold) {
        let value = region.tile.flipped();
        for &pos in &region.tiles {
            grid.set(pos, value);
        }
        flipped += 1;
    }
    flipped
}

/// Remove undersized regions in a single pass.
///
/// Wall regions smaller than `wall_threshold` are opened first. Open regions are
/// then measured on the updated grid, and those smaller than `room_threshold`
/// are filled in. Regions that become undersized as a side effect are left
/// as they are.
pub fn prune_regions(grid: &mut Grid, wall_threshold: usize, room_threshold: usize) -> PruneReport {
    #[cfg(feature = "trace")]
    let _span = tracing::info_span!("prune_regions").entered();

    let walls = find_regions(grid, Tile::Wall);
    let walls_removed = flip_small(grid, &walls, wall_threshold);

    let rooms = find_regions(grid, Tile::Open);
    let rooms_filled = flip_small(grid, &rooms, room_threshold);

    let report = PruneReport {
        wall_regions: walls.len(),
        walls_removed,
        room_regions: rooms.len(),
        rooms_filled,
    };
    tracing::debug!(?report, "pruned regions");
    report
}

#[cfg(test)]
mod tests {
    use glam::IVec2;

    use super::*;

    #[test]
    fn zero_thresholds_keep_everything() {
        let mut grid = Grid::from_rows(&[
            [1, 0, 1], //
            [0, 1, 0],
            [1, 0, 1],
        ]);
        let reference = grid.clone();
        let report = prune_regions(&mut grid, 0, 0);
        assert_eq!(grid, reference);
        assert_eq!(report.walls_removed, 0);
        assert_eq!(report.rooms_filled, 0);
        assert_eq!(report.wall_regions, 5);
        assert_eq!(report.room_regions, 4);
    }

    #[test]
    fn small_walls_are_opened() {
        let mut grid = Grid::from_rows(&[
            [1, 1, 1, 1, 0], //
            [0, 0, 0, 0, 0],
            [0, 1, 0, 0, 0],
            [0, 0, 0, 0, 0],
        ]);
        let report = prune_regions(&mut grid, 2, 0);
        assert_eq!(report.walls_removed, 1);
        assert_eq!(
            grid,
            Grid::from_rows(&[
                [1, 1, 1, 1, 0],
                [0, 0, 0, 0, 0],
                [0, 0, 0, 0, 0],
                [0, 0, 0, 0, 0],
            ])
        );
    }

    #[test]
    fn rooms_are_measured_after_wall_flips() {
        // Opening the lone wall merges the two pockets into a room of five,
        // which survives a room threshold of 3.
        let mut grid = Grid::from_rows(&[[0, 0, 1, 0, 0]]);
        let report = prune_regions(&mut grid, 2, 3);
        assert_eq!(report.walls_removed, 1);
        assert_eq!(report.room_regions, 1);
        assert_eq!(report.rooms_filled, 0);
        assert_eq!(grid.count(Tile::Open), 5);
    }

    #[test]
    fn enclosed_pocket_is_filled() {
        let mut grid = Grid::from_rows(&[
            [0, 0, 0, 0, 0, 0], //
            [0, 1, 1, 1, 1, 0],
            [0, 1, 0, 1, 0, 0],
            [0, 1, 1, 1, 1, 0],
        ]);
        let report = prune_regions(&mut grid, 9, 2);
        assert_eq!(report.wall_regions, 1);
        assert_eq!(report.walls_removed, 0);
        assert_eq!(report.room_regions, 2);
        assert_eq!(report.rooms_filled, 1);
        assert_eq!(grid.cell(IVec2::new(2, 2)), Some(Tile::Wall));
        assert_eq!(grid.cell(IVec2::new(4, 2)), Some(Tile::Open));
    }

    #[test]
    fn single_pass_only() {
        // Filling the room creates a wall region of one, which is not pruned
        // again.
        let mut grid = Grid::from_rows(&[[0]]);
        let report = prune_regions(&mut grid, 2, 2);
        assert_eq!(report.walls_removed, 0);
        assert_eq!(report.rooms_filled, 1);
        assert_eq!(grid.as_bytes(), &[1]);

        let walls = find_regions(&grid, Tile::Wall);
        assert_eq!(walls.len(), 1);
        assert!(walls[0].len() < 2);
    }
}
