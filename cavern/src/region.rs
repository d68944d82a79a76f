use std::collections::VecDeque;

use glam::{IVec2, UVec2};

use crate::{Coord, Grid, Tile};

/// Same-sized flag buffer scoped to one sweep or one fill.
///
/// Flags are stamped with the current epoch, so [`reset()`] clears the mask
/// without touching the buffer.
///
/// [`reset()`]: VisitedMask::reset
#[derive(Debug, Clone)]
pub struct VisitedMask {
    size: UVec2,
    stamps: Vec<u32>,
    epoch: u32,
}

impl VisitedMask {
    pub fn new(size: UVec2) -> Self {
        Self {
            size,
            stamps: vec![0; size.x as usize * size.y as usize],
            epoch: 1,
        }
    }

    #[inline]
    fn index(&self, pos: IVec2) -> usize {
        (pos.y as u32 * self.size.x + pos.x as u32) as usize
    }

    /// Whether `pos` was marked since the last reset. `pos` must be in range.
    #[inline]
    pub fn is_marked(&self, pos: IVec2) -> bool {
        self.stamps[self.index(pos)] == self.epoch
    }

    /// Mark `pos`, returning `false` if it was already marked.
    #[inline]
    pub fn mark(&mut self, pos: IVec2) -> bool {
        let index = self.index(pos);
        let was_marked = self.stamps[index] == self.epoch;
        self.stamps[index] = self.epoch;
        !was_marked
    }

    pub fn reset(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        if self.epoch == 0 {
            self.stamps.fill(0);
            self.epoch = 1;
        }
    }
}

/// Connected set of same-valued tiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub tile: Tile,
    /// Member tiles in flood-fill discovery order.
    pub tiles: Vec<Coord>,
}

impl Region {
    #[inline]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

/// The four cells sharing an edge with a tile.
const EDGE_NEIGHBORS: [IVec2; 4] = [IVec2::NEG_X, IVec2::NEG_Y, IVec2::Y, IVec2::X];

/// Breadth-first flood fill from `start`, collecting every tile connected to it
/// through up/down/left/right steps over cells of the same value.
///
/// `mask` is scratch space for the fill; it is reset before use.
pub fn region_tiles(grid: &Grid, start: Coord, mask: &mut VisitedMask) -> Vec<Coord> {
    let Some(tile) = grid.cell(start) else {
        return vec![];
    };
    mask.reset();

    let mut tiles = vec![];
    let mut queue = VecDeque::new();
    mask.mark(start);
    queue.push_back(start);

    while let Some(pos) = queue.pop_front() {
        tiles.push(pos);
        for dir in EDGE_NEIGHBORS {
            let next = pos + dir;
            if grid.cell(next) == Some(tile) && mask.mark(next) {
                queue.push_back(next);
            }
        }
    }
    tiles
}

/// Find all regions of `tile` in `grid`.
///
/// Cells are scanned with `x` as the outer loop and `y` as the inner one, and a
/// new region is flood-filled from every matching cell not yet claimed by an
/// earlier region. The returned regions are disjoint and together cover every
/// cell of value `tile`.
pub fn find_regions(grid: &Grid, tile: Tile) -> Vec<Region> {
    #[cfg(feature = "trace")]
    let _span = tracing::info_span!("find_regions").entered();

    let mut regions = vec![];
    let mut claimed = VisitedMask::new(grid.size());
    let mut fill_mask = VisitedMask::new(grid.size());

    for i in 0..grid.width() as i32 {
        for j in 0..grid.height() as i32 {
            let pos = IVec2::new(i, j);
            if claimed.is_marked(pos) || grid.cell(pos) != Some(tile) {
                continue;
            }
            let tiles = region_tiles(grid, pos, &mut fill_mask);
            for &t in &tiles {
                claimed.mark(t);
            }
            regions.push(Region { tile, tiles });
        }
    }

    tracing::debug!(?tile, count = regions.len(), "found regions");
    regions
}
