use bytemuck::NoUninit;
use glam::{IVec2, UVec2};
use serde::{Deserialize, Serialize};

/// Grid cell position. Only in-range values are ever stored in a region.
pub type Coord = IVec2;

/// Value of a single grid cell.
#[repr(u8)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, NoUninit, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Open = 0,
    Wall = 1,
}

impl Tile {
    #[inline]
    pub fn value(self) -> u8 {
        self as u8
    }

    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Tile::Open => Tile::Wall,
            Tile::Wall => Tile::Open,
        }
    }
}

/// Rectangular 2D tile map stored row-major, indexed by `y * width + x`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: UVec2,
    data: Vec<Tile>,
}

impl Grid {
    /// Create a grid of `size` with every cell set to `value`.
    pub fn new(size: UVec2, value: Tile) -> Self {
        Self {
            size,
            data: vec![value; size.x as usize * size.y as usize],
        }
    }

    /// Build a grid from rows of 0/1 values, `rows[y][x]`. Any non-zero value is
    /// a wall.
    pub fn from_rows<const W: usize>(rows: &[[u8; W]]) -> Self {
        let data = rows
            .iter()
            .flatten()
            .map(|&v| if v != 0 { Tile::Wall } else { Tile::Open })
            .collect();
        Self {
            size: UVec2::new(W as u32, rows.len() as u32),
            data,
        }
    }

    #[inline]
    pub fn size(&self) -> UVec2 {
        self.size
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.size.y
    }

    #[inline]
    pub fn contains(&self, pos: IVec2) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.size.x && (pos.y as u32) < self.size.y
    }

    #[inline]
    fn index(&self, pos: IVec2) -> usize {
        (pos.y as u32 * self.size.x + pos.x as u32) as usize
    }

    #[inline]
    pub fn cell(&self, pos: IVec2) -> Option<Tile> {
        if self.contains(pos) {
            Some(self.data[self.index(pos)])
        } else {
            None
        }
    }

    #[inline]
    pub fn cell_mut(&mut self, pos: IVec2) -> Option<&mut Tile> {
        if self.contains(pos) {
            let index = self.index(pos);
            Some(&mut self.data[index])
        } else {
            None
        }
    }

    /// Set a cell. Out-of-range positions are ignored.
    #[inline]
    pub fn set(&mut self, pos: IVec2, value: Tile) {
        if let Some(cell) = self.cell_mut(pos) {
            *cell = value;
        }
    }

    #[inline]
    pub fn tiles(&self) -> &[Tile] {
        &self.data
    }

    /// Flat 0/1 view of the grid, row-major.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    /// One row of the grid, `y` in `0..height`.
    pub fn row(&self, y: u32) -> &[Tile] {
        let start = (y * self.size.x) as usize;
        &self.data[start..start + self.size.x as usize]
    }

    pub fn count(&self, value: Tile) -> usize {
        self.data.iter().filter(|&&t| t == value).count()
    }

    /// Iterate over all cells in storage order, with their position.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, Tile)> + '_ {
        let width = self.size.x.max(1);
        self.data.iter().enumerate().map(move |(i, &t)| {
            let i = i as u32;
            (IVec2::new((i % width) as i32, (i / width) as i32), t)
        })
    }

    /// Render as text, `#` for walls and a space for open cells. The last row
    /// is printed first so that `y = 0` ends up at the bottom.
    pub fn to_txt(&self) -> String {
        let mut s = String::with_capacity(self.data.len() + self.size.y as usize);
        for y in (0..self.size.y).rev() {
            for &t in self.row(y) {
                s.push(if t == Tile::Wall { '#' } else { ' ' });
            }
            s.push('\n');
        }
        s
    }
}
