use std::ops::RangeInclusive;

use glam::UVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Valid range of the smoothing neighbor-count threshold.
pub const SMOOTHING_THRESHOLD_RANGE: RangeInclusive<u8> = 2..=6;

/// Number of smoothing passes applied by a full generation.
pub const GENERATION_SMOOTH_PASSES: usize = 5;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("grid dimensions must be non-zero, got {width}x{height}")]
    EmptyDimension { width: u32, height: u32 },
    #[error("fill percentage must be within 0..=100, got {0}")]
    FillPercent(u32),
    #[error("smoothing threshold must be within 2..=6, got {0}")]
    SmoothingThreshold(u8),
    #[error("tile size must be finite and positive, got {0}")]
    TileSize(f32),
    #[error("grid of {width}x{height} with a border of {border} rows is too large")]
    TooLarge { width: u32, height: u32, border: u32 },
}

/// How the smoother counts neighbors that fall outside the grid.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OffGridRule {
    /// An off-grid neighbor at `(ix, iy)` counts as a wall only if `ix >= 0` or
    /// `iy <= 1`. Neighbors past the left edge are therefore ignored except
    /// along the bottom three rows.
    #[default]
    Skewed,
    /// Every off-grid neighbor counts as a wall.
    AllWall,
}

impl OffGridRule {
    #[inline]
    pub fn counts_as_wall(self, x: i32, y: i32) -> bool {
        match self {
            OffGridRule::Skewed => x >= 0 || y <= 1,
            OffGridRule::AllWall => true,
        }
    }
}

/// Parameters of one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub width: u32,
    pub height: u32,
    /// Chance in percent for an interior cell to start as a wall.
    pub fill_percent: u32,
    pub seed: String,
    /// Ignore `seed` and derive one from the current time on every run.
    pub use_random_seed: bool,
    /// Neighbor wall count above which a cell becomes a wall, and below which it
    /// opens up. Cells with exactly this count keep their value.
    pub smoothing_threshold: u8,
    /// Wall regions smaller than this are opened.
    pub wall_region_threshold: usize,
    /// Open regions smaller than this are filled in.
    pub room_region_threshold: usize,
    /// Number of solid rows added below the map before hand-off.
    pub border: u32,
    /// World-space size of one tile, forwarded to the grid consumer.
    pub tile_size: f32,
    pub off_grid_rule: OffGridRule,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 40,
            fill_percent: 50,
            seed: String::new(),
            use_random_seed: false,
            smoothing_threshold: 4,
            wall_region_threshold: 40,
            room_region_threshold: 10,
            border: 10,
            tile_size: 1.0,
            off_grid_rule: OffGridRule::Skewed,
        }
    }
}

impl GenerationConfig {
    #[inline]
    pub fn size(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    pub fn with_seed(mut self, seed: impl Into<String>) -> Self {
        self.seed = seed.into();
        self.use_random_seed = false;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyDimension {
                width: self.width,
                height: self.height,
            });
        }
        // Cell counts must fit u32 and coordinates i32, border rows included.
        let too_large = ConfigError::TooLarge {
            width: self.width,
            height: self.height,
            border: self.border,
        };
        let padded_height = self
            .height
            .checked_add(self.border)
            .ok_or_else(|| too_large.clone())?;
        if self.width > i32::MAX as u32
            || padded_height > i32::MAX as u32
            || self.width.checked_mul(padded_height).is_none()
        {
            return Err(too_large);
        }
        if self.fill_percent > 100 {
            return Err(ConfigError::FillPercent(self.fill_percent));
        }
        if !SMOOTHING_THRESHOLD_RANGE.contains(&self.smoothing_threshold) {
            return Err(ConfigError::SmoothingThreshold(self.smoothing_threshold));
        }
        if !self.tile_size.is_finite() || self.tile_size <= 0.0 {
            return Err(ConfigError::TileSize(self.tile_size));
        }
        Ok(())
    }
}
