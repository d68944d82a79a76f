//! Seeded cave map generation.
//!
//! A map starts as random noise with fixed boundary rows, is smoothed by a
//! majority-rule cellular automaton, and is then cleaned up by removing wall
//! and open regions below a size threshold. The finished grid is padded with
//! solid rows at the bottom and handed to a [`GridConsumer`], usually a mesh
//! builder.
//!
//! ```
//! use cavern::{GenerationConfig, Grid, MapGenerator};
//!
//! let config = GenerationConfig::default().with_seed("cave");
//! let mut meshes = 0;
//! let mut generator = MapGenerator::new(config, |_: &Grid, _: f32| meshes += 1).unwrap();
//! generator.smooth_once();
//! assert_eq!(generator.map().height(), 40);
//! ```

mod border;
mod config;
mod fill;
mod generator;
mod grid;
mod prune;
mod region;
mod seed;
mod smooth;

pub use border::pad_border;
pub use config::{
    ConfigError, GenerationConfig, OffGridRule, GENERATION_SMOOTH_PASSES,
    SMOOTHING_THRESHOLD_RANGE,
};
pub use fill::fill_rand;
pub use generator::{generate_map, GenerationReport, GridConsumer, MapGenerator};
pub use glam::{IVec2, UVec2};
pub use grid::{Coord, Grid, Tile};
pub use prune::{prune_regions, PruneReport};
pub use region::{find_regions, region_tiles, Region, VisitedMask};
pub use seed::{hash_seed, resolve_seed, seeded_rng, time_seed};
pub use smooth::{count_neighbors, smooth};
