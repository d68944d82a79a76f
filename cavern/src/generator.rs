use crate::{
    fill_rand, pad_border, prune_regions, resolve_seed, seeded_rng, smooth, ConfigError,
    GenerationConfig, Grid, PruneReport, GENERATION_SMOOTH_PASSES,
};

/// Receiver of finished grids, typically a mesh builder.
pub trait GridConsumer {
    /// Called with the grid to display and the world-space size of one tile.
    fn consume(&mut self, grid: &Grid, tile_size: f32);
}

impl<F> GridConsumer for F
where
    F: FnMut(&Grid, f32),
{
    fn consume(&mut self, grid: &Grid, tile_size: f32) {
        self(grid, tile_size)
    }
}

/// Summary of a full generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub seed: String,
    pub prune: PruneReport,
}

/// Run the generation pipeline for `seed`, stopping before border padding.
///
/// The config is assumed valid.
pub fn generate_map(config: &GenerationConfig, seed: &str) -> (Grid, PruneReport) {
    #[cfg(feature = "trace")]
    let _span = tracing::info_span!("generate").entered();

    let mut map = {
        #[cfg(feature = "trace")]
        let _span = tracing::info_span!("fill_rand").entered();

        fill_rand(config.size(), config.fill_percent, seeded_rng(seed))
    };

    for _ in 0..GENERATION_SMOOTH_PASSES {
        let changed = smooth(&mut map, config.smoothing_threshold, config.off_grid_rule);
        tracing::debug!(changed, "smoothing pass");
    }

    let prune = prune_regions(
        &mut map,
        config.wall_region_threshold,
        config.room_region_threshold,
    );
    (map, prune)
}

/// Owns the current map and hands every result to a [`GridConsumer`].
///
/// The two entry points mirror the interactive controls: [`regenerate()`]
/// builds a fresh map and [`smooth_once()`] refines the current one.
///
/// [`regenerate()`]: MapGenerator::regenerate
/// [`smooth_once()`]: MapGenerator::smooth_once
pub struct MapGenerator<C> {
    config: GenerationConfig,
    consumer: C,
    map: Grid,
    seed: String,
}

impl<C: GridConsumer> MapGenerator<C> {
    /// Validate `config` and run a first generation.
    pub fn new(config: GenerationConfig, consumer: C) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut generator = Self {
            map: Grid::new(config.size(), Default::default()),
            config,
            consumer,
            seed: String::new(),
        };
        generator.regenerate();
        Ok(generator)
    }

    /// Run the full pipeline with a freshly resolved seed and hand the padded
    /// map to the consumer.
    pub fn regenerate(&mut self) -> GenerationReport {
        let seed = resolve_seed(&self.config);
        let (map, prune) = generate_map(&self.config, &seed);
        tracing::info!(
            seed = %seed,
            width = self.config.width,
            height = self.config.height,
            walls_removed = prune.walls_removed,
            rooms_filled = prune.rooms_filled,
            "generated map"
        );
        self.map = map;
        self.seed = seed;

        let padded = {
            #[cfg(feature = "trace")]
            let _span = tracing::info_span!("pad_border").entered();

            pad_border(&self.map, self.config.border)
        };
        self.consumer.consume(&padded, self.config.tile_size);

        GenerationReport {
            seed: self.seed.clone(),
            prune,
        }
    }

    /// Apply one more smoothing pass to the current map and hand it to the
    /// consumer without padding. Returns the number of changed cells.
    pub fn smooth_once(&mut self) -> usize {
        let changed = smooth(
            &mut self.map,
            self.config.smoothing_threshold,
            self.config.off_grid_rule,
        );
        tracing::debug!(changed, "smoothed map once");
        self.consumer.consume(&self.map, self.config.tile_size);
        changed
    }

    /// Replace the config and regenerate. An invalid config is rejected and the
    /// generator is left unchanged.
    pub fn reconfigure(
        &mut self,
        config: GenerationConfig,
    ) -> Result<GenerationReport, ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(self.regenerate())
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Current map, without the border.
    pub fn map(&self) -> &Grid {
        &self.map
    }

    /// Seed string used by the last generation.
    pub fn seed(&self) -> &str {
        &self.seed
    }

    pub fn consumer(&self) -> &C {
        &self.consumer
    }

    pub fn consumer_mut(&mut self) -> &mut C {
        &mut self.consumer
    }

    pub fn into_consumer(self) -> C {
        self.consumer
    }
}
