use std::{error::Error, fs, path::PathBuf};

use cavern::*;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cavern")]
#[command(about = "Generate a cave map and print it as text")]
struct Args {
    /// JSON file with generation settings; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Map width in tiles
    #[arg(short = 'W', long)]
    width: Option<u32>,

    /// Map height in tiles
    #[arg(short = 'H', long)]
    height: Option<u32>,

    /// Chance in percent for a tile to start as a wall (0-100)
    #[arg(short, long)]
    fill: Option<u32>,

    /// Seed string
    #[arg(short, long, conflicts_with = "random_seed")]
    seed: Option<String>,

    /// Derive the seed from the current time
    #[arg(long)]
    random_seed: bool,

    /// Neighbor wall count deciding the smoothing rule (2-6)
    #[arg(short, long)]
    threshold: Option<u8>,

    /// Wall regions smaller than this are opened
    #[arg(long)]
    wall_threshold: Option<usize>,

    /// Open regions smaller than this are filled in
    #[arg(long)]
    room_threshold: Option<usize>,

    /// Solid rows added below the map
    #[arg(short, long)]
    border: Option<u32>,

    /// Count every off-grid neighbor as a wall while smoothing
    #[arg(long)]
    uniform_edges: bool,

    /// Extra smoothing passes applied after generation, without border
    #[arg(long, default_value = "0")]
    smooth: usize,
}

impl Args {
    fn generation_config(&self) -> Result<GenerationConfig, Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
                serde_json::from_str::<GenerationConfig>(&json)
                    .map_err(|e| format!("invalid config {}: {e}", path.display()))?
            }
            None => GenerationConfig::default(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(fill) = self.fill {
            config.fill_percent = fill;
        }
        if let Some(seed) = &self.seed {
            config.seed = seed.clone();
            config.use_random_seed = false;
        }
        if self.random_seed {
            config.use_random_seed = true;
        }
        if let Some(threshold) = self.threshold {
            config.smoothing_threshold = threshold;
        }
        if let Some(wall_threshold) = self.wall_threshold {
            config.wall_region_threshold = wall_threshold;
        }
        if let Some(room_threshold) = self.room_threshold {
            config.room_region_threshold = room_threshold;
        }
        if let Some(border) = self.border {
            config.border = border;
        }
        if self.uniform_edges {
            config.off_grid_rule = OffGridRule::AllWall;
        }
        Ok(config)
    }
}

/// Generate a map, apply `passes` extra smoothing passes, and render every
/// grid handed over along the way: the padded map first, then one unpadded
/// grid per pass.
fn render(config: GenerationConfig, passes: usize) -> Result<Vec<String>, ConfigError> {
    let mut frames = vec![];
    let mut generator = MapGenerator::new(config, |grid: &Grid, _: f32| {
        frames.push(grid.to_txt());
    })?;
    tracing::info!(seed = generator.seed(), "map ready");

    let mut changed = 0;
    for _ in 0..passes {
        changed += generator.smooth_once();
    }
    if passes > 0 {
        tracing::info!(passes, changed, "extra smoothing done");
    }
    drop(generator);
    Ok(frames)
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = args.generation_config()?;

    let frames = render(config, args.smooth)?;
    print!("{}", frames.join("\n"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify_cli() {
        Args::command().debug_assert();
    }

    #[test]
    fn flags_override_defaults() {
        let args = Args::parse_from([
            "cavern", "-W", "32", "-H", "24", "--fill", "45", "--seed", "flint", "-t", "5",
            "--wall-threshold", "12", "--room-threshold", "6", "-b", "0", "--uniform-edges",
        ]);
        let config = args.generation_config().unwrap();
        assert_eq!(
            config,
            GenerationConfig {
                width: 32,
                height: 24,
                fill_percent: 45,
                seed: "flint".into(),
                use_random_seed: false,
                smoothing_threshold: 5,
                wall_region_threshold: 12,
                room_region_threshold: 6,
                border: 0,
                tile_size: 1.0,
                off_grid_rule: OffGridRule::AllWall,
            }
        );
    }

    #[test]
    fn config_file_is_merged() {
        let path = std::env::temp_dir().join(format!("cavern-cli-{}.json", std::process::id()));
        fs::write(&path, r#"{ "width": 20, "seed": "chalk", "tile_size": 2.0 }"#).unwrap();
        let args = Args::parse_from([
            OsString::from("cavern"),
            "--config".into(),
            path.clone().into_os_string(),
            "--random-seed".into(),
        ]);
        let config = args.generation_config().unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.width, 20);
        assert_eq!(config.height, GenerationConfig::default().height);
        assert_eq!(config.seed, "chalk");
        assert!(config.use_random_seed);
        assert_eq!(config.tile_size, 2.0);
    }

    #[test]
    fn every_hand_off_is_rendered() {
        let args = Args::parse_from([
            "cavern", "-W", "12", "-H", "8", "-b", "3", "--seed", "slate", "--smooth", "2",
        ]);
        let config = args.generation_config().unwrap();
        let frames = render(config, args.smooth).unwrap();

        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].lines().count(), 11);
        for frame in &frames[1..] {
            assert_eq!(frame.lines().count(), 8);
            assert!(frame.lines().all(|line| line.len() == 12));
        }
        // the padded map ends with the solid border rows
        assert!(frames[0].lines().skip(8).all(|line| line == "#".repeat(12)));
    }

    #[test]
    fn seed_flags_conflict() {
        assert!(Args::try_parse_from(["cavern", "--seed", "a", "--random-seed"]).is_err());
    }
}
