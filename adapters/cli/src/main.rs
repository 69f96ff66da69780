#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that generates, shares and inspects platformer levels.

mod config;
mod share;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use glam::Vec2;
use platformer_core::{LevelDimensions, PitRange, Tile, TilePos};
use platformer_level_builder::{audit, Edge, LevelBlueprint, SurfaceKind};
use platformer_system_level_generation::{
    ChunkRecord, GeneratedLevel, GenerationRequest, LevelGenerator,
};
use serde::Serialize;

use config::GeneratorConfig;
use share::LevelShare;

/// Procedural platformer level generator.
#[derive(Debug, Parser)]
#[command(name = "platformer-levels", version)]
struct Cli {
    /// TOML file with physics constants and default dimensions.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a single level.
    Generate {
        #[command(flatten)]
        level: LevelArgs,
        /// Number of gems to place; drawn from 3 to 6 when omitted.
        #[arg(long)]
        gems: Option<u32>,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Include the chunk placement trace.
        #[arg(long)]
        trace: bool,
    },
    /// Generate a pack of independent levels from one seed.
    Pack {
        #[command(flatten)]
        level: LevelArgs,
        /// Number of levels in the pack.
        #[arg(long, default_value_t = 5)]
        count: usize,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Decode a share string and print its rows.
    Decode {
        /// Share string produced by `generate --format share`.
        share: String,
    },
    /// Generate a level and summarise the blueprint a game would load.
    Inspect {
        #[command(flatten)]
        level: LevelArgs,
        /// Number of gems to place; drawn from 3 to 6 when omitted.
        #[arg(long)]
        gems: Option<u32>,
    },
}

#[derive(Debug, Args)]
struct LevelArgs {
    /// Level width in tiles.
    #[arg(long)]
    width: Option<u32>,
    /// Level height in tiles.
    #[arg(long)]
    height: Option<u32>,
    /// Seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,
}

impl LevelArgs {
    fn dimensions(&self, defaults: LevelDimensions) -> LevelDimensions {
        LevelDimensions::new(
            self.width.unwrap_or(defaults.width_tiles),
            self.height.unwrap_or(defaults.height_tiles),
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One row of tile codes per line.
    Text,
    /// JSON document with rows, pits and path.
    Json,
    /// Single-line share string.
    Share,
}

#[derive(Debug, Serialize)]
struct LevelReport<'a> {
    seed: Option<u64>,
    width: usize,
    height: usize,
    rows: Vec<String>,
    pits: &'a [PitRange],
    footholds: &'a [TilePos],
    exit: TilePos,
    gems: &'a [TilePos],
    #[serde(skip_serializing_if = "Option::is_none")]
    chunks: Option<&'a [ChunkRecord]>,
}

impl<'a> LevelReport<'a> {
    fn new(level: &'a GeneratedLevel, trace: bool) -> Self {
        Self {
            seed: level.seed(),
            width: level.grid().width(),
            height: level.grid().height(),
            rows: level.rows(),
            pits: level.pits(),
            footholds: level.footholds(),
            exit: level.exit(),
            gems: level.gems(),
            chunks: trace.then(|| level.chunks()),
        }
    }
}

/// Entry point for the platformer level command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::default(),
    };
    let generator = LevelGenerator::new(config.physics);
    log::debug!(
        "reach bounds: up {} tiles, gap {} tiles",
        generator.bounds().max_up_tiles(),
        generator.bounds().max_gap_tiles()
    );

    match cli.command {
        Command::Generate {
            level,
            gems,
            format,
            trace,
        } => {
            let generated = generate(&generator, &config, &level, gems)?;
            if trace && format != OutputFormat::Json {
                for chunk in generated.chunks() {
                    eprintln!("{}", describe_chunk(chunk));
                }
            }
            println!("{}", render(&generated, format, trace)?);
        }
        Command::Pack {
            level,
            count,
            format,
        } => {
            let dimensions = level.dimensions(config.dimensions);
            let pack = generator
                .generate_pack(count, dimensions, level.seed)
                .context("failed to generate level pack")?;
            let rendered = pack
                .iter()
                .map(|generated| render(generated, format, false))
                .collect::<Result<Vec<_>>>()?;
            let separator = match format {
                OutputFormat::Text => "\n\n",
                OutputFormat::Json | OutputFormat::Share => "\n",
            };
            println!("{}", rendered.join(separator));
        }
        Command::Decode { share } => {
            let decoded = LevelShare::decode(&share).context("failed to decode share string")?;
            if let Some(seed) = decoded.seed {
                println!("seed: {seed}");
            }
            for violation in audit(decoded.rows.as_slice(), None) {
                log::warn!("shared level: {violation}");
            }
            println!("{}", decoded.rows.join("\n"));
        }
        Command::Inspect { level, gems } => {
            let generated = generate(&generator, &config, &level, gems)?;
            let tile_size = generator.physics().tile_size as f32;
            let blueprint = LevelBlueprint::from_grid(generated.grid(), tile_size)
                .context("failed to build level blueprint")?;
            println!("{}", summarise(&generated, &blueprint));
        }
    }

    Ok(())
}

fn generate(
    generator: &LevelGenerator,
    config: &GeneratorConfig,
    level: &LevelArgs,
    gems: Option<u32>,
) -> Result<GeneratedLevel> {
    let request = GenerationRequest {
        dimensions: level.dimensions(config.dimensions),
        seed: level.seed,
        gem_count: gems,
    };
    let generated = generator
        .generate(&request)
        .context("failed to generate level")?;
    log::info!(
        "generated {}x{} level with seed {:?}",
        request.dimensions.width_tiles,
        request.dimensions.height_tiles,
        request.seed
    );
    Ok(generated)
}

fn render(level: &GeneratedLevel, format: OutputFormat, trace: bool) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(level.grid().to_string()),
        OutputFormat::Json => serde_json::to_string_pretty(&LevelReport::new(level, trace))
            .context("failed to serialise level report"),
        OutputFormat::Share => LevelShare::new(level.seed(), level.rows())
            .encode()
            .context("failed to encode share string"),
    }
}

fn describe_chunk(chunk: &ChunkRecord) -> String {
    let landing = match chunk.landing {
        Some(foothold) => format!("({}, {})", foothold.x(), foothold.y()),
        None => "skipped".to_owned(),
    };
    let substitution = if chunk.substituted {
        " [replaced by flat]"
    } else {
        ""
    };
    format!(
        "{:<12} ({}, {}) -> {landing}{substitution}",
        chunk.drawn.name(),
        chunk.start.x(),
        chunk.start.y()
    )
}

fn summarise(level: &GeneratedLevel, blueprint: &LevelBlueprint) -> String {
    let count_blocks = |surface: SurfaceKind, edge: Option<Edge>| {
        blueprint
            .solids()
            .iter()
            .filter(|block| block.surface == surface)
            .filter(|block| edge.map_or(true, |edge| block.edge == edge))
            .count()
    };
    let exit = blueprint.exits().first().copied().unwrap_or(Vec2::ZERO);
    let violations = audit(level.rows().as_slice(), Some(level.pits()));

    let mut lines = vec![
        format!(
            "level {}x{} tiles, {} world units",
            blueprint.dimensions().width_tiles,
            blueprint.dimensions().height_tiles,
            format_point(blueprint.world_size())
        ),
        format!("seed: {:?}", level.seed()),
        format!(
            "reach: up {} tiles, gap {} tiles",
            level.bounds().max_up_tiles(),
            level.bounds().max_gap_tiles()
        ),
        format!("spawn: {}", format_point(blueprint.spawn())),
        format!("exit trigger: {}", format_point(exit)),
        format!("gems: {}", blueprint.collectibles().len()),
        format!(
            "pits: {}",
            level
                .pits()
                .iter()
                .map(|pit| format!("{}..={}", pit.start(), pit.end()))
                .collect::<Vec<_>>()
                .join(", ")
        ),
        format!(
            "chunks: {} placed, {} replaced by flat, {} skipped",
            level.chunks().iter().filter(|chunk| chunk.landing.is_some()).count(),
            level.chunks().iter().filter(|chunk| chunk.substituted).count(),
            level.chunks().iter().filter(|chunk| chunk.landing.is_none()).count()
        ),
        format!(
            "solids: {} ({} grass, {} dirt)",
            level.grid().count(Tile::Solid),
            count_blocks(SurfaceKind::Grass, None),
            count_blocks(SurfaceKind::Dirt, None)
        ),
    ];
    for surface in [SurfaceKind::Grass, SurfaceKind::Dirt] {
        lines.push(format!(
            "  {surface:?}: {} left corners, {} right corners, {} mid",
            count_blocks(surface, Some(Edge::CornerLeft)),
            count_blocks(surface, Some(Edge::CornerRight)),
            count_blocks(surface, Some(Edge::Mid))
        ));
    }
    if violations.is_empty() {
        lines.push("audit: ok".to_owned());
    } else {
        lines.extend(violations.iter().map(|violation| format!("audit: {violation}")));
    }
    lines.join("\n")
}

fn format_point(point: Vec2) -> String {
    format!("({:.1}, {:.1})", point.x, point.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(seed: u64) -> GeneratedLevel {
        LevelGenerator::default()
            .generate(&GenerationRequest::default().with_seed(seed))
            .expect("valid request")
    }

    #[test]
    fn cli_arguments_parse() {
        let cli = Cli::try_parse_from([
            "platformer-levels",
            "--config",
            "levels.toml",
            "generate",
            "--width",
            "64",
            "--seed",
            "9",
            "--format",
            "share",
            "--trace",
        ])
        .expect("arguments parse");
        assert_eq!(cli.config, Some(PathBuf::from("levels.toml")));
        let Command::Generate {
            level,
            format,
            trace,
            gems,
        } = cli.command
        else {
            panic!("expected generate");
        };
        assert_eq!(level.dimensions(LevelDimensions::default()), LevelDimensions::new(64, 11));
        assert_eq!(level.seed, Some(9));
        assert_eq!(format, OutputFormat::Share);
        assert!(trace);
        assert_eq!(gems, None);
    }

    #[test]
    fn share_output_decodes_to_the_same_rows() {
        let generated = level(1);
        let encoded = render(&generated, OutputFormat::Share, false).expect("share");
        let decoded = LevelShare::decode(&encoded).expect("decodes");
        assert_eq!(decoded.rows, generated.rows());
        assert_eq!(decoded.seed, Some(1));
    }

    #[test]
    fn json_output_includes_the_trace_on_request() {
        let generated = level(4);
        let plain: serde_json::Value =
            serde_json::from_str(&render(&generated, OutputFormat::Json, false).expect("json"))
                .expect("valid json");
        assert_eq!(plain["seed"], 4);
        assert_eq!(plain["rows"].as_array().map(Vec::len), Some(11));
        assert!(plain.get("chunks").is_none());

        let traced: serde_json::Value =
            serde_json::from_str(&render(&generated, OutputFormat::Json, true).expect("json"))
                .expect("valid json");
        assert_eq!(
            traced["chunks"].as_array().map(Vec::len),
            Some(generated.chunks().len())
        );
    }

    #[test]
    fn inspection_summary_reports_a_clean_audit() {
        let generated = level(2);
        let blueprint = LevelBlueprint::from_grid(generated.grid(), 48.0).expect("blueprint");
        let summary = summarise(&generated, &blueprint);
        assert!(summary.starts_with("level 42x11 tiles, (2016.0, 528.0) world units"));
        assert!(summary.contains("audit: ok"), "{summary}");
    }
}
