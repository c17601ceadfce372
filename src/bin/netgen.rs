use bevy::app::App;
use bevy::log::{Level, LogPlugin, info};
use clap::{Parser, ValueEnum};
use rand::SeedableRng;
use rand_pcg::Pcg64;
use roadnet::config::{load_config, load_config_from, save_config};
use roadnet::errors::RoadNetResult;
use roadnet::generators::{GenerationReport, Technique, TechniqueKind, generate_and_measure};
use roadnet::metrics::MetricsRecord;
use roadnet::settings::GenerationSettings;
use roadnet::terrain::{TerrainData, TerrainOracle};
use serde::Serialize;
use std::path::PathBuf;

mod netgen {
    pub mod cli_utils;
    pub mod terrain_builder;
}

use netgen::cli_utils::*;
use netgen::terrain_builder::TerrainBuilder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TechniqueArg {
    AgentWalk,
    PathBased,
    Lsystem,
    All,
}

impl TechniqueArg {
    fn kinds(self) -> Vec<TechniqueKind> {
        match self {
            Self::AgentWalk => vec![TechniqueKind::AgentBasedRandomWalk],
            Self::PathBased => vec![TechniqueKind::PathBasedAStarPOIs],
            Self::Lsystem => vec![TechniqueKind::LSystem],
            Self::All => TechniqueKind::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Toml,
}

#[derive(Parser, Clone)]
#[command(name = "netgen")]
#[command(about = "Generate road networks over synthetic terrain and score them")]
struct Args {
    /// Generation technique to run
    #[arg(long, value_enum, default_value = "all")]
    technique: TechniqueArg,

    /// Terrain type preset (flat, hills, mountains, valleys) or algorithm (perlin, ridged)
    #[arg(long, default_value = "hills")]
    terrain_type: String,

    /// Terrain size in grid cells (format: WIDTHxHEIGHT)
    #[arg(long, default_value = "128x128")]
    size: String,

    /// World units per grid cell
    #[arg(long, default_value = "1.0")]
    scale: f32,

    /// Random seed for terrain and generation
    #[arg(long)]
    seed: Option<u32>,

    /// Terrain amplitude override
    #[arg(long)]
    amplitude: Option<f32>,

    /// Terrain noise frequency override
    #[arg(long)]
    frequency: Option<f32>,

    /// Terrain noise octaves override
    #[arg(long)]
    octaves: Option<u32>,

    /// Start point for agent walk and L-system (format: X,Z)
    #[arg(long)]
    start: Option<String>,

    /// Settings file; defaults to the user config directory
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective settings to the user config directory
    #[arg(long)]
    save_config: bool,

    /// Summary format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,
}

#[derive(Serialize)]
struct RunSummary {
    technique: String,
    seed: u32,
    metrics: MetricsRecord,
}

#[derive(Serialize)]
struct Summary {
    terrain_type: String,
    width: u32,
    height: u32,
    scale: f32,
    runs: Vec<RunSummary>,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    App::new().add_plugins(LogPlugin {
        level,
        ..Default::default()
    });
}

fn resolve_settings(args: &Args) -> RoadNetResult<GenerationSettings> {
    let mut settings = match &args.config {
        Some(path) => load_config_from(path)?,
        None => load_config(),
    };

    if let Some(start) = &args.start {
        let start = parse_point(start)?;
        settings.agent_walk.start = Some(start);
        settings.lsystem.start = Some(start);
    }

    settings.checked()
}

/// Run each technique with its own generator seeded from `seed`
fn run_techniques(
    kinds: &[TechniqueKind],
    settings: &GenerationSettings,
    terrain: &TerrainData,
    seed: u32,
) -> RoadNetResult<Vec<GenerationReport>> {
    let oracle: &dyn TerrainOracle = terrain;
    kinds
        .iter()
        .map(|&kind| {
            let technique = Technique::from_settings(kind, settings);
            let mut rng = Pcg64::seed_from_u64(u64::from(seed));
            generate_and_measure(&technique, Some(oracle), &settings.metrics, &mut rng)
        })
        .collect()
}

fn main() -> RoadNetResult<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let (width, height) = parse_size(&args.size)?;
    let seed = args.seed.unwrap_or_else(rand::random);
    let settings = resolve_settings(&args)?;

    if args.save_config {
        let path = save_config(&settings)?;
        info!("Settings written to {}", path.display());
    }

    let terrain = TerrainBuilder::new(args.terrain_type.clone())
        .seed(Some(seed))
        .amplitude(args.amplitude)
        .frequency(args.frequency)
        .octaves(args.octaves)
        .build()?
        .generate(width, height, args.scale)?;

    let reports = run_techniques(&args.technique.kinds(), &settings, &terrain, seed)?;

    let summary = Summary {
        terrain_type: args.terrain_type,
        width,
        height,
        scale: args.scale,
        runs: reports
            .into_iter()
            .map(|report| RunSummary {
                technique: report.technique.to_string(),
                seed,
                metrics: report.metrics,
            })
            .collect(),
    };

    match args.format {
        OutputFormat::Text => print_text_summary(&summary),
        OutputFormat::Toml => print_toml_summary(&summary)?,
    }

    Ok(())
}

fn print_toml_summary(summary: &Summary) -> RoadNetResult<()> {
    let rendered = toml::to_string_pretty(summary)?;
    println!("{rendered}");
    Ok(())
}

fn format_optional(value: Option<f32>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.3}"))
}

fn print_text_summary(summary: &Summary) {
    println!(
        "Terrain: {} {}x{} at scale {}",
        summary.terrain_type, summary.width, summary.height, summary.scale
    );

    for run in &summary.runs {
        let metrics = &run.metrics;
        println!("\n{} (seed {})", run.technique, run.seed);
        println!(
            "  Intersections: {}  Roads: {}  Components: {}",
            metrics.intersection_count, metrics.road_count, metrics.connected_components
        );
        println!(
            "  Total length: {:.1}  Mean road length: {}",
            metrics.total_road_length,
            format_optional(metrics.mean_road_length)
        );
        println!(
            "  Alpha: {}  Gamma: {}  Circuity: {} ({} pairs)",
            format_optional(metrics.alpha),
            format_optional(metrics.gamma),
            format_optional(metrics.circuity),
            metrics.circuity_pairs
        );
        println!(
            "  Average steepness: {} deg",
            format_optional(metrics.average_steepness_deg)
        );
        println!("  Degree distribution: {:?}", metrics.degree_distribution);
        println!(
            "  Angle histogram ({}-degree bins): {:?}",
            metrics.angle_bin_width, metrics.angle_histogram
        );
        println!(
            "  Generation time: {:.4}s  Approx. memory: {} bytes",
            metrics.generation_time_s, metrics.approx_memory_bytes
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_integration() {
        let args = Args::parse_from([
            "netgen",
            "--technique",
            "path-based",
            "--terrain-type",
            "flat",
            "--size",
            "32x32",
            "--seed",
            "12345",
            "--start",
            "1.0,2.0",
            "--format",
            "toml",
        ]);
        assert_eq!(args.technique, TechniqueArg::PathBased);
        assert_eq!(args.format, OutputFormat::Toml);

        let (width, height) = parse_size(&args.size).unwrap();
        let terrain = TerrainBuilder::new(args.terrain_type.clone())
            .seed(Some(12345))
            .build()
            .unwrap()
            .generate(width, height, args.scale)
            .unwrap();

        let mut settings = GenerationSettings::default();
        settings.agent_walk.start = Some(parse_point("1.0,2.0").unwrap());

        let reports = run_techniques(&TechniqueArg::All.kinds(), &settings, &terrain, 12345).unwrap();
        assert_eq!(reports.len(), 3);
        for report in &reports {
            assert!(report.network.intersection_count() >= 1);
        }

        let summary = Summary {
            terrain_type: args.terrain_type,
            width,
            height,
            scale: args.scale,
            runs: reports
                .into_iter()
                .map(|report| RunSummary {
                    technique: report.technique.to_string(),
                    seed: 12345,
                    metrics: report.metrics,
                })
                .collect(),
        };
        let rendered = toml::to_string_pretty(&summary).unwrap();
        assert!(rendered.contains("[[runs]]"));
        assert!(rendered.contains("technique = \"LSystem\""));
    }
}
