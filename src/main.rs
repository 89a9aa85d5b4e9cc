use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::debug;
use serde::Serialize;

use cave_generator::ascii::{self, RenderStyle};
use cave_generator::config::LevelConfig;
use cave_generator::excavation::{ExcavationParams, LevelPreset};
use cave_generator::grid::Coord;
use cave_generator::pathfinding;
use cave_generator::seeds;
use cave_generator::selection::{self, Selection, SelectionStats};
use cave_generator::LevelError;

#[derive(Parser, Debug)]
#[command(name = "cave_generator")]
#[command(about = "Generate drunken-walk caves and keep the one with the longest solution")]
struct Args {
    /// JSON configuration file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base parameter set
    #[arg(long, value_enum)]
    preset: Option<LevelPreset>,

    /// Width of the grid in cells
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Height of the grid in cells
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Wall cells to remove per cave
    #[arg(short, long)]
    budget: Option<usize>,

    /// Margin along the edges the walker may not enter
    #[arg(short, long)]
    padding: Option<usize>,

    /// Number of caves to generate
    #[arg(short = 'n', long)]
    candidates: Option<usize>,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Generate candidates in parallel
    #[arg(long)]
    parallel: bool,

    /// Glyphs used to print the cave
    #[arg(long, value_enum)]
    style: Option<RenderStyle>,

    /// Mark start, end and the solution route
    #[arg(long)]
    show_path: bool,

    /// Print the selected level as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Also write the level and its solution to a text file
    #[arg(short, long)]
    output: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// JSON view of a selected level
#[derive(Serialize)]
struct LevelReport<'a> {
    seed: u64,
    params: ExcavationParams,
    candidate: usize,
    start: Coord,
    end: Coord,
    score: usize,
    farthest: Option<(Coord, usize)>,
    rows: Vec<String>,
    path: &'a [Coord],
    stats: &'a SelectionStats,
}

fn merge_config(args: &Args) -> Result<LevelConfig, LevelError> {
    let mut config = match &args.config {
        Some(path) => LevelConfig::load(path)?,
        None => LevelConfig::default(),
    };

    if let Some(preset) = args.preset {
        config.preset = preset;
    }
    if args.width.is_some() {
        config.width = args.width;
    }
    if args.height.is_some() {
        config.height = args.height;
    }
    if args.budget.is_some() {
        config.removal_budget = args.budget;
    }
    if args.padding.is_some() {
        config.padding = args.padding;
    }
    if let Some(candidates) = args.candidates {
        config.candidates = candidates;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(style) = args.style {
        config.style = style;
    }
    config.parallel |= args.parallel;

    Ok(config)
}

fn run(args: &Args) -> Result<(), LevelError> {
    let config = merge_config(args)?;
    debug!("Configuration: {:?}", config);

    let params = config.excavation_params();
    let seed = seeds::resolve_master(config.seed);

    let outcome: Selection = if config.parallel {
        selection::select_best_parallel(config.candidates, &params, seed)?
    } else {
        let mut rng = seeds::master_rng(seed);
        selection::select_best_scored(config.candidates, &params, &mut rng)?
    };

    let best = &outcome.best;
    let farthest =
        pathfinding::distance_map(&best.candidate.grid, best.candidate.start)?.farthest();

    if args.json {
        let report = LevelReport {
            seed,
            params,
            candidate: best.index,
            start: best.candidate.start,
            end: best.candidate.end,
            score: best.score(),
            farthest,
            rows: ascii::row_strings(&best.candidate.grid, config.style),
            path: best.path.coords(),
            stats: &outcome.stats,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let stats = &outcome.stats;
        println!("Generating caves with seed: {}", seed);
        println!(
            "Map size: {}x{}, budget {}, padding {}",
            params.width, params.height, params.removal_budget, params.padding
        );
        println!(
            "Evaluated {} candidates: scores {}..{} (mean {:.1}), {} unreachable",
            stats.candidates, stats.min_score, stats.max_score, stats.mean_score, stats.unreachable
        );
        println!(
            "Selected candidate {}: start {} end {} solution length {}",
            best.index,
            best.candidate.start,
            best.candidate.end,
            best.score()
        );
        if let Some((coord, dist)) = farthest {
            println!("Farthest floor cell from start: {} ({} steps)", coord, dist);
        }
        println!();
        ascii::print_level(&best.candidate, Some(&best.path), config.style, args.show_path);
    }

    if let Some(path) = &args.output {
        ascii::export_level_file(&best.candidate, &best.path, config.style, seed, path)?;
        if !args.json {
            println!("Level written to {}", path);
        }
    }

    Ok(())
}

fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
