mod error;
mod report;

use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use zm_core::ZoneId;
use zm_project::{MazeConfig, ScopeDef, ScoreDef, generate, load};
use zm_score::{Amount, Scope, ScoreEngine, ScoreKind, SolutionBuilder, SpreadLocations};
use zm_zones::ZonedMaze;

use crate::error::{CliError, CliResult};
use crate::report::{MazeReport, SolutionReport, render_ascii, score_rows, spread_rows};

#[derive(Parser)]
#[command(name = "zm-cli")]
#[command(about = "Zoned maze CLI - grow, score and place over zoned mazes", long_about = None)]
struct Cli {
    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a maze file
    Validate {
        /// Path to the maze YAML or JSON file
        config: PathBuf,
    },
    /// Grow the maze and print its zones
    Generate {
        config: PathBuf,
        /// Override the file's seed
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Grow the maze and print per-node scores
    Score {
        config: PathBuf,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Build the key-gated solution path
    Solve {
        config: PathBuf,
        #[arg(long)]
        seed: Option<u64>,
        /// Score used to pick each zone's key location
        #[arg(long, value_enum)]
        score: Option<ScoreArg>,
        /// Zone visit order, e.g. 0,2,1
        #[arg(long, value_delimiter = ',')]
        order: Option<Vec<u32>>,
    },
    /// Spread locations over the maze
    Spread {
        config: PathBuf,
        #[arg(long)]
        seed: Option<u64>,
        /// Number of locations
        #[arg(long, conflicts_with = "ratio")]
        count: Option<usize>,
        /// Fraction of each region's nodes
        #[arg(long)]
        ratio: Option<f64>,
        #[arg(long, value_enum)]
        scope: Option<ScopeArg>,
        #[arg(long, value_enum)]
        score: Option<ScoreArg>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ScoreArg {
    Entry,
    Exit,
    DeadEnd,
    Combined,
}

impl From<ScoreArg> for ScoreKind {
    fn from(arg: ScoreArg) -> Self {
        match arg {
            ScoreArg::Entry => ScoreKind::Entry,
            ScoreArg::Exit => ScoreKind::Exit,
            ScoreArg::DeadEnd => ScoreKind::DeadEnd,
            ScoreArg::Combined => ScoreKind::Combined,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ScopeArg {
    Global,
    Zone,
    Part,
}

impl From<ScopeArg> for Scope {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::Global => Scope::Global,
            ScopeArg::Zone => Scope::PerZone,
            ScopeArg::Part => Scope::PerPart,
        }
    }
}

fn score_kind(def: ScoreDef) -> ScoreKind {
    match def {
        ScoreDef::DeadEnd => ScoreKind::DeadEnd,
        ScoreDef::Entry => ScoreKind::Entry,
        ScoreDef::Exit => ScoreKind::Exit,
        ScoreDef::Combined => ScoreKind::Combined,
    }
}

fn scope_of(def: ScopeDef) -> Scope {
    match def {
        ScopeDef::Global => Scope::Global,
        ScopeDef::Zone => Scope::PerZone,
        ScopeDef::Part => Scope::PerPart,
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let json = cli.json;

    match cli.command {
        Commands::Validate { config } => cmd_validate(&config, json),
        Commands::Generate { config, seed } => cmd_generate(&config, seed, json),
        Commands::Score { config, seed } => cmd_score(&config, seed, json),
        Commands::Solve {
            config,
            seed,
            score,
            order,
        } => cmd_solve(&config, seed, score, order, json),
        Commands::Spread {
            config,
            seed,
            count,
            ratio,
            scope,
            score,
        } => cmd_spread(&config, seed, count, ratio, scope, score, json),
    }
}

fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn grow(path: &Path, seed: Option<u64>) -> CliResult<(MazeConfig, ZonedMaze, u64)> {
    let config = load(path)?;
    let seed = seed.unwrap_or(config.seed);
    info!(path = %path.display(), seed, "loaded maze file");
    let maze = generate(&config, Some(seed))?;
    Ok((config, maze, seed))
}

fn cmd_validate(path: &Path, json: bool) -> CliResult<()> {
    // Loading validates.
    let config = load(path)?;
    if json {
        #[derive(Serialize)]
        struct Valid<'a> {
            name: &'a str,
            zones: usize,
            valid: bool,
        }
        return print_json(&Valid {
            name: &config.name,
            zones: config.zones.len(),
            valid: true,
        });
    }
    println!("Validating maze file: {}", path.display());
    println!("✓ '{}' is valid ({} zones)", config.name, config.zones.len());
    Ok(())
}

fn cmd_generate(path: &Path, seed: Option<u64>, json: bool) -> CliResult<()> {
    let (config, maze, seed) = grow(path, seed)?;
    let report = MazeReport::new(&config.name, seed, &maze);
    if json {
        return print_json(&report);
    }

    println!("✓ Grew '{}' with seed {}: {} nodes", report.name, seed, report.nodes);
    for zone in &report.zones {
        println!(
            "  zone {}: {} nodes, {} parts, {} doors out, {} open",
            zone.zone,
            zone.nodes,
            zone.parts.len(),
            zone.doors_out,
            zone.open_nodes
        );
    }
    println!();
    print!("{}", render_ascii(&maze, &[]));
    Ok(())
}

fn cmd_score(path: &Path, seed: Option<u64>, json: bool) -> CliResult<()> {
    let (_, maze, _) = grow(path, seed)?;
    let scores = ScoreEngine::compute_scores(&maze);
    let rows = score_rows(&maze, &scores);
    if json {
        return print_json(&rows);
    }

    println!(
        "{:>5} {:>9} {:>4} {:>4} {:>8} {:>6} {:>6} {:>5}",
        "node", "pos", "zone", "part", "dead_end", "entry", "exit", "paths"
    );
    for r in rows {
        let paths = format!(
            "{}{}",
            if r.entry_path { "E" } else { "-" },
            if r.exit_path { "X" } else { "-" }
        );
        println!(
            "{:>5} {:>9} {:>4} {:>4} {:>8.3} {:>6.3} {:>6.3} {:>5}",
            r.node.to_string(),
            r.position.to_string(),
            r.zone.to_string(),
            r.part.to_string(),
            r.dead_end,
            r.entry,
            r.exit,
            paths
        );
    }
    Ok(())
}

fn cmd_solve(
    path: &Path,
    seed: Option<u64>,
    score: Option<ScoreArg>,
    order: Option<Vec<u32>>,
    json: bool,
) -> CliResult<()> {
    let (config, maze, _) = grow(path, seed)?;
    let kind = match score {
        Some(arg) => ScoreKind::from(arg),
        None => score_kind(config.placement.map(|p| p.keys_score).unwrap_or_default()),
    };

    let mut scores = ScoreEngine::compute_scores(&maze);
    let mut builder = SolutionBuilder::new(&maze);
    if let Some(order) = order {
        builder = builder.visit_order(parse_order(&order, maze.zones().len())?);
    }
    let solution = builder.build(&mut scores, |s| kind.value(s))?;
    let report = SolutionReport::new(&maze, &solution);
    if json {
        return print_json(&report);
    }

    println!("✓ Solution through {} zones", report.stops.len());
    for stop in &report.stops {
        println!("  zone {} key at {}", stop.zone, stop.position);
    }
    println!("  Path length: {} ({} unconstrained)", report.path_length, report.shortest_length);
    println!("  Redundancy: {:.3}", report.redundancy);
    println!("  Concentration: {:.3}", report.concentration_index);
    println!("  Detour ratio: {:.3}", report.detour_ratio);
    let keys: Vec<_> = solution.stops.iter().map(|s| s.node).collect();
    println!();
    print!("{}", render_ascii(&maze, &keys));
    Ok(())
}

fn cmd_spread(
    path: &Path,
    seed: Option<u64>,
    count: Option<usize>,
    ratio: Option<f64>,
    scope: Option<ScopeArg>,
    score: Option<ScoreArg>,
    json: bool,
) -> CliResult<()> {
    let (config, maze, _) = grow(path, seed)?;
    let treasures = config.placement.as_ref().and_then(|p| p.treasures.clone());

    let amount = match (count, ratio, &treasures) {
        (Some(n), _, _) => Amount::Count(n),
        (None, Some(r), _) => Amount::Ratio(r),
        (None, None, Some(t)) => match (t.count, t.ratio) {
            (Some(n), _) => Amount::Count(n.max(0) as usize),
            (None, Some(r)) => Amount::Ratio(r),
            (None, None) => return Err(missing_amount()),
        },
        (None, None, None) => return Err(missing_amount()),
    };
    let scope = match (scope, &treasures) {
        (Some(arg), _) => Scope::from(arg),
        (None, Some(t)) => scope_of(t.scope),
        (None, None) => Scope::Global,
    };
    let kind = match (score, &treasures) {
        (Some(arg), _) => ScoreKind::from(arg),
        (None, Some(t)) => score_kind(t.score),
        (None, None) => ScoreKind::Combined,
    };

    debug!(?amount, ?scope, ?kind, "spreading locations");
    let scores = ScoreEngine::compute_scores(&maze);
    let spreads = SpreadLocations::new(&maze, &scores).place(scope, amount, |s| kind.value(s))?;
    let rows = spread_rows(&maze, &spreads);
    if json {
        return print_json(&rows);
    }

    for row in &rows {
        let cells: Vec<String> = row.nodes.iter().map(|p| p.to_string()).collect();
        println!(
            "{}: {} placed (min distance {}): {}",
            row.region,
            row.nodes.len(),
            row.min_distance,
            cells.join(" ")
        );
    }
    let placed: Vec<_> = spreads
        .iter()
        .flat_map(|s| s.result.nodes.iter().copied())
        .collect();
    println!();
    print!("{}", render_ascii(&maze, &placed));
    Ok(())
}

/// Turn `--order` indices into zone ids, rejecting zones the maze does not have.
fn parse_order(order: &[u32], zones: usize) -> CliResult<Vec<ZoneId>> {
    order
        .iter()
        .map(|&index| {
            ZoneId::try_from_index(index)
                .filter(|z| z.slot() < zones)
                .ok_or_else(|| {
                    CliError::InvalidArg(format!(
                        "--order: zone {index} does not exist (maze has {zones} zones)"
                    ))
                })
        })
        .collect()
}

fn missing_amount() -> CliError {
    CliError::InvalidArg("give --count or --ratio, or set placement.treasures".to_string())
}
