//! YetAnotherDungeonCrawler
//!
//! Headless front end: generate levels, show search routes, and run the
//! enemy chase loop from the command line.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use strum::IntoEnumIterator;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use yadc_core::nav::{SearchReport, path_cost};
use yadc_core::{Algorithm, Dungeon, DungeonConfig, GameRng, GameSession, NavGrid, Pos};

/// Dungeon generator and pathfinding playground
#[derive(Parser, Debug)]
#[command(name = "yadc")]
#[command(
    author,
    version,
    about = "YetAnotherDungeonCrawler - dig a level, then get chased through it",
    long_about = None
)]
struct Args {
    /// RNG seed (random if omitted)
    #[arg(short = 's', long = "seed", global = true)]
    seed: Option<u64>,

    /// Map width in cells
    #[arg(short = 'W', long = "width", global = true)]
    width: Option<i32>,

    /// Map height in cells
    #[arg(short = 'H', long = "height", global = true)]
    height: Option<i32>,

    /// JSON config file; flags above override it
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a level and print it
    Generate,

    /// Search a route and draw it over the level
    Path {
        /// bfs, dfs, dijkstra, best-first or a-star
        #[arg(short = 'a', long = "algorithm", default_value = "a-star")]
        algorithm: Algorithm,

        /// Start cell as `x,y` (defaults to the spawn point)
        #[arg(long = "from", value_parser = parse_pos)]
        from: Option<Pos>,

        /// Goal cell as `x,y` (defaults to the ladder)
        #[arg(long = "to", value_parser = parse_pos)]
        to: Option<Pos>,

        /// Run every algorithm and compare them
        #[arg(long = "all")]
        all: bool,
    },

    /// Let the enemies chase a player standing on the spawn point
    Chase {
        /// Number of ticks to run
        #[arg(short = 't', long = "ticks", default_value_t = 10)]
        ticks: u32,
    },
}

fn parse_pos(s: &str) -> Result<Pos, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y, got {s:?}"))?;
    let x = x.trim().parse().map_err(|e| format!("bad x in {s:?}: {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad y in {s:?}: {e}"))?;
    Ok(Pos::new(x, y))
}

fn init_tracing() {
    // logs go to stderr so the map on stdout stays clean
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}

fn build_config(args: &Args) -> Result<DungeonConfig> {
    let mut config = match &args.config {
        Some(path) => DungeonConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => DungeonConfig::default(),
    };
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    // pin a seed so the run can be reproduced from the log
    if config.seed.is_none() {
        config.seed = Some(GameRng::from_entropy().seed());
    }
    config.validate().context("invalid configuration")?;
    debug!(?config, "configuration ready");
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    let config = build_config(&args)?;
    info!(seed = ?config.seed, width = config.width, height = config.height, "starting");

    match args.command {
        Command::Generate => generate(&config),
        Command::Path {
            algorithm,
            from,
            to,
            all,
        } => show_path(&config, algorithm, from, to, all),
        Command::Chase { ticks } => chase(config, ticks),
    }
}

fn generate(config: &DungeonConfig) -> Result<()> {
    let dungeon = Dungeon::generate(config, &mut config.rng())?;
    println!("{}", dungeon.render());
    println!(
        "rooms: {}  hallways: {}  ladder: {}",
        dungeon.rooms().len(),
        dungeon.hallways().len(),
        dungeon
            .ladder_position()
            .map_or_else(|| "none".to_string(), |p| p.to_string()),
    );
    Ok(())
}

fn show_path(
    config: &DungeonConfig,
    algorithm: Algorithm,
    from: Option<Pos>,
    to: Option<Pos>,
    all: bool,
) -> Result<()> {
    let dungeon = Dungeon::generate(config, &mut config.rng())?;
    let grid = NavGrid::from_dungeon(&dungeon).with_cost_reads(config.cost_reads);

    let start = match from.or_else(|| dungeon.spawn_point()) {
        Some(pos) => pos,
        None => bail!("level has no spawn point"),
    };
    let goal = match to.or_else(|| dungeon.ladder_position()) {
        Some(pos) => pos,
        None => bail!("level has no ladder"),
    };
    for (name, pos) in [("start", start), ("goal", goal)] {
        if !dungeon.in_bounds(pos) {
            bail!("{name} {pos} is outside the {}x{} map", dungeon.width(), dungeon.height());
        }
    }

    let algorithms: Vec<Algorithm> = if all {
        Algorithm::iter().collect()
    } else {
        vec![algorithm]
    };

    for algorithm in algorithms {
        // each search gets its own copy so consume-once overrides start fresh
        let grid = grid.clone();
        let report = algorithm.explore(&grid, start, goal);
        println!("== {algorithm} [{}] ({start} -> {goal}) ==", traits(algorithm));
        match report.path(start, goal) {
            Ok(path) => {
                println!("{}", dungeon.render_with_path(&path));
                println!(
                    "steps: {}  cost: {}  expanded: {}",
                    path.len() - 1,
                    route_cost(&report, &grid, &path),
                    report.expanded
                );
            }
            Err(err) => println!("no route: {err} (expanded: {})", report.expanded),
        }
    }
    Ok(())
}

/// Cost of a found route. Searches that read step costs already hold the
/// total; on a consume-once grid a second read would see spent overrides.
fn route_cost(report: &SearchReport, grid: &NavGrid, path: &[Pos]) -> u32 {
    let known = path
        .last()
        .filter(|_| report.algorithm.uses_cost())
        .and_then(|goal| report.cost_so_far.get(goal));
    match known {
        Some(&cost) => cost,
        None => path_cost(grid, path),
    }
}

/// What kind of search this is, for the report header
fn traits(algorithm: Algorithm) -> String {
    let mut tags = Vec::with_capacity(3);
    if algorithm.uses_cost() {
        tags.push("weighted");
    }
    if algorithm.uses_heuristic() {
        tags.push("heuristic");
    }
    tags.push(if algorithm.is_optimal() {
        "optimal"
    } else {
        "any route"
    });
    tags.join(", ")
}

fn chase(config: DungeonConfig, ticks: u32) -> Result<()> {
    let mut session = GameSession::new(config)?;
    let tile_size = session.config().tile_size;
    println!("{}", session.dungeon().render());
    for (i, enemy) in session.enemies().iter().enumerate() {
        println!(
            "enemy {i}: {} at {}",
            enemy.strategy(),
            enemy.cell(tile_size)
        );
    }

    for tick in 1..=ticks {
        let report = session.tick()?;
        for (i, (action, enemy)) in report.actions.iter().zip(session.enemies()).enumerate() {
            println!(
                "tick {tick:>3} enemy {i}: {action:?} now at {}",
                enemy.cell(tile_size)
            );
        }
        if report.descended {
            println!("player reached the ladder, now on level {}", session.depth());
        }
    }
    Ok(())
}
