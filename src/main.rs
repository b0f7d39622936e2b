use std::error::Error;
use std::path::PathBuf;

use chrono::Local;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use seeded_world::ascii::{self, AsciiMode};
use seeded_world::{
    FileStore, GenerationParams, MapGenerator, MapStatistics, Movement, RegionKey, SaveStore, WorldConfig,
    WorldState,
};

#[derive(Parser, Debug)]
#[command(name = "seeded_world")]
#[command(about = "Generate and explore seeded two-tier worlds")]
struct Args {
    /// World width in tiles
    #[arg(short = 'W', long, default_value = "128")]
    width: usize,

    /// World height in tiles
    #[arg(short = 'H', long, default_value = "128")]
    height: usize,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// JSON file with generation parameters (missing fields keep defaults)
    #[arg(long)]
    params: Option<PathBuf>,

    /// Directory holding saved sessions
    #[arg(long, default_value = "saves/games")]
    saves: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the world map as ASCII
    Map {
        /// Show column and row numbers
        #[arg(long)]
        coords: bool,
        /// Also print the legend
        #[arg(long)]
        legend: bool,
        /// Write map, legend and statistics to a text file instead
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Print terrain and temperature statistics of the world map
    Stats {
        /// Emit JSON instead of a text report
        #[arg(long)]
        json: bool,
    },
    /// Print the local map of the region containing a world coordinate
    Local {
        #[arg(long, allow_hyphen_values = true)]
        x: i32,
        #[arg(long, allow_hyphen_values = true)]
        y: i32,
        /// Show height digits instead of terrain symbols
        #[arg(long)]
        heights: bool,
        /// Show column and row numbers
        #[arg(long)]
        coords: bool,
    },
    /// Spawn a player and apply moves ("up", "down", "left", "right" or "dx,dy")
    Walk {
        #[arg(allow_hyphen_values = true)]
        moves: Vec<String>,
        /// Save the session afterwards under this name
        #[arg(long)]
        session: Option<String>,
    },
    /// Spawn a player and save a new session
    Save {
        /// Session name (defaults to a timestamp)
        #[arg(long)]
        session: Option<String>,
    },
    /// Load a saved session and describe the player's surroundings
    Load {
        session: String,
        /// Radius of the surroundings view
        #[arg(long, default_value = "5")]
        radius: u32,
    },
    /// List saved sessions
    Sessions,
}

fn default_session_name() -> String {
    Local::now().format("session_%Y%m%d_%H%M%S").to_string()
}

fn new_state(seed: u64, session: String, config: WorldConfig, params: GenerationParams) -> WorldState {
    let mut state = WorldState::with_config(seed, session, config, params);
    let placement = state.generate();
    let (x, y) = state.position();
    println!("Seed {} | {}x{} | spawn ({}, {}) via {}", seed, config.width, config.height, x, y, placement);
    state
}

fn describe(state: &WorldState, radius: u32) {
    if let Some(info) = state.current_terrain_info() {
        println!(
            "Position ({}, {}): {} | height {:.2} | temperature {:.2} ({})",
            info.position.0,
            info.position.1,
            info.name,
            info.height,
            info.temperature,
            info.temperature_category.name()
        );
    }
    if let Some(map) = state.world_map() {
        let (x, y) = state.position();
        println!("{}", ascii::render_surroundings(map, x, y, radius));
    }
    let blocked: Vec<String> = state
        .nearby_terrain_info(1)
        .iter()
        .filter(|t| !t.walkable)
        .map(|t| format!("({:+},{:+}) {}", t.dx, t.dy, t.name))
        .collect();
    if !blocked.is_empty() {
        println!("Blocked nearby: {}", blocked.join(", "));
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let seed = args.seed.unwrap_or_else(rand::random);
    let params = match &args.params {
        Some(path) => GenerationParams::from_json_file(path)?,
        None => GenerationParams::default(),
    };
    let config = WorldConfig {
        width: args.width,
        height: args.height,
    };
    let store = FileStore::new(&args.saves);

    match args.command {
        Command::Map { coords, legend, export } => {
            let map = MapGenerator::with_params(seed, params).generate_world_map(config.width, config.height);
            match export {
                Some(path) => {
                    ascii::export_world_file(&map, &path)?;
                    println!("Exported world to {}", path.display());
                }
                None => {
                    println!("{}", ascii::render_world_map(&map, coords));
                    if legend {
                        println!("{}", ascii::legend());
                    }
                }
            }
        }
        Command::Stats { json } => {
            let map = MapGenerator::with_params(seed, params).generate_world_map(config.width, config.height);
            let stats = MapStatistics::collect(map.tiles());
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("Seed: {}", seed);
                println!("{}", stats.summary());
            }
        }
        Command::Local { x, y, heights, coords } => {
            let region = RegionKey::containing(x, y);
            let local = MapGenerator::with_params(seed, params).generate_region(region);
            let mode = if heights { AsciiMode::Height } else { AsciiMode::Terrain };
            println!("Seed {} | {}", seed, region);
            println!("{}", ascii::render_local_map(&local, coords, mode));
        }
        Command::Walk { moves, session } => {
            let name = session.clone().unwrap_or_else(default_session_name);
            let mut state = new_state(seed, name, config, params);
            for step in &moves {
                let result = Movement::parse(step).and_then(|movement| state.try_move(movement));
                match result {
                    Ok(outcome) if outcome.region_changed => println!(
                        "{:>8} -> ({}, {}) entering {}",
                        step,
                        outcome.position.0,
                        outcome.position.1,
                        RegionKey::containing(outcome.position.0, outcome.position.1)
                    ),
                    Ok(outcome) => println!("{:>8} -> ({}, {})", step, outcome.position.0, outcome.position.1),
                    Err(e) => println!("{:>8} rejected: {}", step, e),
                }
            }
            describe(&state, 3);
            println!("Cache: {}", state.cache().stats().summary());
            if session.is_some() {
                state.save_game(&store)?;
                println!("Saved session '{}'", state.session_id());
            }
        }
        Command::Save { session } => {
            let name = session.unwrap_or_else(default_session_name);
            let state = new_state(seed, name, config, params);
            state.save_game(&store)?;
            println!("Saved session '{}' to {}", state.session_id(), store.base_dir().display());
        }
        Command::Load { session, radius } => {
            let mut state = WorldState::with_config(seed, session.clone(), config, params);
            state.load_session(&store, &session)?;
            println!("Loaded session '{}' (seed {})", state.session_id(), state.seed());
            describe(&state, radius);
        }
        Command::Sessions => {
            let sessions = store.list_sessions()?;
            if sessions.is_empty() {
                println!("No saved sessions in {}", store.base_dir().display());
            }
            for name in sessions {
                println!("{}", name);
            }
        }
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
