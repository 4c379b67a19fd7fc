mod app;
mod config;
mod error;
mod field;
mod food;
mod game;
mod high_score;
mod logger;
mod snake;
mod term;

use std::path::{Path, PathBuf};

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{load_config, save_config, ConfigError, Validate};
use crate::error::SnakeError;
use crate::game::Level;
use crate::high_score::HighScoreStore;

#[derive(Parser)]
#[command(name = "torus-snake", about = "Snake on a wrap-around field, in the terminal")]
struct Args {
    /// YAML config file; defaults are used when it does not exist
    #[arg(long, default_value = "snake.yaml")]
    config: PathBuf,

    #[arg(long, value_enum)]
    level: Option<Level>,

    /// Player name used for the high-score table
    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    grid_size: Option<u16>,

    /// Seed for food placement and the starting heading
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    log_file: Option<String>,

    /// Write the effective config to the config path and exit
    #[arg(long)]
    write_config: bool,

    /// Print the high-score table and exit
    #[arg(long)]
    scores: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = load_config(&args.config)?;
    if let Some(level) = args.level {
        config.level = level;
    }
    if let Some(name) = args.name {
        config.player_name = name;
    }
    if let Some(grid_size) = args.grid_size {
        config.grid_size = grid_size;
    }
    if let Some(log_file) = args.log_file {
        config.log_file = Some(log_file);
    }
    config.validate().map_err(ConfigError::Invalid)?;

    if args.write_config {
        save_config(&args.config, &config)?;
        println!("Config written to {}", args.config.display());
        return Ok(());
    }

    if let Some(log_file) = &config.log_file {
        logger::init_logger(Path::new(log_file)).map_err(SnakeError::Logger)?;
    }

    let store = HighScoreStore::open(&config.high_score_file)?;

    if args.scores {
        for entry in store.highest_scores(config.high_score_limit) {
            println!("{}", entry);
        }
        return Ok(());
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    log!("Starting with seed {}", seed);

    let mut app = app::SnakeApp::new(config, store, StdRng::seed_from_u64(seed))?;
    app.initialize()?;

    let result = run(&mut app);
    if let Err(e) = &result {
        // Leave the terminal usable before reporting
        app.restore_terminal();
        log!("Exiting on error: {}", e);
    }

    result?;
    Ok(())
}

fn run(app: &mut app::SnakeApp) -> Result<(), SnakeError> {
    app.show_intro()?;

    loop {
        // The main game loop takes care of exiting cleanly on CTRL+C
        app.play()?;
    }
}
