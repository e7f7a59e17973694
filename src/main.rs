mod config;
mod food;
mod game;
mod geometry;
mod input;
mod session;
mod snake;
mod term;

use std::{fs::File, path::{Path, PathBuf}, sync::Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use config::GameConfig;
use session::GameSession;

pub type TermInt = u16;
pub type Coords = (u16, u16);

/// Snake with smooth, frame-rate independent movement, played in the terminal.
#[derive(Parser, Debug)]
#[command(name = "snake")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Speed selector, 0 (slowest) to 4 (fastest)
    #[arg(short, long, default_value_t = config::DEFAULT_SPEED_INDEX)]
    speed: usize,

    /// Playfield width in pixels
    #[arg(long, default_value_t = config::DEFAULT_WIDTH)]
    width: f64,

    /// Playfield height in pixels
    #[arg(long, default_value_t = config::DEFAULT_HEIGHT)]
    height: f64,

    /// Side length of one snake segment in pixels
    #[arg(long, default_value_t = config::DEFAULT_PIXEL_WIDTH)]
    pixel_width: f64,

    /// Height of the score bar in pixels
    #[arg(long, default_value_t = config::DEFAULT_HEADER_OFFSET)]
    header_offset: f64,

    /// Target frames per second
    #[arg(long, default_value_t = game::DEFAULT_FPS)]
    fps: u32,

    /// Write logs to this file (the terminal is taken over by the game)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        init_logging(path, &args.log_level)?;
    }

    let config = GameConfig {
        width: args.width,
        height: args.height,
        pixel_width: args.pixel_width,
        header_offset: args.header_offset,
        speed_index: args.speed,
    };

    let session = GameSession::new(config).context("invalid game configuration")?;
    let mut game = game::SnakeGame::new(session, args.fps)?;

    // The game loop restores the terminal before returning, error or not
    game.play()
}

fn init_logging(path: &Path, level: &str) -> Result<()> {
    let file = File::create(path).with_context(|| format!("could not create log file {:?}", path))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    tracing::info!("snake v{}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
