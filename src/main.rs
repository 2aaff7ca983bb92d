/// Entry point and frame loop.

mod config;
mod domain;
mod error;
mod sim;
mod ui;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use config::AppConfig;
use domain::maze::Maze;
use error::AppError;
use sim::app::{App, AudioFactory};
use sim::event::MazeEvent;
use ui::audio::{open_output, AudioCompanion};
use ui::client::ClientClass;
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::{maze_footprint, Renderer};

const FRAME_SLEEP: Duration = Duration::from_millis(5);

#[derive(Parser, Debug)]
#[command(version, about = "Guide the farmer through the corn maze", long_about = None)]
struct Args {
    /// Config file (default: search for config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maze text file to play instead of the built-in farm
    #[arg(short, long, value_name = "MAZE_FILE")]
    maze: Option<PathBuf>,

    /// Skip the maze and open the home page
    #[arg(long)]
    compact: bool,

    /// Start with audio disabled
    #[arg(long)]
    mute: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let mut config = AppConfig::load(args.config.as_deref());
    if args.mute {
        config.audio.enabled = false;
    }

    init_tracing(&config);
    if let Some(src) = &config.source {
        info!(path = %src.display(), "config loaded");
    }
    for w in &config.warnings {
        warn!("{w}");
    }

    let maze_path = args.maze.as_deref().or(config.maze_file.as_deref());
    let maze = match load_maze(maze_path) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let (cols, rows) = crossterm::terminal::size().unwrap_or((80, 24));
    let class = ClientClass::classify(cols, rows, maze_footprint(&maze), args.compact, &config.client);

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        let _ = renderer.cleanup();
        eprintln!("{}", AppError::from(e));
        return ExitCode::FAILURE;
    }

    let mut app = App::new(maze, config.timing.clone(), class, audio_factory(&config), Instant::now());
    let result = frame_loop(&mut app, &mut renderer, &config);
    app.shutdown();

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    match result {
        Ok(()) => {
            info!("bye");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Log to a file; the terminal belongs to the renderer.
fn init_tracing(config: &AppConfig) {
    // No log file, no logging.
    let Ok(file) = File::create(&config.log_file) else {
        return;
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

fn load_maze(path: Option<&Path>) -> Result<Maze, AppError> {
    let maze = match path {
        Some(p) => {
            let text = std::fs::read_to_string(p)
                .map_err(|source| AppError::MazeFile { path: p.to_path_buf(), source })?;
            let maze = Maze::parse(&text)?;
            info!(path = %p.display(), "maze file loaded");
            maze
        }
        None => Maze::farm()?,
    };
    info!(width = maze.width(), height = maze.height(), "maze ready");
    Ok(maze)
}

fn audio_factory(config: &AppConfig) -> AudioFactory {
    let audio = config.audio.clone();
    Box::new(move |track| {
        let output = open_output(track, audio.volume, audio.enabled);
        AudioCompanion::new(output, audio.autoplay)
    })
}

fn frame_loop(app: &mut App, renderer: &mut Renderer, config: &AppConfig) -> Result<(), AppError> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new(&config.gamepad);
    if gp.connected {
        info!("gamepad detected");
    }
    let tick_rate = config.timing.tick_rate();
    let mut last_tick = Instant::now();

    loop {
        let now = Instant::now();
        let mut commands = kb.drain_events();
        commands.extend(gp.drain());

        for cmd in commands {
            log_events(&app.handle(cmd, now));
            if app.should_quit() {
                return Ok(());
            }
        }

        if last_tick.elapsed() >= tick_rate {
            log_events(&app.tick(Instant::now()));
            last_tick = Instant::now();
        }

        renderer.render(app, Instant::now())?;
        std::thread::sleep(FRAME_SLEEP);
    }
}

fn log_events(events: &[MazeEvent]) {
    for ev in events {
        match ev {
            MazeEvent::Transition(state) => info!(?state, "transition"),
            MazeEvent::Navigated(route) => info!(%route, "route"),
            other => debug!(event = ?other),
        }
    }
}
