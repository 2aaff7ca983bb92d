/// Startup failures. Everything after startup is recoverable and only logged.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::domain::maze::MazeError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
    #[error("could not read maze file {}: {source}", path.display())]
    MazeFile { path: PathBuf, source: io::Error },
    #[error("invalid maze: {0}")]
    Maze(#[from] MazeError),
}
