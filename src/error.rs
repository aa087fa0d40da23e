use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read dashboard {path}: {source}")]
    Dashboard {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid dashboard JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Event loop error: {0}")]
    EventLoop(#[from] calloop::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
