//! Error type shared by configuration, spawning and the search coordinator.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GuessError {
    #[error("target {0} is outside the search domain 1..={}", i64::MAX)]
    InvalidTarget(i64),

    #[error("at least one worker is required")]
    NoWorkers,

    #[error("unsupported lane width {0} (expected 1, 2, 4 or 8)")]
    UnsupportedLaneWidth(usize),

    #[error("reporting interval must be at least one millisecond")]
    InvalidInterval,

    #[error("failed to spawn search worker: {0}")]
    Spawn(std::io::Error),

    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),

    #[error("search worker {0} panicked")]
    WorkerPanicked(usize),

    #[error("every worker reached the top of the domain without a match")]
    Exhausted,
}

pub type Result<T> = std::result::Result<T, GuessError>;
