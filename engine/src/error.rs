use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Text that does not name one of the four directions.
    #[error("invalid direction {0:?}, expected one of up, down, left, right")]
    InvalidDirection(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Caller supplied rows that are not square or hold a non-tile value.
    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    #[error("keep playing is only allowed after the win tile was reached")]
    NotWon,
}

pub type Result<T> = std::result::Result<T, EngineError>;
