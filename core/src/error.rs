use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Coordinates outside the board")]
    OutOfBounds,
    #[error("Operation not allowed for the cell's current state")]
    InvalidOperation,
    #[error("Invalid board configuration")]
    InvalidConfiguration,
}

pub type Result<T> = core::result::Result<T, GameError>;
