use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Dividend out of range")]
    DividendOutOfRange,
    #[error("Divisor out of range")]
    DivisorOutOfRange,
    #[error("Game already ended, no new shots are accepted")]
    AlreadyEnded,
}

pub type Result<T> = core::result::Result<T, GameError>;
