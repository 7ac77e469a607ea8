use thiserror::Error;

use crate::{CellCount, DefinitionError};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("Board must have at least one row and one column")]
    InvalidSize,
    #[error("Expected {expected} card values but got {actual}")]
    CardCountMismatch { expected: CellCount, actual: usize },
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Invalid board definition: {0}")]
    Definition(#[from] DefinitionError),
}

pub type Result<T> = core::result::Result<T, BoardError>;
