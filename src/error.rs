use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MazeError {
    #[error("cell ({row}, {col}) is out of bounds")]
    OutOfBounds { row: usize, col: usize },

    #[error("cells are not grid-adjacent")]
    NotAdjacent,

    #[error("not ready: {0}")]
    NotReady(&'static str),

    #[error("cell size step {0} is outside 1..=6")]
    BadCellSize(u32),
}

pub type Result<T> = std::result::Result<T, MazeError>;
