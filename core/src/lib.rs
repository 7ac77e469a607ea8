use core::fmt;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use card::*;
pub use dealer::*;
pub use definition::*;
pub use engine::*;
pub use error::*;
pub use types::*;
pub use view::*;

mod board;
mod card;
mod dealer;
mod definition;
mod engine;
mod error;
mod types;
mod view;

/// How a board is built: its size and, optionally, the seed of the shuffle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub size: Coord2,
    pub seed: Option<u64>,
}

impl BoardConfig {
    pub const fn new(size: Coord2) -> Self {
        Self { size, seed: None }
    }

    pub const fn with_seed(self, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..self
        }
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub fn validate(&self) -> Result<()> {
        if self.size.0 == 0 || self.size.1 == 0 {
            Err(BoardError::InvalidSize)
        } else {
            Ok(())
        }
    }

    pub fn dealer(&self) -> RandomDealer {
        match self.seed {
            Some(seed) => RandomDealer::new(seed),
            None => RandomDealer::from_entropy(),
        }
    }
}

/// Card values placed on the grid, before any card has been flipped.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardLayout {
    values: Array2<String>,
}

impl CardLayout {
    /// Arranges `values` with `dealer` and fills a `size` grid row-major.
    pub fn deal(size: Coord2, mut values: Vec<String>, dealer: impl CardDealer) -> Result<Self> {
        let config = BoardConfig::new(size);
        config.validate()?;

        let expected = config.total_cells();
        if values.len() != usize::from(expected) {
            return Err(BoardError::CardCountMismatch {
                expected,
                actual: values.len(),
            });
        }

        dealer.arrange(&mut values);
        let values = Array2::from_shape_vec((usize::from(size.0), usize::from(size.1)), values)
            .map_err(|_| BoardError::InvalidBoardShape)?;

        let layout = Self { values };
        if layout.values.grid_size() != Some(size) {
            return Err(BoardError::InvalidBoardShape);
        }
        Ok(layout)
    }

    pub fn size(&self) -> Coord2 {
        self.values.grid_size().unwrap_or((0, 0))
    }

    pub fn value_at(&self, coords: Coord2) -> &str {
        &self[coords]
    }

    pub(crate) fn into_values(self) -> Array2<String> {
        self.values
    }
}

impl Index<Coord2> for CardLayout {
    type Output = String;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.values[coords.to_nd_index()]
    }
}

/// Result of a single flip request.
///
/// Rejections are ordinary outcomes, not errors: the player simply keeps
/// playing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlipOutcome {
    Flipped,
    Matched,
    Mismatched,
    OutOfBounds(Axis),
    CannotFlip,
}

impl FlipOutcome {
    pub const fn is_success(self) -> bool {
        use FlipOutcome::*;
        match self {
            Flipped | Matched | Mismatched => true,
            OutOfBounds(_) | CannotFlip => false,
        }
    }

    pub const fn message(self) -> &'static str {
        use FlipOutcome::*;
        match self {
            Flipped => "Card flipped",
            Matched => "Match!",
            Mismatched => "Not a match.",
            OutOfBounds(Axis::Row) => "Invalid row",
            OutOfBounds(Axis::Col) => "Invalid column",
            CannotFlip => "Cannot flip",
        }
    }
}

impl fmt::Display for FlipOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
