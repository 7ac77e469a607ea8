use core::fmt;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// State of a card as reported to a viewer, which may differ from its true
/// state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardFace {
    FaceDown,
    Revealed,
    Matched,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    pub value: Option<String>,
    pub state: CardFace,
    pub controller: Option<PlayerId>,
}

impl CardView {
    pub const fn hidden() -> Self {
        Self {
            value: None,
            state: CardFace::FaceDown,
            controller: None,
        }
    }

    fn shown(card: &Card) -> Self {
        let state = match card.state {
            CardState::FaceDown => return Self::hidden(),
            CardState::Revealed(_) => CardFace::Revealed,
            CardState::Matched => CardFace::Matched,
        };
        Self {
            value: Some(card.value.clone()),
            state,
            controller: card.state.controller().map(str::to_owned),
        }
    }
}

/// Projection of the board for one viewer, or for a spectator when `viewer`
/// is `None`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardView {
    pub size: Coord2,
    pub viewer: Option<PlayerId>,
    pub cards: Array2<CardView>,
}

impl BoardView {
    /// What `player` may see: matched cards and their own face-up cards.
    ///
    /// A card someone else holds face-up is reported exactly like a
    /// face-down one.
    pub fn for_player(engine: &MatchEngine, player: &str) -> Self {
        Self::project(engine, Some(player), |card| match &card.state {
            CardState::Matched => CardView::shown(card),
            CardState::Revealed(controller) if controller == player => CardView::shown(card),
            CardState::Revealed(_) | CardState::FaceDown => CardView::hidden(),
        })
    }

    /// Every face-up and matched card in its true state.
    pub fn spectator(engine: &MatchEngine) -> Self {
        Self::project(engine, None, CardView::shown)
    }

    fn project(
        engine: &MatchEngine,
        viewer: Option<&str>,
        mut project_card: impl FnMut(&Card) -> CardView,
    ) -> Self {
        let size = engine.size();
        let mut cards = Array2::from_elem(size.to_nd_index(), CardView::hidden());
        for (coords, card) in engine.iter_cards() {
            cards[coords.to_nd_index()] = project_card(card);
        }

        Self {
            size,
            viewer: viewer.map(str::to_owned),
            cards,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.cards.grid_size() == Some(self.size) {
            Ok(())
        } else {
            Err(BoardError::InvalidBoardShape)
        }
    }

    /// Card at 1-based `(row, col)`.
    pub fn card(&self, row: Coord, col: Coord) -> Option<&CardView> {
        let coords = from_one_based((row.into(), col.into()), self.size).ok()?;
        Some(&self.cards[coords.to_nd_index()])
    }

    pub fn rows(&self) -> Vec<Vec<CardView>> {
        self.cards.outer_iter().map(|row| row.to_vec()).collect()
    }
}

/// Renders the textual board state: a `ROWSxCOLS` header, then one line per
/// card in row-major order.
impl fmt::Display for BoardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}x{}", self.size.0, self.size.1)?;
        for card in self.cards.iter() {
            match (card.state, &card.value) {
                (CardFace::FaceDown, _) | (_, None) => writeln!(f, "down")?,
                (CardFace::Matched, Some(value)) => writeln!(f, "matched {value}")?,
                (CardFace::Revealed, Some(value)) => {
                    if self.viewer.is_some() && card.controller == self.viewer {
                        writeln!(f, "my {value}")?
                    } else {
                        writeln!(f, "up {value}")?
                    }
                }
            }
        }
        Ok(())
    }
}
