use serde::{Deserialize, Serialize};

use crate::PlayerId;

/// Lifecycle state of a single card.
///
/// Only [`CardState::Revealed`] carries a controller, so a controller exists
/// exactly while the card is face-up for some player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardState {
    FaceDown,
    Revealed(PlayerId),
    Matched,
}

impl CardState {
    pub const fn is_face_down(&self) -> bool {
        matches!(self, Self::FaceDown)
    }

    pub const fn is_matched(&self) -> bool {
        matches!(self, Self::Matched)
    }

    pub fn controller(&self) -> Option<&str> {
        match self {
            Self::Revealed(player) => Some(player),
            Self::FaceDown | Self::Matched => None,
        }
    }

    pub fn is_revealed_by(&self, player: &str) -> bool {
        self.controller() == Some(player)
    }
}

impl Default for CardState {
    fn default() -> Self {
        Self::FaceDown
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub value: String,
    pub state: CardState,
}

impl Card {
    pub fn face_down(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            state: CardState::FaceDown,
        }
    }
}
