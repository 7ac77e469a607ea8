use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Single-threaded flip/match/reset state machine over a fixed grid of cards.
///
/// All mutation goes through [`MatchEngine::flip`] and
/// [`MatchEngine::map_values`]; sharing between players is the job of
/// [`Board`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchEngine {
    size: Coord2,
    cards: Array2<Card>,
}

impl MatchEngine {
    pub fn new(layout: CardLayout) -> Self {
        let size = layout.size();
        let cards = layout
            .into_values()
            .map(|value| Card::face_down(value.as_str()));
        Self { size, cards }
    }

    pub fn size(&self) -> Coord2 {
        self.size
    }

    /// Card at 0-based `coords`.
    pub fn card_at(&self, coords: Coord2) -> &Card {
        &self.cards[coords.to_nd_index()]
    }

    /// Cards in row-major order with their 0-based coordinates.
    pub fn iter_cards(&self) -> impl Iterator<Item = (Coord2, &Card)> {
        iter_coords(self.size).map(|coords| (coords, self.card_at(coords)))
    }

    /// Every card `player` currently holds face-up, found by scanning the grid.
    pub fn active_reveals(&self, player: &str) -> Vec<Coord2> {
        self.iter_cards()
            .filter(|(_, card)| card.state.is_revealed_by(player))
            .map(|(coords, _)| coords)
            .collect()
    }

    /// Flips the card at 1-based `coords` for `player`.
    ///
    /// Illegal flips come back as `Ok` with a rejecting [`FlipOutcome`] and
    /// leave the grid untouched. `Err` means the grid itself is broken.
    pub fn flip(&mut self, player: &str, coords: OneBased) -> Result<FlipOutcome> {
        use FlipOutcome::*;

        let coords = match from_one_based(coords, self.size) {
            Ok(coords) => coords,
            Err(axis) => return Ok(OutOfBounds(axis)),
        };

        let card = &mut self.cards[coords.to_nd_index()];
        if !card.state.is_face_down() {
            return Ok(CannotFlip);
        }
        card.state = CardState::Revealed(player.to_owned());

        let active = self.active_reveals(player);
        let [first, second] = active[..] else {
            return Ok(Flipped);
        };

        let outcome = if self.card_at(first).value == self.card_at(second).value {
            self.settle([first, second], CardState::Matched);
            Matched
        } else {
            self.settle([first, second], CardState::FaceDown);
            Mismatched
        };

        self.validate_shape()?;
        Ok(outcome)
    }

    /// Replaces the value of every card that is not matched yet.
    ///
    /// Returns whether any value actually changed.
    pub fn map_values(&mut self, mut transform: impl FnMut(&str) -> String) -> bool {
        let mut changed = false;
        for card in self.cards.iter_mut().filter(|card| !card.state.is_matched()) {
            let value = transform(&card.value);
            if value != card.value {
                card.value = value;
                changed = true;
            }
        }
        changed
    }

    pub fn look(&self, player: &str) -> BoardView {
        BoardView::for_player(self, player)
    }

    pub fn spectate(&self) -> BoardView {
        BoardView::spectator(self)
    }

    pub fn validate_shape(&self) -> Result<()> {
        if self.cards.grid_size() == Some(self.size) {
            Ok(())
        } else {
            Err(BoardError::InvalidBoardShape)
        }
    }

    fn settle(&mut self, pair: [Coord2; 2], state: CardState) {
        for coords in pair {
            self.cards[coords.to_nd_index()].state = state.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(size: Coord2, values: &[&str]) -> MatchEngine {
        let values = values.iter().map(|&value| value.to_owned()).collect();
        MatchEngine::new(CardLayout::deal(size, values, OrderedDealer).unwrap())
    }

    fn assert_controller_invariant(engine: &MatchEngine) {
        for (_, card) in engine.iter_cards() {
            assert_eq!(
                card.state.controller().is_some(),
                matches!(card.state, CardState::Revealed(_))
            );
        }
    }

    #[test]
    fn first_flip_reveals_card_for_player() {
        let mut engine = engine((2, 2), &["A", "B", "A", "B"]);

        assert_eq!(engine.flip("p1", (1, 2)).unwrap(), FlipOutcome::Flipped);
        assert_eq!(
            engine.card_at((0, 1)).state,
            CardState::Revealed("p1".to_owned())
        );
        assert_eq!(engine.active_reveals("p1"), vec![(0, 1)]);
        assert!(engine.active_reveals("p2").is_empty());
    }

    #[test]
    fn equal_pair_becomes_matched() {
        let mut engine = engine((2, 2), &["A", "B", "A", "B"]);

        engine.flip("p1", (1, 1)).unwrap();
        let outcome = engine.flip("p1", (2, 1)).unwrap();

        assert_eq!(outcome, FlipOutcome::Matched);
        assert_eq!(engine.card_at((0, 0)).state, CardState::Matched);
        assert_eq!(engine.card_at((1, 0)).state, CardState::Matched);
        assert!(engine.active_reveals("p1").is_empty());
        assert_controller_invariant(&engine);
    }

    #[test]
    fn unequal_pair_is_turned_back_down() {
        let mut engine = engine((2, 2), &["A", "B", "A", "B"]);

        engine.flip("p1", (1, 1)).unwrap();
        let outcome = engine.flip("p1", (1, 2)).unwrap();

        assert_eq!(outcome, FlipOutcome::Mismatched);
        assert_eq!(engine.card_at((0, 0)).state, CardState::FaceDown);
        assert_eq!(engine.card_at((0, 1)).state, CardState::FaceDown);
        assert_controller_invariant(&engine);
    }

    #[test]
    fn out_of_bounds_names_axis_and_changes_nothing() {
        let mut engine = engine((2, 1), &["A", "A"]);
        let before = engine.clone();

        assert_eq!(
            engine.flip("p1", (0, 1)).unwrap(),
            FlipOutcome::OutOfBounds(Axis::Row)
        );
        assert_eq!(
            engine.flip("p1", (3, 1)).unwrap(),
            FlipOutcome::OutOfBounds(Axis::Row)
        );
        assert_eq!(
            engine.flip("p1", (1, 2)).unwrap(),
            FlipOutcome::OutOfBounds(Axis::Col)
        );
        assert_eq!(
            engine.flip("p1", (256, 1)).unwrap(),
            FlipOutcome::OutOfBounds(Axis::Row)
        );
        assert_eq!(
            engine.flip("p1", (-1, 1)).unwrap(),
            FlipOutcome::OutOfBounds(Axis::Row)
        );
        assert_eq!(engine, before);
    }

    #[test]
    fn cannot_flip_own_revealed_card_twice() {
        let mut engine = engine((1, 2), &["A", "A"]);

        engine.flip("p1", (1, 1)).unwrap();
        let before = engine.clone();

        assert_eq!(engine.flip("p1", (1, 1)).unwrap(), FlipOutcome::CannotFlip);
        assert_eq!(engine, before);
    }

    #[test]
    fn cannot_flip_card_held_by_other_player_or_matched() {
        let mut engine = engine((2, 2), &["A", "A", "B", "B"]);

        engine.flip("p1", (1, 1)).unwrap();
        assert_eq!(engine.flip("p2", (1, 1)).unwrap(), FlipOutcome::CannotFlip);

        engine.flip("p1", (1, 2)).unwrap();
        assert_eq!(engine.flip("p2", (1, 2)).unwrap(), FlipOutcome::CannotFlip);
        assert_eq!(engine.card_at((0, 1)).state, CardState::Matched);
    }

    #[test]
    fn players_resolve_their_own_pairs_independently() {
        let mut engine = engine((2, 2), &["A", "B", "B", "A"]);

        engine.flip("p1", (1, 1)).unwrap();
        engine.flip("p2", (1, 2)).unwrap();
        assert_eq!(engine.flip("p2", (2, 1)).unwrap(), FlipOutcome::Matched);
        assert_eq!(
            engine.card_at((0, 0)).state,
            CardState::Revealed("p1".to_owned())
        );
        assert_eq!(engine.flip("p1", (2, 2)).unwrap(), FlipOutcome::Matched);
        assert!(engine.iter_cards().all(|(_, card)| card.state.is_matched()));
    }

    #[test]
    fn map_values_skips_matched_cards() {
        let mut engine = engine((2, 2), &["A", "A", "B", "B"]);
        engine.flip("p1", (1, 1)).unwrap();
        engine.flip("p1", (1, 2)).unwrap();
        engine.flip("p2", (2, 1)).unwrap();

        let changed = engine.map_values(|value| value.to_lowercase());

        assert!(changed);
        assert_eq!(engine.card_at((0, 0)).value, "A");
        assert_eq!(engine.card_at((1, 0)).value, "b");
        assert_eq!(engine.card_at((1, 1)).value, "b");
        assert_eq!(
            engine.card_at((1, 0)).state,
            CardState::Revealed("p2".to_owned())
        );
    }

    #[test]
    fn map_values_reports_no_change_for_identity() {
        let mut engine = engine((1, 2), &["A", "A"]);

        assert!(!engine.map_values(str::to_owned));
    }
}
