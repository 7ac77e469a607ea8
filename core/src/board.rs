use core::future::Future;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use futures_channel::oneshot;
use futures_util::FutureExt;
use serde::{Deserialize, Serialize};

use crate::*;

/// Answer to a flip: what happened, and the board as the flipping player now
/// sees it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlipReport {
    pub outcome: FlipOutcome,
    pub board: BoardView,
}

impl FlipReport {
    pub fn success(&self) -> bool {
        self.outcome.is_success()
    }

    pub fn message(&self) -> &'static str {
        self.outcome.message()
    }
}

#[derive(Debug)]
struct Watcher {
    player: PlayerId,
    sender: oneshot::Sender<BoardView>,
}

#[derive(Debug)]
struct Shared {
    engine: MatchEngine,
    watchers: Vec<Watcher>,
}

impl Shared {
    /// Hands every pending watcher its view of the current, committed state.
    fn notify_watchers(&mut self) {
        let Self { engine, watchers } = self;
        for Watcher { player, sender } in watchers.drain(..) {
            if sender.send(engine.look(&player)).is_err() {
                log::trace!("watcher for {player} went away before the board changed");
            }
        }
    }
}

/// A matching-card board shared by any number of players.
///
/// Mutations (`flip`, `map_values`) hold one exclusive lock for their whole
/// read-scan-write sequence, so they are applied one at a time. Views take a
/// shared lock and only ever observe committed states.
#[derive(Debug)]
pub struct Board {
    size: Coord2,
    shared: RwLock<Shared>,
}

impl Board {
    /// Builds a board with the values shuffled into random positions.
    pub fn new(size: Coord2, values: Vec<String>) -> Result<Self> {
        Self::with_dealer(size, values, RandomDealer::from_entropy())
    }

    pub fn with_config(config: BoardConfig, values: Vec<String>) -> Result<Self> {
        Self::with_dealer(config.size, values, config.dealer())
    }

    pub fn with_dealer(size: Coord2, values: Vec<String>, dealer: impl CardDealer) -> Result<Self> {
        Self::from_layout(CardLayout::deal(size, values, dealer)?)
    }

    pub fn from_definition(definition: BoardDefinition, dealer: impl CardDealer) -> Result<Self> {
        Self::from_layout(definition.into_layout(dealer)?)
    }

    pub fn from_layout(layout: CardLayout) -> Result<Self> {
        let engine = MatchEngine::new(layout);
        engine.validate_shape()?;

        let size = engine.size();
        log::info!("created {}x{} board", size.0, size.1);
        Ok(Self {
            size,
            shared: RwLock::new(Shared {
                engine,
                watchers: Vec::new(),
            }),
        })
    }

    pub fn size(&self) -> Coord2 {
        self.size
    }

    /// The board as `player` sees it right now.
    pub fn look(&self, player: &str) -> BoardView {
        self.read().engine.look(player)
    }

    /// The board with every face-up card shown, regardless of who holds it.
    pub fn spectate(&self) -> BoardView {
        self.read().engine.spectate()
    }

    /// Flips the card at 1-based `(row, col)` for `player`.
    ///
    /// Rejected flips, including coordinates too large or negative for any
    /// board, are reported through [`FlipReport::success`]; `Err` is only
    /// returned if the grid itself is found broken.
    pub fn flip(&self, player: &str, row: i64, col: i64) -> Result<FlipReport> {
        let mut shared = self.write();
        let outcome = shared.engine.flip(player, (row, col))?;

        if outcome.is_success() {
            log::debug!("{player} flipped ({row}, {col}): {outcome}");
            shared.notify_watchers();
        } else {
            log::debug!("{player} rejected at ({row}, {col}): {outcome}");
        }

        Ok(FlipReport {
            outcome,
            board: shared.engine.look(player),
        })
    }

    /// Replaces the value of every card not yet matched with
    /// `transform(value)`, atomically with respect to flips.
    pub fn map_values(&self, player: &str, transform: impl FnMut(&str) -> String) -> BoardView {
        let mut shared = self.write();
        if shared.engine.map_values(transform) {
            log::debug!("{player} transformed card values");
            shared.notify_watchers();
        }
        shared.engine.look(player)
    }

    /// Waits for the next change to the board and yields `player`'s view of
    /// it.
    ///
    /// Resolves to `None` if the board is dropped first. Use [`Board::look`]
    /// for the current state.
    pub fn watch(&self, player: &str) -> impl Future<Output = Option<BoardView>> + use<> {
        let (sender, receiver) = oneshot::channel();
        {
            let mut shared = self.write();
            shared.watchers.retain(|watcher| !watcher.sender.is_canceled());
            shared.watchers.push(Watcher {
                player: player.to_owned(),
                sender,
            });
        }
        receiver.map(|view| view.ok())
    }

    /// Number of watchers still waiting for a change.
    pub fn pending_watchers(&self) -> usize {
        self.read()
            .watchers
            .iter()
            .filter(|watcher| !watcher.sender.is_canceled())
            .count()
    }

    fn read(&self) -> RwLockReadGuard<'_, Shared> {
        self.shared.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Shared> {
        self.shared.write().unwrap_or_else(PoisonError::into_inner)
    }
}
