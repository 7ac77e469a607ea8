pub use random::*;

mod random;

/// Decides where each card value lands before the grid is filled row-major.
pub trait CardDealer {
    fn arrange(self, values: &mut [String]);
}

/// Keeps values in the order given, useful for replays and fixed boards.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct OrderedDealer;

impl CardDealer for OrderedDealer {
    fn arrange(self, _values: &mut [String]) {}
}
