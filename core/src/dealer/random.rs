use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use super::*;

/// Uniform shuffle of all card values, seeded for reproducible boards or drawn
/// from OS entropy.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomDealer {
    seed: Option<u64>,
}

impl RandomDealer {
    pub fn new(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    pub fn from_entropy() -> Self {
        Self { seed: None }
    }
}

impl CardDealer for RandomDealer {
    fn arrange(self, values: &mut [String]) {
        let mut rng = match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        values.shuffle(&mut rng);
        log::trace!("shuffled {} card values, seed: {:?}", values.len(), self.seed);
    }
}
