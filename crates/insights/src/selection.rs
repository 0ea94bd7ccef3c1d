//! Reason Selection
//!
//! Which candidate reasons end up in an insight sentence, and in which
//! order, is a strategy chosen by configuration.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Most reasons quoted in one sentence
pub const MAX_REASONS: usize = 3;

/// Picks up to `limit` reasons out of the candidates
pub trait ReasonSelector {
    fn select(&mut self, candidates: Vec<String>, limit: usize) -> Vec<String>;
}

/// Uniform random sample, in random order
pub struct RandomSelector {
    rng: StdRng,
}

impl RandomSelector {
    /// Seeded from the OS
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl ReasonSelector for RandomSelector {
    fn select(&mut self, mut candidates: Vec<String>, limit: usize) -> Vec<String> {
        let take = limit.min(candidates.len());
        let (chosen, _) = candidates.partial_shuffle(&mut self.rng, take);
        chosen.to_vec()
    }
}

/// The first `limit` candidates, in candidate order
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstNSelector;

impl ReasonSelector for FirstNSelector {
    fn select(&mut self, mut candidates: Vec<String>, limit: usize) -> Vec<String> {
        candidates.truncate(limit);
        candidates
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStrategy {
    #[default]
    Random,
    FirstN,
}

/// Configured strategy; hands out a fresh selector per request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionPolicy {
    #[serde(default)]
    pub strategy: SelectionStrategy,
    /// Fixed seed for the random strategy
    #[serde(default)]
    pub seed: Option<u64>,
}

impl SelectionPolicy {
    pub fn first_n() -> Self {
        Self {
            strategy: SelectionStrategy::FirstN,
            seed: None,
        }
    }

    pub fn selector(&self) -> Box<dyn ReasonSelector + Send> {
        match (self.strategy, self.seed) {
            (SelectionStrategy::FirstN, _) => Box::new(FirstNSelector),
            (SelectionStrategy::Random, Some(seed)) => Box::new(RandomSelector::seeded(seed)),
            (SelectionStrategy::Random, None) => Box::new(RandomSelector::from_entropy()),
        }
    }
}
