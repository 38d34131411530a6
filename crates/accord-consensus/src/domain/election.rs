//! Proposer election strategies.
//!
//! The random draw is injected so election is deterministic under test:
//! given the same draw, the cumulative-weight walk always lands on the
//! same participant (registration order is the tie-break).

use accord_types::{ConsensusAlgorithm, Participant, ParticipantId, Weight};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform draws for stake-weighted election.
pub trait EntropySource: Send {
    /// Uniform draw in `[0, bound)`. `bound` is always > 0 when called.
    fn draw(&mut self, bound: Weight) -> Weight;
}

/// Production entropy from the thread RNG.
#[derive(Debug, Default)]
pub struct ThreadRngEntropy;

impl EntropySource for ThreadRngEntropy {
    fn draw(&mut self, bound: Weight) -> Weight {
        rand::thread_rng().gen_range(0..bound)
    }
}

/// Deterministic entropy for tests: a seeded standard RNG.
#[derive(Debug)]
pub struct SeededEntropy {
    rng: StdRng,
}

impl SeededEntropy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl EntropySource for SeededEntropy {
    fn draw(&mut self, bound: Weight) -> Weight {
        self.rng.gen_range(0..bound)
    }
}

/// Elect a proposer among active participants.
///
/// `StakeWeighted`: draw `r` in `[0, total_weight)`, then walk the
/// participants in registration order subtracting weights until `r` falls
/// within a participant's span. Returns `None` when total weight is zero.
///
/// `RoundRobin`: block number modulo participant count, registration
/// order. Returns `None` only when there are no participants.
pub fn elect_proposer(
    active: &[Participant],
    algorithm: ConsensusAlgorithm,
    block_number: u64,
    entropy: &mut dyn EntropySource,
) -> Option<ParticipantId> {
    if active.is_empty() {
        return None;
    }

    match algorithm {
        ConsensusAlgorithm::StakeWeighted => {
            let total: Weight = active.iter().map(|p| p.weight).sum();
            if total == 0 {
                return None;
            }
            let mut r = entropy.draw(total);
            for participant in active {
                if r < participant.weight {
                    return Some(participant.id.clone());
                }
                r -= participant.weight;
            }
            // Unreachable while draw() respects its bound; fall back to
            // the last weighted participant rather than panicking.
            active
                .iter()
                .rev()
                .find(|p| p.weight > 0)
                .map(|p| p.id.clone())
        }
        ConsensusAlgorithm::RoundRobin => {
            let idx = (block_number % active.len() as u64) as usize;
            Some(active[idx].id.clone())
        }
    }
}
