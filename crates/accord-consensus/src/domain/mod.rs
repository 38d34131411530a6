//! Domain logic for consensus: proposer election and quorum tallying.

pub mod election;
pub mod tally;

pub use election::{elect_proposer, EntropySource, SeededEntropy, ThreadRngEntropy};
pub use tally::{TallyOutcome, Vote, VoteOutcome, WeightTally};
