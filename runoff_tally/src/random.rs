use log::debug;
use rand::rngs::ThreadRng;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::*;

/// The source of the decision when a tie between candidates must be broken.
///
/// `tied` is never empty. The returned value is an index into `tied`.
pub trait RandomSource {
    fn pick(&mut self, round: RoundId, tied: &[String]) -> usize;
}

/// Uniform choice from any random number generator.
pub struct RngSource<R: Rng> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> RngSource<R> {
        RngSource { rng }
    }
}

impl RngSource<ThreadRng> {
    pub fn from_entropy() -> RngSource<ThreadRng> {
        RngSource::new(rand::thread_rng())
    }
}

impl RngSource<ChaCha8Rng> {
    pub fn seeded(seed: u64) -> RngSource<ChaCha8Rng> {
        RngSource::new(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn pick(&mut self, _round: RoundId, tied: &[String]) -> usize {
        self.rng.gen_range(0..tied.len())
    }
}

/// Generates a "random" choice. Random in this context means hard to guess in advance.
/// The candidate with the smallest SHA-256 digest of the seed, the round and its name is picked.
pub struct HashedSource {
    pub seed: u32,
}

impl RandomSource for HashedSource {
    fn pick(&mut self, round: RoundId, tied: &[String]) -> usize {
        let mut data: Vec<(String, usize)> = tied
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let key = format!("{:08}{:08}{}", self.seed, round, name);
                (sha256::digest(key.as_str()), idx)
            })
            .collect();
        data.sort();
        debug!("HashedSource: round {} digests: {:?}", round, data);
        data.first().map(|p| p.1).unwrap_or(0)
    }
}

/// Picks the last tied candidate, in the order of the ballot.
pub struct CandidateOrder;

impl RandomSource for CandidateOrder {
    fn pick(&mut self, _round: RoundId, tied: &[String]) -> usize {
        tied.len().saturating_sub(1)
    }
}

impl TieBreakMode {
    pub fn source(&self) -> Box<dyn RandomSource> {
        match *self {
            TieBreakMode::Random => Box::new(RngSource::from_entropy()),
            TieBreakMode::Seeded(seed) => Box::new(RngSource::seeded(seed)),
            TieBreakMode::Hashed(seed) => Box::new(HashedSource { seed }),
            TieBreakMode::UseCandidateOrder => Box::new(CandidateOrder),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(ns: &[&str]) -> Vec<String> {
        ns.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn seeded_sources_repeat_themselves() {
        let tied = names(&["A", "B", "C", "D", "E"]);
        let mut s1 = RngSource::seeded(7);
        let mut s2 = RngSource::seeded(7);
        let p1: Vec<usize> = (1..20).map(|r| s1.pick(r, &tied)).collect();
        let p2: Vec<usize> = (1..20).map(|r| s2.pick(r, &tied)).collect();
        assert_eq!(p1, p2);
        assert!(p1.iter().all(|idx| *idx < tied.len()));
    }

    #[test]
    fn hashed_source_depends_on_names_not_position() {
        let mut s = HashedSource { seed: 42 };
        let forward = names(&["Anna", "Bob", "Clara"]);
        let backward = names(&["Clara", "Bob", "Anna"]);
        let a = s.pick(3, &forward);
        let b = s.pick(3, &backward);
        assert_eq!(forward[a], backward[b]);
    }

    #[test]
    fn candidate_order_picks_the_last() {
        assert_eq!(CandidateOrder.pick(1, &names(&["A", "B", "C"])), 2);
    }

    #[test]
    fn thread_source_stays_in_range() {
        let mut s = TieBreakMode::Random.source();
        let tied = names(&["A", "B"]);
        for r in 0..50 {
            assert!(s.pick(r, &tied) < 2);
        }
    }
}
