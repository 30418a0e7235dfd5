use log::warn;

pub use crate::config::*;
use crate::{Candidate, Election};

/// A builder for collecting votes.
///
/// ```
/// pub use runoff_tally::builder::Builder;
/// pub use runoff_tally::VoteRules;
/// # use runoff_tally::VotingErrors;
///
/// let mut builder = Builder::new(&VoteRules::DEFAULT_RULES)?
///     .candidates(&["Anna".to_string(), "Bob".to_string()])?;
///
/// builder.add_ranking(&"voter-1".into(), &["Bob".to_string(), "Anna".to_string()])?;
/// builder.add_vote(&"voter-2".into(), "Anna", 0)?;
///
/// let election = builder.build()?;
/// assert_eq!(election.voter_count(), 2);
/// # Ok::<(), VotingErrors>(())
/// ```
pub struct Builder {
    pub(crate) _rules: VoteRules,
    pub(crate) _candidates: Vec<Candidate>,
}

impl Builder {
    pub fn new(rules: &VoteRules) -> Result<Builder, VotingErrors> {
        Ok(Builder {
            _rules: rules.clone(),
            _candidates: Vec::new(),
        })
    }

    /// Registers the candidates, in ballot order. The names are used as given.
    pub fn candidates(self, cands: &[String]) -> Result<Builder, VotingErrors> {
        Ok(Builder {
            _rules: self._rules,
            _candidates: cands.iter().map(Candidate::new).collect(),
        })
    }

    /// Registers one more candidate and returns its position.
    pub fn add_candidate(&mut self, candidate: Candidate) -> usize {
        self._candidates.push(candidate);
        self._candidates.len() - 1
    }

    /// Records the rank a voter gave to the first candidate with this name.
    pub fn add_vote(
        &mut self,
        voter: &VoterId,
        candidate: &str,
        rank: Rank,
    ) -> Result<(), VotingErrors> {
        let idx = self
            ._candidates
            .iter()
            .position(|c| c.name == candidate)
            .ok_or_else(|| VotingErrors::UnknownCandidate {
                name: candidate.to_string(),
            })?;
        self.add_vote_at(idx, voter, rank)
    }

    /// Records the rank a voter gave to the candidate at this position.
    ///
    /// A voter who gives several ranks to the same candidate keeps the best one.
    pub fn add_vote_at(
        &mut self,
        candidate: usize,
        voter: &VoterId,
        rank: Rank,
    ) -> Result<(), VotingErrors> {
        let c = self
            ._candidates
            .get_mut(candidate)
            .ok_or_else(|| VotingErrors::UnknownCandidate {
                name: format!("#{}", candidate),
            })?;
        match c.rank_of(voter) {
            Some(previous) if previous <= rank => {
                warn!(
                    "add_vote: voter {} gave ranks {} and {} to {}, keeping {}",
                    voter, previous, rank, c.name, previous
                );
            }
            Some(previous) => {
                warn!(
                    "add_vote: voter {} gave ranks {} and {} to {}, keeping {}",
                    voter, previous, rank, c.name, rank
                );
                c.set_rank(voter.clone(), rank);
            }
            None => {
                c.set_rank(voter.clone(), rank);
            }
        }
        Ok(())
    }

    /// Adds a full ranking: the first name is the first choice, and so on.
    pub fn add_ranking(
        &mut self,
        voter: &VoterId,
        candidates: &[String],
    ) -> Result<(), VotingErrors> {
        for (rank, name) in candidates.iter().enumerate() {
            self.add_vote(voter, name, rank as Rank)?;
        }
        Ok(())
    }

    /// The candidates and their votes, as collected so far.
    pub fn collected(&self) -> &[Candidate] {
        &self._candidates
    }

    pub fn build(self) -> Result<Election, VotingErrors> {
        Election::new(self._candidates, &self._rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_the_best_rank_of_a_voter() {
        let mut b = Builder::new(&VoteRules::DEFAULT_RULES).unwrap();
        let a = b.add_candidate(Candidate::new("A"));
        b.add_vote_at(a, &"v1".into(), 3).unwrap();
        b.add_vote_at(a, &"v1".into(), 1).unwrap();
        b.add_vote_at(a, &"v1".into(), 2).unwrap();
        assert_eq!(b.collected()[a].rank_of(&"v1".into()), Some(1));
    }

    #[test]
    fn rejects_unknown_candidates() {
        let mut b = Builder::new(&VoteRules::DEFAULT_RULES)
            .unwrap()
            .candidates(&["A".to_string()])
            .unwrap();
        assert_eq!(
            b.add_vote(&"v1".into(), "Z", 0),
            Err(VotingErrors::UnknownCandidate {
                name: "Z".to_string()
            })
        );
        assert!(b.add_vote_at(4, &"v1".into(), 0).is_err());
    }
}
