use log::debug;
use std::collections::BTreeSet;

use crate::candidate::Candidate;
use crate::config::*;

/// The outcome of a normalization pass.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Normalization {
    /// The voters whose ranks had gaps and were renumbered.
    pub fixed_voters: BTreeSet<VoterId>,
    /// The number of distinct voters holding a rank among the candidates.
    pub voter_count: u64,
}

// The ranking of one voter: (rank, index of the candidate), sorted by rank.
type RankVector = Vec<(Rank, usize)>;

/// Renumbers the ranks of every voter so that they are contiguous from 0.
///
/// All the ballots are checked before any of them is modified: if a voter
/// ranked two candidates the same, an error is returned and the candidates
/// are left untouched.
pub fn normalize(candidates: &mut [Candidate]) -> Result<Normalization, VotingErrors> {
    let ballots: Vec<(VoterId, RankVector)> = {
        let view: &[Candidate] = candidates;
        let mut seen: BTreeSet<&VoterId> = BTreeSet::new();
        let mut ballots = Vec::new();
        for c in view.iter() {
            for voter in c.voters() {
                if seen.insert(voter) {
                    ballots.push((voter.clone(), rank_vector(view, voter)?));
                }
            }
        }
        ballots
    };

    let mut res = Normalization {
        fixed_voters: BTreeSet::new(),
        voter_count: ballots.len() as u64,
    };
    for (voter, ranks) in ballots.into_iter() {
        let moves = close_gaps(&ranks);
        if moves.is_empty() {
            continue;
        }
        debug!("normalize: voter {}: moving ranks {:?}", voter, moves);
        for (cidx, _, to) in moves {
            candidates[cidx].set_rank(voter.clone(), to);
        }
        res.fixed_voters.insert(voter);
    }
    Ok(res)
}

fn rank_vector(candidates: &[Candidate], voter: &VoterId) -> Result<RankVector, VotingErrors> {
    let mut ranks: RankVector = candidates
        .iter()
        .enumerate()
        .filter_map(|(idx, c)| c.rank_of(voter).map(|r| (r, idx)))
        .collect();
    ranks.sort();
    for pair in ranks.windows(2) {
        if let [(r1, c1), (r2, c2)] = pair {
            if r1 == r2 {
                return Err(VotingErrors::InvalidBallot {
                    voter: voter.clone(),
                    rank: *r1,
                    first: candidates[*c1].name.clone(),
                    second: candidates[*c2].name.clone(),
                });
            }
        }
    }
    Ok(ranks)
}

// `ranks` is sorted and free of duplicates: the vote at position i gets rank i.
// Returns (candidate, old rank, new rank) for every vote whose rank changed.
fn close_gaps(ranks: &[(Rank, usize)]) -> Vec<(usize, Rank, Rank)> {
    ranks
        .iter()
        .enumerate()
        .filter_map(|(slot, (rank, cidx))| {
            let slot = slot as Rank;
            if *rank != slot {
                Some((*cidx, *rank, slot))
            } else {
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cand(name: &str, votes: &[(&str, Rank)]) -> Candidate {
        let mut c = Candidate::new(name);
        for (v, r) in votes {
            c.set_rank(VoterId::from(*v), *r);
        }
        c
    }

    #[test]
    fn closes_a_gap() {
        let mut cands = vec![
            cand("A", &[("v1", 0), ("v2", 1)]),
            cand("B", &[("v1", 2), ("v2", 0)]),
        ];
        let n = normalize(&mut cands).unwrap();
        assert_eq!(cands[0].rank_of(&"v1".into()), Some(0));
        assert_eq!(cands[1].rank_of(&"v1".into()), Some(1));
        // v2 is untouched
        assert_eq!(cands[0].rank_of(&"v2".into()), Some(1));
        assert_eq!(cands[1].rank_of(&"v2".into()), Some(0));
        assert_eq!(n.voter_count, 2);
        assert_eq!(
            n.fixed_voters.into_iter().collect::<Vec<_>>(),
            vec![VoterId::from("v1")]
        );
    }

    #[test]
    fn promotes_sparse_rankings_to_the_first_choice() {
        let mut cands = vec![
            cand("A", &[("v1", 7)]),
            cand("B", &[("v1", 3)]),
            cand("C", &[]),
        ];
        let n = normalize(&mut cands).unwrap();
        assert_eq!(cands[1].rank_of(&"v1".into()), Some(0));
        assert_eq!(cands[0].rank_of(&"v1".into()), Some(1));
        assert_eq!(n.voter_count, 1);
    }

    #[test]
    fn is_idempotent() {
        let mut cands = vec![
            cand("A", &[("v1", 4), ("v2", 0), ("v3", 1)]),
            cand("B", &[("v1", 2), ("v3", 5)]),
            cand("C", &[("v2", 9)]),
        ];
        let first = normalize(&mut cands).unwrap();
        assert_eq!(first.fixed_voters.len(), 3);
        let snapshot = cands.clone();
        let second = normalize(&mut cands).unwrap();
        assert!(second.fixed_voters.is_empty());
        assert_eq!(second.voter_count, 3);
        assert_eq!(cands, snapshot);
    }

    #[test]
    fn rejects_duplicate_ranks_without_mutation() {
        let mut cands = vec![
            cand("A", &[("v1", 0), ("v2", 3)]),
            cand("B", &[("v2", 1)]),
            cand("C", &[("v2", 1)]),
        ];
        let before = cands.clone();
        let err = normalize(&mut cands).unwrap_err();
        assert_eq!(
            err,
            VotingErrors::InvalidBallot {
                voter: "v2".into(),
                rank: 1,
                first: "B".to_string(),
                second: "C".to_string(),
            }
        );
        assert_eq!(cands, before);
    }

    #[test]
    fn counts_no_voters_in_an_empty_election() {
        let mut cands = vec![cand("A", &[])];
        let n = normalize(&mut cands).unwrap();
        assert_eq!(n, Normalization::default());
    }
}
