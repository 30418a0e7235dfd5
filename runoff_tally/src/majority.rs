use log::debug;

use crate::candidate::Candidate;

/// The number of first choices needed to hold a strict majority.
pub fn majority_threshold(voter_count: u64) -> u64 {
    voter_count / 2 + 1
}

/// Returns the index of the winner of the current round, if there is one.
///
/// The last remaining candidate always wins, even without any voter.
pub fn find_winner(candidates: &[Candidate], voter_count: u64) -> Option<usize> {
    if candidates.len() == 1 {
        debug!("find_winner: only one candidate left: {}", candidates[0].name);
        return Some(0);
    }
    let needed = majority_threshold(voter_count);
    let winner = candidates
        .iter()
        .position(|c| c.first_choices() >= needed);
    debug!(
        "find_winner: needed: {} voter_count: {} winner: {:?}",
        needed, voter_count, winner
    );
    winner
}
