// The reactions that carry the structure of an election.

use runoff_tally::Rank;

pub const ELECTION_START: &str = "🔰"; // :beginner:
pub const ELECTION_FINISHED: &str = "🏁"; // :checkered_flag:
pub const CANDIDATE: [&str; 3] = ["☑️", "✔️", "✅"]; // :ballot_box_with_check:, :heavy_check_mark:, :white_check_mark:
pub const WINNER: &str = "🏆"; // :trophy:
pub const LOSER: &str = "❌"; // :x:

/// The rank markers, in order: the first one is the first choice.
pub const RANKS: [&str; 10] = [
    "1️⃣", "2️⃣", "3️⃣", "4️⃣", "5️⃣", "6️⃣", "7️⃣", "8️⃣", "9️⃣", "🔟",
];

pub fn rank_of_marker(emoji: &str) -> Option<Rank> {
    RANKS
        .iter()
        .position(|r| *r == emoji)
        .map(|idx| idx as Rank)
}

pub fn is_candidate_marker(emoji: &str) -> bool {
    CANDIDATE.contains(&emoji)
}
