// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// The position a voter gives to a candidate. 0 is the first choice.
pub type Rank = u32;

pub type RoundId = u32;

/// An opaque, stable identity for a voter.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Ord, PartialOrd)]
pub struct VoterId(pub String);

impl VoterId {
    pub fn new(id: impl Into<String>) -> VoterId {
        VoterId(id.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for VoterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for VoterId {
    fn from(s: &str) -> VoterId {
        VoterId(s.to_string())
    }
}

// ******** Output data structures *********

/// Statistics for one round, as seen before the round decision.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RoundStats {
    pub round: RoundId,
    pub voter_count: u64,
    /// The number of first choices needed to win this round.
    pub threshold: u64,
    /// First choice counts, in candidate order.
    pub tally: Vec<(String, u64)>,
    pub elected: Option<String>,
    pub eliminated: Vec<String>,
}

/// Errors that prevent the algorithm from completing successfully.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum VotingErrors {
    EmptyElection,
    NoConvergence,
    /// The text of a candidate record has no word character to build a name from.
    MalformedCandidateName {
        text: String,
    },
    /// One voter put two candidates on the same rank.
    InvalidBallot {
        voter: VoterId,
        rank: Rank,
        first: String,
        second: String,
    },
    UnknownCandidate {
        name: String,
    },
}

impl Error for VotingErrors {}

impl Display for VotingErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VotingErrors::EmptyElection => write!(f, "The election has no candidates"),
            VotingErrors::NoConvergence => {
                write!(f, "The election did not converge to a winner")
            }
            VotingErrors::MalformedCandidateName { text } => {
                write!(f, "Message has no parsable candidate name: \"{}\"", text)
            }
            VotingErrors::InvalidBallot {
                voter,
                rank,
                first,
                second,
            } => write!(
                f,
                "Voter {} ranked more than one candidate the same: {} and {} at rank {}",
                voter, first, second, rank
            ),
            VotingErrors::UnknownCandidate { name } => {
                write!(f, "Unknown candidate \"{}\"", name)
            }
        }
    }
}

// ********* Configuration **********

/// How a consequential tie between the weakest candidates is broken.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum TieBreakMode {
    /// Uniformly at random, from the thread generator.
    Random,
    /// Uniformly at random, from a generator seeded with the given value.
    Seeded(u64),
    /// Hard to guess in advance but reproducible: uses a cryptographic hash of
    /// the seed, the round and the candidate names.
    Hashed(u32),
    /// The last tied candidate in ballot order is eliminated.
    UseCandidateOrder,
}

/// The elimination algorithm to apply when no candidate has a majority.
///
/// - Cascade eliminates the weakest candidate. Ties are resolved by eliminating
/// the whole tied group when even combined it cannot reach the next tier, and
/// otherwise by drawing one candidate from the tie break source.
///
/// - PreferenceScore eliminates exactly one candidate per round. Ties on the
/// first choices are resolved by the lowest preference score (how highly all
/// the voters ranked the candidate), and then by the tie break source.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum EliminationRule {
    Cascade,
    PreferenceScore,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct VoteRules {
    pub tiebreak_mode: TieBreakMode,
    pub elimination_rule: EliminationRule,
    /// Upper bound on the number of rounds. None means one round per candidate.
    pub max_rounds: Option<u32>,
}

impl VoteRules {
    pub const DEFAULT_RULES: VoteRules = VoteRules {
        tiebreak_mode: TieBreakMode::Random,
        elimination_rule: EliminationRule::Cascade,
        max_rounds: None,
    };
}

impl Default for VoteRules {
    fn default() -> Self {
        VoteRules::DEFAULT_RULES
    }
}
