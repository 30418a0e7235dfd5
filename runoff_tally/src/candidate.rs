use std::collections::BTreeMap;

use crate::config::*;

/// A candidate and the votes it received: for every voter, the rank that
/// voter gave to this candidate.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Candidate {
    pub name: String,
    /// An external reference for this candidate, such as the record it was read from.
    pub code: Option<String>,
    votes: BTreeMap<VoterId, Rank>,
}

impl Candidate {
    pub fn new(name: impl Into<String>) -> Candidate {
        Candidate {
            name: name.into(),
            code: None,
            votes: BTreeMap::new(),
        }
    }

    pub fn with_code(name: impl Into<String>, code: impl Into<String>) -> Candidate {
        Candidate {
            code: Some(code.into()),
            ..Candidate::new(name)
        }
    }

    /// Builds a candidate from the free text of a candidate record.
    pub fn from_text(text: &str) -> Result<Candidate, VotingErrors> {
        Ok(Candidate::new(candidate_name(text)?))
    }

    pub fn votes(&self) -> &BTreeMap<VoterId, Rank> {
        &self.votes
    }

    pub fn rank_of(&self, voter: &VoterId) -> Option<Rank> {
        self.votes.get(voter).cloned()
    }

    /// Records the rank of a voter, returning the rank it replaces.
    pub fn set_rank(&mut self, voter: VoterId, rank: Rank) -> Option<Rank> {
        self.votes.insert(voter, rank)
    }

    pub fn remove_voter(&mut self, voter: &VoterId) -> Option<Rank> {
        self.votes.remove(voter)
    }

    pub fn voters(&self) -> impl Iterator<Item = &VoterId> {
        self.votes.keys()
    }

    /// Number of voters who put this candidate first.
    pub fn first_choices(&self) -> u64 {
        self.votes.values().filter(|r| **r == 0).count() as u64
    }

    /// Number of votes for each rank, up to and including `max_rank`.
    pub fn rank_counts(&self, max_rank: Rank) -> Vec<u64> {
        let mut counts = vec![0u64; max_rank as usize + 1];
        for rank in self.votes.values() {
            if let Some(c) = counts.get_mut(*rank as usize) {
                *c += 1;
            }
        }
        counts
    }

    pub fn max_rank(&self) -> Option<Rank> {
        self.votes.values().max().cloned()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Trims a candidate name to the span between its first and last word characters.
///
/// ```
/// use runoff_tally::candidate_name;
/// assert_eq!(candidate_name("** Anna Smith! **").unwrap(), "Anna Smith");
/// ```
pub fn candidate_name(text: &str) -> Result<String, VotingErrors> {
    let first = text.find(is_word_char);
    let last = text
        .char_indices()
        .rev()
        .find(|(_, c)| is_word_char(*c))
        .map(|(idx, c)| idx + c.len_utf8());
    match (first, last) {
        (Some(start), Some(end)) => Ok(text[start..end].to_string()),
        _ => Err(VotingErrors::MalformedCandidateName {
            text: text.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_decorations() {
        assert_eq!(candidate_name("Pizza").unwrap(), "Pizza");
        assert_eq!(candidate_name("  **Thai food** :) ").unwrap(), "Thai food");
        assert_eq!(candidate_name("🍕 pizza_place 🍕").unwrap(), "pizza_place");
        assert_eq!(candidate_name("-7-").unwrap(), "7");
    }

    #[test]
    fn rejects_names_without_word_characters() {
        let err = candidate_name(" -- ?! ").unwrap_err();
        assert_eq!(
            err,
            VotingErrors::MalformedCandidateName {
                text: " -- ?! ".to_string()
            }
        );
        assert!(candidate_name("").is_err());
    }

    #[test]
    fn counts_first_choices_and_ranks() {
        let mut c = Candidate::new("A");
        c.set_rank("v1".into(), 0);
        c.set_rank("v2".into(), 0);
        c.set_rank("v3".into(), 2);
        assert_eq!(c.first_choices(), 2);
        assert_eq!(c.rank_counts(3), vec![2, 0, 1, 0]);
        assert_eq!(c.max_rank(), Some(2));
        assert_eq!(c.set_rank("v3".into(), 1), Some(2));
        assert_eq!(c.remove_voter(&"v1".into()), Some(0));
        assert_eq!(c.first_choices(), 1);
    }
}
