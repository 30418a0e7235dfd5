//! Human readable summaries of the collected votes.

use crate::Candidate;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum SummaryMode {
    /// The rank given by every voter.
    Ranks,
    /// The number of votes received at every rank.
    Tally,
}

/// One line per candidate, in ballot order.
pub fn summary_report(candidates: &[Candidate], mode: SummaryMode) -> Vec<String> {
    match mode {
        SummaryMode::Ranks => candidates.iter().map(ranks_line).collect(),
        SummaryMode::Tally => {
            let max_rank = candidates.iter().filter_map(|c| c.max_rank()).max();
            candidates
                .iter()
                .map(|c| match max_rank {
                    Some(max_rank) => format!(
                        "{}: {}",
                        c.name,
                        c.rank_counts(max_rank)
                            .iter()
                            .enumerate()
                            .map(|(rank, count)| format!("{}=>{}", rank, count))
                            .collect::<Vec<_>>()
                            .join(", ")
                    ),
                    None => format!("{}: no votes", c.name),
                })
                .collect()
        }
    }
}

fn ranks_line(c: &Candidate) -> String {
    if c.votes().is_empty() {
        return format!("{}: no votes", c.name);
    }
    let pairs: Vec<String> = c
        .votes()
        .iter()
        .map(|(voter, rank)| format!("{}=>{}", voter, rank))
        .collect();
    format!("{}: {}", c.name, pairs.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VoterId;

    fn cands() -> Vec<Candidate> {
        let mut a = Candidate::new("Pizza");
        a.set_rank(VoterId::from("bob"), 1);
        a.set_rank(VoterId::from("alice"), 0);
        let mut b = Candidate::new("Tacos");
        b.set_rank(VoterId::from("bob"), 0);
        b.set_rank(VoterId::from("carol"), 2);
        vec![a, b, Candidate::new("Salad")]
    }

    #[test]
    fn lists_voter_ranks() {
        assert_eq!(
            summary_report(&cands(), SummaryMode::Ranks),
            vec![
                "Pizza: alice=>0, bob=>1",
                "Tacos: bob=>0, carol=>2",
                "Salad: no votes"
            ]
        );
    }

    #[test]
    fn tallies_every_rank() {
        assert_eq!(
            summary_report(&cands(), SummaryMode::Tally),
            vec![
                "Pizza: 0=>1, 1=>1, 2=>0",
                "Tacos: 0=>1, 1=>0, 2=>1",
                "Salad: 0=>0, 1=>0, 2=>0"
            ]
        );
    }

    #[test]
    fn tallies_nothing_without_votes() {
        let cands = vec![Candidate::new("A")];
        assert_eq!(summary_report(&cands, SummaryMode::Tally), vec!["A: no votes"]);
    }
}
