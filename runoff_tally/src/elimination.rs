use log::debug;

use crate::audit::{join_names, plural, AuditLog};
use crate::candidate::Candidate;
use crate::config::*;
use crate::random::RandomSource;

/// Chooses the candidates to eliminate in a round without a majority winner.
///
/// Returns indices into `candidates`, in increasing order. The result is never
/// empty and never contains all the candidates, as long as at least two
/// candidates are running.
pub fn select_eliminated(
    candidates: &[Candidate],
    voter_count: u64,
    rule: EliminationRule,
    round: RoundId,
    rng: &mut dyn RandomSource,
    log: &mut AuditLog,
) -> Vec<usize> {
    if candidates.len() < 2 {
        debug!("select_eliminated: nothing to eliminate among {} candidates", candidates.len());
        return Vec::new();
    }
    let tally: Vec<u64> = candidates.iter().map(|c| c.first_choices()).collect();
    debug!("select_eliminated: round {} tally: {:?}", round, tally);
    match rule {
        EliminationRule::Cascade => cascade(candidates, &tally, voter_count, round, rng, log),
        EliminationRule::PreferenceScore => {
            preference_score(candidates, &tally, round, rng, log)
        }
    }
}

// (lowest count, the indices holding it)
fn lowest_group(tally: &[u64]) -> (u64, Vec<usize>) {
    let lowest = tally.iter().cloned().min().unwrap_or(0);
    let group = tally
        .iter()
        .enumerate()
        .filter_map(|(idx, count)| if *count == lowest { Some(idx) } else { None })
        .collect();
    (lowest, group)
}

fn names_of(candidates: &[Candidate], group: &[usize]) -> Vec<String> {
    group.iter().map(|idx| candidates[*idx].name.clone()).collect()
}

fn cascade(
    candidates: &[Candidate],
    tally: &[u64],
    voter_count: u64,
    round: RoundId,
    rng: &mut dyn RandomSource,
    log: &mut AuditLog,
) -> Vec<usize> {
    let (lowest, group) = lowest_group(tally);
    let next_tier = tally.iter().cloned().filter(|count| *count > lowest).min();
    // With no higher tier, compare against the whole electorate.
    let second_lowest = next_tier.unwrap_or(voter_count);
    let target = match next_tier {
        Some(count) => format!("the next lowest total ({})", count),
        None => format!("the total number of voters ({})", voter_count),
    };
    debug!(
        "cascade: lowest: {} second_lowest: {} group: {:?}",
        lowest, second_lowest, group
    );

    if let [single] = group.as_slice() {
        log.push(format!(
            "Eliminating {} with the fewest first choice votes ({})",
            candidates[*single].name, lowest
        ));
        return group;
    }

    let names = names_of(candidates, &group);
    log.push(format!(
        "{} are tied for the fewest first choice votes ({})",
        join_names(&names),
        lowest
    ));

    let combined = lowest * group.len() as u64;
    if group.len() < candidates.len() && combined < second_lowest {
        log.push(format!(
            "Combined, they hold {} and cannot catch up with {}",
            plural(combined, "first choice vote"),
            target
        ));
        log.push(format!("Eliminating {} together", join_names(&names)));
        return group;
    }

    log.push(format!(
        "Combined, they could catch up with {}: breaking the tie at random",
        target
    ));
    let picked = draw(&group, &names, round, rng);
    log.push(format!(
        "Eliminating {} (drawn at random among {})",
        candidates[picked].name,
        join_names(&names)
    ));
    vec![picked]
}

// How highly the voters ranked a candidate overall: a first choice is worth
// the number of running candidates, the last choice is worth 1.
fn score(candidate: &Candidate, running: u64) -> u64 {
    candidate
        .votes()
        .values()
        .map(|rank| running.saturating_sub(*rank as u64))
        .sum()
}

fn preference_score(
    candidates: &[Candidate],
    tally: &[u64],
    round: RoundId,
    rng: &mut dyn RandomSource,
    log: &mut AuditLog,
) -> Vec<usize> {
    let (lowest, group) = lowest_group(tally);
    if let [single] = group.as_slice() {
        log.push(format!(
            "Eliminating {} with the fewest first choice votes ({})",
            candidates[*single].name, lowest
        ));
        return group;
    }

    let running = candidates.len() as u64;
    let scores: Vec<(usize, u64)> = group
        .iter()
        .map(|idx| (*idx, score(&candidates[*idx], running)))
        .collect();
    let lowest_score = scores.iter().map(|(_, s)| *s).min().unwrap_or(0);
    let scored_group: Vec<usize> = scores
        .iter()
        .filter_map(|(idx, s)| if *s == lowest_score { Some(*idx) } else { None })
        .collect();
    debug!("preference_score: scores: {:?}", scores);

    let names = names_of(candidates, &group);
    log.push(format!(
        "{} are tied for the fewest first choice votes ({}), preference scores: {}",
        join_names(&names),
        lowest,
        scores
            .iter()
            .map(|(idx, s)| format!("{}={}", candidates[*idx].name, s))
            .collect::<Vec<_>>()
            .join(", ")
    ));

    if let [single] = scored_group.as_slice() {
        log.push(format!(
            "Eliminating {} with the lowest preference score ({})",
            candidates[*single].name, lowest_score
        ));
        return scored_group;
    }

    let scored_names = names_of(candidates, &scored_group);
    let picked = draw(&scored_group, &scored_names, round, rng);
    log.push(format!(
        "Eliminating {} (drawn at random among {})",
        candidates[picked].name,
        join_names(&scored_names)
    ));
    vec![picked]
}

fn draw(group: &[usize], names: &[String], round: RoundId, rng: &mut dyn RandomSource) -> usize {
    let pick = rng.pick(round, names).min(group.len() - 1);
    debug!("draw: picked {} among {:?}", names[pick], names);
    group[pick]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{CandidateOrder, RngSource};

    // A candidate with `first` first choices and `second` second choices.
    fn cand(name: &str, first: usize, second: usize) -> Candidate {
        let mut c = Candidate::new(name);
        for i in 0..first {
            c.set_rank(VoterId::new(format!("{}-first-{}", name, i)), 0);
        }
        for i in 0..second {
            c.set_rank(VoterId::new(format!("{}-second-{}", name, i)), 1);
        }
        c
    }

    fn select(cands: &[Candidate], voters: u64, rule: EliminationRule) -> (Vec<usize>, AuditLog) {
        let mut log = AuditLog::new();
        let res = select_eliminated(cands, voters, rule, 1, &mut CandidateOrder, &mut log);
        (res, log)
    }

    #[test]
    fn eliminates_the_single_weakest() {
        let cands = vec![cand("A", 5, 0), cand("B", 2, 0), cand("C", 3, 0)];
        let (res, log) = select(&cands, 10, EliminationRule::Cascade);
        assert_eq!(res, vec![1]);
        assert_eq!(log.lines().len(), 1);
        assert!(log.lines()[0].starts_with("Eliminating B"));
    }

    #[test]
    fn eliminates_hopeless_ties_in_batch() {
        let cands = vec![
            cand("A", 0, 0),
            cand("B", 0, 0),
            cand("C", 0, 0),
            cand("D", 10, 0),
        ];
        let (res, log) = select(&cands, 10, EliminationRule::Cascade);
        assert_eq!(res, vec![0, 1, 2]);
        assert_eq!(
            log.lines().last().unwrap(),
            "Eliminating A, B and C together"
        );
    }

    #[test]
    fn batch_needs_a_strict_gap() {
        // 2 * 2 == 4: combined, A and B would tie with C.
        let cands = vec![cand("A", 2, 0), cand("B", 2, 0), cand("C", 4, 0), cand("D", 9, 0)];
        let (res, _) = select(&cands, 17, EliminationRule::Cascade);
        assert_eq!(res, vec![1]);
    }

    #[test]
    fn never_eliminates_everybody() {
        let cands = vec![cand("A", 0, 0), cand("B", 0, 0)];
        let (res, log) = select(&cands, 0, EliminationRule::Cascade);
        assert_eq!(res, vec![1]);
        assert!(log
            .lines()
            .iter()
            .any(|l| l.contains("breaking the tie at random")));

        let cands = vec![cand("A", 3, 0), cand("B", 3, 0)];
        let (res, _) = select(&cands, 6, EliminationRule::Cascade);
        assert_eq!(res.len(), 1);
    }

    #[test]
    fn full_tie_compares_with_the_electorate() {
        let cands = vec![cand("A", 2, 0), cand("B", 2, 0), cand("C", 2, 0)];
        let (res, log) = select(&cands, 6, EliminationRule::Cascade);
        assert_eq!(res, vec![2]);
        let expected = "Combined, they could catch up with the total number of voters (6): \
                        breaking the tie at random";
        assert!(log.lines().iter().any(|l| l == expected));
        assert!(!log.lines().iter().any(|l| l.contains("next lowest total")));

        let cands = vec![cand("A", 2, 0), cand("B", 2, 0), cand("C", 3, 0)];
        let (_, log) = select(&cands, 7, EliminationRule::Cascade);
        assert!(log
            .lines()
            .iter()
            .any(|l| l.contains("could catch up with the next lowest total (3)")));
    }

    #[test]
    fn random_tie_break_is_reproducible_with_a_seed() {
        let cands = vec![cand("A", 3, 0), cand("B", 3, 0), cand("C", 5, 0)];
        let run = || {
            let mut log = AuditLog::new();
            let mut rng = RngSource::seeded(1234);
            select_eliminated(&cands, 11, EliminationRule::Cascade, 1, &mut rng, &mut log)
        };
        let first = run();
        assert_eq!(first.len(), 1);
        assert!(first[0] < 2);
        for _ in 0..10 {
            assert_eq!(run(), first);
        }
    }

    #[test]
    fn preference_score_uses_lower_ranks() {
        // A and B are tied on first choices, B has more second choices.
        let cands = vec![cand("A", 1, 0), cand("B", 1, 2), cand("C", 4, 1)];
        let (res, log) = select(&cands, 8, EliminationRule::PreferenceScore);
        assert_eq!(res, vec![0]);
        assert_eq!(
            log.lines().last().unwrap(),
            "Eliminating A with the lowest preference score (3)"
        );
    }

    #[test]
    fn preference_score_never_batches() {
        let cands = vec![
            cand("A", 0, 0),
            cand("B", 0, 0),
            cand("C", 0, 0),
            cand("D", 10, 0),
        ];
        let (res, _) = select(&cands, 10, EliminationRule::PreferenceScore);
        assert_eq!(res, vec![2]);
    }
}
