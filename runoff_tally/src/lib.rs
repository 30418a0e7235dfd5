mod audit;
pub mod builder;
mod candidate;
mod config;
mod elimination;
mod majority;
pub mod manual;
mod normalize;
mod random;
pub mod summary;

use log::{debug, info};
use std::collections::BTreeSet;

pub use crate::audit::AuditLog;
pub use crate::candidate::*;
pub use crate::config::*;
pub use crate::elimination::select_eliminated;
pub use crate::majority::{find_winner, majority_threshold};
pub use crate::normalize::{normalize, Normalization};
pub use crate::random::*;

use crate::audit::{join_names, plural};

/// The states of a tabulation.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum ElectionState {
    Initialized,
    RoundEvaluating,
    Won,
}

/// What happened in one round.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum RoundOutcome {
    Winner(String),
    Eliminated(Vec<String>),
}

/// A candidate removed from the election, as it stood when it was removed.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct EliminatedCandidate {
    pub round: RoundId,
    pub candidate: Candidate,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ElectionResult {
    pub winner: Candidate,
    /// In order of elimination.
    pub eliminated: Vec<EliminatedCandidate>,
    pub rounds: Vec<RoundStats>,
    /// The voters whose initial rankings had gaps.
    pub initially_fixed: BTreeSet<VoterId>,
    pub log: Vec<String>,
}

impl ElectionResult {
    pub fn report(&self) -> String {
        self.log.join("\n")
    }
}

/// One instant-runoff tabulation.
///
/// The election owns its candidates. Every round either declares a winner or
/// removes the weakest candidates and renumbers the remaining rankings.
#[derive(Debug, Clone)]
pub struct Election {
    rules: VoteRules,
    state: ElectionState,
    // The candidates still running, in ballot order.
    candidates: Vec<Candidate>,
    eliminated: Vec<EliminatedCandidate>,
    voter_count: u64,
    round: RoundId,
    max_rounds: u32,
    rounds: Vec<RoundStats>,
    initially_fixed: BTreeSet<VoterId>,
    log: AuditLog,
    winner: Option<usize>,
}

impl Election {
    /// Prepares an election. The rankings are normalized once here.
    pub fn new(candidates: Vec<Candidate>, rules: &VoteRules) -> Result<Election, VotingErrors> {
        info!(
            "Processing {} candidates, rules: {:?}",
            candidates.len(),
            rules
        );
        if candidates.is_empty() {
            return Err(VotingErrors::EmptyElection);
        }
        let mut candidates = candidates;
        let norm = normalize(&mut candidates)?;

        let mut log = AuditLog::new();
        log.push(format!(
            "Starting election state: {}, {}",
            plural(candidates.len() as u64, "candidate"),
            plural(norm.voter_count, "voter")
        ));
        for c in candidates.iter() {
            log.push(format!(
                "  {}: {}",
                c.name,
                plural(c.first_choices(), "first choice vote")
            ));
        }
        if !norm.fixed_voters.is_empty() {
            let voters: Vec<&str> = norm.fixed_voters.iter().map(|v| v.as_str()).collect();
            log.push(format!(
                "Warning: gaps were fixed in the rankings of {}",
                join_names(&voters)
            ));
        }

        let max_rounds = rules.max_rounds.unwrap_or(candidates.len() as u32);
        Ok(Election {
            rules: rules.clone(),
            state: ElectionState::Initialized,
            candidates,
            eliminated: Vec::new(),
            voter_count: norm.voter_count,
            round: 0,
            max_rounds,
            rounds: Vec::new(),
            initially_fixed: norm.fixed_voters,
            log,
            winner: None,
        })
    }

    pub fn state(&self) -> ElectionState {
        self.state
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn eliminated(&self) -> &[EliminatedCandidate] {
        &self.eliminated
    }

    pub fn voter_count(&self) -> u64 {
        self.voter_count
    }

    pub fn log(&self) -> &AuditLog {
        &self.log
    }

    pub fn fixed_voters(&self) -> &BTreeSet<VoterId> {
        &self.initially_fixed
    }

    /// Runs one round. Once a winner is declared, further calls return it again.
    pub fn step(&mut self, rng: &mut dyn RandomSource) -> Result<RoundOutcome, VotingErrors> {
        if let Some(widx) = self.winner {
            return Ok(RoundOutcome::Winner(self.candidates[widx].name.clone()));
        }
        if self.round >= self.max_rounds {
            return Err(VotingErrors::NoConvergence);
        }
        self.round += 1;
        self.state = ElectionState::RoundEvaluating;
        let round = self.round;

        let threshold = majority_threshold(self.voter_count);
        let tally: Vec<(String, u64)> = self
            .candidates
            .iter()
            .map(|c| (c.name.clone(), c.first_choices()))
            .collect();
        self.log.push(format!(
            "Round {}: {}, {} needed for a majority",
            round,
            plural(self.voter_count, "voter"),
            threshold
        ));
        for (name, count) in tally.iter() {
            self.log.push(format!("  {}: {}", name, count));
        }
        let mut stats = RoundStats {
            round,
            voter_count: self.voter_count,
            threshold,
            tally,
            elected: None,
            eliminated: Vec::new(),
        };

        if let Some(widx) = find_winner(&self.candidates, self.voter_count) {
            let winner = &self.candidates[widx];
            if self.candidates.len() == 1 {
                self.log.push(format!(
                    "{} is the only remaining candidate and wins the election",
                    winner.name
                ));
            } else {
                self.log.push(format!(
                    "{} has a majority with {} of {} first choice votes and wins the election",
                    winner.name,
                    winner.first_choices(),
                    self.voter_count
                ));
            }
            let name = winner.name.clone();
            stats.elected = Some(name.clone());
            self.rounds.push(stats);
            self.state = ElectionState::Won;
            self.winner = Some(widx);
            return Ok(RoundOutcome::Winner(name));
        }

        let chosen = select_eliminated(
            &self.candidates,
            self.voter_count,
            self.rules.elimination_rule,
            round,
            rng,
            &mut self.log,
        );
        debug!("step: round {} eliminating indices {:?}", round, chosen);
        if chosen.is_empty() || chosen.len() >= self.candidates.len() {
            return Err(VotingErrors::NoConvergence);
        }

        // Survivors keep their relative order.
        let mut names: Vec<String> = Vec::new();
        let mut survivors: Vec<Candidate> = Vec::new();
        for (idx, c) in std::mem::take(&mut self.candidates).into_iter().enumerate() {
            if chosen.contains(&idx) {
                names.push(c.name.clone());
                self.eliminated.push(EliminatedCandidate {
                    round,
                    candidate: c,
                });
            } else {
                survivors.push(c);
            }
        }
        self.candidates = survivors;

        let norm = normalize(&mut self.candidates)?;
        if norm.voter_count < self.voter_count {
            self.log.push(format!(
                "{} no longer ranked any remaining candidate",
                plural(self.voter_count - norm.voter_count, "voter")
            ));
        }
        if !norm.fixed_voters.is_empty() {
            self.log.push(format!(
                "Moved up the next choices of {}",
                plural(norm.fixed_voters.len() as u64, "voter")
            ));
        }
        self.voter_count = norm.voter_count;

        stats.eliminated = names.clone();
        self.rounds.push(stats);
        Ok(RoundOutcome::Eliminated(names))
    }

    /// Runs rounds until a winner is declared.
    pub fn run(mut self, rng: &mut dyn RandomSource) -> Result<ElectionResult, VotingErrors> {
        while self.state != ElectionState::Won {
            self.step(rng)?;
        }
        let widx = self.winner.ok_or(VotingErrors::NoConvergence)?;
        let winner = self.candidates.swap_remove(widx);
        Ok(ElectionResult {
            winner,
            eliminated: self.eliminated,
            rounds: self.rounds,
            initially_fixed: self.initially_fixed,
            log: self.log.into_lines(),
        })
    }
}

/// Runs the voting algorithm with the given rules for the given candidates.
///
/// Ties are broken with the source described by the rules. To control the
/// tie breaks, use [`Election::run`] directly.
pub fn run_election(
    candidates: Vec<Candidate>,
    rules: &VoteRules,
) -> Result<ElectionResult, VotingErrors> {
    let mut source = rules.tiebreak_mode.source();
    Election::new(candidates, rules)?.run(source.as_mut())
}
