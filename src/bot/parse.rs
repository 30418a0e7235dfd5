use log::{debug, warn};

use runoff_tally::builder::Builder;
use runoff_tally::{Candidate, Rank, VoteRules, VoterId};
use snafu::prelude::*;

use crate::bot::channel::ChannelMessage;
use crate::bot::markers::*;
use crate::bot::*;

/// A message flagged as a candidate, with the ballots cast on it.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CandidateRecord {
    pub message_id: String,
    pub name: String,
    pub ballots: Vec<(VoterId, Rank)>,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedElection {
    pub start: ChannelMessage,
    /// In the order they were posted.
    pub candidates: Vec<CandidateRecord>,
}

impl ParsedElection {
    /// A builder holding all the candidates and their ballots.
    pub fn builder(&self, rules: &VoteRules) -> BotResult<Builder> {
        let mut builder = Builder::new(rules).context(VotingSnafu)?;
        for record in self.candidates.iter() {
            let idx = builder.add_candidate(Candidate::with_code(
                record.name.clone(),
                record.message_id.clone(),
            ));
            for (voter, rank) in record.ballots.iter() {
                builder.add_vote_at(idx, voter, *rank).context(VotingSnafu)?;
            }
        }
        Ok(builder)
    }
}

fn read_candidate(message: &ChannelMessage, bot_user: &str) -> BotResult<CandidateRecord> {
    let candidate = Candidate::from_text(&message.content).context(VotingSnafu)?;
    let mut ballots: Vec<(VoterId, Rank)> = Vec::new();
    for reaction in message.reactions.iter() {
        if let Some(rank) = rank_of_marker(&reaction.emoji) {
            for user in reaction.users.iter().filter(|u| u.as_str() != bot_user) {
                ballots.push((VoterId::new(user.clone()), rank));
            }
        }
    }
    debug!(
        "read_candidate: {} ({}): {} ballots",
        candidate.name,
        message.id,
        ballots.len()
    );
    Ok(CandidateRecord {
        message_id: message.id.clone(),
        name: candidate.name,
        ballots,
    })
}

/// Finds the election in the most recent messages of a channel.
///
/// The messages come newest first. The election is made of the most recent
/// message with a start marker and the candidate messages posted after it.
pub fn parse_channel_messages(
    messages: &[ChannelMessage],
    limit: usize,
    bot_user: &str,
) -> BotResult<ParsedElection> {
    let mut candidates: Vec<CandidateRecord> = Vec::new();
    let mut start: Option<&ChannelMessage> = None;
    for message in messages.iter().take(limit) {
        if message.has_reaction(ELECTION_START) {
            start = Some(message);
            break;
        }
        if message.reactions.iter().any(|r| is_candidate_marker(&r.emoji)) {
            candidates.push(read_candidate(message, bot_user)?);
        }
    }
    let start = match start {
        Some(m) => m,
        None => {
            warn!("No start marker in the last {} messages", limit);
            return NoStartMarkerFoundSnafu { limit }.fail();
        }
    };
    ensure!(!candidates.is_empty(), NoCandidatesFoundSnafu { limit });
    candidates.reverse();
    Ok(ParsedElection {
        start: start.clone(),
        candidates,
    })
}
