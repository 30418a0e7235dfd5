use log::{debug, info, warn};

use runoff_tally::summary::{summary_report, SummaryMode};
use runoff_tally::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use text_diff::print_diff;

pub mod channel;
pub mod config_reader;
pub mod markers;
pub mod parse;
pub mod permissions;
pub mod snapshot;

use crate::bot::channel::ElectionChannel;
use crate::bot::config_reader::BotConfig;
use crate::bot::markers::*;
use crate::bot::parse::parse_channel_messages;
use crate::bot::permissions::{check_admin, has_role};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum BotError {
    #[snafu(display("Error opening file {path}"))]
    OpeningFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON: {source}"))]
    ParsingJson { source: serde_json::Error },

    #[snafu(display("Another election command is running on this channel (lock file {path})"))]
    ChannelBusy { path: String },
    #[snafu(display("Error creating lock file {path}"))]
    Locking {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Message {id} does not exist in this channel"))]
    UnknownMessage { id: String },

    #[snafu(display("Could not find election start message in \"{limit}\" messages."))]
    NoStartMarkerFound { limit: usize },
    #[snafu(display("Could not find any candidates in \"{limit}\" messages."))]
    NoCandidatesFound { limit: usize },
    #[snafu(display("This election is already finished. Reset it to run it again."))]
    AlreadyFinished {},
    #[snafu(display("{member} does not have the {role} role"))]
    PermissionDenied { member: String, role: String },
    #[snafu(display("Could not find the member \"{id}\" in this server"))]
    NoMember { id: String },

    #[snafu(display("{source}"))]
    Voting { source: VotingErrors },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type BotResult<T> = Result<T, BotError>;

/// Tabulates the election held in the channel and publishes the outcome.
///
/// Returns the report. Nothing is written to the channel unless a winner was
/// found.
pub fn tabulate(
    channel: &mut dyn ElectionChannel,
    config: &BotConfig,
    rules: &VoteRules,
    rng: &mut dyn RandomSource,
    invoker: &str,
) -> BotResult<String> {
    check_admin(channel, invoker, config.admin_role())?;

    let limit = config.max_messages();
    let messages = channel.fetch_recent(limit)?;
    let parsed = parse_channel_messages(&messages, limit, channel.bot_user())?;
    ensure!(
        !parsed.start.has_reaction(ELECTION_FINISHED),
        AlreadyFinishedSnafu {}
    );
    info!(
        "tabulate: election {} with {} candidates",
        parsed.start.id,
        parsed.candidates.len()
    );

    let election = parsed.builder(rules)?.build().context(VotingSnafu)?;
    let result = election.run(rng).context(VotingSnafu)?;
    let report = result.report();

    channel.reply(&parsed.start.id, &report)?;
    for e in result.eliminated.iter() {
        if let Some(id) = e.candidate.code.as_deref() {
            channel.add_reaction(id, LOSER)?;
        }
    }
    if let Some(id) = result.winner.code.as_deref() {
        channel.add_reaction(id, WINNER)?;
    }
    channel.add_reaction(&parsed.start.id, ELECTION_FINISHED)?;
    Ok(report)
}

/// The votes collected so far, without tabulating them.
pub fn summarize(
    channel: &dyn ElectionChannel,
    config: &BotConfig,
    mode: SummaryMode,
) -> BotResult<String> {
    let limit = config.max_messages();
    let messages = channel.fetch_recent(limit)?;
    let parsed = parse_channel_messages(&messages, limit, channel.bot_user())?;
    let builder = parsed.builder(&VoteRules::DEFAULT_RULES)?;
    Ok(summary_report(builder.collected(), mode).join("\n"))
}

/// Removes the outcome markers so that the election can be tabulated again.
pub fn reset(
    channel: &mut dyn ElectionChannel,
    config: &BotConfig,
    invoker: &str,
) -> BotResult<String> {
    check_admin(channel, invoker, config.admin_role())?;

    let limit = config.max_messages();
    let messages = channel.fetch_recent(limit)?;
    let parsed = parse_channel_messages(&messages, limit, channel.bot_user())?;
    channel.remove_reaction(&parsed.start.id, ELECTION_FINISHED)?;
    for c in parsed.candidates.iter() {
        channel.remove_reaction(&c.message_id, WINNER)?;
        channel.remove_reaction(&c.message_id, LOSER)?;
    }
    Ok(format!(
        "Election reset: {} candidates can be tabulated again.",
        parsed.candidates.len()
    ))
}

pub fn ping(channel: &dyn ElectionChannel, config: &BotConfig, invoker: &str) -> String {
    let admin = channel
        .member(invoker)
        .map(|m| has_role(channel, &m, config.admin_role()))
        .unwrap_or(false);
    format!("Pong! {}", admin)
}

/// Compares a report with a reference file, and prints the differences.
pub fn check_reference(report: &str, reference_path: &str) -> BotResult<()> {
    let reference = fs::read_to_string(reference_path).context(OpeningFileSnafu {
        path: reference_path.to_string(),
    })?;
    debug!("check_reference: reference: {:?}", reference);
    if reference.trim_end() != report.trim_end() {
        warn!("Found differences with the reference report");
        print_diff(reference.trim_end(), report.trim_end(), "\n");
        whatever!("Difference detected between the calculated report and the reference report")
    }
    Ok(())
}
