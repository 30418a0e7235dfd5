use clap::{Parser, Subcommand};

/// Runs instant-runoff elections held in a chat channel.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The channel holding the election, as a JSON snapshot of its messages and members.
    #[clap(long, value_parser)]
    pub channel: String,

    /// (file path, optional) The configuration of the bot in JSON format: admin role, number of messages to scan
    /// and tabulation rules.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (member id) The member who issued the command.
    #[clap(short, long, value_parser)]
    pub invoker: String,

    /// (file path, optional) A reference report. If provided, the tabulated report must match it.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (integer, optional) The seed for breaking ties. Overrides the randomSeed of the configuration.
    #[clap(long, value_parser)]
    pub seed: Option<u64>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Tabulates the election and marks the winner and the eliminated candidates.
    Run,
    /// Shows the votes collected so far.
    Summary {
        /// Counts the votes for each rank instead of listing every voter.
        #[clap(long, takes_value = false)]
        tally: bool,
    },
    /// Removes the outcome markers, so that the election can be tabulated again.
    Reset,
    /// Checks that the bot is working, and whether the invoker may manage elections.
    Ping,
}
