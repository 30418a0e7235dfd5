mod args;
mod bot;

use std::io::Write;
use std::path::Path;

use clap::Parser;
use log::{debug, info, warn};
use snafu::ErrorCompat;

use crate::args::{Args, Command};
use crate::bot::config_reader::{read_config, validate_rules, BotConfig};
use crate::bot::snapshot::{ChannelLock, FileChannel};
use crate::bot::*;
use runoff_tally::summary::SummaryMode;

fn execute(args: &Args) -> BotResult<String> {
    let config = match &args.config {
        Some(p) => read_config(Path::new(p))?,
        None => BotConfig::default(),
    };
    let channel_path = Path::new(args.channel.as_str());

    match args.command {
        Command::Run => {
            let rules = validate_rules(&config.rules, args.seed)?;
            info!("rules: {:?}", rules);
            let _lock = ChannelLock::acquire(channel_path)?;
            let mut channel = FileChannel::open(channel_path)?;
            let mut rng = rules.tiebreak_mode.source();
            let report = tabulate(&mut channel, &config, &rules, rng.as_mut(), &args.invoker)?;
            channel.save()?;
            if let Some(reference) = &args.reference {
                check_reference(&report, reference)?;
            }
            Ok(report)
        }
        Command::Summary { tally } => {
            let channel = FileChannel::open(channel_path)?;
            let mode = if tally {
                SummaryMode::Tally
            } else {
                SummaryMode::Ranks
            };
            summarize(&channel, &config, mode)
        }
        Command::Reset => {
            let _lock = ChannelLock::acquire(channel_path)?;
            let mut channel = FileChannel::open(channel_path)?;
            let reply = reset(&mut channel, &config, &args.invoker)?;
            channel.save()?;
            Ok(reply)
        }
        Command::Ping => {
            let channel = FileChannel::open(channel_path)?;
            Ok(ping(&channel, &config, &args.invoker))
        }
    }
}

fn main() {
    let args = Args::parse();

    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }
    debug!("args: {:?}", args);

    match execute(&args) {
        Ok(reply) => {
            let mut out = std::io::stdout();
            if let Err(e) = writeln!(out, "{}", reply) {
                warn!("Could not deliver the reply: {}", e);
            }
        }
        Err(e) => {
            warn!("Error occured {:?}", e);
            if let Some(bt) = ErrorCompat::backtrace(&e) {
                debug!("trace: {}", bt);
            }
            if let Err(e2) = writeln!(std::io::stderr(), "Error: {}", e) {
                warn!("Could not deliver the error message: {}", e2);
            }
            std::process::exit(1);
        }
    }
}
