//! pedalctl - Pedal Throttle Control CLI
//!
//! Replays recorded pedal reports through the throttle engine and inspects
//! the effective engine configuration.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod commands;
mod error;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::CliError;

#[derive(Parser)]
#[command(name = "pedalctl")]
#[command(about = "Pedal Throttle Control CLI - Replay pedal reports and inspect engine state")]
#[command(version)]
#[command(long_about = "
pedalctl drives the pedal-to-throttle engine from recorded HID reports.

Replay files hold one JSON object per line: {\"at_ms\": <u64>, \"report\": [<u8>, ...]}.
Use --json flag for machine-readable output suitable for scripting.
")]
struct Cli {
    /// Output format (human-readable or JSON)
    #[arg(
        long,
        global = true,
        help = "Output in JSON format for machine parsing"
    )]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Engine configuration file (YAML, or JSON by extension)
    #[arg(long, global = true, env = "PEDALCTL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded report stream through the engine
    Replay {
        /// Replay file, or `-` for stdin
        input: String,

        /// Pace frames by wall clock with the decay ticker running
        #[arg(long)]
        realtime: bool,
    },

    /// Print the effective engine configuration
    Config,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("pedalctl={log_level},openracing_pedal_throttle={log_level}").into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match execute_command(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                output::print_error_json(&e);
            } else {
                output::print_error_human(&e);
            }

            let exit_code = e.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            ExitCode::from(exit_code)
        }
    }
}

fn execute_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Replay { input, realtime } => {
            commands::replay::execute(input, cli.config.as_deref(), *realtime, cli.json)
        }
        Commands::Config => commands::config::execute(cli.config.as_deref(), cli.json),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn parse_replay_defaults() -> TestResult {
        let cli = Cli::try_parse_from(["pedalctl", "replay", "frames.jsonl"])?;
        assert!(!cli.json);
        assert_eq!(cli.verbose, 0);
        assert!(matches!(
            cli.command,
            Commands::Replay { ref input, realtime: false } if input == "frames.jsonl"
        ));
        Ok(())
    }

    #[test]
    fn parse_replay_stdin_realtime() -> TestResult {
        let cli = Cli::try_parse_from(["pedalctl", "replay", "-", "--realtime"])?;
        assert!(matches!(
            cli.command,
            Commands::Replay { ref input, realtime: true } if input == "-"
        ));
        Ok(())
    }

    #[test]
    fn parse_global_flags_after_subcommand() -> TestResult {
        let cli = Cli::try_parse_from([
            "pedalctl", "config", "--json", "--config", "pedals.yaml", "-vv",
        ])?;
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("pedals.yaml")));
        assert!(matches!(cli.command, Commands::Config));
        Ok(())
    }

    #[test]
    fn parse_replay_requires_input() {
        assert!(Cli::try_parse_from(["pedalctl", "replay"]).is_err());
    }

    #[test]
    fn parse_rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["pedalctl", "calibrate"]).is_err());
    }
}
