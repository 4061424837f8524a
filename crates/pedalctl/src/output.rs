//! Output formatting for CLI responses

use std::io::{self, Write};

use anyhow::Error;
use colored::*;
use openracing_pedal_throttle::{DriveMode, PedalConfig, PedalObservation, ThrottleSnapshot};
use serde_json::json;

use crate::commands::replay::ReplaySummary;
use crate::error::CliError;

/// Number of trailing history samples shown in human output.
const HISTORY_TAIL: usize = 10;

/// Print error in JSON format
pub fn print_error_json(error: &Error) {
    let error_json = json!({
        "success": false,
        "error": {
            "message": error.to_string(),
            "type": error_type_name(error)
        }
    });
    match serde_json::to_string_pretty(&error_json) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Failed to format error as JSON: {}", e),
    }
}

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    let mut source = error.source();
    while let Some(err) = source {
        eprintln!("  {} {}", "Caused by:".yellow(), err);
        source = err.source();
    }
}

fn error_type_name(error: &Error) -> &'static str {
    match error.downcast_ref::<CliError>() {
        Some(CliError::InvalidConfiguration(_)) => "invalid_configuration",
        Some(CliError::ReplayParse { .. }) => "replay_parse",
        Some(CliError::Shell(_)) => "engine",
        Some(CliError::IoError(_)) => "io",
        Some(CliError::JsonError(_)) => "json",
        Some(CliError::YamlError(_)) => "yaml",
        None => "unknown",
    }
}

/// Print the effective configuration as YAML or JSON.
pub fn print_config(config: &PedalConfig, json: bool) -> Result<(), CliError> {
    if json {
        let output = json!({
            "success": true,
            "config": config
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{}", serde_yaml::to_string(config)?);
    }
    Ok(())
}

/// Console status line: accumulated value, right pedal, middle pedal.
pub fn write_status_line<W: Write>(out: &mut W, snapshot: &ThrottleSnapshot) -> io::Result<()> {
    write!(
        out,
        "\rAccel: {} | R: {} | M: {}    ",
        snapshot.accel_count, snapshot.accelerator.raw_pressure, snapshot.brake.raw_pressure
    )?;
    out.flush()
}

/// Print the outcome of a replay.
pub fn print_replay_result(
    summary: &ReplaySummary,
    snapshot: &ThrottleSnapshot,
    json: bool,
) -> Result<(), CliError> {
    if json {
        let output = json!({
            "success": true,
            "summary": summary,
            "snapshot": snapshot,
            "outputs": snapshot.normalized_outputs(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_snapshot_human(snapshot);
    println!(
        "  {} {} applied, {} skipped, {} ticks",
        "Frames:".bold(),
        summary.frames_applied,
        summary.frames_skipped,
        snapshot.ticks
    );
    Ok(())
}

fn print_snapshot_human(snapshot: &ThrottleSnapshot) {
    let mode = match snapshot.drive_mode {
        DriveMode::Static => "Static".cyan(),
        DriveMode::Dynamic => "Dynamic".magenta(),
    };

    println!("{}", "Throttle State:".bold());
    println!("  {} {}", "Mode:".bold(), mode);
    println!(
        "  {} {} / {} ({:.1}%)",
        "Accel:".bold(),
        snapshot.accel_count,
        snapshot.max_accel,
        snapshot.normalized_speed() * 100.0
    );
    println!(
        "  {} accelerator {} | brake {} | clutch {}",
        "Pedals:".bold(),
        format_pedal(&snapshot.accelerator),
        format_pedal(&snapshot.brake),
        format_pedal(&snapshot.clutch)
    );
    println!("  {} {}", "Last report:".bold(), format_report(&snapshot.last_raw));

    let tail_start = snapshot.history.len().saturating_sub(HISTORY_TAIL);
    let tail = snapshot.history.get(tail_start..).unwrap_or_default();
    println!(
        "  {} {:?} ({} samples)",
        "History:".bold(),
        tail,
        snapshot.history.len()
    );
}

fn format_pedal(pedal: &PedalObservation) -> String {
    if pedal.pressed {
        format!("{}", pedal.raw_pressure).green().to_string()
    } else {
        "released".dimmed().to_string()
    }
}

fn format_report(report: &[u8]) -> String {
    report
        .iter()
        .map(|byte| format!("{byte:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}
