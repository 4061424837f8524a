//! Replay recorded pedal reports through the engine.
//!
//! Input is one JSON object per line:
//!
//! ```text
//! {"at_ms": 0, "report": [0, 0, 50, 0, 0, 0, 0, 0]}
//! {"at_ms": 120, "report": [0, 0, 0, 0, 40, 0, 0, 0]}
//! ```
//!
//! `at_ms` is the offset from the start of the recording. In the default
//! deterministic mode the decay ticks run on a virtual clock: every
//! `tick_period_ms` boundary at or before a frame's timestamp fires before
//! that frame is applied. A record may not be more than
//! [`MAX_CATCHUP_TICKS`] tick periods ahead of the virtual clock. In realtime
//! mode the shell's ticker thread runs and frames are paced by the wall clock.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use openracing_pedal_throttle::{PedalShell, RawPedalFrame};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::CliError;
use crate::output;

/// Most virtual ticks a single record may advance the clock by.
pub const MAX_CATCHUP_TICKS: u64 = 1_000_000;

/// One line of a replay file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReplayRecord {
    pub at_ms: u64,
    pub report: Vec<u8>,
}

/// Counters reported after a replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    pub frames_applied: u64,
    /// Records whose report was too short to parse.
    pub frames_skipped: u64,
    /// Virtual-clock ticks driven by the replay (0 in realtime mode).
    pub virtual_ticks: u64,
}

/// Parse one replay line. Blank lines yield `None`.
pub fn parse_line(line_no: usize, line: &str) -> Result<Option<ReplayRecord>, CliError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|e| CliError::ReplayParse {
            line: line_no,
            message: e.to_string(),
        })
}

fn offset(origin: Instant, at_ms: u64, line_no: usize) -> Result<Instant, CliError> {
    origin
        .checked_add(Duration::from_millis(at_ms))
        .ok_or_else(|| CliError::ReplayParse {
            line: line_no,
            message: format!("timestamp {at_ms} ms out of range"),
        })
}

/// Timestamps must not go backwards; a late record is applied at the
/// previous timestamp.
fn monotonic(at_ms: u64, last_at_ms: u64, line_no: usize) -> u64 {
    if at_ms < last_at_ms {
        warn!(
            "Line {}: timestamp {} ms precedes {} ms, clamping",
            line_no, at_ms, last_at_ms
        );
        last_at_ms
    } else {
        at_ms
    }
}

/// Number of tick boundaries in `next_tick_ms..=at_ms`.
fn ticks_due(
    next_tick_ms: Option<u64>,
    at_ms: u64,
    period_ms: u64,
    line_no: usize,
) -> Result<u64, CliError> {
    let Some(next) = next_tick_ms.filter(|next| *next <= at_ms) else {
        return Ok(0);
    };
    let due = at_ms
        .saturating_sub(next)
        .checked_div(period_ms)
        .unwrap_or_default()
        .saturating_add(1);
    if due > MAX_CATCHUP_TICKS {
        return Err(CliError::ReplayParse {
            line: line_no,
            message: format!(
                "timestamp {at_ms} ms is {due} ticks ahead of the replay clock (limit {MAX_CATCHUP_TICKS})"
            ),
        });
    }
    Ok(due)
}

fn apply(
    shell: &PedalShell,
    record: &ReplayRecord,
    now: Instant,
    line_no: usize,
    summary: &mut ReplaySummary,
) -> bool {
    match RawPedalFrame::from_report(&record.report) {
        Ok(frame) => {
            shell.on_input_frame(&frame, now);
            summary.frames_applied = summary.frames_applied.saturating_add(1);
            true
        }
        Err(e) => {
            warn!("Line {}: skipping report: {}", line_no, e);
            summary.frames_skipped = summary.frames_skipped.saturating_add(1);
            false
        }
    }
}

/// Replay on a virtual clock. Output depends only on the input.
pub fn replay_deterministic<R: BufRead>(
    reader: R,
    shell: &PedalShell,
) -> Result<ReplaySummary, CliError> {
    let origin = Instant::now();
    let period_ms = shell.ticker_config().tick_period_ms;
    // `None` once the next boundary no longer fits in a u64.
    let mut next_tick_ms = Some(period_ms);
    let mut last_at_ms = 0u64;
    let mut summary = ReplaySummary::default();

    for (index, line) in reader.lines().enumerate() {
        let line_no = index.saturating_add(1);
        let line = line?;
        let Some(record) = parse_line(line_no, &line)? else {
            continue;
        };

        let at_ms = monotonic(record.at_ms, last_at_ms, line_no);
        last_at_ms = at_ms;

        for _ in 0..ticks_due(next_tick_ms, at_ms, period_ms, line_no)? {
            let Some(tick_ms) = next_tick_ms else {
                break;
            };
            shell.on_decay_tick(offset(origin, tick_ms, line_no)?);
            summary.virtual_ticks = summary.virtual_ticks.saturating_add(1);
            next_tick_ms = tick_ms.checked_add(period_ms);
        }

        apply(shell, &record, offset(origin, at_ms, line_no)?, line_no, &mut summary);
    }

    Ok(summary)
}

/// Replay against the wall clock with the ticker thread running, writing a
/// status line to `out` after every frame.
pub fn replay_realtime<R: BufRead, W: Write>(
    reader: R,
    shell: &mut PedalShell,
    out: &mut W,
) -> Result<ReplaySummary, CliError> {
    shell.start_ticker()?;
    let origin = Instant::now();
    let period_ms = shell.ticker_config().tick_period_ms;
    let mut last_at_ms = 0u64;
    let mut summary = ReplaySummary::default();

    for (index, line) in reader.lines().enumerate() {
        let line_no = index.saturating_add(1);
        let line = line?;
        let Some(record) = parse_line(line_no, &line)? else {
            continue;
        };

        let at_ms = monotonic(record.at_ms, last_at_ms, line_no);
        ticks_due(last_at_ms.checked_add(period_ms), at_ms, period_ms, line_no)?;
        last_at_ms = at_ms;

        let due = offset(origin, at_ms, line_no)?;
        let wait = due.saturating_duration_since(Instant::now());
        if !wait.is_zero() {
            thread::sleep(wait);
        }

        if apply(shell, &record, Instant::now(), line_no, &mut summary) {
            output::write_status_line(out, &shell.snapshot())?;
        }
    }

    writeln!(out)?;
    shell.stop_ticker()?;
    Ok(summary)
}

fn open_input(input: &str) -> Result<Box<dyn BufRead>, CliError> {
    if input == "-" {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file = File::open(Path::new(input))?;
    Ok(Box::new(BufReader::new(file)))
}

/// Run the `replay` command.
pub fn execute(
    input: &str,
    config_path: Option<&Path>,
    realtime: bool,
    json: bool,
) -> anyhow::Result<()> {
    let config = super::config::load(config_path)?;
    let mut shell = PedalShell::new(config).map_err(CliError::from)?;
    let reader = open_input(input)?;

    info!(
        "Replaying {} ({} mode)",
        input,
        if realtime { "realtime" } else { "deterministic" }
    );

    // Status lines stay off stdout when it carries the JSON document.
    let summary = if realtime && json {
        replay_realtime(reader, &mut shell, &mut io::stderr().lock())?
    } else if realtime {
        replay_realtime(reader, &mut shell, &mut io::stdout().lock())?
    } else {
        replay_deterministic(reader, &shell)?
    };

    info!(
        "Replay finished: {} applied, {} skipped",
        summary.frames_applied, summary.frames_skipped
    );
    output::print_replay_result(&summary, &shell.snapshot(), json)?;
    Ok(())
}
