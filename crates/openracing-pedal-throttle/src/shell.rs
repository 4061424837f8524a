//! Thread-safe shell around [`ThrottleEngine`].
//!
//! The engine lives behind a single mutex. Input frames and decay ticks are
//! serialized through it, and every snapshot is taken under the same lock so
//! readers never observe a half-applied frame. Logging happens after the
//! lock is released.
//!
//! [`PedalShell`] additionally owns an optional decay ticker thread that
//! calls [`ShellHandle::on_decay_tick`] at a fixed period. The ticker paces
//! itself against absolute deadlines, so a slow tick does not push every
//! later tick back.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use tracing::{debug, error, info, trace, warn};

use crate::config::{PedalConfig, TickerConfig};
use crate::engine::{DriveMode, FrameOutcome, ThrottleEngine, TickOutcome};
use crate::error::{ShellError, ShellResult};
use crate::frame::RawPedalFrame;
use crate::snapshot::ThrottleSnapshot;

const TICKER_THREAD_NAME: &str = "pedal-decay-ticker";

/// Cloneable entry point for producers and consumers on any thread.
#[derive(Debug, Clone)]
pub struct ShellHandle {
    engine: Arc<Mutex<ThrottleEngine>>,
}

impl ShellHandle {
    fn new(engine: ThrottleEngine) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
        }
    }

    /// Apply one input frame atomically with respect to ticks and snapshots.
    pub fn on_input_frame(&self, frame: &RawPedalFrame, now: Instant) -> FrameOutcome {
        let outcome = self.engine.lock().ingest_frame(frame, now);

        trace!(
            "Frame accel={} brake={} clutch={} -> {} (was {})",
            frame.accel_raw,
            frame.brake_raw,
            frame.clutch_raw,
            outcome.accel_after,
            outcome.accel_before
        );
        if let Some(change) = outcome.mode_change {
            debug!("Drive mode changed: {} -> {}", change.from, change.to);
            if change.to == DriveMode::Static {
                debug!("Acceleration reset to 0 on leaving {}", change.from);
            }
        }

        outcome
    }

    /// Run one decay tick atomically with respect to frames and snapshots.
    pub fn on_decay_tick(&self, now: Instant) -> TickOutcome {
        let outcome = self.engine.lock().tick_decay(now);
        if outcome.decayed {
            trace!("Decay tick -> {}", outcome.sampled);
        }
        outcome
    }

    pub fn snapshot(&self) -> ThrottleSnapshot {
        self.engine.lock().snapshot()
    }
}

struct TickerThread {
    stop_tx: Sender<()>,
    done_rx: Receiver<()>,
    join: JoinHandle<()>,
}

/// Engine plus its periodic decay ticker.
///
/// Dropping the shell stops the ticker.
pub struct PedalShell {
    handle: ShellHandle,
    ticker_config: TickerConfig,
    ticker: Option<TickerThread>,
}

impl PedalShell {
    /// # Errors
    ///
    /// Returns [`ShellError::Config`] if the configuration does not validate.
    pub fn new(config: PedalConfig) -> ShellResult<Self> {
        config.validate()?;
        let engine = ThrottleEngine::new(config.throttle)?;
        Ok(Self {
            handle: ShellHandle::new(engine),
            ticker_config: config.ticker,
            ticker: None,
        })
    }

    /// A handle sharing this shell's engine.
    pub fn handle(&self) -> ShellHandle {
        self.handle.clone()
    }

    pub fn on_input_frame(&self, frame: &RawPedalFrame, now: Instant) -> FrameOutcome {
        self.handle.on_input_frame(frame, now)
    }

    pub fn on_decay_tick(&self, now: Instant) -> TickOutcome {
        self.handle.on_decay_tick(now)
    }

    pub fn snapshot(&self) -> ThrottleSnapshot {
        self.handle.snapshot()
    }

    pub fn ticker_config(&self) -> &TickerConfig {
        &self.ticker_config
    }

    #[inline]
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    /// Start the periodic decay ticker.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::AlreadyRunning`] if the ticker is already
    /// started, or [`ShellError::SpawnFailed`] if the thread cannot be
    /// created.
    pub fn start_ticker(&mut self) -> ShellResult {
        if self.ticker.is_some() {
            return Err(ShellError::AlreadyRunning);
        }

        let period = self.ticker_config.tick_period();
        let (stop_tx, stop_rx) = channel::bounded::<()>(1);
        let (done_tx, done_rx) = channel::bounded::<()>(1);
        let handle = self.handle.clone();

        let join = thread::Builder::new()
            .name(TICKER_THREAD_NAME.to_string())
            .spawn(move || ticker_main(handle, period, stop_rx, done_tx))
            .map_err(|e| ShellError::SpawnFailed(e.to_string()))?;

        self.ticker = Some(TickerThread {
            stop_tx,
            done_rx,
            join,
        });

        info!("Decay ticker started with period {:?}", period);
        Ok(())
    }

    /// Signal the ticker and wait for it to exit.
    ///
    /// The wait is bounded by the configured shutdown timeout. On timeout the
    /// thread is detached. Stopping a shell whose ticker is not running is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::ShutdownTimeout`] if the ticker does not exit in
    /// time, or [`ShellError::TickerPanicked`] if it panicked.
    pub fn stop_ticker(&mut self) -> ShellResult {
        let Some(ticker) = self.ticker.take() else {
            return Ok(());
        };

        info!("Stopping decay ticker");
        let timeout = self.ticker_config.shutdown_timeout();

        // A full or disconnected stop channel means the ticker already saw a
        // stop signal or has exited; either way the done channel settles it.
        let _ = ticker.stop_tx.try_send(());

        match ticker.done_rx.recv_timeout(timeout) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {}
            Err(RecvTimeoutError::Timeout) => {
                warn!("Decay ticker did not stop within {:?}, detaching", timeout);
                return Err(ShellError::ShutdownTimeout(timeout));
            }
        }

        match ticker.join.join() {
            Ok(()) => {
                info!("Decay ticker stopped cleanly");
                Ok(())
            }
            Err(_) => {
                error!("Decay ticker panicked");
                Err(ShellError::TickerPanicked)
            }
        }
    }
}

impl std::fmt::Debug for PedalShell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PedalShell")
            .field("ticker_config", &self.ticker_config)
            .field("ticking", &self.is_ticking())
            .finish()
    }
}

impl Drop for PedalShell {
    fn drop(&mut self) {
        if let Err(e) = self.stop_ticker() {
            warn!("Decay ticker shutdown on drop failed: {}", e);
        }
    }
}

fn ticker_main(handle: ShellHandle, period: Duration, stop_rx: Receiver<()>, done_tx: Sender<()>) {
    let mut next_deadline = Instant::now() + period;

    loop {
        match stop_rx.recv_deadline(next_deadline) {
            Err(RecvTimeoutError::Timeout) => {
                handle.on_decay_tick(Instant::now());
                next_deadline += period;

                // Fell more than a period behind: skip the missed ticks
                // instead of bursting through them.
                let now = Instant::now();
                if next_deadline < now {
                    next_deadline = now + period;
                }
            }
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    let _ = done_tx.send(());
}
