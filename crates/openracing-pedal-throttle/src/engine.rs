//! Pedal-to-virtual-throttle state machine.
//!
//! The engine maps raw pedal pressures and elapsed time into a bounded
//! acceleration value (`accel_count`) and a drive mode:
//!
//! - **Static**: accelerator and brake presses apply fixed, edge-triggered
//!   steps.
//! - **Dynamic**: accelerator and brake pressure drive the value
//!   proportionally on every frame, and the value decays passively on
//!   every N-th tick.
//!
//! The clutch toggles between the two modes (debounced). Leaving Dynamic
//! resets the value to zero.
//!
//! # Invariants
//!
//! After every call to [`ThrottleEngine::ingest_frame`] or
//! [`ThrottleEngine::tick_decay`], `0 <= accel_count <= max_accel`. All
//! arithmetic saturates; neither mutator can fail.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::config::ThrottleConfig;
use crate::debounce::DebounceGate;
use crate::edge_latch::{EdgeLatch, StepDecision};
use crate::error::ConfigResult;
use crate::frame::{REPORT_LEN, RawPedalFrame};
use crate::history::SpeedHistoryBuffer;
use crate::snapshot::{PedalObservation, ThrottleSnapshot};

/// Discrete drive mode selected by the clutch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DriveMode {
    #[default]
    Static,
    Dynamic,
}

impl DriveMode {
    #[inline]
    pub fn as_u8(self) -> u8 {
        match self {
            DriveMode::Static => 0,
            DriveMode::Dynamic => 1,
        }
    }

    #[inline]
    pub fn toggled(self) -> Self {
        match self {
            DriveMode::Static => DriveMode::Dynamic,
            DriveMode::Dynamic => DriveMode::Static,
        }
    }
}

impl std::fmt::Display for DriveMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DriveMode::Static => write!(f, "Static"),
            DriveMode::Dynamic => write!(f, "Dynamic"),
        }
    }
}

/// Accepted clutch transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeChange {
    pub from: DriveMode,
    pub to: DriveMode,
}

/// What a single [`ThrottleEngine::ingest_frame`] call did.
///
/// Returned so the caller can log after releasing any lock around the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameOutcome {
    pub accel_before: u16,
    pub accel_after: u16,
    /// The accelerator changed the value (step or continuous gain).
    pub accel_applied: bool,
    /// The brake passed threshold and debounce and changed the value.
    pub brake_applied: bool,
    pub mode_change: Option<ModeChange>,
}

/// What a single [`ThrottleEngine::tick_decay`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    pub decayed: bool,
    /// Value sampled into the history for this tick.
    pub sampled: u16,
}

/// The pedal state machine. Owns every piece of mutable pedal state.
#[derive(Debug, Clone)]
pub struct ThrottleEngine {
    config: ThrottleConfig,
    mode: DriveMode,
    accel_count: u16,

    accelerator: PedalObservation,
    brake: PedalObservation,
    clutch: PedalObservation,

    mode_gate: DebounceGate,
    brake_gate: DebounceGate,
    accel_latch: EdgeLatch,
    brake_latch: EdgeLatch,

    history: SpeedHistoryBuffer,
    decay_ticks: u32,

    last_raw: [u8; REPORT_LEN],
    last_frame_at: Option<Instant>,
    last_tick_at: Option<Instant>,
    frames_ingested: u64,
    ticks: u64,
}

impl ThrottleEngine {
    /// Create an engine in `Static` mode with `accel_count = 0`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration does not validate.
    pub fn new(config: ThrottleConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: ThrottleConfig) -> Self {
        Self {
            mode: DriveMode::Static,
            accel_count: 0,
            accelerator: PedalObservation::default(),
            brake: PedalObservation::default(),
            clutch: PedalObservation::default(),
            mode_gate: DebounceGate::new(config.mode_debounce()),
            brake_gate: DebounceGate::new(config.brake_debounce()),
            accel_latch: EdgeLatch::new(),
            brake_latch: EdgeLatch::new(),
            history: SpeedHistoryBuffer::new(config.history_capacity),
            decay_ticks: 0,
            last_raw: [0; REPORT_LEN],
            last_frame_at: None,
            last_tick_at: None,
            frames_ingested: 0,
            ticks: 0,
            config,
        }
    }

    /// Apply one input frame: accelerator, then brake, then clutch.
    ///
    /// The clutch runs last, so a switch back to `Static` in this frame
    /// resets the value only after the accelerator and brake have applied
    /// their dynamic-mode deltas for the same frame.
    pub fn ingest_frame(&mut self, frame: &RawPedalFrame, now: Instant) -> FrameOutcome {
        let accel_before = self.accel_count;

        self.last_raw = frame.report;
        self.last_frame_at = Some(now);
        self.frames_ingested = self.frames_ingested.saturating_add(1);

        let accel_applied = self.apply_accelerator(frame.accel_raw);
        let brake_applied = self.apply_brake(frame.brake_raw, now);
        let mode_change = self.apply_clutch(frame.clutch_raw, now);

        FrameOutcome {
            accel_before,
            accel_after: self.accel_count,
            accel_applied,
            brake_applied,
            mode_change,
        }
    }

    /// Periodic tick: passive decay in `Dynamic` mode, then sample history.
    pub fn tick_decay(&mut self, now: Instant) -> TickOutcome {
        self.last_tick_at = Some(now);
        self.ticks = self.ticks.saturating_add(1);

        let mut decayed = false;
        if self.mode == DriveMode::Dynamic {
            self.decay_ticks = self.decay_ticks.saturating_add(1);
            if self.decay_ticks >= self.config.decay_every_n_ticks {
                self.decay_ticks = 0;
                self.lower(self.config.decay_amount);
                decayed = true;
            }
        }

        self.history.push(self.accel_count);

        TickOutcome {
            decayed,
            sampled: self.accel_count,
        }
    }

    /// Copy out a consistent view of the current state.
    pub fn snapshot(&self) -> ThrottleSnapshot {
        ThrottleSnapshot {
            accel_count: self.accel_count,
            max_accel: self.config.max_accel,
            drive_mode: self.mode,
            accelerator: self.accelerator,
            brake: self.brake,
            clutch: self.clutch,
            last_raw: self.last_raw,
            history: self.history.snapshot(),
            frames_ingested: self.frames_ingested,
            ticks: self.ticks,
        }
    }

    fn apply_accelerator(&mut self, raw: u8) -> bool {
        self.accelerator = PedalObservation::from_raw(raw);
        if raw == 0 {
            self.accel_latch.reset();
            return false;
        }

        match self.mode {
            DriveMode::Static => {
                let decision = self
                    .accel_latch
                    .on_pressure(raw, self.config.accel_step_threshold);
                if decision != StepDecision::Step {
                    return false;
                }
                self.raise(self.config.accel_step);
            }
            DriveMode::Dynamic => {
                // Both adjustments apply independently; a light touch gets the
                // proportional gain (usually 0) plus the nudge.
                self.raise(u16::from(raw / self.config.dynamic_accel_divisor));
                if raw < self.config.light_touch_threshold {
                    self.raise(self.config.light_touch_nudge);
                }
            }
        }

        self.history.push(self.accel_count);
        true
    }

    fn apply_brake(&mut self, raw: u8, now: Instant) -> bool {
        self.brake = PedalObservation::from_raw(raw);
        if raw == 0 {
            self.brake_latch.reset();
            return false;
        }
        if raw <= self.config.brake_step_threshold || !self.brake_gate.try_accept(now) {
            return false;
        }

        match self.mode {
            DriveMode::Static => {
                let decision = self
                    .brake_latch
                    .on_pressure(raw, self.config.brake_step_threshold);
                if decision != StepDecision::Step {
                    return false;
                }
                self.lower(self.config.brake_step);
            }
            DriveMode::Dynamic => {
                self.lower(u16::from(raw).saturating_mul(self.config.dynamic_brake_multiplier));
            }
        }

        self.history.push(self.accel_count);
        true
    }

    fn apply_clutch(&mut self, raw: u8, now: Instant) -> Option<ModeChange> {
        self.clutch = PedalObservation::from_raw(raw);
        if raw <= self.config.clutch_mode_threshold || !self.mode_gate.try_accept(now) {
            return None;
        }

        let from = self.mode;
        let to = from.toggled();
        self.mode = to;
        self.decay_ticks = 0;
        if to == DriveMode::Static {
            self.accel_count = 0;
        }

        Some(ModeChange { from, to })
    }

    #[inline]
    fn raise(&mut self, amount: u16) {
        self.accel_count = self
            .accel_count
            .saturating_add(amount)
            .min(self.config.max_accel);
    }

    #[inline]
    fn lower(&mut self, amount: u16) {
        self.accel_count = self.accel_count.saturating_sub(amount);
    }

    #[inline]
    pub fn accel_count(&self) -> u16 {
        self.accel_count
    }

    #[inline]
    pub fn drive_mode(&self) -> DriveMode {
        self.mode
    }

    #[inline]
    pub fn config(&self) -> &ThrottleConfig {
        &self.config
    }

    #[inline]
    pub fn history(&self) -> &SpeedHistoryBuffer {
        &self.history
    }

    #[inline]
    pub fn last_frame_at(&self) -> Option<Instant> {
        self.last_frame_at
    }

    #[inline]
    pub fn last_tick_at(&self) -> Option<Instant> {
        self.last_tick_at
    }
}

impl Default for ThrottleEngine {
    fn default() -> Self {
        Self::build(ThrottleConfig::default())
    }
}
