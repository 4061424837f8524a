//! Owned, immutable views of engine state handed to consumers.

use serde::{Deserialize, Serialize};

use crate::MAX_PRESSURE;
use crate::engine::DriveMode;
use crate::frame::REPORT_LEN;
use crate::outputs::{NormalizedOutputs, OutputValues};

/// Latest observation of a single pedal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PedalObservation {
    pub raw_pressure: u8,
    /// True iff `raw_pressure > 0`.
    pub pressed: bool,
}

impl PedalObservation {
    pub fn from_raw(raw_pressure: u8) -> Self {
        Self {
            raw_pressure,
            pressed: raw_pressure > 0,
        }
    }

    /// Pedal travel in [0.0, 1.0].
    pub fn normalized(&self) -> f32 {
        f32::from(self.raw_pressure) / f32::from(MAX_PRESSURE)
    }
}

/// Consistent copy of everything a renderer or publisher needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThrottleSnapshot {
    pub accel_count: u16,
    pub max_accel: u16,
    pub drive_mode: DriveMode,
    pub accelerator: PedalObservation,
    pub brake: PedalObservation,
    pub clutch: PedalObservation,
    /// Raw bytes of the last ingested report.
    pub last_raw: [u8; REPORT_LEN],
    /// Sampled acceleration values, oldest first.
    pub history: Vec<u16>,
    pub frames_ingested: u64,
    pub ticks: u64,
}

impl ThrottleSnapshot {
    /// Acceleration value in [0.0, 1.0] relative to `max_accel`.
    pub fn normalized_speed(&self) -> f32 {
        if self.max_accel == 0 {
            return 0.0;
        }
        f32::from(self.accel_count) / f32::from(self.max_accel)
    }

    pub fn output_values(&self) -> OutputValues {
        OutputValues::from(self)
    }

    pub fn normalized_outputs(&self) -> NormalizedOutputs {
        NormalizedOutputs::from(self)
    }
}
