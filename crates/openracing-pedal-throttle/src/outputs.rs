//! Plain numeric values for output-channel collaborators.
//!
//! CAN writers, XCP publishers, and simulation output ports all consume the
//! same handful of values. These types carry them without any framing; wire
//! encoding stays with the collaborator.

use serde::{Deserialize, Serialize};

use crate::snapshot::ThrottleSnapshot;

/// Raw values as published to CAN/XCP variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputValues {
    pub accel_count: u16,
    /// 0 = Static, 1 = Dynamic.
    pub drive_mode: u8,
    pub accel_pressure: u8,
    pub brake_pressure: u8,
    pub clutch_pressed: bool,
}

impl From<&ThrottleSnapshot> for OutputValues {
    fn from(snapshot: &ThrottleSnapshot) -> Self {
        Self {
            accel_count: snapshot.accel_count,
            drive_mode: snapshot.drive_mode.as_u8(),
            accel_pressure: snapshot.accelerator.raw_pressure,
            brake_pressure: snapshot.brake.raw_pressure,
            clutch_pressed: snapshot.clutch.pressed,
        }
    }
}

/// Five unit-scaled output ports: speed, mode, throttle, brake, clutch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedOutputs {
    /// `accel_count / max_accel`
    pub speed: f64,
    /// 0.0 = Static, 1.0 = Dynamic
    pub mode: f64,
    /// `accel_pressure / 255`
    pub throttle: f64,
    /// `brake_pressure / 255`
    pub brake: f64,
    /// 1.0 while the clutch is pressed
    pub clutch: f64,
}

impl NormalizedOutputs {
    pub const PORT_COUNT: usize = 5;

    /// Values in port order.
    pub fn as_array(&self) -> [f64; Self::PORT_COUNT] {
        [self.speed, self.mode, self.throttle, self.brake, self.clutch]
    }
}

impl From<&ThrottleSnapshot> for NormalizedOutputs {
    fn from(snapshot: &ThrottleSnapshot) -> Self {
        let unit = |value: u16, full_scale: u16| {
            if full_scale == 0 {
                0.0
            } else {
                f64::from(value) / f64::from(full_scale)
            }
        };
        let pressure = u16::from(crate::MAX_PRESSURE);

        Self {
            speed: unit(snapshot.accel_count, snapshot.max_accel),
            mode: f64::from(snapshot.drive_mode.as_u8()),
            throttle: unit(u16::from(snapshot.accelerator.raw_pressure), pressure),
            brake: unit(u16::from(snapshot.brake.raw_pressure), pressure),
            clutch: if snapshot.clutch.pressed { 1.0 } else { 0.0 },
        }
    }
}
