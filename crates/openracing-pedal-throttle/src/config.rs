//! Engine and ticker configuration.
//!
//! Every tunable of the pedal state machine lives here with its reference
//! default. Configuration is plain data: loading it from disk is the
//! caller's job.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Largest accepted speed history ring.
pub const MAX_HISTORY_CAPACITY: usize = 65_536;

/// Tunables of the pedal state machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThrottleConfig {
    /// Minimum time between accepted clutch mode changes (milliseconds).
    pub mode_debounce_ms: u64,
    /// Minimum time between accepted brake applications (milliseconds).
    pub brake_debounce_ms: u64,
    /// Accelerator pressure that must be exceeded for a static step.
    pub accel_step_threshold: u8,
    /// Brake pressure that must be exceeded for any brake action.
    pub brake_step_threshold: u8,
    /// Clutch pressure that must be exceeded to toggle the drive mode.
    pub clutch_mode_threshold: u8,
    /// Static-mode accelerator step size.
    pub accel_step: u16,
    /// Static-mode brake step size.
    pub brake_step: u16,
    /// Dynamic-mode accelerator gain is `raw / dynamic_accel_divisor`.
    pub dynamic_accel_divisor: u8,
    /// Dynamic-mode brake loss is `raw * dynamic_brake_multiplier`.
    pub dynamic_brake_multiplier: u16,
    /// Accelerator pressures below this get the light-touch nudge in dynamic mode.
    pub light_touch_threshold: u8,
    /// Size of the light-touch nudge.
    pub light_touch_nudge: u16,
    /// Passive decay fires once every this many ticks in dynamic mode.
    pub decay_every_n_ticks: u32,
    /// Amount removed by each passive decay.
    pub decay_amount: u16,
    /// Upper bound of the virtual acceleration value.
    pub max_accel: u16,
    /// Number of samples kept in the speed history ring.
    pub history_capacity: usize,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            mode_debounce_ms: 1000,
            brake_debounce_ms: 500,
            accel_step_threshold: 13,
            brake_step_threshold: 30,
            clutch_mode_threshold: 14,
            accel_step: 10,
            brake_step: 20,
            dynamic_accel_divisor: 5,
            dynamic_brake_multiplier: 2,
            light_touch_threshold: 2,
            light_touch_nudge: 1,
            decay_every_n_ticks: 10,
            decay_amount: 1,
            max_accel: crate::MAX_ACCEL,
            history_capacity: 100,
        }
    }
}

impl ThrottleConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a value would make the engine ill-defined
    /// (zero or oversized ring, zero divisor, zero bound, zero decay cadence).
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_accel == 0 {
            return Err(ConfigError::invalid("max_accel", "must be greater than 0"));
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::invalid(
                "history_capacity",
                "must be greater than 0",
            ));
        }
        if self.history_capacity > MAX_HISTORY_CAPACITY {
            return Err(ConfigError::invalid(
                "history_capacity",
                "must not exceed 65536",
            ));
        }
        if self.decay_every_n_ticks == 0 {
            return Err(ConfigError::invalid(
                "decay_every_n_ticks",
                "must be greater than 0",
            ));
        }
        if self.dynamic_accel_divisor == 0 {
            return Err(ConfigError::invalid(
                "dynamic_accel_divisor",
                "must be greater than 0",
            ));
        }
        Ok(())
    }

    #[inline]
    pub fn mode_debounce(&self) -> Duration {
        Duration::from_millis(self.mode_debounce_ms)
    }

    #[inline]
    pub fn brake_debounce(&self) -> Duration {
        Duration::from_millis(self.brake_debounce_ms)
    }
}

/// Pacing of the periodic decay ticker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TickerConfig {
    /// Period between decay ticks (milliseconds).
    pub tick_period_ms: u64,
    /// Upper bound on how long stopping the ticker may take (milliseconds).
    pub shutdown_timeout_ms: u64,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: 100,
            shutdown_timeout_ms: 2000,
        }
    }
}

impl TickerConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the period or the shutdown bound is zero.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.tick_period_ms == 0 {
            return Err(ConfigError::invalid(
                "tick_period_ms",
                "must be greater than 0",
            ));
        }
        if self.shutdown_timeout_ms == 0 {
            return Err(ConfigError::invalid(
                "shutdown_timeout_ms",
                "must be greater than 0",
            ));
        }
        Ok(())
    }

    #[inline]
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    #[inline]
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }
}

/// Complete configuration set for a [`crate::PedalShell`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PedalConfig {
    pub throttle: ThrottleConfig,
    pub ticker: TickerConfig,
}

impl PedalConfig {
    /// Validate both halves of the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first invalid value found.
    pub fn validate(&self) -> ConfigResult<()> {
        self.throttle.validate()?;
        self.ticker.validate()
    }
}
