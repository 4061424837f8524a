//! Prelude module for common pedal-throttle types.
//!
//! This module provides a convenient way to import the most commonly used
//! types from the pedal-throttle crate.

pub use crate::config::{PedalConfig, ThrottleConfig, TickerConfig};
pub use crate::engine::{DriveMode, FrameOutcome, ThrottleEngine, TickOutcome};
pub use crate::error::{ConfigError, FrameError, ShellError, ShellResult};
pub use crate::frame::RawPedalFrame;
pub use crate::outputs::{NormalizedOutputs, OutputValues};
pub use crate::shell::{PedalShell, ShellHandle};
pub use crate::snapshot::{PedalObservation, ThrottleSnapshot};
pub use crate::{MAX_ACCEL, MAX_PRESSURE};
