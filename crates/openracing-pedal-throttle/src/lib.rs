//! Pedal-to-virtual-throttle engine for sim racing pedal sets.
//!
//! This crate turns raw accelerator, brake, and clutch pressures (0–255 each)
//! into a bounded virtual acceleration value plus a discrete drive mode, and
//! keeps a rolling history of that value for display and telemetry replay.
//!
//! - **DebounceGate**: minimum elapsed time between accepted transitions
//! - **EdgeLatch**: one discrete step per sustained press, rearmed on release
//! - **SpeedHistoryBuffer**: fixed-capacity ring of sampled values
//! - **ThrottleEngine**: the state machine (`ingest_frame`, `tick_decay`, `snapshot`)
//! - **PedalShell**: lock-guarded engine plus a periodic decay ticker thread
//!
//! The crate performs no device or file I/O. Report acquisition, rendering,
//! and wire encoding belong to the caller.
//!
//! # Example
//!
//! ```
//! use openracing_pedal_throttle::{PedalConfig, PedalShell, RawPedalFrame};
//! use std::time::Instant;
//!
//! let shell = PedalShell::new(PedalConfig::default())?;
//! shell.on_input_frame(&RawPedalFrame::new(50, 0, 0), Instant::now());
//!
//! let snapshot = shell.snapshot();
//! assert_eq!(snapshot.accel_count, 10);
//! # Ok::<(), openracing_pedal_throttle::ShellError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]
#![deny(static_mut_refs)]
#![deny(unused_must_use)]

pub mod config;
pub mod debounce;
pub mod edge_latch;
pub mod engine;
pub mod error;
pub mod frame;
pub mod history;
pub mod outputs;
pub mod shell;
pub mod snapshot;

pub mod prelude;

pub use config::{MAX_HISTORY_CAPACITY, PedalConfig, ThrottleConfig, TickerConfig};
pub use debounce::DebounceGate;
pub use edge_latch::{EdgeLatch, StepDecision};
pub use engine::{DriveMode, FrameOutcome, ModeChange, ThrottleEngine, TickOutcome};
pub use error::{
    ConfigError, ConfigResult, FrameError, FrameResult, ShellError, ShellResult,
};
pub use frame::{RawPedalFrame, ACCEL_OFFSET, BRAKE_OFFSET, CLUTCH_OFFSET, REPORT_LEN};
pub use history::SpeedHistoryBuffer;
pub use outputs::{NormalizedOutputs, OutputValues};
pub use shell::{PedalShell, ShellHandle};
pub use snapshot::{PedalObservation, ThrottleSnapshot};

/// Upper bound of the virtual acceleration value with the default configuration.
pub const MAX_ACCEL: u16 = 300;

/// Full-scale raw pedal pressure.
pub const MAX_PRESSURE: u8 = u8::MAX;
