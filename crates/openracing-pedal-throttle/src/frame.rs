//! Raw pedal frame extraction.
//!
//! The pedal set reports an 8-byte HID input report with one pressure byte
//! per pedal at fixed offsets:
//!
//! | Offset | Pedal       |
//! |--------|-------------|
//! | 2      | accelerator |
//! | 4      | brake       |
//! | 6      | clutch      |
//!
//! All other bytes are carried along for display only.

use serde::{Deserialize, Serialize};

use crate::error::{FrameError, FrameResult};

/// Length of the retained raw report.
pub const REPORT_LEN: usize = 8;

pub const ACCEL_OFFSET: usize = 2;
pub const BRAKE_OFFSET: usize = 4;
pub const CLUTCH_OFFSET: usize = 6;

const MIN_REPORT_LEN: usize = CLUTCH_OFFSET + 1;

/// One sample of raw pedal pressures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPedalFrame {
    pub accel_raw: u8,
    pub brake_raw: u8,
    pub clutch_raw: u8,
    /// First [`REPORT_LEN`] bytes of the source report, zero-padded.
    pub report: [u8; REPORT_LEN],
}

impl RawPedalFrame {
    /// Build a frame from the three pressures, synthesizing the report bytes.
    pub fn new(accel_raw: u8, brake_raw: u8, clutch_raw: u8) -> Self {
        let mut report = [0u8; REPORT_LEN];
        for (offset, value) in [
            (ACCEL_OFFSET, accel_raw),
            (BRAKE_OFFSET, brake_raw),
            (CLUTCH_OFFSET, clutch_raw),
        ] {
            if let Some(byte) = report.get_mut(offset) {
                *byte = value;
            }
        }
        Self {
            accel_raw,
            brake_raw,
            clutch_raw,
            report,
        }
    }

    /// Extract a frame from a device report.
    ///
    /// Bytes beyond [`REPORT_LEN`] are ignored; a report shorter than 8 bytes
    /// but long enough to reach the clutch offset is zero-padded.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::TooShort`] if the report does not reach the
    /// clutch offset. The caller should skip that cycle.
    pub fn from_report(data: &[u8]) -> FrameResult<Self> {
        let (Some(&accel_raw), Some(&brake_raw), Some(&clutch_raw)) = (
            data.get(ACCEL_OFFSET),
            data.get(BRAKE_OFFSET),
            data.get(CLUTCH_OFFSET),
        ) else {
            return Err(FrameError::TooShort {
                len: data.len(),
                min: MIN_REPORT_LEN,
            });
        };

        let mut report = [0u8; REPORT_LEN];
        for (dst, src) in report.iter_mut().zip(data) {
            *dst = *src;
        }

        Ok(Self {
            accel_raw,
            brake_raw,
            clutch_raw,
            report,
        })
    }

    #[inline]
    pub fn accel_pressed(&self) -> bool {
        self.accel_raw > 0
    }

    #[inline]
    pub fn brake_pressed(&self) -> bool {
        self.brake_raw > 0
    }

    #[inline]
    pub fn clutch_pressed(&self) -> bool {
        self.clutch_raw > 0
    }
}
