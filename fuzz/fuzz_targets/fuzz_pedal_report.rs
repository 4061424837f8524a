//! Fuzzes pedal report extraction.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_pedal_report
#![no_main]
use libfuzzer_sys::fuzz_target;
use openracing_pedal_throttle::{ACCEL_OFFSET, BRAKE_OFFSET, CLUTCH_OFFSET, RawPedalFrame};

fuzz_target!(|data: &[u8]| {
    // Short reports are errors, never panics.
    if let Ok(frame) = RawPedalFrame::from_report(data) {
        assert_eq!(Some(&frame.accel_raw), data.get(ACCEL_OFFSET));
        assert_eq!(Some(&frame.brake_raw), data.get(BRAKE_OFFSET));
        assert_eq!(Some(&frame.clutch_raw), data.get(CLUTCH_OFFSET));
    }
});
