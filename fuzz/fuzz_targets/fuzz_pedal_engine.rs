//! Fuzzes the throttle engine with arbitrary report streams.
//!
//! Each 9-byte chunk is a time step (first byte) followed by an 8-byte
//! report; a time step with the high bit set also runs a decay tick.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_pedal_engine
#![no_main]
use libfuzzer_sys::fuzz_target;
use openracing_pedal_throttle::{RawPedalFrame, ThrottleEngine};
use std::time::{Duration, Instant};

fuzz_target!(|data: &[u8]| {
    let mut engine = ThrottleEngine::default();
    let max_accel = engine.config().max_accel;
    let mut now = Instant::now();

    for chunk in data.chunks(9) {
        let Some((&step, report)) = chunk.split_first() else {
            continue;
        };
        now += Duration::from_millis(u64::from(step & 0x7F) * 10);

        if step & 0x80 != 0 {
            engine.tick_decay(now);
        }
        if let Ok(frame) = RawPedalFrame::from_report(report) {
            engine.ingest_frame(&frame, now);
        }
        assert!(engine.accel_count() <= max_accel);
    }

    let snapshot = engine.snapshot();
    assert!(snapshot.history.len() <= engine.config().history_capacity);
});
