//! Property-based tests for the throttle engine.
//!
//! Random interleavings of pedal frames and decay ticks, on a virtual clock,
//! must keep the acceleration value bounded and respect both debounce gates.

use openracing_pedal_throttle::{
    DriveMode, RawPedalFrame, SpeedHistoryBuffer, ThrottleConfig, ThrottleEngine,
};
use proptest::prelude::*;
use quickcheck_macros::quickcheck;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
enum Event {
    Frame {
        accel: u8,
        brake: u8,
        clutch: u8,
        gap_ms: u64,
    },
    Tick {
        gap_ms: u64,
    },
}

fn event_strategy() -> impl Strategy<Value = Event> {
    prop_oneof![
        3 => (any::<u8>(), any::<u8>(), any::<u8>(), 0u64..700).prop_map(
            |(accel, brake, clutch, gap_ms)| Event::Frame {
                accel,
                brake,
                clutch,
                gap_ms,
            }
        ),
        1 => (0u64..200).prop_map(|gap_ms| Event::Tick { gap_ms }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// The value stays within [0, max_accel] after every operation.
    #[test]
    fn prop_accel_count_bounded(
        events in prop::collection::vec(event_strategy(), 0..200),
        max_accel in 1u16..=1000,
    ) {
        let mut engine = ThrottleEngine::new(ThrottleConfig {
            max_accel,
            ..Default::default()
        }).map_err(|e| TestCaseError::fail(e.to_string()))?;

        let mut now = Instant::now();
        for event in events {
            match event {
                Event::Frame { accel, brake, clutch, gap_ms } => {
                    now += Duration::from_millis(gap_ms);
                    let outcome = engine.ingest_frame(&RawPedalFrame::new(accel, brake, clutch), now);
                    prop_assert!(outcome.accel_after <= max_accel);
                }
                Event::Tick { gap_ms } => {
                    now += Duration::from_millis(gap_ms);
                    let outcome = engine.tick_decay(now);
                    prop_assert!(outcome.sampled <= max_accel);
                }
            }
            prop_assert!(engine.accel_count() <= max_accel);
        }
    }

    /// Accepted mode changes are at least the debounce interval apart.
    #[test]
    fn prop_mode_changes_respect_debounce(
        events in prop::collection::vec(event_strategy(), 0..200),
    ) {
        let mut engine = ThrottleEngine::default();
        let debounce = engine.config().mode_debounce();
        let mut now = Instant::now();
        let mut last_change: Option<Instant> = None;

        for event in events {
            if let Event::Frame { accel, brake, clutch, gap_ms } = event {
                now += Duration::from_millis(gap_ms);
                let outcome = engine.ingest_frame(&RawPedalFrame::new(accel, brake, clutch), now);
                if outcome.mode_change.is_some() {
                    if let Some(previous) = last_change {
                        prop_assert!(now.duration_since(previous) >= debounce);
                    }
                    last_change = Some(now);
                }
            }
        }
    }

    /// Leaving Dynamic always lands on zero.
    #[test]
    fn prop_static_entry_resets(
        accel_presses in prop::collection::vec(1u8..=255, 0..20),
    ) {
        let t0 = Instant::now();
        let mut engine = ThrottleEngine::default();
        engine.ingest_frame(&RawPedalFrame::new(0, 0, 20), t0);
        prop_assert_eq!(engine.drive_mode(), DriveMode::Dynamic);

        for (i, accel) in accel_presses.iter().enumerate() {
            engine.ingest_frame(&RawPedalFrame::new(*accel, 0, 0), t0 + Duration::from_millis(i as u64));
        }

        let outcome = engine.ingest_frame(&RawPedalFrame::new(0, 0, 20), t0 + Duration::from_secs(1));
        prop_assert_eq!(engine.drive_mode(), DriveMode::Static);
        prop_assert_eq!(outcome.accel_after, 0);
    }

    /// Holding the accelerator above the threshold in Static steps exactly once.
    #[test]
    fn prop_static_hold_steps_once(
        pressures in prop::collection::vec(14u8..=255, 1..50),
    ) {
        let t0 = Instant::now();
        let mut engine = ThrottleEngine::default();
        for (i, pressure) in pressures.iter().enumerate() {
            engine.ingest_frame(&RawPedalFrame::new(*pressure, 0, 0), t0 + Duration::from_millis(i as u64));
        }
        prop_assert_eq!(engine.accel_count(), 10);
    }

    /// In Static, ticks never move the value.
    #[test]
    fn prop_static_ticks_are_inert(ticks in 0usize..100) {
        let t0 = Instant::now();
        let mut engine = ThrottleEngine::default();
        engine.ingest_frame(&RawPedalFrame::new(50, 0, 0), t0);
        for i in 0..ticks {
            engine.tick_decay(t0 + Duration::from_millis(100 * i as u64));
        }
        prop_assert_eq!(engine.accel_count(), 10);
        prop_assert_eq!(engine.history().len(), (ticks + 1).min(100));
    }

    /// Any report long enough to reach the clutch byte parses; shorter ones do not.
    #[test]
    fn prop_report_length_boundary(data in prop::collection::vec(any::<u8>(), 0..32)) {
        let parsed = RawPedalFrame::from_report(&data);
        prop_assert_eq!(parsed.is_ok(), data.len() >= 7);
        if let Ok(frame) = parsed {
            prop_assert_eq!(Some(&frame.accel_raw), data.get(2));
            prop_assert_eq!(Some(&frame.brake_raw), data.get(4));
            prop_assert_eq!(Some(&frame.clutch_raw), data.get(6));
        }
    }
}

#[quickcheck]
fn history_keeps_most_recent_samples(capacity: u8, values: Vec<u16>) -> bool {
    let capacity = usize::from(capacity.max(1));
    let mut history = SpeedHistoryBuffer::new(capacity);
    for value in &values {
        history.push(*value);
    }

    let expected: Vec<u16> = values
        .iter()
        .skip(values.len().saturating_sub(capacity))
        .copied()
        .collect();
    history.snapshot() == expected
}

#[quickcheck]
fn history_latest_matches_last_push(values: Vec<u16>) -> bool {
    let mut history = SpeedHistoryBuffer::new(16);
    for value in &values {
        history.push(*value);
    }
    history.latest() == values.last().copied()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// In Dynamic with no pedal input, n ticks remove exactly n / 10.
    #[test]
    fn prop_decay_cadence(start_presses in 1usize..6, ticks in 0u64..200) {
        let t0 = Instant::now();
        let mut engine = ThrottleEngine::default();
        engine.ingest_frame(&RawPedalFrame::new(0, 0, 20), t0);
        for i in 0..start_presses {
            engine.ingest_frame(&RawPedalFrame::new(250, 0, 0), t0 + Duration::from_millis(i as u64));
        }
        let start = engine.accel_count();

        for i in 0..ticks {
            engine.tick_decay(t0 + Duration::from_millis(100 * i));
        }

        let expected = start.saturating_sub(u16::try_from(ticks / 10).unwrap_or(u16::MAX));
        prop_assert_eq!(engine.accel_count(), expected);
    }
}
