//! Concurrency tests for the pedal shell.
//!
//! Frames, ticks, and snapshots arrive from independent threads; every
//! operation must be atomic with respect to the others.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use openracing_pedal_throttle::{
    DriveMode, PedalConfig, PedalShell, RawPedalFrame, ShellHandle, TickerConfig,
};

fn shell() -> Result<PedalShell, Box<dyn std::error::Error>> {
    Ok(PedalShell::new(PedalConfig::default())?)
}

#[test]
fn test_concurrent_frames_and_ticks_are_all_counted() -> Result<(), Box<dyn std::error::Error>> {
    let shell = shell()?;
    let num_threads: u64 = 8;
    let ops_per_thread: u64 = 2_000;
    let t0 = Instant::now();

    let handles: Vec<_> = (0..num_threads)
        .map(|thread_id| {
            let handle = shell.handle();
            thread::spawn(move || {
                for i in 0..ops_per_thread {
                    let now = t0 + Duration::from_millis(i);
                    if thread_id % 2 == 0 {
                        let accel = u8::try_from(i % 256).unwrap_or(0);
                        handle.on_input_frame(&RawPedalFrame::new(accel, 0, 0), now);
                    } else {
                        handle.on_decay_tick(now);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().is_ok(), "thread panicked unexpectedly");
    }

    let snapshot = shell.snapshot();
    let per_kind = num_threads / 2 * ops_per_thread;
    assert_eq!(snapshot.frames_ingested, per_kind);
    assert_eq!(snapshot.ticks, per_kind);
    assert!(snapshot.accel_count <= snapshot.max_accel);
    Ok(())
}

#[test]
fn test_held_accelerator_from_many_threads_steps_once() -> Result<(), Box<dyn std::error::Error>> {
    let shell = shell()?;
    let t0 = Instant::now();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let handle = shell.handle();
            thread::spawn(move || {
                for _ in 0..500 {
                    handle.on_input_frame(&RawPedalFrame::new(50, 0, 0), t0);
                }
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().is_ok(), "thread panicked unexpectedly");
    }

    let snapshot = shell.snapshot();
    assert_eq!(snapshot.accel_count, 10);
    assert_eq!(snapshot.history, vec![10]);
    Ok(())
}

#[test]
fn test_snapshots_are_consistent_under_load() -> Result<(), Box<dyn std::error::Error>> {
    let shell = shell()?;
    let running = Arc::new(AtomicBool::new(true));
    let t0 = Instant::now();

    // Switch to Dynamic so every frame moves the value.
    shell.on_input_frame(&RawPedalFrame::new(0, 0, 20), t0);

    let writer = {
        let handle = shell.handle();
        let running = Arc::clone(&running);
        thread::spawn(move || {
            let mut i: u64 = 0;
            while running.load(Ordering::Acquire) {
                let now = t0 + Duration::from_millis(i);
                let accel = if i % 3 == 0 { 0 } else { 255 };
                let brake = if i % 7 == 0 { 200 } else { 0 };
                handle.on_input_frame(&RawPedalFrame::new(accel, brake, 0), now);
                handle.on_decay_tick(now);
                i = i.wrapping_add(1);
            }
        })
    };

    let reader = {
        let handle: ShellHandle = shell.handle();
        thread::spawn(move || {
            for _ in 0..2_000 {
                let snapshot = handle.snapshot();
                assert!(snapshot.accel_count <= snapshot.max_accel);
                assert!(snapshot.history.len() <= 100);
                assert!(snapshot.history.iter().all(|v| *v <= snapshot.max_accel));
                assert_eq!(snapshot.drive_mode, DriveMode::Dynamic);
                // Every value change is sampled in the same locked step.
                if let Some(last) = snapshot.history.last() {
                    assert_eq!(*last, snapshot.accel_count);
                }
            }
        })
    };

    assert!(reader.join().is_ok(), "reader panicked unexpectedly");
    running.store(false, Ordering::Release);
    assert!(writer.join().is_ok(), "writer panicked unexpectedly");
    Ok(())
}

#[test]
fn test_ticker_runs_alongside_input() -> Result<(), Box<dyn std::error::Error>> {
    let mut shell = PedalShell::new(PedalConfig {
        ticker: TickerConfig {
            tick_period_ms: 2,
            shutdown_timeout_ms: 2000,
        },
        ..Default::default()
    })?;
    shell.start_ticker()?;

    let handle = shell.handle();
    let producer = thread::spawn(move || {
        for _ in 0..200 {
            handle.on_input_frame(&RawPedalFrame::new(50, 0, 0), Instant::now());
            thread::sleep(Duration::from_micros(200));
        }
    });

    assert!(producer.join().is_ok(), "producer panicked unexpectedly");
    shell.stop_ticker()?;

    let snapshot = shell.snapshot();
    assert_eq!(snapshot.frames_ingested, 200);
    assert!(snapshot.ticks > 0);
    assert_eq!(snapshot.accel_count, 10);
    assert_eq!(snapshot.history.last().copied(), Some(10));
    Ok(())
}
