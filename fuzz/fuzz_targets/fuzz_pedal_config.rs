//! Fuzzes configuration parsing and engine construction.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_pedal_config
#![no_main]
use libfuzzer_sys::fuzz_target;
use openracing_pedal_throttle::{PedalConfig, PedalShell};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(config) = serde_yaml::from_str::<PedalConfig>(text) else {
        return;
    };
    // Validation and construction must agree.
    let valid = config.validate().is_ok();
    assert_eq!(PedalShell::new(config).is_ok(), valid);
});
