//! Command implementations for pedalctl

pub mod config;
pub mod replay;
