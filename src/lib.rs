//! Time-windowed dashboard for Modbus sensor logs.
//!
//! The library holds everything except the egui shell: loading, time-window
//! filtering, chart titles, series building and the UI state machine.

pub mod chart;
pub mod color;
pub mod config;
pub mod data;
pub mod state;
