//! # AV library.
//!
//! This library allows other crates in the workspace (and the benchmarks) to access items defined
//! inside the AV crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// AV control module - combines the control core into wheel and indicator demands each tick
pub mod av_ctrl;

/// Data store - per-cycle data of the executable
pub mod data_store;

/// Drift correction - run-lifetime bias counters for the ring track
pub mod drift_corr;

/// Tick driver - runs the startup sequence and control loop against a platform
pub mod exec;

/// Headway control - adaptive cruise speed multiplier and emergency braking
pub mod headway_ctrl;

/// Executable parameters
pub mod params;

/// Speed phase schedule
pub mod phase_sched;

/// Simulation platform - a kinematic robot on a ring track behind a lead vehicle
pub mod sim;

/// Start ramp - reaction delay and acceleration after a stop
pub mod start_ramp;

/// Startup synchronisation sequence
pub mod startup_seq;

/// Track position classification
pub mod track_pos;
