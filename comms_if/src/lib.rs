//! # Communications interface crate.
//!
//! Provides the interfaces between the controller and the robot's equipment.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Demand, sensor data and device definitions for equipment (motors, sensors, LEDs, buzzer)
pub mod eqpt;
