//! # AV Executable Parameters
//!
//! This module provides parameters for the AV executable.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;
use std::time::Duration;

use crate::sim::SimParams;
use util::logger::LogParams;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AvExecParams {
    /// Target period of one cycle.
    ///
    /// Units: seconds
    pub cycle_period_s: f64,

    /// Time after which the executable stops, or 0 to run until killed.
    ///
    /// Units: seconds
    pub run_duration_s: f64,

    /// Parameter file for AvCtrl, relative to the params directory
    pub ctrl_params_file: String,

    /// Parameter file for the startup sequence, relative to the params directory
    pub startup_params_file: String,

    pub log: LogParams,

    pub sim: SimParams,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ExecParamsError {
    #[error("Cycle period must be positive and finite, found {0} s")]
    InvalidCyclePeriod(f64),

    #[error("Run duration must be zero or positive and finite, found {0} s")]
    InvalidRunDuration(f64),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for AvExecParams {
    fn default() -> Self {
        Self {
            cycle_period_s: 0.02,
            run_duration_s: 0.0,
            ctrl_params_file: String::from("av_ctrl.toml"),
            startup_params_file: String::from("startup_seq.toml"),
            log: LogParams::default(),
            sim: SimParams::default(),
        }
    }
}

impl AvExecParams {
    /// The target cycle period, or an error if it can't be slept for.
    pub fn cycle_period(&self) -> Result<Duration, ExecParamsError> {
        if !(self.cycle_period_s > 0.0) || !self.cycle_period_s.is_finite() {
            return Err(ExecParamsError::InvalidCyclePeriod(self.cycle_period_s));
        }

        Ok(Duration::from_secs_f64(self.cycle_period_s))
    }

    pub fn validate(&self) -> Result<(), ExecParamsError> {
        self.cycle_period()?;

        if !(self.run_duration_s >= 0.0) || !self.run_duration_s.is_finite() {
            return Err(ExecParamsError::InvalidRunDuration(self.run_duration_s));
        }

        Ok(())
    }
}
