//! AV control module
//!
//! Combines track position, drift correction, headway control, the start ramp and the speed
//! phase schedule into wheel speed and indicator demands, once per tick.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod indicator;
mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use indicator::*;
pub use params::*;
pub use state::*;

use util::params::LoadError;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Invalid controller parameters.
#[derive(Debug, thiserror::Error)]
pub enum ParamsError {
    #[error("headway min ({0} cm) must be below headway max ({1} cm)")]
    HeadwayMinNotBelowMax(f64, f64),

    #[error("headway break ({0} cm) must be below headway max ({1} cm)")]
    HeadwayBreakNotBelowMax(f64, f64),

    #[error("Restart reaction delay cannot be negative, found {0} ms")]
    NegativeReactionDelay(f64),

    #[error("Ramp acceleration rate must be positive, found {0}")]
    NonPositiveAccelRate(f64),

    #[error("Activation threshold ({0} s) must not be after the speedup threshold ({1} s)")]
    PhaseThresholdsOutOfOrder(f64, f64),

    #[error("Multiplier {0} cannot be negative, found {1}")]
    NegativeMultiplier(&'static str, f64),

    #[error("Speed {0} must be within [-100, 100] %, found {1}")]
    SpeedOutOfRange(&'static str, f64),
}

/// Possible errors that can occur during AvCtrl initialisation.
#[derive(Debug, thiserror::Error)]
pub enum AvCtrlInitError {
    #[error("Could not load AvCtrl parameters: {0}")]
    ParamLoadError(LoadError),

    #[error("Invalid AvCtrl parameters: {0}")]
    InvalidParams(ParamsError),
}
