//! Parameters structure for AvCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::eqpt::{drive::MAX_WHEEL_SPEED_PCT, IndicatorDems, Rgb};
use log::warn;
use serde::Deserialize;

use super::ParamsError;
use crate::{
    headway_ctrl::HeadwayParams,
    phase_sched::{PhaseParams, SpeedPhase},
    start_ramp::RampParams,
    track_pos::LateralPosition,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for AV control.
///
/// Defaults are those of the reference ring track controller, so a parameter file only needs to
/// list the values which differ.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Params {

    // ---- SUB-MODULES ----

    pub headway: HeadwayParams,

    pub ramp: RampParams,

    pub phase: PhaseParams,

    pub steer: SteerParams,

    // ---- INDICATOR ----

    /// Below this speed on both wheels the low speed warning colour is shown.
    ///
    /// Units: percent
    pub low_speed_warning_pct: f64,

    /// What the indicator shows when there is no braking or low speed warning.
    pub indicator_mode: IndicatorMode,

    pub colours: ColourParams,
}

/// Wheel speeds for each lateral position.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SteerParams {
    /// Forward speed when centered, before drift correction.
    ///
    /// Units: percent
    pub base_forward_pct: f64,

    /// Right wheel speed when centered. Uses `base_forward_pct` if not set.
    ///
    /// Units: percent
    pub base_forward_right_pct: Option<f64>,

    /// Inner wheel speed when correcting a drift.
    ///
    /// Units: percent
    pub turn_speed_low_pct: f64,

    /// Outer wheel speed when correcting a drift.
    ///
    /// Units: percent
    pub turn_speed_high_pct: f64,

    /// Speed to reverse at when the track is lost.
    ///
    /// Units: percent
    pub reverse_speed_pct: f64,
}

/// Indicator colours.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColourParams {
    pub initial: Rgb,
    pub reduced: Rgb,
    pub full: Rgb,

    pub braking: Rgb,
    pub low_speed: Rgb,

    pub centered: IndicatorDems,
    pub drifting_right: IndicatorDems,
    pub drifting_left: IndicatorDems,
    pub lost: IndicatorDems,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Information displayed by the indicator in normal running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorMode {
    /// Show the mission speed phase.
    Phase,

    /// Show the lateral position on the track.
    Position,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            headway: HeadwayParams::default(),
            ramp: RampParams::default(),
            phase: PhaseParams::default(),
            steer: SteerParams::default(),
            low_speed_warning_pct: 20.0,
            indicator_mode: IndicatorMode::default(),
            colours: ColourParams::default(),
        }
    }
}

impl Params {
    /// Check the parameters are consistent.
    ///
    /// Warnings are logged for unusual but valid values.
    pub fn validate(&self) -> Result<(), ParamsError> {
        self.headway.validate()?;
        self.ramp.validate()?;
        self.phase.validate()?;
        self.steer.validate()?;

        if !(self.low_speed_warning_pct >= 0.0) {
            return Err(ParamsError::SpeedOutOfRange(
                "low_speed_warning_pct",
                self.low_speed_warning_pct
            ));
        }

        if self.headway.break_cm >= self.headway.min_cm {
            warn!(
                "headway break ({} cm) is not below headway min ({} cm), the speed multiplier \
                 will not reach zero before braking",
                self.headway.break_cm,
                self.headway.min_cm
            );
        }

        if self.colours.braking == self.colours.low_speed {
            warn!("Braking and low speed warning share the colour {}", self.colours.braking);
        }

        Ok(())
    }
}

impl Default for SteerParams {
    fn default() -> Self {
        Self {
            base_forward_pct: 85.0,
            base_forward_right_pct: None,
            turn_speed_low_pct: 60.0,
            turn_speed_high_pct: 100.0,
            reverse_speed_pct: 50.0,
        }
    }
}

impl SteerParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        let speeds = [
            ("base_forward_pct", self.base_forward_pct),
            ("base_forward_right_pct", self.base_forward_right()),
            ("turn_speed_low_pct", self.turn_speed_low_pct),
            ("turn_speed_high_pct", self.turn_speed_high_pct),
            ("reverse_speed_pct", self.reverse_speed_pct),
        ];

        for (name, speed) in speeds.iter() {
            if !(speed.abs() <= MAX_WHEEL_SPEED_PCT) {
                return Err(ParamsError::SpeedOutOfRange(*name, *speed));
            }
        }

        Ok(())
    }

    /// Right wheel speed when centered.
    pub fn base_forward_right(&self) -> f64 {
        self.base_forward_right_pct.unwrap_or(self.base_forward_pct)
    }
}

impl Default for ColourParams {
    fn default() -> Self {
        let green = Rgb::new(0x00, 0xff, 0x00);
        let red = Rgb::new(0xff, 0x00, 0x00);

        Self {
            initial: green,
            reduced: red,
            full: Rgb::new(0x00, 0xff, 0xff),
            braking: Rgb::new(0xff, 0xaa, 0x00),
            low_speed: Rgb::new(0xff, 0xff, 0x00),
            centered: IndicatorDems::both(green),
            drifting_right: IndicatorDems { left: green, right: red },
            drifting_left: IndicatorDems { left: red, right: green },
            lost: IndicatorDems::both(red),
        }
    }
}

impl ColourParams {
    /// Colour of a speed phase.
    pub fn phase(&self, phase: SpeedPhase) -> Rgb {
        match phase {
            SpeedPhase::Initial => self.initial,
            SpeedPhase::Reduced => self.reduced,
            SpeedPhase::Full => self.full,
        }
    }

    /// Colours of a lateral position.
    pub fn position(&self, position: LateralPosition) -> IndicatorDems {
        match position {
            LateralPosition::Centered => self.centered,
            LateralPosition::DriftingRight => self.drifting_right,
            LateralPosition::DriftingLeft => self.drifting_left,
            LateralPosition::Lost => self.lost,
        }
    }
}

impl Default for IndicatorMode {
    fn default() -> Self {
        IndicatorMode::Phase
    }
}
