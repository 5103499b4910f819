//! Implementations for the AvCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use comms_if::eqpt::{IndicatorDems, LineSensData, WheelDems};
use log::{info, trace, warn};

// Internal
use super::{select_indicator, AvCtrlInitError, Params, ParamsError};
use crate::{
    drift_corr::{DriftBias, DriftCorrector},
    headway_ctrl,
    phase_sched::{self, SpeedPhase},
    start_ramp::{RampState, StartRamp},
    track_pos::LateralPosition,
};
use util::{module::State, params};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// AV control module.
#[derive(Default)]
pub struct AvCtrl {
    pub(crate) params: Params,

    pub(crate) state: ControllerState,

    pub(crate) report: StatusReport,
}

/// Everything the controller remembers between ticks.
#[derive(Debug, Clone, Default)]
pub struct ControllerState {
    /// Time since the control loop became active.
    ///
    /// Units: seconds
    pub mission_clock_s: f64,

    /// Position on the last tick the track was classified, `None` before the first one.
    pub previous_position: Option<LateralPosition>,

    pub drift: DriftCorrector,

    pub ramp: StartRamp,

    /// Phase on the previous tick, used to report phase changes.
    pub phase: Option<SpeedPhase>,
}

/// Input data to AV control.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputData {
    pub line: LineSensData,

    /// Distance to the vehicle ahead.
    ///
    /// Units: centimeters
    pub headway_cm: f64,

    /// Time since the previous tick.
    ///
    /// Units: seconds
    pub dt_s: f64,
}

/// Demands from AvCtrl that the platform must execute.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OutputData {
    pub wheels: WheelDems,
    pub indicator: IndicatorDems,
}

/// Status report for AvCtrl processing.
#[derive(Debug, Clone, Copy)]
pub struct StatusReport {
    pub mission_clock_s: f64,

    /// Position this tick, `None` if the track was not classified (emergency stop).
    pub position: Option<LateralPosition>,

    pub drift_bias: DriftBias,

    pub headway_mult: f64,
    pub emergency_stop: bool,

    pub ramp_state: RampState,
    pub ramp_factor: f64,

    /// True while the robot is held stationary by an emergency stop or the restart delay.
    pub stopped: bool,

    pub phase: SpeedPhase,
    pub phase_mult: f64,

    pub low_speed: bool,

    /// True if the tick interval was invalid and replaced by zero.
    pub dt_invalid: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for StatusReport {
    fn default() -> Self {
        Self {
            mission_clock_s: 0.0,
            position: None,
            drift_bias: DriftBias::default(),
            headway_mult: 0.0,
            emergency_stop: false,
            ramp_state: RampState::Stopped,
            ramp_factor: 0.0,
            stopped: true,
            phase: SpeedPhase::Initial,
            phase_mult: 1.0,
            low_speed: false,
            dt_invalid: false,
        }
    }
}

impl AvCtrl {
    /// Create a new controller from already loaded parameters.
    pub fn new(params: Params) -> Result<Self, ParamsError> {
        params.validate()?;

        Ok(Self {
            params,
            ..Self::default()
        })
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// Nominal wheel speeds for a position, before any multiplier.
    fn nominal_speeds(&self, position: LateralPosition) -> (f64, f64) {
        let steer = &self.params.steer;

        match position {
            LateralPosition::Centered => (
                self.state.drift.correction_for(steer.base_forward_pct),
                steer.base_forward_right()
            ),
            LateralPosition::DriftingRight => (steer.turn_speed_low_pct, steer.turn_speed_high_pct),
            LateralPosition::DriftingLeft => (steer.turn_speed_high_pct, steer.turn_speed_low_pct),
            LateralPosition::Lost => (-steer.reverse_speed_pct, -steer.reverse_speed_pct),
        }
    }
}

impl State for AvCtrl {
    type InitData = String;
    type InitError = AvCtrlInitError;

    type InputData = InputData;
    type OutputData = OutputData;
    type StatusReport = StatusReport;
    type ProcError = std::convert::Infallible;

    /// Initialise the AvCtrl module.
    ///
    /// Expected init data is the path to the parameter file. Any state from a previous run is
    /// discarded.
    fn init(&mut self, init_data: Self::InitData) -> Result<(), Self::InitError> {
        let params: Params = params::load(&init_data)
            .map_err(AvCtrlInitError::ParamLoadError)?;

        params.validate().map_err(AvCtrlInitError::InvalidParams)?;

        self.params = params;
        self.state = ControllerState::default();
        self.report = StatusReport::default();

        Ok(())
    }

    /// Perform one control tick.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        self.report = StatusReport::default();

        // Advance the mission clock
        let dt_s = if input_data.dt_s.is_finite() && input_data.dt_s >= 0.0 {
            input_data.dt_s
        }
        else {
            warn!("Invalid tick interval ({} s), using 0", input_data.dt_s);
            self.report.dt_invalid = true;
            0.0
        };
        self.state.mission_clock_s += dt_s;
        let clock_s = self.state.mission_clock_s;

        // Speed phase
        let (phase, phase_mult) = phase_sched::schedule(&self.params.phase, clock_s);
        if self.state.phase != Some(phase) {
            info!("Entering {:?} speed phase at {:.2} s (x{})", phase, clock_s, phase_mult);
            self.state.phase = Some(phase);
        }

        // Headway and ramp, the ramp is stepped even when braking
        let headway = headway_ctrl::regulate(&self.params.headway, input_data.headway_cm);
        let ramp_factor = self.state.ramp.step(
            &self.params.ramp,
            headway.emergency_stop,
            clock_s,
            dt_s
        );

        let mut position = None;

        let wheels = if headway.emergency_stop {
            WheelDems::stop()
        }
        else {
            let pos = LateralPosition::from(input_data.line);
            self.state.drift.observe(pos, self.state.previous_position);
            self.state.previous_position = Some(pos);
            position = Some(pos);

            let (left, right) = self.nominal_speeds(pos);
            let nominal = WheelDems::new(left, right);

            // Clip again since the phase multiplier may be above one
            let mult = headway.speed_mult * ramp_factor * phase_mult;
            WheelDems::new(nominal.left_pct * mult, nominal.right_pct * mult)
        };

        let low_speed = wheels.both_below(self.params.low_speed_warning_pct);

        let indicator = select_indicator(
            &self.params,
            phase,
            position,
            headway.emergency_stop,
            low_speed
        );

        self.report.mission_clock_s = clock_s;
        self.report.position = position;
        self.report.drift_bias = self.state.drift.bias();
        self.report.headway_mult = headway.speed_mult;
        self.report.emergency_stop = headway.emergency_stop;
        self.report.ramp_state = self.state.ramp.state();
        self.report.ramp_factor = ramp_factor;
        self.report.stopped = headway.emergency_stop || self.state.ramp.is_stopped();
        self.report.phase = phase;
        self.report.phase_mult = phase_mult;
        self.report.low_speed = low_speed;

        let output = OutputData { wheels, indicator };

        trace!(
            "AvCtrl output: {:?} (position {:?}, headway x{:.2}, ramp x{:.2}, phase x{})",
            output.wheels,
            position,
            headway.speed_mult,
            ramp_factor,
            phase_mult
        );

        Ok((output, self.report))
    }
}
