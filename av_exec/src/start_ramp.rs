//! # Start ramp
//!
//! After an emergency stop the robot waits for a reaction delay once the road ahead clears, then
//! accelerates progressively by ramping a speed multiplier from 0 back up to 1.
//!
//! The reaction delay is a timed state measured on the mission clock rather than a blocking wait,
//! so the control loop keeps ticking (and keeps checking the headway) while the robot waits.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::info;
use serde::Deserialize;

use crate::av_ctrl::ParamsError;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters of the start ramp.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RampParams {
    /// Time to wait after the road ahead clears before moving off again.
    ///
    /// Units: milliseconds
    pub restart_reaction_delay_ms: f64,

    /// Rate at which the ramp multiplier increases.
    ///
    /// Units: fraction of full speed per second
    pub accel_rate: f64,
}

/// The start ramp.
#[derive(Debug, Clone)]
pub struct StartRamp {
    state: RampState,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// State of the start ramp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RampState {
    /// Stopped by an emergency stop (or not yet started).
    Stopped,

    /// The road ahead is clear, waiting for the reaction delay to elapse.
    WaitingToRestart {
        /// Mission clock time at which the road cleared.
        ///
        /// Units: seconds
        since_s: f64
    },

    /// Accelerating, or at full speed once the value reaches 1.
    Ramping(f64),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for RampParams {
    fn default() -> Self {
        Self {
            restart_reaction_delay_ms: 800.0,
            accel_rate: 0.7,
        }
    }
}

impl RampParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        if !(self.restart_reaction_delay_ms >= 0.0) {
            return Err(ParamsError::NegativeReactionDelay(self.restart_reaction_delay_ms));
        }
        if !(self.accel_rate > 0.0) {
            return Err(ParamsError::NonPositiveAccelRate(self.accel_rate));
        }

        Ok(())
    }

    fn reaction_delay_s(&self) -> f64 {
        self.restart_reaction_delay_ms / 1000.0
    }
}

impl Default for StartRamp {
    fn default() -> Self {
        Self {
            state: RampState::Stopped,
        }
    }
}

impl StartRamp {
    /// Create a new ramp, initially stopped.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the ramp by one tick, returning the speed multiplier for this tick.
    ///
    /// # Inputs
    /// - `emergency_stop`: the headway controller's emergency stop flag for this tick
    /// - `clock_s`: mission clock at this tick
    /// - `dt_s`: time since the previous tick
    pub fn step(
        &mut self,
        params: &RampParams,
        emergency_stop: bool,
        clock_s: f64,
        dt_s: f64
    ) -> f64 {
        if emergency_stop {
            if self.state != RampState::Stopped {
                info!("Emergency stop");
            }
            self.state = RampState::Stopped;
            return self.factor();
        }

        self.state = match self.state {
            RampState::Stopped => {
                info!(
                    "Road ahead clear, restarting in {:.0} ms",
                    params.restart_reaction_delay_ms
                );
                Self::wait(params, clock_s, clock_s)
            },
            RampState::WaitingToRestart { since_s } => Self::wait(params, since_s, clock_s),
            RampState::Ramping(value) => {
                RampState::Ramping((value + params.accel_rate * dt_s).min(1.0))
            }
        };

        self.factor()
    }

    /// Current speed multiplier, in [0, 1].
    pub fn factor(&self) -> f64 {
        match self.state {
            RampState::Ramping(value) => value,
            _ => 0.0
        }
    }

    /// Returns true while the robot is held stationary, i.e. stopped or waiting out the reaction
    /// delay.
    pub fn is_stopped(&self) -> bool {
        !matches!(self.state, RampState::Ramping(_))
    }

    /// Current state.
    pub fn state(&self) -> RampState {
        self.state
    }

    fn wait(params: &RampParams, since_s: f64, clock_s: f64) -> RampState {
        if clock_s - since_s >= params.reaction_delay_s() {
            info!("Reaction delay elapsed, accelerating");
            RampState::Ramping(0.0)
        }
        else {
            RampState::WaitingToRestart { since_s }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const DT: f64 = 0.02;

    fn params() -> RampParams {
        RampParams {
            restart_reaction_delay_ms: 800.0,
            accel_rate: 0.5,
        }
    }

    /// Run ticks of `DT` until the ramp leaves the waiting state, returning the clock.
    fn run_until_ramping(ramp: &mut StartRamp, p: &RampParams, mut clock: f64) -> f64 {
        while ramp.is_stopped() {
            clock += DT;
            assert_eq!(ramp.step(p, false, clock, DT), 0.0);
        }
        clock
    }

    #[test]
    fn test_initially_stopped() {
        let ramp = StartRamp::new();
        assert_eq!(ramp.state(), RampState::Stopped);
        assert_eq!(ramp.factor(), 0.0);
        assert!(ramp.is_stopped());
    }

    #[test]
    fn test_waits_for_reaction_delay() {
        let p = params();
        let mut ramp = StartRamp::new();

        // Road clears at t = 1
        assert_eq!(ramp.step(&p, false, 1.0, DT), 0.0);
        assert_eq!(ramp.state(), RampState::WaitingToRestart { since_s: 1.0 });

        // Still waiting just before the delay elapses
        assert_eq!(ramp.step(&p, false, 1.79, DT), 0.0);
        assert!(ramp.is_stopped());

        // Delay elapsed, ramp begins from zero
        assert_eq!(ramp.step(&p, false, 1.8, DT), 0.0);
        assert_eq!(ramp.state(), RampState::Ramping(0.0));
        assert!(!ramp.is_stopped());

        // And then rises at the accel rate
        let f = ramp.step(&p, false, 1.9, 0.1);
        assert!((f - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_zero_delay() {
        let p = RampParams {
            restart_reaction_delay_ms: 0.0,
            accel_rate: 0.5,
        };
        let mut ramp = StartRamp::new();

        assert_eq!(ramp.step(&p, false, 0.0, DT), 0.0);
        assert_eq!(ramp.state(), RampState::Ramping(0.0));
    }

    #[test]
    fn test_ramp_monotonic_and_saturates() {
        let p = params();
        let mut ramp = StartRamp::new();
        let mut clock = run_until_ramping(&mut ramp, &p, 0.0);

        let mut last = ramp.factor();
        assert_eq!(last, 0.0);

        // 0.5 per second means 2 seconds to full speed, run for 3
        for _ in 0..150 {
            clock += DT;
            let f = ramp.step(&p, false, clock, DT);
            assert!(f >= last);
            assert!(f >= 0.0 && f <= 1.0);
            last = f;
        }

        assert_eq!(last, 1.0);
        assert_eq!(ramp.state(), RampState::Ramping(1.0));
    }

    #[test]
    fn test_ramp_rate() {
        let p = params();
        let mut ramp = StartRamp::new();
        let mut clock = run_until_ramping(&mut ramp, &p, 0.0);

        // One simulated second in ticks of DT
        for _ in 0..50 {
            clock += DT;
            ramp.step(&p, false, clock, DT);
        }

        assert!((ramp.factor() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_stop_resets() {
        let p = params();
        let mut ramp = StartRamp::new();
        let clock = run_until_ramping(&mut ramp, &p, 0.0);
        ramp.step(&p, false, clock + 1.0, 1.0);
        assert!(ramp.factor() > 0.0);

        // Emergency stop drops straight to zero
        assert_eq!(ramp.step(&p, true, clock + 1.1, 0.1), 0.0);
        assert_eq!(ramp.state(), RampState::Stopped);
    }

    #[test]
    fn test_stop_while_waiting_restarts_delay() {
        let p = params();
        let mut ramp = StartRamp::new();

        ramp.step(&p, false, 0.0, DT);
        ramp.step(&p, false, 0.5, DT);

        // Vehicle ahead comes back before the delay elapsed
        ramp.step(&p, true, 0.6, DT);
        assert_eq!(ramp.state(), RampState::Stopped);

        // The delay is measured from the new clear time
        ramp.step(&p, false, 0.7, DT);
        assert_eq!(ramp.state(), RampState::WaitingToRestart { since_s: 0.7 });
        ramp.step(&p, false, 1.4, DT);
        assert!(ramp.is_stopped());
        ramp.step(&p, false, 1.5, DT);
        assert!(!ramp.is_stopped());
    }

    #[test]
    fn test_validate() {
        assert!(RampParams::default().validate().is_ok());
        assert!(RampParams { accel_rate: 0.0, ..params() }.validate().is_err());
        assert!(RampParams { restart_reaction_delay_ms: -1.0, ..params() }.validate().is_err());
    }
}
